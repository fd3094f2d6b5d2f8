//! Alcohol type repository.

use std::sync::Arc;

use crate::entities::{AlcoholType, alcohol_type};
use drinklog_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Alcohol type repository for database operations.
#[derive(Clone)]
pub struct AlcoholTypeRepository {
    db: Arc<DatabaseConnection>,
}

impl AlcoholTypeRepository {
    /// Create a new alcohol type repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an alcohol type by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<alcohol_type::Model>> {
        AlcoholType::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an alcohol type by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<alcohol_type::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Alcohol type: {id}")))
    }

    /// Find an alcohol type by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<alcohol_type::Model>> {
        AlcoholType::find()
            .filter(alcohol_type::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find alcohol types by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<alcohol_type::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        AlcoholType::find()
            .filter(alcohol_type::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all alcohol types by name.
    pub async fn find_all(&self) -> AppResult<Vec<alcohol_type::Model>> {
        AlcoholType::find()
            .order_by_asc(alcohol_type::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new alcohol type.
    pub async fn create(&self, model: alcohol_type::ActiveModel) -> AppResult<alcohol_type::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
