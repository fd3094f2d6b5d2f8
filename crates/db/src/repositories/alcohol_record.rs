//! Alcohol record repository.
//!
//! Every query is keyed by the owning user; a record is addressed by
//! `(user_id, date)`, never by its row ID alone.

use std::sync::Arc;

use super::write_error;
use crate::entities::{AlcoholRecord, AlcoholType, alcohol_record, alcohol_type};
use chrono::NaiveDate;
use drinklog_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};

/// A record joined with its alcohol type.
pub type RecordWithType = (alcohol_record::Model, Option<alcohol_type::Model>);

/// Alcohol record repository for database operations.
#[derive(Clone)]
pub struct AlcoholRecordRepository {
    db: Arc<DatabaseConnection>,
}

impl AlcoholRecordRepository {
    /// Create a new alcohol record repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user's record for a date.
    pub async fn find_by_user_and_date(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> AppResult<Option<alcohol_record::Model>> {
        AlcoholRecord::find()
            .filter(alcohol_record::Column::UserId.eq(user_id))
            .filter(alcohol_record::Column::Date.eq(date))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user's record for a date, returning an error if not found.
    pub async fn get_by_user_and_date(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> AppResult<alcohol_record::Model> {
        self.find_by_user_and_date(user_id, date)
            .await?
            .ok_or_else(|| AppError::RecordNotFound(date.to_string()))
    }

    /// List all of a user's records, by date.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<alcohol_record::Model>> {
        AlcoholRecord::find()
            .filter(alcohol_record::Column::UserId.eq(user_id))
            .order_by_asc(alcohol_record::Column::Date)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Which of `dates` already hold a record for this user.
    pub async fn find_taken_dates(
        &self,
        user_id: &str,
        dates: &[NaiveDate],
    ) -> AppResult<Vec<NaiveDate>> {
        if dates.is_empty() {
            return Ok(vec![]);
        }

        AlcoholRecord::find()
            .select_only()
            .column(alcohol_record::Column::Date)
            .filter(alcohol_record::Column::UserId.eq(user_id))
            .filter(alcohol_record::Column::Date.is_in(dates.iter().copied()))
            .into_tuple::<NaiveDate>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Records with their alcohol type for `start <= date < end`.
    pub async fn find_with_type_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<RecordWithType>> {
        AlcoholRecord::find()
            .find_also_related(AlcoholType)
            .filter(alcohol_record::Column::UserId.eq(user_id))
            .filter(alcohol_record::Column::Date.gte(start))
            .filter(alcohol_record::Column::Date.lt(end))
            .order_by_asc(alcohol_record::Column::Date)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new record.
    ///
    /// A second record for the same user and date is a conflict.
    pub async fn create(
        &self,
        model: alcohol_record::ActiveModel,
    ) -> AppResult<alcohol_record::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| write_error(e, date_taken))
    }

    /// Create several records in one transaction.
    ///
    /// Either every record is inserted or none is.
    pub async fn create_many(
        &self,
        models: Vec<alcohol_record::ActiveModel>,
    ) -> AppResult<Vec<alcohol_record::Model>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut created = Vec::with_capacity(models.len());
        for model in models {
            // Dropping `txn` on error rolls the batch back
            let record = model
                .insert(&txn)
                .await
                .map_err(|e| write_error(e, date_taken))?;
            created.push(record);
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(created)
    }

    /// Update a record.
    pub async fn update(
        &self,
        model: alcohol_record::ActiveModel,
    ) -> AppResult<alcohol_record::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| write_error(e, date_taken))
    }

    /// Delete a user's record for a date. Returns whether a row was removed.
    pub async fn delete_by_user_and_date(&self, user_id: &str, date: NaiveDate) -> AppResult<bool> {
        let deleted = AlcoholRecord::delete_many()
            .filter(alcohol_record::Column::UserId.eq(user_id))
            .filter(alcohol_record::Column::Date.eq(date))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(deleted.rows_affected > 0)
    }
}

fn date_taken() -> String {
    "A record already exists for this date".to_string()
}
