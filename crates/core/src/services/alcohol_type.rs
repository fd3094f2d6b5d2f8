//! Alcohol type catalog.

use drinklog_common::{AppError, AppResult, IdGenerator};
use drinklog_db::{
    entities::{alcohol_type, user},
    repositories::AlcoholTypeRepository,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

/// Input for adding an alcohol type to the catalog.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAlcoholTypeInput {
    #[validate(length(min = 1, max = 50))]
    pub name: String,

    #[validate(range(min = 0.0))]
    pub alcohol_content_per_serving: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlcoholTypeResponse {
    pub id: String,
    pub name: String,
    pub alcohol_content_per_serving: f64,
}

impl From<alcohol_type::Model> for AlcoholTypeResponse {
    fn from(t: alcohol_type::Model) -> Self {
        Self {
            id: t.id,
            name: t.name,
            alcohol_content_per_serving: t.alcohol_content_per_serving,
        }
    }
}

/// Alcohol type service.
#[derive(Clone)]
pub struct AlcoholTypeService {
    alcohol_type_repo: AlcoholTypeRepository,
    id_gen: IdGenerator,
}

impl AlcoholTypeService {
    #[must_use]
    pub const fn new(alcohol_type_repo: AlcoholTypeRepository) -> Self {
        Self {
            alcohol_type_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List every type, by name.
    pub async fn list(&self) -> AppResult<Vec<AlcoholTypeResponse>> {
        let types = self.alcohol_type_repo.find_all().await?;
        Ok(types.into_iter().map(Into::into).collect())
    }

    /// Add a type. Admin only.
    pub async fn create(
        &self,
        requester: &user::Model,
        input: CreateAlcoholTypeInput,
    ) -> AppResult<AlcoholTypeResponse> {
        if !requester.is_admin {
            return Err(AppError::Forbidden(
                "Only administrators can add alcohol types".to_string(),
            ));
        }

        input.validate()?;

        if self
            .alcohol_type_repo
            .find_by_name(&input.name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Alcohol type already exists: {}",
                input.name
            )));
        }

        let model = alcohol_type::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            alcohol_content_per_serving: Set(input.alcohol_content_per_serving),
        };

        let created = self.alcohol_type_repo.create(model).await?;
        info!(alcohol_type_id = %created.id, name = %created.name, "Alcohol type added");
        Ok(created.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_user(is_admin: bool) -> user::Model {
        user::Model {
            id: "user1".to_string(),
            username: "alice".to_string(),
            nickname: "ally".to_string(),
            password: "hash".to_string(),
            gender: "female".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1995, 5, 5).unwrap(),
            token: None,
            is_admin,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn soju() -> alcohol_type::Model {
        alcohol_type::Model {
            id: "soju".to_string(),
            name: "Soju".to_string(),
            alcohol_content_per_serving: 7.9,
        }
    }

    fn service_with(db: MockDatabase) -> AlcoholTypeService {
        AlcoholTypeService::new(AlcoholTypeRepository::new(Arc::new(db.into_connection())))
    }

    fn input(name: &str) -> CreateAlcoholTypeInput {
        CreateAlcoholTypeInput {
            name: name.to_string(),
            alcohol_content_per_serving: 14.0,
        }
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let service = service_with(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service.create(&test_user(false), input("Beer")).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[soju()]]),
        );

        let result = service.create(&test_user(true), input("Soju")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_content() {
        let service = service_with(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service
            .create(
                &test_user(true),
                CreateAlcoholTypeInput {
                    name: "Water".to_string(),
                    alcohol_content_per_serving: -1.0,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_as_admin() {
        let beer = alcohol_type::Model {
            id: "beer".to_string(),
            name: "Beer".to_string(),
            alcohol_content_per_serving: 14.0,
        };
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<alcohol_type::Model>::new()])
                .append_query_results([[beer]]),
        );

        let created = service.create(&test_user(true), input("Beer")).await.unwrap();
        assert_eq!(created.name, "Beer");
    }

    #[tokio::test]
    async fn test_list() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[soju()]]),
        );

        let types = service.list().await.unwrap();
        assert_eq!(types.len(), 1);
        assert!((types[0].alcohol_content_per_serving - 7.9).abs() < f64::EPSILON);
    }
}
