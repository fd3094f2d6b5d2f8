//! Alcohol record service.
//!
//! A record is addressed by `(caller, date)`. Dates arriving as path segments
//! are parsed strictly as `YYYY-MM-DD`.

use std::collections::HashSet;

use chrono::NaiveDate;
use drinklog_common::{
    AppError, AppResult, IdGenerator,
    dates::{parse_record_date, strict_date},
};
use drinklog_db::{
    entities::alcohol_record::{self, Mood, Weather},
    repositories::{AlcoholRecordRepository, AlcoholTypeRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Deserializer, Serialize, de};
use tracing::info;
use validator::Validate;

/// One record in a create payload. The owner is always the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordInput {
    #[serde(deserialize_with = "strict_date::deserialize")]
    pub date: NaiveDate,

    #[validate(length(min = 1))]
    pub alcohol_type_id: String,

    #[validate(range(min = 0))]
    pub servings: i32,

    #[validate(range(min = 0))]
    pub drinking_duration: i32,

    pub weather: Weather,

    pub mood: Mood,
}

/// Create payload: a single record object or a JSON array of them.
#[derive(Debug)]
pub enum RecordPayload {
    Batch(Vec<RecordInput>),
    Single(RecordInput),
}

// Branch on the JSON shape first so field errors from `RecordInput` survive.
impl<'de> Deserialize<'de> for RecordPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;

        let payload = if value.is_array() {
            serde_json::from_value(value).map(Self::Batch)
        } else {
            serde_json::from_value(value).map(Self::Single)
        };
        payload.map_err(de::Error::custom)
    }
}

impl RecordPayload {
    fn into_inputs(self) -> Vec<RecordInput> {
        match self {
            Self::Batch(inputs) => inputs,
            Self::Single(input) => vec![input],
        }
    }

    const fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateRecordInput {
    #[serde(default, deserialize_with = "strict_date::deserialize_option")]
    pub date: Option<NaiveDate>,

    #[validate(length(min = 1))]
    pub alcohol_type_id: Option<String>,

    #[validate(range(min = 0))]
    pub servings: Option<i32>,

    #[validate(range(min = 0))]
    pub drinking_duration: Option<i32>,

    pub weather: Option<Weather>,

    pub mood: Option<Mood>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordResponse {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub alcohol_type_id: String,
    pub servings: i32,
    pub drinking_duration: i32,
    pub weather: Weather,
    pub mood: Mood,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<alcohol_record::Model> for RecordResponse {
    fn from(r: alcohol_record::Model) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            date: r.date,
            alcohol_type_id: r.alcohol_type_id,
            servings: r.servings,
            drinking_duration: r.drinking_duration,
            weather: r.weather,
            mood: r.mood,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Result of a create, shaped like the payload that produced it.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreatedRecords {
    Single(RecordResponse),
    Batch(Vec<RecordResponse>),
}

/// Record service for business logic.
#[derive(Clone)]
pub struct RecordService {
    record_repo: AlcoholRecordRepository,
    alcohol_type_repo: AlcoholTypeRepository,
    id_gen: IdGenerator,
}

impl RecordService {
    /// Create a new record service.
    #[must_use]
    pub const fn new(
        record_repo: AlcoholRecordRepository,
        alcohol_type_repo: AlcoholTypeRepository,
    ) -> Self {
        Self {
            record_repo,
            alcohol_type_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List the caller's records, by date.
    pub async fn list(&self, user_id: &str) -> AppResult<Vec<RecordResponse>> {
        let records = self.record_repo.find_by_user(user_id).await?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Create one record or a batch.
    ///
    /// The whole payload is checked before anything is written; a batch is
    /// inserted in a single transaction.
    pub async fn create(&self, user_id: &str, payload: RecordPayload) -> AppResult<CreatedRecords> {
        let is_batch = payload.is_batch();
        let inputs = payload.into_inputs();

        if inputs.is_empty() {
            return Err(AppError::Validation(
                "At least one record is required".to_string(),
            ));
        }

        for input in &inputs {
            input.validate()?;
        }

        let mut seen = HashSet::with_capacity(inputs.len());
        if let Some(dup) = inputs.iter().find(|i| !seen.insert(i.date)) {
            return Err(AppError::Conflict(format!(
                "Duplicate date in payload: {}",
                dup.date
            )));
        }

        self.ensure_alcohol_types_exist(&inputs).await?;

        let dates: Vec<NaiveDate> = inputs.iter().map(|i| i.date).collect();
        let taken = self.record_repo.find_taken_dates(user_id, &dates).await?;
        if let Some(date) = taken.first() {
            return Err(AppError::Conflict(format!(
                "A record already exists for {date}"
            )));
        }

        let now = chrono::Utc::now();
        let mut models: Vec<alcohol_record::ActiveModel> = inputs
            .into_iter()
            .map(|input| alcohol_record::ActiveModel {
                id: Set(self.id_gen.generate()),
                user_id: Set(user_id.to_string()),
                date: Set(input.date),
                alcohol_type_id: Set(input.alcohol_type_id),
                servings: Set(input.servings),
                drinking_duration: Set(input.drinking_duration),
                weather: Set(input.weather),
                mood: Set(input.mood),
                created_at: Set(now.into()),
                updated_at: Set(None),
            })
            .collect();

        if is_batch {
            let created = self.record_repo.create_many(models).await?;
            info!(user_id = %user_id, count = created.len(), "Records created");
            Ok(CreatedRecords::Batch(
                created.into_iter().map(Into::into).collect(),
            ))
        } else {
            let model = models
                .pop()
                .ok_or_else(|| AppError::Internal("Empty record payload".to_string()))?;
            let created = self.record_repo.create(model).await?;
            info!(user_id = %user_id, date = %created.date, "Record created");
            Ok(CreatedRecords::Single(created.into()))
        }
    }

    /// Get the caller's record for a `YYYY-MM-DD` date.
    pub async fn get_by_date(&self, user_id: &str, date: &str) -> AppResult<RecordResponse> {
        let date = parse_record_date(date)?;
        let record = self.record_repo.get_by_user_and_date(user_id, date).await?;
        Ok(record.into())
    }

    /// Apply a partial update to the caller's record for a date.
    pub async fn update_by_date(
        &self,
        user_id: &str,
        date: &str,
        input: UpdateRecordInput,
    ) -> AppResult<RecordResponse> {
        let date = parse_record_date(date)?;
        input.validate()?;

        let record = self.record_repo.get_by_user_and_date(user_id, date).await?;

        if let Some(new_date) = input.date.filter(|d| *d != date) {
            let taken = self
                .record_repo
                .find_by_user_and_date(user_id, new_date)
                .await?;
            if taken.is_some() {
                return Err(AppError::Conflict(format!(
                    "A record already exists for {new_date}"
                )));
            }
        }

        if let Some(type_id) = input
            .alcohol_type_id
            .as_deref()
            .filter(|id| *id != record.alcohol_type_id)
        {
            if self.alcohol_type_repo.find_by_id(type_id).await?.is_none() {
                return Err(AppError::Validation(format!(
                    "alcohol_type_id: unknown alcohol type {type_id}"
                )));
            }
        }

        let mut active: alcohol_record::ActiveModel = record.into();

        if let Some(date) = input.date {
            active.date = Set(date);
        }
        if let Some(alcohol_type_id) = input.alcohol_type_id {
            active.alcohol_type_id = Set(alcohol_type_id);
        }
        if let Some(servings) = input.servings {
            active.servings = Set(servings);
        }
        if let Some(duration) = input.drinking_duration {
            active.drinking_duration = Set(duration);
        }
        if let Some(weather) = input.weather {
            active.weather = Set(weather);
        }
        if let Some(mood) = input.mood {
            active.mood = Set(mood);
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.record_repo.update(active).await?;
        info!(user_id = %user_id, date = %updated.date, "Record updated");
        Ok(updated.into())
    }

    /// Permanently delete the caller's record for a date.
    pub async fn delete_by_date(&self, user_id: &str, date: &str) -> AppResult<()> {
        let date = parse_record_date(date)?;

        if !self.record_repo.delete_by_user_and_date(user_id, date).await? {
            return Err(AppError::RecordNotFound(date.to_string()));
        }

        info!(user_id = %user_id, date = %date, "Record deleted");
        Ok(())
    }

    async fn ensure_alcohol_types_exist(&self, inputs: &[RecordInput]) -> AppResult<()> {
        let mut ids: Vec<String> = inputs.iter().map(|i| i.alcohol_type_id.clone()).collect();
        ids.sort();
        ids.dedup();

        let found: HashSet<String> = self
            .alcohol_type_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();

        match ids.iter().find(|id| !found.contains(*id)) {
            Some(missing) => Err(AppError::Validation(format!(
                "alcohol_type_id: unknown alcohol type {missing}"
            ))),
            None => Ok(()),
        }
    }
}
