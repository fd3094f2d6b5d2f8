//! Monthly calendar of alcohol intake.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use drinklog_common::{AppError, AppResult, dates::month_range};
use drinklog_db::{
    entities::user,
    repositories::{AlcoholRecordRepository, RecordWithType},
};
use serde::Serialize;
use tracing::warn;

/// Total intake on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyConsumption {
    pub date: NaiveDate,
    pub total_consumption: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyConsumption {
    pub year: i32,
    pub month: u32,
    pub data: Vec<DailyConsumption>,
}

#[derive(Clone)]
pub struct CalendarService {
    record_repo: AlcoholRecordRepository,
}

impl CalendarService {
    #[must_use]
    pub const fn new(record_repo: AlcoholRecordRepository) -> Self {
        Self { record_repo }
    }

    /// Per-date intake for `user_id` over one calendar month.
    ///
    /// Only the owner or an administrator may read a user's calendar.
    pub async fn monthly(
        &self,
        caller: &user::Model,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> AppResult<MonthlyConsumption> {
        if caller.id != user_id && !caller.is_admin {
            return Err(AppError::Forbidden(
                "Cannot read another user's calendar".to_string(),
            ));
        }

        let (start, end) = month_range(year, month)?;
        let records = self
            .record_repo
            .find_with_type_in_range(user_id, start, end)
            .await?;

        Ok(MonthlyConsumption {
            year,
            month,
            data: daily_totals(&records),
        })
    }
}

/// Sum `servings * alcohol_content_per_serving` per date, in date order.
///
/// Dates without records are omitted.
#[must_use]
pub fn daily_totals(records: &[RecordWithType]) -> Vec<DailyConsumption> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for (record, alcohol_type) in records {
        let content = match alcohol_type {
            Some(t) => t.alcohol_content_per_serving,
            None => {
                warn!(record_id = %record.id, "Record has no alcohol type");
                0.0
            }
        };
        *totals.entry(record.date).or_default() += f64::from(record.servings) * content;
    }

    totals
        .into_iter()
        .map(|(date, total_consumption)| DailyConsumption {
            date,
            total_consumption,
        })
        .collect()
}
