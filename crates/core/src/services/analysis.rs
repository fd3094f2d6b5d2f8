//! Drinking pattern analysis.
//!
//! Two windows ending today, both inclusive: the current calendar month and
//! the trailing 180 days. Every aggregate over an empty window is `None`
//! (or zero / empty for counts and lists).

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate};
use drinklog_common::{
    AppResult,
    dates::{first_of_month, trailing_window},
};
use drinklog_db::repositories::{AlcoholRecordRepository, RecordWithType};
use serde::Serialize;

/// Length of the long-term window in days.
pub const SIX_MONTHS_DAYS: i64 = 180;

/// Summed servings of one alcohol type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrinkTypeTotal {
    pub alcohol_type_name: String,
    pub total_servings: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAnalysis {
    pub drink_count: usize,
    pub drink_types: Vec<DrinkTypeTotal>,
    pub avg_drinking_duration: Option<f64>,
    pub avg_weather: Option<String>,
    pub avg_mood: Option<String>,
    pub most_drunk_this_month: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SixMonthsAnalysis {
    pub most_drunk_six_months: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub monthly_analysis: MonthlyAnalysis,
    pub six_months_analysis: SixMonthsAnalysis,
}

#[derive(Clone)]
pub struct AnalysisService {
    record_repo: AlcoholRecordRepository,
}

impl AnalysisService {
    #[must_use]
    pub const fn new(record_repo: AlcoholRecordRepository) -> Self {
        Self { record_repo }
    }

    /// Build the monthly and six-month report for `user_id` as of `today`.
    pub async fn report(&self, user_id: &str, today: NaiveDate) -> AppResult<AnalysisReport> {
        // Repository ranges are half-open.
        let end = today + Duration::days(1);

        let monthly = self
            .record_repo
            .find_with_type_in_range(user_id, first_of_month(today), end)
            .await?;

        let (six_months_start, _) = trailing_window(today, SIX_MONTHS_DAYS);
        let six_months = self
            .record_repo
            .find_with_type_in_range(user_id, six_months_start, end)
            .await?;

        Ok(AnalysisReport {
            monthly_analysis: analyze_month(&monthly),
            six_months_analysis: SixMonthsAnalysis {
                most_drunk_six_months: most_consumed(&servings_by_type(&six_months)),
            },
        })
    }
}

/// Summary of one month's records.
#[must_use]
pub fn analyze_month(records: &[RecordWithType]) -> MonthlyAnalysis {
    let drink_types = servings_by_type(records);

    MonthlyAnalysis {
        drink_count: records.len(),
        most_drunk_this_month: most_consumed(&drink_types),
        drink_types,
        avg_drinking_duration: average_duration(records),
        avg_weather: mode(records.iter().map(|(r, _)| r.weather.as_str())).map(str::to_string),
        avg_mood: mode(records.iter().map(|(r, _)| r.mood.as_str())).map(str::to_string),
    }
}

/// Total servings per alcohol type name, sorted by name.
///
/// A record whose type did not join is grouped under its type ID.
#[must_use]
pub fn servings_by_type(records: &[RecordWithType]) -> Vec<DrinkTypeTotal> {
    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();

    for (record, alcohol_type) in records {
        let name = alcohol_type
            .as_ref()
            .map_or(record.alcohol_type_id.as_str(), |t| t.name.as_str());
        *totals.entry(name).or_default() += i64::from(record.servings);
    }

    totals
        .into_iter()
        .map(|(name, total_servings)| DrinkTypeTotal {
            alcohol_type_name: name.to_string(),
            total_servings,
        })
        .collect()
}

/// Name with the highest summed servings; ties go to the smallest name.
#[must_use]
pub fn most_consumed(totals: &[DrinkTypeTotal]) -> Option<String> {
    totals
        .iter()
        .max_by(|a, b| {
            a.total_servings
                .cmp(&b.total_servings)
                .then_with(|| b.alcohol_type_name.cmp(&a.alcohol_type_name))
        })
        .map(|t| t.alcohol_type_name.clone())
}

/// Most frequent value; ties go to the lexicographically smallest.
pub fn mode<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    counts
        .into_iter()
        .max_by(|(va, ca), (vb, cb)| ca.cmp(cb).then_with(|| vb.cmp(va)))
        .map(|(value, _)| value)
}

fn average_duration(records: &[RecordWithType]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }

    let total: i64 = records
        .iter()
        .map(|(r, _)| i64::from(r.drinking_duration))
        .sum();
    Some(total as f64 / records.len() as f64)
}
