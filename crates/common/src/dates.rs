//! Calendar date helpers shared by the record, calendar and analysis services.

use chrono::{Datelike, Duration, NaiveDate};

use crate::{AppError, AppResult};

/// Message returned when a date path segment is malformed.
pub const INVALID_DATE_FORMAT: &str = "Invalid date format. Use YYYY-MM-DD.";

/// Parse a record date in strict `YYYY-MM-DD` form.
///
/// Unpadded forms such as `2024-3-1` are rejected.
pub fn parse_record_date(value: &str) -> AppResult<NaiveDate> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    if !well_formed {
        return Err(AppError::BadRequest(INVALID_DATE_FORMAT.to_string()));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(INVALID_DATE_FORMAT.to_string()))
}

/// Serde adapters applying [`parse_record_date`] to JSON body fields.
///
/// Errors name the `date` field so they surface keyed by field.
pub mod strict_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, de::Error};

    use super::{INVALID_DATE_FORMAT, parse_record_date};

    fn parse<E: Error>(value: &str) -> Result<NaiveDate, E> {
        parse_record_date(value).map_err(|_| E::custom(format!("date: {INVALID_DATE_FORMAT}")))
    }

    /// `#[serde(deserialize_with)]` for a required date.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse(&value)
    }

    /// `#[serde(default, deserialize_with)]` for an optional date.
    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|value| parse(&value))
            .transpose()
    }
}

/// Half-open range `[first_of_month, first_of_next_month)`.
///
/// December rolls over into January of the following year.
pub fn month_range(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    let invalid = || AppError::BadRequest(format!("Invalid month: {year}-{month}"));

    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;

    Ok((start, end))
}

/// First day of the month containing `date`.
#[must_use]
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Inclusive window `[today - days, today]`.
#[must_use]
pub fn trailing_window(today: NaiveDate, days: i64) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(days), today)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_valid_date() {
        assert_eq!(parse_record_date("2024-03-01").unwrap(), ymd(2024, 3, 1));
        assert_eq!(parse_record_date("2024-02-29").unwrap(), ymd(2024, 2, 29));
    }

    #[test]
    fn test_parse_rejects_malformed_dates() {
        for bad in ["2024-3-1", "20240301", "2024/03/01", "2023-02-29", "2024-13-01", "", "abcd-ef-gh"] {
            let err = parse_record_date(bad).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(ref m) if m == INVALID_DATE_FORMAT), "{bad}");
        }
    }

    #[derive(Debug, serde::Deserialize)]
    struct Body {
        #[serde(deserialize_with = "strict_date::deserialize")]
        date: NaiveDate,
        #[serde(default, deserialize_with = "strict_date::deserialize_option")]
        until: Option<NaiveDate>,
    }

    #[test]
    fn test_strict_date_in_json_body() {
        let body: Body = serde_json::from_str(r#"{"date":"2024-03-01"}"#).unwrap();
        assert_eq!(body.date, ymd(2024, 3, 1));
        assert_eq!(body.until, None);

        let body: Body =
            serde_json::from_str(r#"{"date":"2024-03-01","until":"2024-03-05"}"#).unwrap();
        assert_eq!(body.until, Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_strict_date_error_names_the_field() {
        let err = serde_json::from_str::<Body>(r#"{"date":"2024/03/01"}"#).unwrap_err();
        assert!(err.to_string().starts_with("date: "), "{err}");

        let err =
            serde_json::from_str::<Body>(r#"{"date":"2024-03-01","until":"2024-3-5"}"#).unwrap_err();
        assert!(err.to_string().contains(INVALID_DATE_FORMAT), "{err}");
    }

    #[test]
    fn test_month_range_regular_month() {
        let (start, end) = month_range(2024, 3).unwrap();
        assert_eq!(start, ymd(2024, 3, 1));
        assert_eq!(end, ymd(2024, 4, 1));
    }

    #[test]
    fn test_month_range_december_rolls_over() {
        let (start, end) = month_range(2024, 12).unwrap();
        assert_eq!(start, ymd(2024, 12, 1));
        assert_eq!(end, ymd(2025, 1, 1));
    }

    #[test]
    fn test_month_range_rejects_invalid_month() {
        assert!(month_range(2024, 0).is_err());
        assert!(month_range(2024, 13).is_err());
    }

    #[test]
    fn test_trailing_window_is_180_days_back() {
        let (start, end) = trailing_window(ymd(2024, 6, 30), 180);
        assert_eq!(start, ymd(2024, 1, 2));
        assert_eq!(end, ymd(2024, 6, 30));
    }

    #[test]
    fn test_first_of_month() {
        assert_eq!(first_of_month(ymd(2024, 3, 17)), ymd(2024, 3, 1));
    }
}
