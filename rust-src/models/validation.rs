//! Input validation for traffic writes.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::config::MAX_VISITS;


static DATE_PATTERN: OnceLock<Regex> = OnceLock::new();


/// Rejected client input. The message is returned to the caller verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("date must be YYYY-MM-DD string")]
    DateFormat,

    #[error("date must be a valid calendar date")]
    DateValue,

    #[error("visits must be a non-negative integer")]
    Visits,

    #[error("visits must not exceed {}", MAX_VISITS)]
    VisitsTooLarge,
}


fn date_pattern() -> &'static Regex {
    DATE_PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"))
}


/// Check that `s` is a `YYYY-MM-DD` string naming a real day.
pub fn validate_date(s: &str) -> Result<NaiveDate, ValidationError> {
    if !date_pattern().is_match(s) {
        return Err(ValidationError::DateFormat);
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ValidationError::DateValue)
}


/// Check that a JSON value is a whole number in `0..=MAX_VISITS`.
///
/// Integral floats such as `120.0` are accepted.
pub fn validate_visits(value: &Value) -> Result<i64, ValidationError> {
    let Value::Number(number) = value else {
        return Err(ValidationError::Visits);
    };

    if let Some(n) = number.as_i64() {
        return visits_in_range(n as f64).map(|_| n);
    }
    if number.is_u64() {
        return Err(ValidationError::VisitsTooLarge);
    }

    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => visits_in_range(f).map(|_| f as i64),
        _ => Err(ValidationError::Visits),
    }
}


fn visits_in_range(visits: f64) -> Result<(), ValidationError> {
    if visits < 0.0 {
        Err(ValidationError::Visits)
    } else if visits > MAX_VISITS as f64 {
        Err(ValidationError::VisitsTooLarge)
    } else {
        Ok(())
    }
}
