use std::borrow::Cow;

use chrono::{NaiveDate, NaiveTime};
use validator::ValidationError;

/// Accepted date inputs, tried in order
/// - Valid: "2024-03-01", "03/01/2024"
/// - Invalid: "2024-13-01", "01.03.2024", "yesterday"
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Accepted time inputs (24h clock), tried in order
/// - Valid: "09:30", "23:59:59"
/// - Invalid: "24:00", "9.30", "noon"
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

pub fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn required_error() -> ValidationError {
    validation_error("required", "This field is required.")
}

pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .ok_or_else(|| validation_error("invalid_date", "Enter a valid date."))
}

pub fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    let value = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
        .ok_or_else(|| validation_error("invalid_time", "Enter a valid time."))
}

/// Required date field
pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(required_error());
    }
    parse_date(value).map(|_| ())
}

/// Required time field
pub fn validate_time(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(required_error());
    }
    parse_time(value).map(|_| ())
}
