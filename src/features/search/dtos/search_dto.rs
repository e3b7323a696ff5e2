use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::features::search::models::{IncidentSummary, Report};
use crate::shared::constants::MEDIA_URL;
use crate::shared::timezone::{format_in, localize_utc};
use crate::shared::validation::{
    parse_date, parse_time, validate_date, validate_time, validation_error,
};

/// Key under which `validator` files struct-level (non-field) errors
const NON_FIELD_ERRORS: &str = "__all__";

// =============================================================================
// FORM INPUT
// =============================================================================

/// Search form shared by incident and report search.
///
/// Missing fields deserialize as empty strings so they surface as field
/// errors instead of request rejections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SearchForm {
    #[validate(custom(function = "validate_date"))]
    pub s_date: String,

    #[validate(custom(function = "validate_time"))]
    pub s_time: String,

    #[validate(custom(function = "validate_date"))]
    pub e_date: String,

    #[validate(custom(function = "validate_time"))]
    pub e_time: String,

    /// Free-text filter, empty matches everything
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub text: String,

    /// "", "open" or "closed"
    #[validate(custom(function = "validate_status"))]
    pub status: String,
}

/// Open/closed filter for incident search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    Any,
    Open,
    Closed,
}

impl StatusFilter {
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value.trim() {
            "" => Some(Self::Any),
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// Cleaned form data: wall-clock bounds still without a timezone
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub text: String,
    pub status: StatusFilter,
}

impl SearchCriteria {
    /// Localize both bounds to `tz` and convert them to UTC
    pub fn bounds_in(&self, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
        (localize_utc(self.start, tz), localize_utc(self.end, tz))
    }
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    StatusFilter::from_form_value(value)
        .map(|_| ())
        .ok_or_else(|| {
            validation_error(
                "invalid_choice",
                "Select a valid choice. That choice is not one of the available choices.",
            )
        })
}

impl SearchForm {
    /// Validate the form and return the cleaned criteria
    pub fn clean(&self) -> Result<SearchCriteria, ValidationErrors> {
        self.validate()?;
        self.parse_criteria().map_err(|e| {
            let mut errors = ValidationErrors::new();
            errors.add(NON_FIELD_ERRORS, e);
            errors
        })
    }

    fn parse_criteria(&self) -> Result<SearchCriteria, ValidationError> {
        let start = parse_date(&self.s_date)?.and_time(parse_time(&self.s_time)?);
        let end = parse_date(&self.e_date)?.and_time(parse_time(&self.e_time)?);
        let status = StatusFilter::from_form_value(&self.status)
            .ok_or_else(|| validation_error("invalid_choice", "Select a valid choice."))?;

        Ok(SearchCriteria {
            start,
            end,
            text: self.text.trim().to_string(),
            status,
        })
    }
}

/// Validation errors in the shape the form templates render
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormErrors {
    /// Field name -> messages
    pub fields: BTreeMap<String, Vec<String>>,
    pub non_field: Vec<String>,
}

impl From<&ValidationErrors> for FormErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut form_errors = FormErrors::default();
        for (field, field_errors) in errors.field_errors() {
            let messages = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect::<Vec<_>>();

            if field == NON_FIELD_ERRORS {
                form_errors.non_field.extend(messages);
            } else {
                form_errors.fields.insert(field.to_string(), messages);
            }
        }
        form_errors
    }
}

// =============================================================================
// RESULT VIEWS
// =============================================================================

/// Incident search result, timestamps formatted in the requester's zone
#[derive(Debug, Clone, Serialize)]
pub struct IncidentResultDto {
    pub id: i64,
    pub date: String,
    pub closed: Option<String>,
    pub detail: String,
    pub is_open: bool,
}

impl IncidentResultDto {
    pub fn localized(incident: IncidentSummary, tz: Tz) -> Self {
        Self {
            id: incident.id,
            date: format_in(incident.date, tz),
            closed: incident.closed.map(|closed| format_in(closed, tz)),
            is_open: incident.is_open(),
            detail: incident.detail,
        }
    }
}

/// Report search result, timestamps formatted in the requester's zone
#[derive(Debug, Clone, Serialize)]
pub struct ReportResultDto {
    pub id: i64,
    pub date: String,
    pub name: String,
    pub email: String,
    pub description: String,
    pub additional: Option<String>,
    /// Link under `MEDIA_URL`, `None` when absent or not a storage path
    pub screenshot1: Option<String>,
    pub screenshot2: Option<String>,
}

/// Map a stored upload reference to its URL under `MEDIA_URL`.
///
/// References are relative storage paths. Anything carrying a scheme, a
/// backslash or a `..` segment is dropped rather than linked.
fn media_url(reference: Option<String>) -> Option<String> {
    let reference = reference?;
    let path = reference.trim().trim_start_matches('/');
    if path.is_empty()
        || path.contains(':')
        || path.contains('\\')
        || path.split('/').any(|segment| segment == "..")
    {
        if !path.is_empty() {
            tracing::warn!("Dropping screenshot reference that is not a storage path: {:?}", reference);
        }
        return None;
    }
    Some(format!("{}{}", MEDIA_URL, path))
}

impl ReportResultDto {
    pub fn localized(report: Report, tz: Tz) -> Self {
        Self {
            id: report.id,
            date: format_in(report.date, tz),
            name: report.name,
            email: report.email,
            description: report.description,
            additional: report.additional,
            screenshot1: media_url(report.screenshot1),
            screenshot2: media_url(report.screenshot2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn form(s_date: &str, s_time: &str, e_date: &str, e_time: &str) -> SearchForm {
        SearchForm {
            s_date: s_date.to_string(),
            s_time: s_time.to_string(),
            e_date: e_date.to_string(),
            e_time: e_time.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_valid_form() {
        let mut f = form("2024-01-01", "00:00", "2024-01-31", "23:59:59");
        f.text = "  outage ".to_string();
        f.status = "open".to_string();

        let criteria = f.clean().unwrap();
        assert_eq!(
            criteria.start,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert_eq!(
            criteria.end,
            NaiveDate::from_ymd_opt(2024, 1, 31)
                .unwrap()
                .and_hms_opt(23, 59, 59)
                .unwrap()
        );
        assert_eq!(criteria.text, "outage");
        assert_eq!(criteria.status, StatusFilter::Open);
    }

    #[test]
    fn test_clean_reports_field_errors() {
        let f = form("2024-02-30", "", "2024-03-01", "10:00");
        let errors = f.clean().unwrap_err();
        let form_errors = FormErrors::from(&errors);

        assert_eq!(
            form_errors.fields.get("s_date"),
            Some(&vec!["Enter a valid date.".to_string()])
        );
        assert_eq!(
            form_errors.fields.get("s_time"),
            Some(&vec!["This field is required.".to_string()])
        );
        assert!(!form_errors.fields.contains_key("e_date"));
        assert!(form_errors.non_field.is_empty());
    }

    #[test]
    fn test_clean_rejects_unknown_status() {
        let mut f = form("2024-01-01", "00:00", "2024-01-02", "00:00");
        f.status = "pending".to_string();
        let form_errors = FormErrors::from(&f.clean().unwrap_err());
        assert!(form_errors.fields.contains_key("status"));
    }

    #[test]
    fn test_clean_accepts_inverted_range() {
        let criteria = form("2024-05-02", "00:00", "2024-05-01", "00:00")
            .clean()
            .unwrap();
        assert!(criteria.start > criteria.end);
    }

    #[test]
    fn test_text_too_long() {
        let mut f = form("2024-01-01", "00:00", "2024-01-02", "00:00");
        f.text = "x".repeat(256);
        let form_errors = FormErrors::from(&f.clean().unwrap_err());
        assert!(form_errors.fields.contains_key("text"));
    }

    #[test]
    fn test_status_filter_values() {
        assert_eq!(StatusFilter::from_form_value(""), Some(StatusFilter::Any));
        assert_eq!(StatusFilter::from_form_value("open"), Some(StatusFilter::Open));
        assert_eq!(
            StatusFilter::from_form_value("closed"),
            Some(StatusFilter::Closed)
        );
        assert_eq!(StatusFilter::from_form_value("OPEN"), None);
    }

    #[test]
    fn test_bounds_in_timezone() {
        let criteria = form("2024-01-01", "00:00", "2024-01-01", "12:00")
            .clean()
            .unwrap();
        let (start, end) = criteria.bounds_in(Tz::Asia__Tokyo);
        assert_eq!(start, Utc.with_ymd_and_hms(2023, 12, 31, 15, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 1, 3, 0, 0).unwrap());
    }

    #[test]
    fn test_incident_result_localized() {
        let incident = IncidentSummary {
            id: 7,
            date: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            closed: None,
            detail: "Mail delays".to_string(),
        };
        let dto = IncidentResultDto::localized(incident, Tz::Europe__Berlin);
        assert_eq!(dto.date, "2024-01-01 13:00 CET");
        assert!(dto.is_open);
        assert!(dto.closed.is_none());
    }

    #[test]
    fn test_report_screenshots_served_from_media() {
        let report = Report {
            id: 3,
            date: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            description: "Broken login".to_string(),
            additional: None,
            screenshot1: Some("screenshots/login.png".to_string()),
            screenshot2: Some("/screenshots/second.png".to_string()),
        };
        let dto = ReportResultDto::localized(report, Tz::UTC);
        assert_eq!(dto.screenshot1.as_deref(), Some("/media/screenshots/login.png"));
        assert_eq!(dto.screenshot2.as_deref(), Some("/media/screenshots/second.png"));
    }

    #[test]
    fn test_media_url_drops_non_storage_references() {
        for reference in [
            "javascript:alert(document.cookie)",
            "https://evil.example/x.png",
            "data:text/html,hi",
            "../secrets.txt",
            "screenshots\\..\\x.png",
            "   ",
        ] {
            assert_eq!(media_url(Some(reference.to_string())), None, "{}", reference);
        }
        assert_eq!(media_url(None), None);
    }
}
