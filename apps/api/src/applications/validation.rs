use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::applications::dto::JobApplicationRequest;
use crate::models::job_application::{ApplicationStatus, JobApplicationFields};

pub const COMPANY_MAX_LEN: usize = 200;
pub const POSITION_MAX_LEN: usize = 200;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const LOCATION_MAX_LEN: usize = 100;
pub const NOTES_MAX_LEN: usize = 500;
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Checks a create/update body and, if every rule passes, returns the fields
/// that get persisted. All failures are collected, not just the first.
///
/// `description`, `location`, `salaryExpected` and `notes` are checked but not
/// returned: the row has nowhere to keep them.
pub fn validate_request(req: &JobApplicationRequest) -> Result<JobApplicationFields, Vec<FieldError>> {
    let mut errors = Vec::new();

    let company = required_text(
        &mut errors,
        "company",
        req.company.as_deref(),
        COMPANY_MAX_LEN,
        "Company name is required",
        "Company name cannot exceed 200 characters",
    );
    let position = required_text(
        &mut errors,
        "position",
        req.position.as_deref(),
        POSITION_MAX_LEN,
        "Position is required",
        "Position cannot exceed 200 characters",
    );

    let status = match &req.status {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("status", "Status is required"));
            None
        }
        Some(value) => {
            let parsed = parse_status(value);
            if parsed.is_none() {
                errors.push(FieldError::new("status", invalid_status_message()));
            }
            parsed
        }
    };

    let date_applied = match req.date_applied.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push(FieldError::new("dateApplied", "Date applied is required"));
            None
        }
        Some(raw) => {
            let parsed = parse_date_applied(raw);
            if parsed.is_none() {
                errors.push(FieldError::new(
                    "dateApplied",
                    "Date applied must be a date (YYYY-MM-DD) or an RFC 3339 timestamp in years 0001-9999",
                ));
            }
            parsed
        }
    };

    optional_text(
        &mut errors,
        "description",
        req.description.as_deref(),
        DESCRIPTION_MAX_LEN,
        "Description cannot exceed 500 characters",
    );
    optional_text(
        &mut errors,
        "location",
        req.location.as_deref(),
        LOCATION_MAX_LEN,
        "Location cannot exceed 100 characters",
    );
    optional_text(
        &mut errors,
        "notes",
        req.notes.as_deref(),
        NOTES_MAX_LEN,
        "Notes cannot exceed 500 characters",
    );

    if let Some(salary) = req.salary_expected {
        if !salary.is_finite() || salary < 0.0 {
            errors.push(FieldError::new(
                "salaryExpected",
                "Salary expected must be a positive value",
            ));
        }
    }

    match (company, position, status, date_applied) {
        (Some(company), Some(position), Some(status), Some(date_applied)) if errors.is_empty() => {
            Ok(JobApplicationFields {
                company,
                position,
                status,
                date_applied,
            })
        }
        _ => Err(errors),
    }
}

fn required_text(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: Option<&str>,
    max_len: usize,
    missing: &str,
    too_long: &str,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => {
            if v.chars().count() > max_len {
                errors.push(FieldError::new(field, too_long));
                None
            } else {
                Some(v.to_string())
            }
        }
        _ => {
            errors.push(FieldError::new(field, missing));
            None
        }
    }
}

fn optional_text(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: Option<&str>,
    max_len: usize,
    too_long: &str,
) {
    if let Some(v) = value {
        if v.chars().count() > max_len {
            errors.push(FieldError::new(field, too_long));
        }
    }
}

fn parse_status(value: &Value) -> Option<ApplicationStatus> {
    match value {
        Value::Number(n) => n.as_i64().and_then(ApplicationStatus::from_ordinal),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

pub fn invalid_status_message() -> String {
    let names: Vec<&str> = ApplicationStatus::ALL.iter().map(|s| s.as_str()).collect();
    format!("Status must be one of {}", names.join(", "))
}

/// Accepts `2025-09-15`, `2025-09-15T10:30:00` (read as UTC) or any RFC 3339 timestamp.
///
/// The UTC result must fall in years 1..=9999: the column is TEXT, and signed
/// or five-digit years would not sort chronologically.
pub fn parse_date_applied(raw: &str) -> Option<DateTime<Utc>> {
    parse_any_date(raw).filter(|dt| (MIN_YEAR..=MAX_YEAR).contains(&dt.year()))
}

fn parse_any_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_request() -> JobApplicationRequest {
        JobApplicationRequest {
            company: Some("BigTech Corp".to_string()),
            position: Some("Platform Engineer".to_string()),
            status: Some(json!("Applied")),
            date_applied: Some("2025-09-15".to_string()),
            ..Default::default()
        }
    }

    fn fields_of(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_valid_request_produces_fields() {
        let fields = validate_request(&valid_request()).unwrap();
        assert_eq!(fields.company, "BigTech Corp");
        assert_eq!(fields.position, "Platform Engineer");
        assert_eq!(fields.status, ApplicationStatus::Applied);
        assert_eq!(
            fields.date_applied,
            Utc.with_ymd_and_hms(2025, 9, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_empty_request_reports_every_required_field() {
        let errors = validate_request(&JobApplicationRequest::default()).unwrap_err();
        assert_eq!(
            fields_of(&errors),
            vec!["company", "position", "status", "dateApplied"]
        );
        assert_eq!(errors[0].message, "Company name is required");
        assert_eq!(errors[3].message, "Date applied is required");
    }

    #[test]
    fn test_whitespace_company_is_missing() {
        let req = JobApplicationRequest {
            company: Some("   ".to_string()),
            ..valid_request()
        };
        let errors = validate_request(&req).unwrap_err();
        assert_eq!(errors, vec![FieldError::new("company", "Company name is required")]);
    }

    #[test]
    fn test_length_limits_count_characters() {
        let at_limit = JobApplicationRequest {
            company: Some("é".repeat(200)),
            ..valid_request()
        };
        assert!(validate_request(&at_limit).is_ok());

        let over = JobApplicationRequest {
            company: Some("a".repeat(201)),
            position: Some("b".repeat(201)),
            ..valid_request()
        };
        let errors = validate_request(&over).unwrap_err();
        assert_eq!(fields_of(&errors), vec!["company", "position"]);
        assert_eq!(errors[1].message, "Position cannot exceed 200 characters");
    }

    #[test]
    fn test_optional_fields_are_checked() {
        let req = JobApplicationRequest {
            description: Some("d".repeat(501)),
            location: Some("l".repeat(101)),
            salary_expected: Some(-1.0),
            notes: Some("n".repeat(501)),
            ..valid_request()
        };
        let errors = validate_request(&req).unwrap_err();
        assert_eq!(
            fields_of(&errors),
            vec!["description", "location", "notes", "salaryExpected"]
        );
    }

    #[test]
    fn test_optional_fields_within_limits_pass() {
        let req = JobApplicationRequest {
            description: Some("Remote-first team".to_string()),
            location: Some("Berlin".to_string()),
            salary_expected: Some(0.0),
            notes: Some("Referral from Sam".to_string()),
            ..valid_request()
        };
        assert!(validate_request(&req).is_ok());
    }

    #[test]
    fn test_status_accepts_ordinal_and_any_case() {
        let by_ordinal = JobApplicationRequest {
            status: Some(json!(3)),
            ..valid_request()
        };
        assert_eq!(
            validate_request(&by_ordinal).unwrap().status,
            ApplicationStatus::Interview
        );

        let by_name = JobApplicationRequest {
            status: Some(json!("underreview")),
            ..valid_request()
        };
        assert_eq!(
            validate_request(&by_name).unwrap().status,
            ApplicationStatus::UnderReview
        );
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        for bad in [json!(0), json!(7), json!("Hired"), json!(true), json!(2.5)] {
            let req = JobApplicationRequest {
                status: Some(bad.clone()),
                ..valid_request()
            };
            let errors = validate_request(&req).unwrap_err();
            assert_eq!(fields_of(&errors), vec!["status"], "value {bad}");
            assert!(errors[0].message.starts_with("Status must be one of Applied"));
        }
    }

    #[test]
    fn test_null_status_is_missing() {
        let req = JobApplicationRequest {
            status: Some(Value::Null),
            ..valid_request()
        };
        let errors = validate_request(&req).unwrap_err();
        assert_eq!(errors[0].message, "Status is required");
    }

    #[test]
    fn test_parse_date_applied_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 9, 15, 10, 30, 0).unwrap();
        assert_eq!(parse_date_applied("2025-09-15T10:30:00Z"), Some(expected));
        assert_eq!(parse_date_applied("2025-09-15T12:30:00+02:00"), Some(expected));
        assert_eq!(parse_date_applied("2025-09-15T10:30:00"), Some(expected));
        assert_eq!(
            parse_date_applied("2025-09-15"),
            Some(Utc.with_ymd_and_hms(2025, 9, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_date_applied("15/09/2025"), None);
        assert_eq!(parse_date_applied("2025-02-30"), None);
    }

    #[test]
    fn test_bad_date_is_reported() {
        let req = JobApplicationRequest {
            date_applied: Some("yesterday".to_string()),
            ..valid_request()
        };
        let errors = validate_request(&req).unwrap_err();
        assert_eq!(fields_of(&errors), vec!["dateApplied"]);
    }

    #[test]
    fn test_parse_date_applied_rejects_years_outside_four_digits() {
        assert_eq!(parse_date_applied("+10000-01-01"), None);
        assert_eq!(parse_date_applied("-0500-06-01"), None);
        assert_eq!(parse_date_applied("0000-12-31"), None);
        // Offsets that push the UTC instant across the boundary.
        assert_eq!(parse_date_applied("9999-12-31T23:00:00-02:00"), None);
        assert_eq!(parse_date_applied("0001-01-01T00:30:00+01:00"), None);

        assert!(parse_date_applied("0001-01-01").is_some());
        assert!(parse_date_applied("9999-12-31T23:59:59Z").is_some());
    }

    #[test]
    fn test_out_of_range_year_is_reported() {
        let req = JobApplicationRequest {
            date_applied: Some("+10000-01-01".to_string()),
            ..valid_request()
        };
        let errors = validate_request(&req).unwrap_err();
        assert_eq!(fields_of(&errors), vec!["dateApplied"]);
        assert!(errors[0].message.contains("0001-9999"));
    }
}
