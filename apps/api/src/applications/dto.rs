use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::job_application::{ApplicationStatus, JobApplication};

/// Body of POST and PUT. Every field is optional at the serde level so that
/// missing values surface as per-field validation errors instead of a
/// deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationRequest {
    pub company: Option<String>,
    pub position: Option<String>,
    /// Variant name or ordinal.
    pub status: Option<Value>,
    /// `YYYY-MM-DD` or RFC 3339.
    pub date_applied: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub salary_expected: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationDto {
    pub id: i64,
    pub company: String,
    pub position: String,
    pub status: ApplicationStatus,
    pub date_applied: DateTime<Utc>,
    // The four fields below have no column yet; they are always null.
    pub description: Option<String>,
    pub location: Option<String>,
    pub salary_expected: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<JobApplication> for JobApplicationDto {
    fn from(row: JobApplication) -> Self {
        Self {
            id: row.id,
            company: row.company,
            position: row.position,
            status: row.status,
            date_applied: row.date_applied,
            description: None,
            location: None,
            salary_expected: None,
            notes: None,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Query string of `GET /api/job-applications`.
#[derive(Debug, Default, Deserialize)]
pub struct ListFilter {
    pub status: Option<String>,
    pub company: Option<String>,
}
