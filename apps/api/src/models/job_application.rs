use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Pipeline stage of an application. Stored as its ordinal (1..=6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
pub enum ApplicationStatus {
    Applied = 1,
    UnderReview = 2,
    Interview = 3,
    Offer = 4,
    Rejected = 5,
    Withdrawn = 6,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Applied,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::UnderReview => "UnderReview",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Withdrawn => "Withdrawn",
        }
    }

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| *s as i64 == ordinal)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown application status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

/// Accepts a variant name (any case) or its ordinal, e.g. `"interview"` or `"3"`.
impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(ordinal) = trimmed.parse::<i64>() {
            return Self::from_ordinal(ordinal).ok_or_else(|| UnknownStatus(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A persisted job application row.
///
/// `created_at` and `updated_at` are owned by the storage layer and are
/// overwritten on every write (see `db::save_changes`).
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct JobApplication {
    pub id: i64,
    pub company: String,
    pub position: String,
    pub status: ApplicationStatus,
    pub date_applied: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The caller-controlled subset of a row: everything `create` and `update` may write.
#[derive(Debug, Clone, PartialEq)]
pub struct JobApplicationFields {
    pub company: String,
    pub position: String,
    pub status: ApplicationStatus,
    pub date_applied: DateTime<Utc>,
}

impl JobApplication {
    /// Builds an unsaved row. The id and timestamps are placeholders until
    /// the row goes through `save_changes`.
    pub fn new(fields: JobApplicationFields) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            company: fields.company,
            position: fields.position,
            status: fields.status,
            date_applied: fields.date_applied,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, fields: JobApplicationFields) {
        self.company = fields.company;
        self.position = fields.position;
        self.status = fields.status;
        self.date_applied = fields.date_applied;
    }
}
