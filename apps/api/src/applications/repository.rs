//! Query facade over the `job_applications` table.
//!
//! Handlers only see `JobApplicationRepository`; `AppState` carries it as
//! `Arc<dyn JobApplicationRepository>` so tests can swap in their own backend.

use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::db::{self, Change};
use crate::models::job_application::{ApplicationStatus, JobApplication, JobApplicationFields};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait JobApplicationRepository: Send + Sync {
    /// All rows, newest `date_applied` first.
    async fn get_all(&self) -> RepoResult<Vec<JobApplication>>;

    async fn get_by_id(&self, id: i64) -> RepoResult<Option<JobApplication>>;

    async fn create(&self, fields: JobApplicationFields) -> RepoResult<JobApplication>;

    /// Overwrites company, position, status and date applied. `None` if the id is absent.
    async fn update(
        &self,
        id: i64,
        fields: JobApplicationFields,
    ) -> RepoResult<Option<JobApplication>>;

    /// `true` if a row was removed.
    async fn delete(&self, id: i64) -> RepoResult<bool>;

    async fn exists(&self, id: i64) -> RepoResult<bool>;

    async fn get_by_status(&self, status: ApplicationStatus) -> RepoResult<Vec<JobApplication>>;

    /// Case-insensitive substring match on company name.
    async fn get_by_company(&self, company: &str) -> RepoResult<Vec<JobApplication>>;
}

#[derive(Clone)]
pub struct SqlJobApplicationRepository {
    pool: SqlitePool,
}

impl SqlJobApplicationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Writes new field values onto a row loaded earlier. `None` if the row
    /// was deleted after it was read.
    async fn write_update(
        &self,
        mut row: JobApplication,
        fields: JobApplicationFields,
    ) -> RepoResult<Option<JobApplication>> {
        row.apply(fields);
        let written = db::save_changes(&self.pool, &mut [Change::Modified(&mut row)]).await?;
        if written == 0 {
            return Ok(None);
        }

        tracing::info!("Updated job application {}", row.id);
        Ok(Some(row))
    }
}

#[async_trait]
impl JobApplicationRepository for SqlJobApplicationRepository {
    async fn get_all(&self) -> RepoResult<Vec<JobApplication>> {
        Ok(sqlx::query_as::<_, JobApplication>(
            "SELECT * FROM job_applications ORDER BY date_applied DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_by_id(&self, id: i64) -> RepoResult<Option<JobApplication>> {
        Ok(
            sqlx::query_as::<_, JobApplication>("SELECT * FROM job_applications WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create(&self, fields: JobApplicationFields) -> RepoResult<JobApplication> {
        let mut row = JobApplication::new(fields);
        db::save_changes(&self.pool, &mut [Change::Added(&mut row)]).await?;
        tracing::info!("Created job application {} ({})", row.id, row.company);
        Ok(row)
    }

    async fn update(
        &self,
        id: i64,
        fields: JobApplicationFields,
    ) -> RepoResult<Option<JobApplication>> {
        let Some(row) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        self.write_update(row, fields).await
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let deleted = db::delete_by_id(&self.pool, id).await?;
        if deleted {
            tracing::info!("Deleted job application {id}");
        }
        Ok(deleted)
    }

    async fn exists(&self, id: i64) -> RepoResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM job_applications WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn get_by_status(&self, status: ApplicationStatus) -> RepoResult<Vec<JobApplication>> {
        Ok(sqlx::query_as::<_, JobApplication>(
            "SELECT * FROM job_applications WHERE status = ? ORDER BY date_applied DESC, id DESC",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_by_company(&self, company: &str) -> RepoResult<Vec<JobApplication>> {
        // SQLite's lower() only folds ASCII, so matching happens here.
        let mut rows = self.get_all().await?;
        rows.retain(|row| company_matches(&row.company, company));
        Ok(rows)
    }
}

/// Case-insensitive substring match with full Unicode lowercasing.
pub fn company_matches(company: &str, needle: &str) -> bool {
    company.to_lowercase().contains(&needle.to_lowercase())
}
