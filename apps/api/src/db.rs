use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::models::job_application::{ApplicationStatus, JobApplication};

/// Creates and returns a SQLite connection pool.
///
/// In-memory databases live inside a single connection, so the pool is pinned
/// to exactly one connection that is never reaped.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    info!("Opening SQLite database at {database_url}");

    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL '{database_url}'"))?
        .create_if_missing(true);

    let pool = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?
    };

    info!("SQLite connection pool established");
    Ok(pool)
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS job_applications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            company TEXT NOT NULL CHECK (length(trim(company)) > 0),
            position TEXT NOT NULL CHECK (length(trim(position)) > 0),
            status INTEGER NOT NULL CHECK (status BETWEEN 1 AND 6),
            date_applied TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create job_applications table")?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_job_applications_date_applied ON job_applications (date_applied)",
    )
    .execute(pool)
    .await
    .context("failed to create date_applied index")?;

    info!("database migrations complete");
    Ok(())
}

/// Inserts the two sample applications if the table is empty.
///
/// Fixtures carry explicit historical timestamps, so they bypass `save_changes`.
pub async fn seed_sample_data(pool: &SqlitePool) -> Result<u64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_applications")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        debug!("Skipping seed data: table already has {count} rows");
        return Ok(0);
    }

    let now = Utc::now();
    let fixtures = [
        (
            "Microsoft",
            "Software Engineer",
            ApplicationStatus::Applied,
            now - Duration::days(5),
            now - Duration::days(5),
            now - Duration::days(5),
        ),
        (
            "Google",
            "Senior Software Engineer",
            ApplicationStatus::Interview,
            now - Duration::days(10),
            now - Duration::days(10),
            now - Duration::days(2),
        ),
    ];

    let mut tx = pool.begin().await?;
    let mut inserted = 0;
    for (company, position, status, date_applied, created_at, updated_at) in fixtures {
        let result = sqlx::query(
            r#"
            INSERT INTO job_applications
                (company, position, status, date_applied, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(company)
        .bind(position)
        .bind(status)
        .bind(date_applied)
        .bind(created_at)
        .bind(updated_at)
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected();
    }
    tx.commit().await?;

    info!("Seeded {inserted} sample job applications");
    Ok(inserted)
}

/// A row handed to `save_changes`, tagged with what happened to it.
#[derive(Debug)]
pub enum Change<'a> {
    Added(&'a mut JobApplication),
    Modified(&'a mut JobApplication),
}

/// Added rows get both timestamps; modified rows only get `updated_at`.
pub fn stamp_timestamps(change: &mut Change<'_>, now: DateTime<Utc>) {
    match change {
        Change::Added(row) => {
            row.created_at = now;
            row.updated_at = now;
        }
        Change::Modified(row) => {
            row.updated_at = now;
        }
    }
}

/// Writes a batch of changes in one transaction.
///
/// This is the only write path for job applications: every change is stamped
/// with the same commit time before it reaches SQL. Inserted rows get their
/// generated id written back. Returns the number of rows written.
pub async fn save_changes(
    pool: &SqlitePool,
    changes: &mut [Change<'_>],
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();
    let mut written = 0;

    for change in changes.iter_mut() {
        stamp_timestamps(change, now);
        match change {
            Change::Added(row) => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO job_applications
                        (company, position, status, date_applied, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(row.company.as_str())
                .bind(row.position.as_str())
                .bind(row.status)
                .bind(row.date_applied)
                .bind(row.created_at)
                .bind(row.updated_at)
                .execute(&mut *tx)
                .await?;
                row.id = result.last_insert_rowid();
                written += result.rows_affected();
            }
            Change::Modified(row) => {
                let result = sqlx::query(
                    r#"
                    UPDATE job_applications
                    SET company = ?, position = ?, status = ?, date_applied = ?, updated_at = ?
                    WHERE id = ?
                    "#,
                )
                .bind(row.company.as_str())
                .bind(row.position.as_str())
                .bind(row.status)
                .bind(row.date_applied)
                .bind(row.updated_at)
                .bind(row.id)
                .execute(&mut *tx)
                .await?;
                written += result.rows_affected();
            }
        }
    }

    tx.commit().await?;
    Ok(written)
}

/// Hard delete. Returns whether a row was removed.
pub async fn delete_by_id(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM job_applications WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Fresh, migrated, unseeded in-memory database.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
