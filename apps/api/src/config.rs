use anyhow::{bail, Context, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

/// Application configuration loaded from environment variables.
/// Every setting has a default, so the service starts with no `.env` at all.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Insert the two sample applications on startup when the table is empty.
    pub seed_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            seed_data: match std::env::var("SEED_DATA") {
                Ok(raw) => parse_flag(&raw).context("SEED_DATA must be true or false")?,
                Err(_) => true,
            },
        })
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("unrecognised boolean '{other}'"),
    }
}
