mod goal_repo;
mod plan_repo;
mod settings_repo;
mod template_ref_repo;
mod token_repo;
mod workout_repo;

pub use goal_repo::GoalRepository;
pub use plan_repo::WorkoutPlanRepository;
pub use settings_repo::SettingsRepository;
pub use template_ref_repo::TemplateRefRepository;
pub use token_repo::SyncTokenRepository;
pub use workout_repo::WorkoutRepository;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors returned by the repositories.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Failed to create database directory '{0}': {1}")]
    Directory(String, std::io::Error),

    #[error("Failed to encode {field}: {source}")]
    Encode {
        field: &'static str,
        source: serde_json::Error,
    },

    #[error("Malformed stored {field} for '{id}': {message}")]
    Decode {
        field: &'static str,
        id: String,
        message: String,
    },
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Initialize the database connection pool and run migrations
pub async fn init_db(path: &Path) -> RepoResult<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RepoError::Directory(parent.display().to_string(), e))?;
        }
    }

    let db_url = format!("sqlite:{}?mode=rwc", path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .foreign_keys(true)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::debug!(path = %path.display(), "database ready");

    Ok(pool)
}

/// Timestamps are stored as fixed-width RFC 3339 UTC strings so that
/// string comparison in SQL orders them chronologically.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_timestamp(
    raw: &str,
    field: &'static str,
    id: &str,
) -> RepoResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::Decode {
            field,
            id: id.to_string(),
            message: e.to_string(),
        })
}

pub(crate) fn encode_json<T: serde::Serialize>(
    value: &T,
    field: &'static str,
) -> RepoResult<String> {
    serde_json::to_string(value).map_err(|source| RepoError::Encode { field, source })
}

pub(crate) fn decode_json<T: serde::de::DeserializeOwned>(
    raw: &str,
    field: &'static str,
    id: &str,
) -> RepoResult<T> {
    serde_json::from_str(raw).map_err(|e| RepoError::Decode {
        field,
        id: id.to_string(),
        message: e.to_string(),
    })
}
