use std::env;
use std::str::FromStr;

use crate::error::AppError;

/// Which store the service runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    /// File-backed SQLite (the default deployment)
    SqliteFile,
    /// Private in-memory SQLite; one connection, used by tests
    SqliteMemory,
}

impl FromStr for DbKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postgres" => Ok(Self::Postgres),
            "sqlite-file" => Ok(Self::SqliteFile),
            "sqlite-memory" => Ok(Self::SqliteMemory),
            other => Err(AppError::config(format!(
                "SCISTATS_DB must be one of postgres, sqlite-file, sqlite-memory (got '{other}')"
            ))),
        }
    }
}

/// Pool and session settings applied when the pool is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub pool_max: u32,
    pub acquire_timeout_ms: u64,
    pub sqlite_busy_timeout_ms: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            pool_max: 10,
            acquire_timeout_ms: 5_000,
            sqlite_busy_timeout_ms: 5_000,
        }
    }
}

impl PoolSettings {
    /// Read `DB_POOL_MAX`, `DB_ACQUIRE_TIMEOUT_MS`, `SQLITE_BUSY_TIMEOUT_MS`,
    /// falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        Ok(Self {
            pool_max: parse_var("DB_POOL_MAX", defaults.pool_max)?,
            acquire_timeout_ms: parse_var("DB_ACQUIRE_TIMEOUT_MS", defaults.acquire_timeout_ms)?,
            sqlite_busy_timeout_ms: parse_var(
                "SQLITE_BUSY_TIMEOUT_MS",
                defaults.sqlite_busy_timeout_ms,
            )?,
        })
    }
}

/// Selected store from `SCISTATS_DB` (defaults to `sqlite-file`)
pub fn db_kind_from_env() -> Result<DbKind, AppError> {
    match env::var("SCISTATS_DB") {
        Ok(value) => value.parse(),
        Err(_) => Ok(DbKind::SqliteFile),
    }
}

/// Builds a connection URL from environment variables for the given store
pub fn db_url(kind: DbKind) -> Result<String, AppError> {
    match kind {
        DbKind::Postgres => {
            let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
            let db_name = must_var("POSTGRES_DB")?;
            let username = must_var("POSTGRES_USER")?;
            let password = must_var("POSTGRES_PASSWORD")?;
            Ok(format!(
                "postgresql://{username}:{password}@{host}:{port}/{db_name}"
            ))
        }
        DbKind::SqliteFile => {
            let path = env::var("SQLITE_DB_PATH").unwrap_or_else(|_| "science.db".to_string());
            Ok(sqlite_file_url(&path))
        }
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
    }
}

/// URL for a SQLite file, created on first connect
pub fn sqlite_file_url(path: &str) -> String {
    format!("sqlite://{path}?mode=rwc")
}

/// Get required environment variable or return error
fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("{name} has an invalid value: '{raw}'"))),
        Err(_) => Ok(default),
    }
}
