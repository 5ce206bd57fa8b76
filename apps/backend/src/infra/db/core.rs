use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use migration::MigrationCommand;
use sea_orm::{DatabaseConnection, SqlxPostgresConnector, SqlxSqliteConnector};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{info, trace, warn};

use super::{DbKind, PoolSettings};
use crate::error::AppError;

/// Get database engine name for logging
fn get_db_engine(db_kind: DbKind) -> &'static str {
    match db_kind {
        DbKind::Postgres => "postgresql",
        DbKind::SqliteFile | DbKind::SqliteMemory => "sqlite",
    }
}

/// Retry a connection attempt with fixed interval delays
/// Returns the result of the last attempt after all retries are exhausted
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "connection_retry=success");
                }
                return Ok(result);
            }
            Err(e) if attempt < max_attempts => {
                warn!(
                    attempt,
                    max_attempts,
                    interval_ms,
                    error = %e,
                    "connection_retry=failed"
                );
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Ordered session-level SQL statements run on every new connection.
fn build_session_statements(db_kind: DbKind, settings: &PoolSettings) -> Vec<String> {
    match db_kind {
        DbKind::SqliteFile | DbKind::SqliteMemory => vec![
            "PRAGMA foreign_keys = ON;".to_string(),
            format!("PRAGMA busy_timeout = {};", settings.sqlite_busy_timeout_ms),
        ],
        DbKind::Postgres => vec!["SET timezone = 'UTC';".to_string()],
    }
}

async fn apply_sqlite_config(
    conn: &mut sqlx::SqliteConnection,
    settings: &PoolSettings,
) -> Result<(), sqlx::Error> {
    for stmt in build_session_statements(DbKind::SqliteFile, settings) {
        sqlx::query(&stmt).execute(&mut *conn).await?;
    }
    Ok(())
}

async fn apply_postgres_config(
    conn: &mut sqlx::PgConnection,
    settings: &PoolSettings,
) -> Result<(), sqlx::Error> {
    for stmt in build_session_statements(DbKind::Postgres, settings) {
        sqlx::query(&stmt).execute(&mut *conn).await?;
    }
    Ok(())
}

/// Build the shared pool for `db_kind` at `url` with per-connection session settings.
///
/// In-memory SQLite is pinned to a single connection that never expires,
/// since every new connection would open an empty database.
pub async fn build_pool(
    db_kind: DbKind,
    url: &str,
    settings: &PoolSettings,
) -> Result<DatabaseConnection, AppError> {
    match db_kind {
        DbKind::SqliteFile | DbKind::SqliteMemory => {
            let connect_opts = SqliteConnectOptions::from_str(url)
                .map_err(|e| AppError::config(format!("invalid SQLite connection options: {e}")))?
                .create_if_missing(true);

            let (min, max) = match db_kind {
                DbKind::SqliteMemory => (1, 1),
                _ => (0, settings.pool_max),
            };

            let hook_settings = settings.clone();
            let mut pool_opts = SqlitePoolOptions::new()
                .min_connections(min)
                .max_connections(max)
                .acquire_timeout(Duration::from_millis(settings.acquire_timeout_ms))
                .after_connect(move |conn, _meta| {
                    let settings = hook_settings.clone();
                    Box::pin(async move {
                        apply_sqlite_config(conn, &settings).await?;
                        trace!("db=sqlite hook=after_connect ok");
                        Ok::<_, sqlx::Error>(())
                    })
                });
            if db_kind == DbKind::SqliteMemory {
                pool_opts = pool_opts.idle_timeout(None).max_lifetime(None);
            }

            let pool: SqlitePool = pool_opts.connect_with(connect_opts).await.map_err(|e| {
                AppError::db_unavailable(format!("failed to create SQLite connection pool: {e}"))
            })?;

            info!(
                engine = "sqlite",
                min,
                max,
                acquire_timeout_ms = settings.acquire_timeout_ms,
                "pool=create"
            );
            Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
        }

        DbKind::Postgres => {
            let hook_settings = settings.clone();
            let pool_max = settings.pool_max;
            let acquire_timeout = Duration::from_millis(settings.acquire_timeout_ms);

            // Postgres may still be starting when the service comes up
            let sqlx_pool = retry_connection(
                || {
                    let hook_settings = hook_settings.clone();
                    async move {
                        PgPoolOptions::new()
                            .max_connections(pool_max)
                            .acquire_timeout(acquire_timeout)
                            .idle_timeout(Duration::from_secs(30))
                            .after_connect(move |conn, _meta| {
                                let settings = hook_settings.clone();
                                Box::pin(async move {
                                    apply_postgres_config(conn, &settings).await?;
                                    Ok::<_, sqlx::Error>(())
                                })
                            })
                            .connect(url)
                            .await
                            .map_err(|e| {
                                AppError::db_unavailable(format!(
                                    "failed to connect to Postgres: {e}"
                                ))
                            })
                    }
                },
                5,
                500,
            )
            .await?;

            info!(
                engine = "postgres",
                max = pool_max,
                acquire_timeout_ms = settings.acquire_timeout_ms,
                "pool=create"
            );
            Ok(SqlxPostgresConnector::from_sqlx_postgres_pool(sqlx_pool))
        }
    }
}

/// Build the pool *and* guarantee the schema is current.
///
/// Migrations run on the returned pool so in-memory SQLite sees its own schema.
pub async fn bootstrap_db(
    db_kind: DbKind,
    url: &str,
    settings: &PoolSettings,
) -> Result<DatabaseConnection, AppError> {
    let engine = get_db_engine(db_kind);
    info!(db_kind = ?db_kind, engine, pid = std::process::id(), "bootstrap=start");

    let db = build_pool(db_kind, url, settings).await?;

    migration::migrate(&db, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::config(format!("schema migration failed: {e}")))?;

    info!(engine, "bootstrap=ready");
    Ok(db)
}
