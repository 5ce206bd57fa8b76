//! SeaORM -> DomainError translation helpers.
//!
//! Adapters return `sea_orm::DbErr`; repos translate through `map_db_err`
//! (directly or via `?` and the `From` impl below) so every higher layer
//! only ever sees `DomainError`.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

const SQLITE_UNIQUE_PREFIX: &str = "UNIQUE constraint failed: ";

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Extract `table.column` from SQLite "UNIQUE constraint failed: table.column" messages.
///
/// Composite keys are reported as `table.a, table.b`; only the first is returned.
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    let start = error_msg.find(SQLITE_UNIQUE_PREFIX)? + SQLITE_UNIQUE_PREFIX.len();
    error_msg[start..]
        .split(|c: char| c.is_whitespace() || c == ',' || c == '"')
        .find(|part| !part.is_empty())
}

/// Map SQLite table.column format to domain-specific conflict errors.
fn map_sqlite_table_column_to_conflict(table_column: &str) -> Option<(ConflictKind, &'static str)> {
    match table_column {
        "persons.guid" => Some((ConflictKind::UniqueGuid, "Person GUID already exists")),
        "databases.name" => Some((
            ConflictKind::UniqueSourceName,
            "Data source name already exists",
        )),
        "stats.person_id" | "stats.database_id" => Some((
            ConflictKind::UniquePersonSource,
            "Record already exists for person and data source",
        )),
        _ => None,
    }
}

/// Map PostgreSQL constraint names to domain-specific conflict errors.
fn map_postgres_constraint_to_conflict(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    if error_msg.contains("persons_guid_key") {
        return Some((ConflictKind::UniqueGuid, "Person GUID already exists"));
    }
    if error_msg.contains("databases_name_key") {
        return Some((
            ConflictKind::UniqueSourceName,
            "Data source name already exists",
        ));
    }
    if error_msg.contains("person_database_unique_constraint") {
        return Some((
            ConflictKind::UniquePersonSource,
            "Record already exists for person and data source",
        ));
    }
    None
}

/// Translate a `DbErr` into a `DomainError` with sanitized, PII-safe detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(
                NotFoundKind::Other("Record".into()),
                "Record not found",
            );
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unique constraint violation");

        if let Some(table_column) = extract_sqlite_table_column(&error_msg) {
            if let Some((kind, detail)) = map_sqlite_table_column_to_conflict(table_column) {
                return DomainError::conflict(kind, detail);
            }
        }

        if let Some((kind, detail)) = map_postgres_constraint_to_conflict(&error_msg) {
            return DomainError::conflict(kind, detail);
        }

        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Foreign key constraint violation");
        return DomainError::conflict(
            ConflictKind::ForeignKey,
            "Referenced person or data source does not exist",
        );
    }

    // SQLITE_BUSY, Postgres serialization failure and deadlock
    if error_msg.contains("database is locked")
        || mentions_sqlstate(&error_msg, "40001")
        || mentions_sqlstate(&error_msg, "40P01")
        || error_msg.contains("could not serialize access")
        || error_msg.contains("deadlock detected")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database lock contention");
        return DomainError::infra(InfraErrorKind::LockContention, "Database is busy");
    }

    if error_msg.contains("timed out") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        map_db_err(e)
    }
}
