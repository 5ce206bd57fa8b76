//! Data source repository functions.

use sea_orm::ConnectionTrait;

use crate::adapters::sources_sea as sources_adapter;
use crate::errors::domain::DomainError;

pub async fn find_id_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<Option<i64>, DomainError> {
    let source = sources_adapter::find_by_name(conn, name).await?;
    Ok(source.map(|s| s.id))
}

/// All source names, ascending.
pub async fn list_names<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<String>, DomainError> {
    Ok(sources_adapter::list_names(conn).await?)
}

/// Register a data source and return its id.
///
/// Fails with `ConflictKind::UniqueSourceName` when the name is already taken.
pub async fn insert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<i64, DomainError> {
    let source = sources_adapter::create_source(conn, name).await?;
    Ok(source.id)
}

/// Remove every data source. Stat records must be removed first.
pub async fn delete_all<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, DomainError> {
    Ok(sources_adapter::delete_all(conn).await?)
}
