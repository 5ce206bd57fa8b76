use sea_orm::ConnectionTrait;

use crate::errors::domain::DomainError;
use crate::repos::stats::{self, SourceStats};

/// Per-source totals; sources without records are left out.
pub async fn by_source<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<SourceStats>, DomainError> {
    stats::aggregate_by_source(conn).await
}
