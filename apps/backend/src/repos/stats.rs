//! Stat record repository functions.
//!
//! A (person, source) pair holds at most one record. Records are never
//! updated in place: [`replace`] deletes the old row and inserts a new one,
//! so `id` and `created_at` always reflect the latest submission.

use sea_orm::{ConnectionTrait, Order};
use serde::{Deserialize, Serialize};

use crate::adapters::stats_sea::{self as stats_adapter, SourcePage};
use crate::entities::stats;
use crate::errors::domain::DomainError;

pub use crate::adapters::stats_sea::NewStatRecord;

/// Fixed page size for per-source listings
pub const PAGE_SIZE: u64 = 10;

/// Last page whose row offset is representable as a signed 64-bit OFFSET
pub const MAX_PAGE: u64 = i64::MAX as u64 / PAGE_SIZE;

/// Stat record domain model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRecord {
    pub id: i64,
    pub person_id: i64,
    pub database_id: i64,
    pub dcount: i32,
    pub ccount: i32,
    pub hindex: i32,
    pub url: String,
    pub created_at: time::OffsetDateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Hindex,
    CreationTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Paging and ordering for [`list_for_source`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileListQuery {
    /// Zero-based page number
    pub page: u64,
    pub sort: SortField,
    pub order: SortOrder,
}

/// One entry of a per-source listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub name: String,
    pub hindex: i32,
    pub url: String,
}

/// Aggregate over all records of one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStats {
    pub database: String,
    pub sum_dcount: i64,
    pub sum_ccount: i64,
    /// Mean h-index truncated toward zero
    pub avg_hindex: i64,
}

pub async fn find<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    person_id: i64,
    database_id: i64,
) -> Result<Option<StatRecord>, DomainError> {
    let stat = stats_adapter::find_for_pair(conn, person_id, database_id).await?;
    Ok(stat.map(StatRecord::from))
}

/// Insert a record stamped with the current UTC time and return its id.
///
/// Fails with `ConflictKind::UniquePersonSource` if the pair already has a
/// record and `ConflictKind::ForeignKey` if the person or source is missing.
pub async fn insert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    record: NewStatRecord,
) -> Result<i64, DomainError> {
    let stat = stats_adapter::create_stat(conn, record).await?;
    Ok(stat.id)
}

/// Delete the record for the pair; no-op if absent.
pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    person_id: i64,
    database_id: i64,
) -> Result<(), DomainError> {
    stats_adapter::delete_for_pair(conn, person_id, database_id).await?;
    Ok(())
}

/// Replace whatever record the pair has with `record`; returns the new id.
///
/// Only atomic when `conn` is a transaction.
pub async fn replace<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    record: NewStatRecord,
) -> Result<i64, DomainError> {
    delete(conn, record.person_id, record.database_id).await?;
    insert(conn, record).await
}

pub async fn list_for_source<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    database_id: i64,
    query: ProfileListQuery,
) -> Result<Vec<ProfileSummary>, DomainError> {
    // no stored row can sit beyond this offset
    if query.page > MAX_PAGE {
        return Ok(Vec::new());
    }

    let page = SourcePage {
        database_id,
        order_by: match query.sort {
            SortField::Hindex => stats::Column::Hindex,
            SortField::CreationTime => stats::Column::Creationtime,
        },
        order: match query.order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        },
        offset: query.page * PAGE_SIZE,
        limit: PAGE_SIZE,
    };

    let rows = stats_adapter::list_for_source(conn, page).await?;
    Ok(rows
        .into_iter()
        .map(|row| ProfileSummary {
            name: row.name,
            hindex: row.hindex,
            url: row.url,
        })
        .collect())
}

/// Totals per source name, ascending; sources without records are omitted.
pub async fn aggregate_by_source<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<SourceStats>, DomainError> {
    let rows = stats_adapter::totals_by_source(conn).await?;
    Ok(rows
        .into_iter()
        .map(|row| SourceStats {
            database: row.database,
            sum_dcount: row.sum_dcount,
            sum_ccount: row.sum_ccount,
            // values are non-negative, so integer division truncates the mean
            avg_hindex: if row.records > 0 {
                row.sum_hindex / row.records
            } else {
                0
            },
        })
        .collect())
}

pub async fn delete_all<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, DomainError> {
    Ok(stats_adapter::delete_all(conn).await?)
}

impl From<stats::Model> for StatRecord {
    fn from(model: stats::Model) -> Self {
        Self {
            id: model.id,
            person_id: model.person_id,
            database_id: model.database_id,
            dcount: model.dcount,
            ccount: model.ccount,
            hindex: model.hindex,
            url: model.url,
            created_at: model.creationtime,
        }
    }
}
