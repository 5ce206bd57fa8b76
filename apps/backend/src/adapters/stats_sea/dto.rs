//! DTOs for stats_sea adapter.

use sea_orm::{FromQueryResult, Order};

use crate::entities::stats;

/// DTO for inserting a stat record; `creationtime` is stamped by the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStatRecord {
    pub person_id: i64,
    pub database_id: i64,
    pub dcount: i32,
    pub ccount: i32,
    pub hindex: i32,
    pub url: String,
}

impl NewStatRecord {
    pub fn new(person_id: i64, database_id: i64, url: impl Into<String>) -> Self {
        Self {
            person_id,
            database_id,
            dcount: 0,
            ccount: 0,
            hindex: 0,
            url: url.into(),
        }
    }

    pub fn with_counts(mut self, dcount: i32, ccount: i32, hindex: i32) -> Self {
        self.dcount = dcount;
        self.ccount = ccount;
        self.hindex = hindex;
        self
    }
}

/// One page of records for a single source.
#[derive(Debug, Clone)]
pub struct SourcePage {
    pub database_id: i64,
    pub order_by: stats::Column,
    pub order: Order,
    pub offset: u64,
    pub limit: u64,
}

/// Row shape of the per-source listing (stats joined to persons).
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct ProfileRow {
    pub name: String,
    pub hindex: i32,
    pub url: String,
}

/// Row shape of the per-source aggregate.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct SourceTotalsRow {
    pub database: String,
    pub sum_dcount: i64,
    pub sum_ccount: i64,
    pub sum_hindex: i64,
    pub records: i64,
}
