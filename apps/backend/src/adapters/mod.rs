//! SeaORM adapters: all query construction lives here.

pub mod persons_sea;
pub mod sources_sea;
pub mod stats_sea;
