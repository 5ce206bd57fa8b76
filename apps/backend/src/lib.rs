#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod trace_ctx;
pub mod validation;

// Re-exports for public API
pub use config::db::{db_url, DbKind, PoolSettings};
pub use db::txn::{with_txn, SharedTxn};
pub use error::{AppError, ErrorBody};
pub use errors::{DomainError, ErrorCode};
pub use extractors::ValidatedQuery;
pub use infra::db::bootstrap_db;
pub use infra::state::{build_state, StateBuilder};
pub use middleware::request_trace::RequestTrace;
pub use middleware::structured_logger::StructuredLogger;
pub use state::app_state::AppState;
pub use state::source_catalog::SourceCatalog;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    scistats_test_support::logging::init();
}
