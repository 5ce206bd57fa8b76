use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::source_catalog::SourceCatalog;

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// Shared connection pool
    pub db: DatabaseConnection,
    /// Data sources known at startup; never mutated afterwards
    pub sources: Arc<SourceCatalog>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, sources: SourceCatalog) -> Self {
        Self {
            db,
            sources: Arc::new(sources),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn sources(&self) -> &SourceCatalog {
        &self.sources
    }
}
