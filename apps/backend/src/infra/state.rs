use tracing::info;

use crate::config::db::{db_url, DbKind, PoolSettings};
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::repos::sources;
use crate::state::app_state::AppState;
use crate::state::source_catalog::SourceCatalog;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    db_kind: DbKind,
    url: Option<String>,
    pool: PoolSettings,
    seed_sources: Vec<String>,
}

impl StateBuilder {
    /// Defaults to a private in-memory SQLite store.
    pub fn new() -> Self {
        Self {
            db_kind: DbKind::SqliteMemory,
            url: None,
            pool: PoolSettings::default(),
            seed_sources: Vec::new(),
        }
    }

    pub fn with_db(mut self, db_kind: DbKind) -> Self {
        self.db_kind = db_kind;
        self
    }

    /// Connection URL; when unset it is derived from the environment.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_pool_settings(mut self, pool: PoolSettings) -> Self {
        self.pool = pool;
        self
    }

    /// Data sources to register (if missing) before the catalog is loaded.
    pub fn with_sources<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seed_sources.extend(names.into_iter().map(Into::into));
        self
    }

    /// Bootstrap the store, then snapshot its data sources into the catalog.
    pub async fn build(self) -> Result<AppState, AppError> {
        let url = match self.url {
            Some(url) => url,
            None => db_url(self.db_kind)?,
        };
        let db = bootstrap_db(self.db_kind, &url, &self.pool).await?;

        for name in &self.seed_sources {
            match sources::insert(&db, name).await {
                Ok(_) => {}
                Err(e) if e.is_unique_violation() => {}
                Err(e) => return Err(e.into()),
            }
        }

        let catalog = SourceCatalog::new(sources::list_names(&db).await?);
        info!(sources = catalog.len(), "source catalog loaded");

        Ok(AppState::new(db, catalog))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
