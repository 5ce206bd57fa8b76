use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use tracing::warn;

use crate::error::AppError;
use crate::state::app_state::AppState;

/// A shared transaction wrapper that can be injected into request extensions
#[derive(Clone)]
pub struct SharedTxn(pub Arc<DatabaseTransaction>);

impl SharedTxn {
    /// Begin a transaction on `db` that requests will share instead of opening their own.
    pub async fn open(db: &DatabaseConnection) -> Result<Self, DbErr> {
        Ok(Self(Arc::new(db.begin().await?)))
    }

    /// Get a reference to the underlying database transaction
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.0
    }

    /// Roll back the shared transaction.
    ///
    /// Fails if a clone is still alive (e.g. held by an unfinished request).
    pub async fn rollback(self) -> Result<(), DbErr> {
        match Arc::try_unwrap(self.0) {
            Ok(txn) => txn.rollback().await,
            Err(_) => Err(DbErr::Custom(
                "shared transaction is still referenced".to_string(),
            )),
        }
    }
}

/// Execute a function within a database transaction
///
/// 1) If a SharedTxn is in request extensions → use it (no commit/rollback here)
/// 2) Otherwise → begin txn, run closure, commit on Ok / rollback on Err
pub async fn with_txn<R, F>(
    req: Option<&HttpRequest>,
    state: &AppState,
    f: F,
) -> Result<R, AppError>
where
    F: for<'t> FnOnce(&'t DatabaseTransaction) -> LocalBoxFuture<'t, Result<R, AppError>>,
{
    // Clone out of the extensions before awaiting so no RefCell borrow is held.
    let shared_txn: Option<SharedTxn> =
        req.and_then(|r| r.extensions().get::<SharedTxn>().cloned());

    if let Some(shared) = shared_txn {
        return f(shared.transaction()).await;
    }

    let txn = state.db.begin().await?;
    match f(&txn).await {
        Ok(val) => {
            txn.commit().await?;
            Ok(val)
        }
        Err(err) => {
            // Best-effort rollback; preserve original error
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}
