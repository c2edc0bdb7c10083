//! The per-request connection scope shared by every data handler.

use crate::{error::AppError, AppState};
use database::StoreConnection;
use futures_util::future::BoxFuture;

/// Runs `work` on a freshly acquired store connection and releases it afterwards.
///
/// The connection is released whether `work` succeeds or fails; a failed
/// release is logged and does not change the outcome. If acquisition itself
/// fails, `work` never runs and there is nothing to release.
pub async fn with_connection<T, F>(
    state: &AppState,
    operation: &'static str,
    work: F,
) -> Result<T, AppError>
where
    F: for<'c> FnOnce(&'c mut dyn StoreConnection) -> BoxFuture<'c, Result<T, AppError>>,
{
    let mut conn = state.connections.acquire().await.map_err(|e| {
        tracing::warn!(operation, "Could not acquire a database connection.");
        AppError::Connection(e)
    })?;

    let outcome = work(&mut *conn).await;

    if let Err(e) = conn.release().await {
        tracing::warn!(error = ?e, operation, "Failed to release database connection.");
    }

    outcome
}
