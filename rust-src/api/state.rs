//! Shared application state.

use std::sync::Arc;

use anyhow::anyhow;

use super::error::ApiError;
use crate::auth::TokenVerifier;
use crate::storage::Database;


pub struct AppState {
    pub db: Database,
    pub verifier: Box<dyn TokenVerifier>,
}


pub type SharedState = Arc<AppState>;


impl AppState {
    pub fn new(db: Database, verifier: Box<dyn TokenVerifier>) -> SharedState {
        Arc::new(Self { db, verifier })
    }

    /// Run a storage call on tokio's blocking pool.
    ///
    /// SQLite calls block on the connection mutex and on disk I/O, so they
    /// stay off the async worker threads.
    pub async fn with_db<T, F>(self: &Arc<Self>, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || f(&state.db))
            .await
            .map_err(|err| ApiError::Internal(anyhow!("storage task failed: {err}")))?
            .map_err(ApiError::from)
    }
}
