//! Key-value store abstraction shared by the paste service and recency index.

mod memory;
mod persistent;

pub use memory::MemoryStore;
pub use persistent::RedbStore;

use crate::{error::AppError, Config};
use async_trait::async_trait;
use std::sync::Arc;

/// Async string-to-string store.
///
/// Individual key writes are atomic; nothing spans more than one key.
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Fetch the value for `key`, `Ok(None)` when missing.
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Insert or overwrite the value for `key`.
    async fn put(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

/// Open the store selected by `config`.
///
/// # Returns
/// An in-memory store when `config.ephemeral` is set, otherwise a redb store
/// under `config.db_path`.
///
/// # Errors
/// Returns an error when the on-disk database cannot be opened.
pub fn open_store(config: &Config) -> Result<Arc<dyn KvStore>, AppError> {
    if config.ephemeral {
        tracing::info!("Using in-memory store; pastes are lost on exit");
        return Ok(Arc::new(MemoryStore::default()));
    }
    let store = RedbStore::open(&config.db_path)?;
    tracing::info!("Opened paste store at {}", store.path().display());
    Ok(Arc::new(store))
}
