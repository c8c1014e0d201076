//! In-memory store used for ephemeral mode and tests.

use super::KvStore;
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Process-local [`KvStore`] backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, AppError> {
        self.entries
            .lock()
            .map_err(|_| AppError::StorageMessage("Memory store lock poisoned".to_string()))
    }

    /// Number of stored keys, including the recency index record.
    pub fn len(&self) -> usize {
        self.entries().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether the store holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries()?.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.entries()?.remove(key);
        Ok(())
    }
}
