//! Paste create/read operations over a [`KvStore`] and its [`RecencyIndex`].

use crate::{
    error::AppError,
    naming,
    recency::RecencyIndex,
    store::KvStore,
};
use std::sync::Arc;

/// Entry point used by request handlers to create and read pastes.
#[derive(Clone)]
pub struct PasteService {
    store: Arc<dyn KvStore>,
    index: RecencyIndex,
}

impl PasteService {
    /// Build a service whose recency index keeps `index_capacity` pastes.
    pub fn new(store: Arc<dyn KvStore>, index_capacity: usize) -> Self {
        let index = RecencyIndex::new(store.clone(), index_capacity);
        Self { store, index }
    }

    /// The recency index driving eviction.
    pub fn index(&self) -> &RecencyIndex {
        &self.index
    }

    /// Store `content` under a fresh id and record it in the recency index.
    ///
    /// Index maintenance failures are logged and do not fail the call: the
    /// content is already stored and readable by id.
    ///
    /// # Returns
    /// The generated paste id.
    ///
    /// # Errors
    /// Returns an error when the content write fails; the index is untouched
    /// in that case.
    pub async fn create(&self, content: &str) -> Result<String, AppError> {
        let id = naming::generate_id();
        self.store.put(&id, content).await?;

        match self.index.record_creation(&id).await {
            Ok(outcome) if !outcome.evicted.is_empty() => tracing::debug!(
                "Paste {} evicted {} older paste(s)",
                id,
                outcome.evicted.len()
            ),
            Ok(_) => {}
            Err(err) => tracing::warn!("Failed to record paste {} in recency index: {}", id, err),
        }
        Ok(id)
    }

    /// Fetch paste content by id without touching the recency index.
    ///
    /// Ids that could not have been generated, including the index record's
    /// key, answer `None` without a store lookup.
    ///
    /// # Returns
    /// `Ok(None)` when no paste exists for `id`.
    ///
    /// # Errors
    /// Returns an error when the store lookup itself fails.
    pub async fn read(&self, id: &str) -> Result<Option<String>, AppError> {
        if !naming::is_valid_id(id) {
            return Ok(None);
        }
        self.store.get(id).await
    }
}
