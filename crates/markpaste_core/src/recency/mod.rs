//! Bounded most-recent-first index of paste ids, persisted under one key.
//!
//! The index is a JSON array of ids stored at [`INDEX_KEY`]. Every creation
//! prepends its id and evicts (and deletes) ids beyond the capacity from the
//! tail. Updates are an unguarded read-modify-write: concurrent creations can
//! overwrite each other's index writes and the last persisted write wins.
//! Pastes dropped from the index that way stay readable by id.

use crate::{error::AppError, store::KvStore};
use std::collections::VecDeque;
use std::sync::Arc;

#[cfg(test)]
mod tests;

/// Reserved store key holding the serialized index.
pub const INDEX_KEY: &str = "file_list";

/// Result of loading the persisted index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedIndex {
    /// A well-formed record, most recent id first.
    Valid(Vec<String>),
    /// No usable record: absent, malformed, or unreadable.
    Empty,
}

impl ParsedIndex {
    /// Interpret a raw stored record.
    ///
    /// Anything that is not a JSON array of strings is treated as empty.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Empty;
        };
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(entries) => Self::Valid(entries),
            Err(err) => {
                tracing::warn!("Ignoring malformed recency index record: {}", err);
                Self::Empty
            }
        }
    }

    /// Entries in most-recent-first order; empty for [`ParsedIndex::Empty`].
    pub fn into_entries(self) -> Vec<String> {
        match self {
            Self::Valid(entries) => entries,
            Self::Empty => Vec::new(),
        }
    }
}

/// What a single [`RecencyIndex::record_creation`] call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordOutcome {
    /// Index length after the update.
    pub len: usize,
    /// Ids dropped from the tail, oldest first.
    pub evicted: Vec<String>,
    /// Evicted ids whose paste could not be deleted from the store.
    pub failed_deletions: Vec<String>,
}

/// Bounded FIFO over paste ids that owns the eviction decision.
#[derive(Clone)]
pub struct RecencyIndex {
    store: Arc<dyn KvStore>,
    capacity: usize,
}

impl RecencyIndex {
    /// Create an index over `store` keeping at most `capacity` ids.
    ///
    /// A zero capacity would evict every paste on creation, so it is raised
    /// to one.
    pub fn new(store: Arc<dyn KvStore>, capacity: usize) -> Self {
        Self {
            store,
            capacity: capacity.max(1),
        }
    }

    /// Maximum number of ids kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Load the persisted index, failing open to [`ParsedIndex::Empty`].
    pub async fn load(&self) -> ParsedIndex {
        match self.store.get(INDEX_KEY).await {
            Ok(raw) => ParsedIndex::parse(raw.as_deref()),
            Err(err) => {
                tracing::warn!("Failed to load recency index, starting empty: {}", err);
                ParsedIndex::Empty
            }
        }
    }

    /// Current ids, most recent first.
    pub async fn entries(&self) -> Vec<String> {
        self.load().await.into_entries()
    }

    /// Prepend `id`, evict past capacity, and persist the result.
    ///
    /// Duplicate ids are kept as-is. Eviction deletes are best effort: a failed
    /// delete is logged and reported in [`RecordOutcome::failed_deletions`], and
    /// the id is dropped from the index regardless.
    ///
    /// # Errors
    /// Returns an error only when the updated index cannot be serialized or
    /// written back to the store.
    pub async fn record_creation(&self, id: &str) -> Result<RecordOutcome, AppError> {
        let mut entries: VecDeque<String> = self.load().await.into_entries().into();
        entries.push_front(id.to_string());

        let mut outcome = RecordOutcome::default();
        while entries.len() > self.capacity {
            let Some(evicted_id) = entries.pop_back() else {
                break;
            };
            match self.store.delete(&evicted_id).await {
                Ok(()) => tracing::debug!("Evicted paste {}", evicted_id),
                Err(err) => {
                    tracing::warn!("Failed to delete evicted paste {}: {}", evicted_id, err);
                    outcome.failed_deletions.push(evicted_id.clone());
                }
            }
            outcome.evicted.push(evicted_id);
        }

        let encoded = serde_json::to_string(&entries)?;
        self.store.put(INDEX_KEY, &encoded).await?;
        outcome.len = entries.len();
        Ok(outcome)
    }
}
