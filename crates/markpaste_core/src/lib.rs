//! Core domain library for MarkPaste (config, storage, recency index, rendering).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Application error types (storage/domain).
pub mod error;
/// Paste identifier generation.
pub mod naming;
/// Bounded most-recent-first index of paste ids.
pub mod recency;
/// HTML documents for the paste view.
pub mod render;
/// Paste create/read operations.
pub mod service;
/// Key-value store abstraction and backends.
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use constants::DEFAULT_PORT;
pub use error::AppError;
pub use recency::{ParsedIndex, RecencyIndex, RecordOutcome, INDEX_KEY};
pub use service::PasteService;
pub use store::{open_store, KvStore, MemoryStore, RedbStore};
