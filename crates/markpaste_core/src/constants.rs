//! Shared constants used across MarkPaste crates.

/// Default HTTP port for MarkPaste.
pub const DEFAULT_PORT: u16 = 38420;

/// Default maximum paste size accepted by the HTTP layer.
pub const DEFAULT_MAX_PASTE_SIZE: usize = 10 * 1024 * 1024;

/// Default number of pastes kept by the recency index before eviction.
pub const DEFAULT_INDEX_CAPACITY: usize = 100;

/// Length of generated paste identifiers.
pub const PASTE_ID_LEN: usize = 8;

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";
