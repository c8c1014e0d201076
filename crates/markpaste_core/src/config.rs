//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_INDEX_CAPACITY, DEFAULT_MAX_PASTE_SIZE, DEFAULT_PORT};
use std::env;
use std::path::PathBuf;

/// Runtime configuration for MarkPaste.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub max_paste_size: usize,
    /// Number of pastes the recency index keeps before evicting the oldest.
    pub index_capacity: usize,
    /// Origin used when building paste URLs, e.g. `https://paste.example.org`.
    pub public_url: Option<String>,
    /// Keep pastes in memory only.
    pub ephemeral: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            port: DEFAULT_PORT,
            max_paste_size: DEFAULT_MAX_PASTE_SIZE,
            index_capacity: DEFAULT_INDEX_CAPACITY,
            public_url: None,
            ephemeral: false,
        }
    }
}

fn expand_tilde(path: String) -> String {
    match (path.strip_prefix("~/"), home_dir()) {
        (Some(rest), Some(home)) => home.join(rest).to_string_lossy().to_string(),
        _ => path,
    }
}

fn home_dir() -> Option<PathBuf> {
    ["HOME", "USERPROFILE"]
        .into_iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
}

fn default_db_path() -> String {
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cache")
        .join("markpaste")
        .join("db")
        .to_string_lossy()
        .to_string()
}

/// Parse a boolean-like environment flag value.
///
/// Truthy values are `1`, `true`, `yes` and `on`; falsy values are `0`,
/// `false`, `no`, `off` and the empty string. Matching ignores case and
/// surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn parse_index_capacity(raw: Option<String>) -> usize {
    let Some(raw) = raw else {
        return DEFAULT_INDEX_CAPACITY;
    };
    match raw.trim().parse::<usize>() {
        Ok(capacity) if capacity > 0 => capacity,
        _ => {
            tracing::warn!(
                "Invalid INDEX_CAPACITY='{}'; falling back to {}",
                raw,
                DEFAULT_INDEX_CAPACITY
            );
            DEFAULT_INDEX_CAPACITY
        }
    }
}

fn normalize_public_url(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().trim_end_matches('/').to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: env::var("DB_PATH")
                .map(expand_tilde)
                .unwrap_or(defaults.db_path),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            max_paste_size: env::var("MAX_PASTE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_paste_size),
            index_capacity: parse_index_capacity(env::var("INDEX_CAPACITY").ok()),
            public_url: normalize_public_url(env::var("PUBLIC_URL").ok()),
            ephemeral: env_flag_enabled("EPHEMERAL"),
        }
    }
}
