//! Core types, configuration and statistics for the work store.

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Filename of the own JSON sidecar, one per directory.
pub const OWN_SIDECAR_NAME: &str = ".photowork.json";

/// Default debounce delay before a store cycle writes to disk.
pub const DEFAULT_STORE_DELAY: Duration = Duration::from_millis(2000);

/// Default interval a fetched snapshot stays fresh without re-reading.
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(30);

/// Default maximum number of directory caches kept resident.
pub const DEFAULT_REGISTRY_CAPACITY: usize = 100;

/// Store-related errors.
///
/// Cloneable (string payloads instead of error sources) so a single-flight
/// fetch can hand the same failure to every waiter.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// I/O failure reading, writing or deleting a sidecar file
    #[error("sidecar I/O error on {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// Own sidecar exists but does not parse as the expected JSON shape
    #[error("malformed sidecar {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },
}

impl StoreError {
    pub(crate) fn io(path: &Path, err: &std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Work store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Debounce delay before a store cycle writes to disk.
    pub store_delay: Duration,
    /// How long a fetched snapshot stays fresh without re-reading.
    pub freshness: Duration,
    /// Maximum number of directory caches kept resident.
    pub registry_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_delay: DEFAULT_STORE_DELAY,
            freshness: DEFAULT_FRESHNESS,
            registry_capacity: DEFAULT_REGISTRY_CAPACITY,
        }
    }
}

impl StoreConfig {
    /// Set the debounce delay for store cycles.
    pub fn with_store_delay(mut self, delay: Duration) -> Self {
        self.store_delay = delay;
        self
    }

    /// Set the snapshot freshness interval.
    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }

    /// Set the registry capacity.
    pub fn with_registry_capacity(mut self, capacity: usize) -> Self {
        self.registry_capacity = capacity;
        self
    }
}

/// Per-directory cache statistics for monitoring and tests.
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    /// Completed snapshot fetches (both sidecars read)
    pub fetches: u64,
    /// Fetch attempts that failed
    pub fetch_failures: u64,
    /// Calls served from a fresh snapshot without I/O
    pub snapshot_hits: u64,
    /// Own sidecar files written
    pub sidecar_writes: u64,
    /// Own sidecar files deleted (last entry removed)
    pub sidecar_deletes: u64,
    /// Store cycles that failed to write or delete
    pub write_failures: u64,
}
