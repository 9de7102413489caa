//! Per-directory edit-record store with debounced durable persistence.
//!
//! One [`DirectoryWorkCache`] per directory owns the authoritative
//! in-memory copy of that directory's edit records, merged with a lazily
//! imported legacy snapshot. The [`PhotoWorkStore`] facade keeps a bounded
//! registry of caches and exposes the public fetch/store/remove API.

mod cache;
mod registry;
mod sidecar;
mod types;

pub use cache::DirectoryWorkCache;
pub use registry::PhotoWorkStore;
pub use types::{
    StoreConfig, StoreError, StoreStats, DEFAULT_FRESHNESS, DEFAULT_REGISTRY_CAPACITY,
    DEFAULT_STORE_DELAY, OWN_SIDECAR_NAME,
};
