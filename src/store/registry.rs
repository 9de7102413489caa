//! Bounded registry of directory caches behind the public store facade.

use crate::store::cache::DirectoryWorkCache;
use crate::store::types::{StoreConfig, StoreError};
use crate::work::PhotoWork;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// The public edit-record store.
///
/// Hands out one [`DirectoryWorkCache`] per directory and keeps the set
/// of resident caches bounded: when the registry is full, idle caches
/// are swept before a new one is admitted. Caches with work in flight
/// are never evicted, so the registry may transiently exceed its
/// capacity.
pub struct PhotoWorkStore {
    config: StoreConfig,
    caches: Mutex<HashMap<PathBuf, DirectoryWorkCache>>,
}

impl PhotoWorkStore {
    /// Create a store with default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a store with the given configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            caches: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch the edit record of one photo, translating legacy rules when
    /// no own record exists.
    pub async fn fetch_photo_work(
        &self,
        dir: &Path,
        name: &str,
        master_width: u32,
        master_height: u32,
    ) -> Result<PhotoWork, StoreError> {
        self.cache_for(dir)
            .get(name, master_width, master_height)
            .await
    }

    /// Store the edit record of one photo. The change is readable
    /// immediately and becomes durable after the debounce delay.
    pub async fn store_photo_work(
        &self,
        dir: &Path,
        name: &str,
        work: PhotoWork,
    ) -> Result<(), StoreError> {
        self.cache_for(dir).set(name, work).await
    }

    /// Remove the edit record of one photo. Equivalent to storing an
    /// empty record; removing the last record deletes the sidecar file.
    pub async fn remove_photo_work(&self, dir: &Path, name: &str) -> Result<(), StoreError> {
        self.cache_for(dir).set(name, PhotoWork::default()).await
    }

    /// Directories with a resident cache, in no particular order.
    pub fn resident_directories(&self) -> Vec<PathBuf> {
        self.caches.lock().unwrap().keys().cloned().collect()
    }

    /// Get or create the cache for `dir`, sweeping idle caches first
    /// when the registry is at capacity.
    fn cache_for(&self, dir: &Path) -> DirectoryWorkCache {
        let mut caches = self.caches.lock().unwrap();
        if let Some(cache) = caches.get(dir) {
            return cache.clone();
        }

        if caches.len() >= self.config.registry_capacity {
            let before = caches.len();
            caches.retain(|_, cache| !cache.is_idle());
            let evicted = before - caches.len();
            if evicted > 0 {
                debug!(evicted, resident = caches.len(), "evicted idle directory caches");
            }
            if caches.len() >= self.config.registry_capacity {
                // Every resident cache has work in flight; admit anyway
                warn!(
                    resident = caches.len(),
                    capacity = self.config.registry_capacity,
                    "directory cache registry over capacity"
                );
            }
        }

        let cache = DirectoryWorkCache::new(dir.to_path_buf(), self.config.clone());
        caches.insert(dir.to_path_buf(), cache.clone());
        cache
    }
}

impl Default for PhotoWorkStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PhotoWorkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoWorkStore")
            .field("capacity", &self.config.registry_capacity)
            .field("resident", &self.caches.lock().unwrap().len())
            .finish()
    }
}
