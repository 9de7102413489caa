//! Per-directory edit-record cache.
//!
//! Each instance owns the authoritative in-memory copy of one directory's
//! edit records. Reads go through a single-flight snapshot fetch (both
//! sidecars, in parallel); writes mutate the in-memory state and schedule
//! a debounced store cycle that coalesces bursts of edits into one disk
//! write.

use crate::legacy::{read_legacy_sections, translate_rules, LegacySections};
use crate::store::sidecar;
use crate::store::types::{StoreConfig, StoreError, StoreStats};
use crate::work::PhotoWork;
use futures::future::{FutureExt, Shared};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, error, warn};

type FetchFuture = Shared<Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send>>>;

/// Combined on-disk state of one directory, rebuilt wholesale per fetch.
#[derive(Debug, Default)]
struct DirectorySnapshot {
    /// This store's own records, keyed by photo basename, key-sorted
    own: BTreeMap<String, PhotoWork>,
    /// Raw legacy rule lists, when a legacy sidecar exists
    legacy: Option<LegacySections>,
}

struct CacheState {
    snapshot: Option<DirectorySnapshot>,
    fetched_at: Option<Instant>,
    /// In-flight fetch that concurrent callers attach to (single-flight)
    fetch: Option<FetchFuture>,
    /// A store cycle task is running
    storing: bool,
    /// A mutation arrived while storing; another cycle must follow
    store_followup: bool,
    stats: StoreStats,
}

struct CacheShared {
    dir: PathBuf,
    config: StoreConfig,
    state: Mutex<CacheState>,
}

/// Cache of one directory's edit records with debounced persistence.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct DirectoryWorkCache {
    shared: Arc<CacheShared>,
}

impl DirectoryWorkCache {
    /// Create a cache for `dir`. No I/O happens until the first access.
    pub fn new(dir: PathBuf, config: StoreConfig) -> Self {
        Self {
            shared: Arc::new(CacheShared {
                dir,
                config,
                state: Mutex::new(CacheState {
                    snapshot: None,
                    fetched_at: None,
                    fetch: None,
                    storing: false,
                    store_followup: false,
                    stats: StoreStats::default(),
                }),
            }),
        }
    }

    /// The directory this cache serves.
    pub fn directory(&self) -> &std::path::Path {
        &self.shared.dir
    }

    /// Fetch the edit record for one photo.
    ///
    /// Returns the own record if present; otherwise translates the
    /// photo's legacy rules (if any) using the master dimensions;
    /// otherwise an empty record. Never mutates the snapshot.
    pub async fn get(
        &self,
        name: &str,
        master_width: u32,
        master_height: u32,
    ) -> Result<PhotoWork, StoreError> {
        self.ensure_snapshot().await?;

        let state = self.shared.state.lock().unwrap();
        let Some(snapshot) = state.snapshot.as_ref() else {
            return Ok(PhotoWork::default());
        };
        if let Some(work) = snapshot.own.get(name) {
            return Ok(work.clone());
        }
        if let Some(rules) = snapshot.legacy.as_ref().and_then(|l| l.get(name)) {
            let (work, anomalies) = translate_rules(rules, master_width, master_height);
            if !anomalies.is_empty() {
                let summary = anomalies
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                warn!(
                    directory = %self.shared.dir.display(),
                    photo = name,
                    "legacy import anomalies: {summary}"
                );
            }
            return Ok(work);
        }
        Ok(PhotoWork::default())
    }

    /// Store the edit record for one photo.
    ///
    /// An empty record deletes the entry; a non-empty record is inserted
    /// into the key-sorted own mapping. Either way the change becomes
    /// durable through the debounced store cycle: if a cycle is already
    /// running, the mutation is folded into its followup instead of
    /// starting a second writer.
    pub async fn set(&self, name: &str, work: PhotoWork) -> Result<(), StoreError> {
        self.ensure_snapshot().await?;

        let start_cycle = {
            let mut state = self.shared.state.lock().unwrap();
            let snapshot = state.snapshot.get_or_insert_with(DirectorySnapshot::default);
            if work.is_empty() {
                snapshot.own.remove(name);
            } else {
                snapshot.own.insert(name.to_string(), work);
            }
            if state.storing {
                state.store_followup = true;
                false
            } else {
                state.storing = true;
                true
            }
        };

        if start_cycle {
            tokio::spawn(Self::store_cycle(self.shared.clone()));
        }
        Ok(())
    }

    /// Whether this cache has no fetch in flight, no store in flight and
    /// no followup pending. The registry only evicts idle caches.
    pub fn is_idle(&self) -> bool {
        let state = self.shared.state.lock().unwrap();
        state.fetch.is_none() && !state.storing && !state.store_followup
    }

    /// Snapshot of this cache's statistics.
    pub fn stats(&self) -> StoreStats {
        self.shared.state.lock().unwrap().stats.clone()
    }

    /// Make sure a fresh snapshot is in memory, fetching if necessary.
    ///
    /// A snapshot counts as fresh within the freshness interval of its
    /// fetch, and always while a store is running or pending, so a
    /// re-read never races a write. Concurrent callers share one
    /// in-flight fetch.
    async fn ensure_snapshot(&self) -> Result<(), StoreError> {
        let fetch = {
            let mut state = self.shared.state.lock().unwrap();
            let store_active = state.storing || state.store_followup;
            let recently_fetched = state
                .fetched_at
                .map_or(false, |at| at.elapsed() < self.shared.config.freshness);
            if state.snapshot.is_some() && (store_active || recently_fetched) {
                state.stats.snapshot_hits += 1;
                return Ok(());
            }
            match &state.fetch {
                Some(fetch) => fetch.clone(),
                None => {
                    let future: Pin<Box<dyn Future<Output = _> + Send>> =
                        Box::pin(Self::run_fetch(self.shared.clone()));
                    let fetch = future.shared();
                    state.fetch = Some(fetch.clone());
                    fetch
                }
            }
        };
        fetch.await
    }

    /// The single in-flight fetch: read both sidecars in parallel and
    /// replace the snapshot wholesale.
    async fn run_fetch(shared: Arc<CacheShared>) -> Result<(), StoreError> {
        let result = async {
            let (own, legacy) = tokio::join!(
                sidecar::read_own_sidecar(&shared.dir),
                read_legacy_sections(&shared.dir),
            );
            Ok(DirectorySnapshot {
                own: own?,
                legacy: legacy?,
            })
        }
        .await;

        let mut state = shared.state.lock().unwrap();
        state.fetch = None;
        match result {
            Ok(snapshot) => {
                debug!(
                    directory = %shared.dir.display(),
                    own = snapshot.own.len(),
                    legacy = snapshot.legacy.is_some(),
                    "directory snapshot fetched"
                );
                state.snapshot = Some(snapshot);
                state.fetched_at = Some(Instant::now());
                state.stats.fetches += 1;
                Ok(())
            }
            Err(e) => {
                // No snapshot update; the next call retries
                state.stats.fetch_failures += 1;
                Err(e)
            }
        }
    }

    /// The debounced store cycle.
    ///
    /// Waits out the debounce delay (batching near-term mutations),
    /// clears the followup flag, then writes the own mapping - or deletes
    /// the sidecar when the mapping is empty. A followup requested during
    /// the delay/write window starts another cycle; failures are logged
    /// and not retried, the in-memory state stays the source of truth
    /// until the next mutation.
    async fn store_cycle(shared: Arc<CacheShared>) {
        loop {
            tokio::time::sleep(shared.config.store_delay).await;

            let photos = {
                let mut state = shared.state.lock().unwrap();
                state.store_followup = false;
                state
                    .snapshot
                    .as_ref()
                    .map(|s| s.own.clone())
                    .unwrap_or_default()
            };

            let result = if photos.is_empty() {
                sidecar::delete_own_sidecar(&shared.dir).await
            } else {
                sidecar::write_own_sidecar(&shared.dir, &photos).await
            };

            {
                let mut state = shared.state.lock().unwrap();
                match result {
                    Ok(()) => {
                        if photos.is_empty() {
                            state.stats.sidecar_deletes += 1;
                        } else {
                            state.stats.sidecar_writes += 1;
                        }
                    }
                    Err(e) => {
                        state.stats.write_failures += 1;
                        error!(
                            directory = %shared.dir.display(),
                            error = %e,
                            "sidecar store failed"
                        );
                    }
                }
                if !state.store_followup {
                    state.storing = false;
                    return;
                }
            }
        }
    }
}

impl std::fmt::Debug for DirectoryWorkCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryWorkCache")
            .field("dir", &self.shared.dir)
            .field("idle", &self.is_idle())
            .finish()
    }
}
