//! Photowork - per-directory, non-destructive photo edit metadata.
//!
//! This library owns the authoritative edit records for photos (rotation,
//! tilt, crop, flags) and persists them as one JSON sidecar file per
//! directory, with debounced, coalesced writes. Directories that carry a
//! legacy Picasa-style sidecar are imported transparently: the legacy rule
//! grammar is parsed and translated into the internal edit model, including
//! the geometric reconciliation between the legacy crop-first coordinate
//! frame and the internal rotate-first frame.
//!
//! # High-Level API
//!
//! Most callers only need the [`store::PhotoWorkStore`] facade:
//!
//! ```ignore
//! use photowork::store::{PhotoWorkStore, StoreConfig};
//!
//! let store = PhotoWorkStore::with_config(StoreConfig::default());
//!
//! let work = store.fetch_photo_work(dir, "IMG_0001.jpg", 6000, 4000).await?;
//! store.store_photo_work(dir, "IMG_0001.jpg", edited).await?;
//! ```

pub mod geometry;
pub mod legacy;
pub mod store;
pub mod work;

/// Version of the photowork library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
