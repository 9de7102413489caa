//! Reading and writing the own JSON sidecar file.
//!
//! One sidecar per directory, shaped `{ "photos": { <basename>: {...} } }`,
//! pretty-printed with photo keys in sorted order so that version-control
//! diffs stay minimal. The sidecar is deleted outright when the last entry
//! goes away; an empty `photos` object is never written.

use crate::store::types::{StoreError, OWN_SIDECAR_NAME};
use crate::work::PhotoWork;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::debug;

#[derive(Debug, Default, serde::Deserialize)]
struct SidecarFile {
    photos: BTreeMap<String, PhotoWork>,
}

#[derive(serde::Serialize)]
struct SidecarFileRef<'a> {
    photos: &'a BTreeMap<String, PhotoWork>,
}

/// Read the own sidecar of `dir`. A missing file is an empty mapping.
pub(crate) async fn read_own_sidecar(
    dir: &Path,
) -> Result<BTreeMap<String, PhotoWork>, StoreError> {
    let path = dir.join(OWN_SIDECAR_NAME);
    let bytes = match fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(StoreError::io(&path, &e)),
    };
    let file: SidecarFile = serde_json::from_slice(&bytes).map_err(|e| StoreError::Malformed {
        path: path.clone(),
        message: e.to_string(),
    })?;
    Ok(file.photos)
}

/// Write the own sidecar of `dir`, replacing any previous content.
pub(crate) async fn write_own_sidecar(
    dir: &Path,
    photos: &BTreeMap<String, PhotoWork>,
) -> Result<(), StoreError> {
    let path = dir.join(OWN_SIDECAR_NAME);
    let mut bytes = serde_json::to_vec_pretty(&SidecarFileRef { photos })
        .map_err(|e| StoreError::Malformed {
            path: path.clone(),
            message: e.to_string(),
        })?;
    bytes.push(b'\n');
    fs::write(&path, bytes)
        .await
        .map_err(|e| StoreError::io(&path, &e))?;
    debug!(path = %path.display(), entries = photos.len(), "sidecar written");
    Ok(())
}

/// Delete the own sidecar of `dir`. Deleting a missing file succeeds.
pub(crate) async fn delete_own_sidecar(dir: &Path) -> Result<(), StoreError> {
    let path = dir.join(OWN_SIDECAR_NAME);
    match fs::remove_file(&path).await {
        Ok(()) => {
            debug!(path = %path.display(), "sidecar deleted");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::io(&path, &e)),
    }
}
