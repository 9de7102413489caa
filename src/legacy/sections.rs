//! Line-oriented section parser for the legacy sidecar file.

use crate::store::StoreError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Candidate filenames for the legacy sidecar, probed in order; the first
/// one found wins.
pub const LEGACY_SIDECAR_NAMES: [&str; 2] = [".picasa.ini", "Picasa.ini"];

/// Directory basenames that mark an "originals" holding directory. A
/// legacy sidecar found there layers on top of the parent directory's
/// rules for the same photo name.
pub const ORIGINALS_DIR_NAMES: [&str; 2] = [".picasaoriginals", "Originals"];

/// Photo basename to ordered rule list, as parsed from one sidecar.
pub type LegacySections = HashMap<String, Vec<String>>;

/// Read and parse the legacy sidecar of `dir`.
///
/// Returns `Ok(None)` when the directory has no legacy sidecar (not an
/// error). A line matching `[name]` starts a new section; every other
/// line is appended verbatim to the current section's rule list; the last
/// open section is flushed at end of input. Lines before the first
/// section header are ignored.
///
/// If `dir` is an originals holding directory, the parent directory's
/// sidecar is fetched as well and, for each section present here, the
/// parent's rules for the same name are appended after this file's own
/// rules.
pub async fn read_legacy_sections(dir: &Path) -> Result<Option<LegacySections>, StoreError> {
    let Some(path) = find_legacy_sidecar(dir).await? else {
        return Ok(None);
    };

    let file = fs::File::open(&path)
        .await
        .map_err(|e| StoreError::io(&path, &e))?;
    let mut lines = BufReader::new(file).lines();

    let mut sections = LegacySections::new();
    let mut current: Option<(String, Vec<String>)> = None;
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| StoreError::io(&path, &e))?
    {
        if let Some(name) = parse_section_header(&line) {
            if let Some((name, rules)) = current.take() {
                sections.insert(name, rules);
            }
            current = Some((name.to_string(), Vec::new()));
        } else if let Some((_, rules)) = &mut current {
            rules.push(line);
        }
    }
    if let Some((name, rules)) = current.take() {
        sections.insert(name, rules);
    }

    if is_originals_dir(dir) {
        if let Some(parent) = dir.parent() {
            let parent_sections = Box::pin(read_legacy_sections(parent)).await?;
            if let Some(parent_sections) = parent_sections {
                for (name, rules) in sections.iter_mut() {
                    if let Some(parent_rules) = parent_sections.get(name) {
                        rules.extend_from_slice(parent_rules);
                    }
                }
            }
        }
    }

    Ok(Some(sections))
}

/// Probe for the first existing legacy sidecar candidate in `dir`.
async fn find_legacy_sidecar(dir: &Path) -> Result<Option<PathBuf>, StoreError> {
    for name in LEGACY_SIDECAR_NAMES {
        let path = dir.join(name);
        match fs::metadata(&path).await {
            Ok(_) => return Ok(Some(path)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(StoreError::io(&path, &e)),
        }
    }
    Ok(None)
}

fn parse_section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.strip_suffix(']')
}

fn is_originals_dir(dir: &Path) -> bool {
    dir.file_name()
        .and_then(|n| n.to_str())
        .map(|n| ORIGINALS_DIR_NAMES.contains(&n))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_sidecar_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let sections = read_legacy_sections(dir.path()).await.unwrap();
        assert!(sections.is_none());
    }

    #[tokio::test]
    async fn test_parses_sections_verbatim() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".picasa.ini"),
            "[Picasa]\nname=holiday\n[IMG_0001.jpg]\nstar=yes\nrotate=rotate(1)\n[IMG_0002.jpg]\nbackuphash=1234\n",
        )
        .unwrap();

        let sections = read_legacy_sections(dir.path()).await.unwrap().unwrap();
        assert_eq!(sections.len(), 3);
        assert_eq!(
            sections["IMG_0001.jpg"],
            vec!["star=yes".to_string(), "rotate=rotate(1)".to_string()]
        );
        // Last section is flushed at end of input
        assert_eq!(sections["IMG_0002.jpg"], vec!["backuphash=1234".to_string()]);
    }

    #[tokio::test]
    async fn test_second_candidate_name_found() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Picasa.ini"), "[a.jpg]\nstar=yes\n").unwrap();

        let sections = read_legacy_sections(dir.path()).await.unwrap().unwrap();
        assert_eq!(sections["a.jpg"], vec!["star=yes".to_string()]);
    }

    #[tokio::test]
    async fn test_lines_before_first_section_ignored() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".picasa.ini"),
            "stray=value\n[a.jpg]\nstar=yes\n",
        )
        .unwrap();

        let sections = read_legacy_sections(dir.path()).await.unwrap().unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections["a.jpg"], vec!["star=yes".to_string()]);
    }

    #[tokio::test]
    async fn test_originals_dir_appends_parent_rules() {
        let parent = TempDir::new().unwrap();
        let originals = parent.path().join(".picasaoriginals");
        std::fs::create_dir(&originals).unwrap();
        std::fs::write(
            parent.path().join(".picasa.ini"),
            "[a.jpg]\nstar=yes\n[only_parent.jpg]\nrotate=rotate(2)\n",
        )
        .unwrap();
        std::fs::write(originals.join(".picasa.ini"), "[a.jpg]\nrotate=rotate(1)\n").unwrap();

        let sections = read_legacy_sections(&originals).await.unwrap().unwrap();
        // Own rules first, parent rules appended after
        assert_eq!(
            sections["a.jpg"],
            vec!["rotate=rotate(1)".to_string(), "star=yes".to_string()]
        );
        // Sections only present in the parent are not pulled in
        assert!(!sections.contains_key("only_parent.jpg"));
    }

    #[tokio::test]
    async fn test_originals_dir_without_own_sidecar_yields_none() {
        let parent = TempDir::new().unwrap();
        let originals = parent.path().join("Originals");
        std::fs::create_dir(&originals).unwrap();
        std::fs::write(parent.path().join(".picasa.ini"), "[a.jpg]\nstar=yes\n").unwrap();

        let sections = read_legacy_sections(&originals).await.unwrap();
        assert!(sections.is_none());
    }
}
