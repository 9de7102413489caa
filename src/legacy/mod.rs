//! Legacy Picasa-style sidecar import.
//!
//! Parses the per-directory legacy sidecar's line-based section format and
//! translates a photo's rule list into a [`crate::work::PhotoWork`],
//! reconciling the legacy crop-first coordinate frame with the internal
//! rotate-first frame via the geometry module.

mod sections;
mod translate;

pub use sections::{
    read_legacy_sections, LegacySections, LEGACY_SIDECAR_NAMES, ORIGINALS_DIR_NAMES,
};
pub use translate::{translate_rules, ImportAnomaly, TILT_DEGREES_PER_LEGACY_UNIT};
