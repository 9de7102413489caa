//! Translation of legacy rule lists into edit records.
//!
//! The legacy tool crops the original image first and rotates/tilts the
//! crop afterwards; the internal model rotates/tilts the whole canvas
//! first and crops second. Translation therefore pushes the legacy crop
//! through the edit transform and re-fits it, so that the visible result
//! matches what the legacy tool produced.

use crate::geometry::{
    create_edit_transform, fit_rect_in_polygon, Corner, Point, Rect,
};
use crate::work::{CropRect, PhotoWork};
use std::fmt;

/// Scale from the legacy tilt unit to internal degrees. One legacy unit
/// is the full scale of the legacy tool's tilt slider.
pub const TILT_DEGREES_PER_LEGACY_UNIT: f64 = 11.3;

/// Rule prefixes known to carry nothing relevant to the edit model.
const IGNORED_RULE_PREFIXES: [&str; 4] = ["backuphash=", "width=", "height=", "moddate="];

/// A non-fatal irregularity found while translating legacy rules.
///
/// Anomalies are collected and reported together; they never abort
/// translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportAnomaly {
    /// A rule that matches no known form and is not on the ignore list
    UnknownRule(String),
    /// A filter entry inside a `filters=` rule that matches no known form
    UnknownFilter(String),
    /// Two crop rules with different packed values; the first wins
    ConflictingCrop { kept: String, ignored: String },
    /// A packed crop value longer than 16 hex digits; the crop is skipped
    OversizedCrop(String),
    /// A packed crop value that is not parseable hex; the crop is skipped
    MalformedCrop(String),
}

impl fmt::Display for ImportAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportAnomaly::UnknownRule(rule) => write!(f, "unknown rule `{rule}`"),
            ImportAnomaly::UnknownFilter(filter) => write!(f, "unknown filter `{filter}`"),
            ImportAnomaly::ConflictingCrop { kept, ignored } => {
                write!(f, "conflicting crop values (kept {kept}, ignored {ignored})")
            }
            ImportAnomaly::OversizedCrop(value) => {
                write!(f, "crop value `{value}` exceeds 16 hex digits")
            }
            ImportAnomaly::MalformedCrop(value) => {
                write!(f, "crop value `{value}` is not valid hex")
            }
        }
    }
}

/// Translate one photo's ordered legacy rule list into an edit record.
///
/// `rotate=rotate(N)` counts N clockwise quarter turns (not degrees),
/// taken modulo 4; `rotate(0)` and `rotate(4)` produce no adjustment.
///
/// Returns the best-effort record together with any anomalies found;
/// anomalies are non-fatal and the remaining rules still translate.
pub fn translate_rules(
    rules: &[String],
    master_width: u32,
    master_height: u32,
) -> (PhotoWork, Vec<ImportAnomaly>) {
    let mut anomalies = Vec::new();
    let mut turns: u8 = 0;
    let mut flagged = false;
    let mut tilt = 0.0_f64;
    let mut crop_hex: Option<String> = None;

    for rule in rules {
        let rule = rule.trim();
        if rule.is_empty()
            || rule == "textactive=0"
            || IGNORED_RULE_PREFIXES.iter().any(|p| rule.starts_with(p))
        {
            continue;
        }

        if let Some(count) = rule
            .strip_prefix("rotate=rotate(")
            .and_then(|r| r.strip_suffix(')'))
            .and_then(|r| r.parse::<u32>().ok())
        {
            turns = (count % 4) as u8;
        } else if rule == "star=yes" {
            flagged = true;
        } else if let Some(filters) = rule.strip_prefix("filters=") {
            for filter in filters.split(';').filter(|f| !f.is_empty()) {
                if let Some(params) = filter.strip_prefix("tilt=1,") {
                    match params.split(',').next().and_then(|v| v.parse::<f64>().ok()) {
                        // Tilt filters compound: each adds to the total
                        Some(angle) => tilt += angle * TILT_DEGREES_PER_LEGACY_UNIT,
                        None => anomalies.push(ImportAnomaly::UnknownFilter(filter.to_string())),
                    }
                } else if let Some(hex) = filter.strip_prefix("crop64=1,") {
                    offer_crop(hex, &mut crop_hex, &mut anomalies);
                } else {
                    anomalies.push(ImportAnomaly::UnknownFilter(filter.to_string()));
                }
            }
        } else if let Some(hex) = rule
            .strip_prefix("crop=rect64(")
            .and_then(|r| r.strip_suffix(')'))
        {
            offer_crop(hex, &mut crop_hex, &mut anomalies);
        } else {
            anomalies.push(ImportAnomaly::UnknownRule(rule.to_string()));
        }
    }

    let mut work = PhotoWork::default();
    if turns != 0 {
        work.rotation_turns = Some(turns);
    }
    if flagged {
        work.flagged = Some(true);
    }
    if tilt != 0.0 {
        work.tilt = Some(tilt);
    }
    if let Some(hex) = crop_hex {
        let width = f64::from(master_width);
        let height = f64::from(master_height);
        match decode_crop_hex(&hex, width, height) {
            Some(legacy_rect) => {
                work.crop_rect = Some(reconcile_crop(&legacy_rect, width, height, turns, tilt));
            }
            None => anomalies.push(ImportAnomaly::MalformedCrop(hex)),
        }
    }

    (work, anomalies)
}

/// Record a packed crop value, keeping the first one seen.
///
/// Values shorter than 16 hex digits are zero-left-padded before
/// comparison; longer values are an anomaly and skipped entirely.
fn offer_crop(hex: &str, crop_hex: &mut Option<String>, anomalies: &mut Vec<ImportAnomaly>) {
    if hex.len() > 16 {
        anomalies.push(ImportAnomaly::OversizedCrop(hex.to_string()));
        return;
    }
    let padded = format!("{hex:0>16}");
    match crop_hex {
        None => *crop_hex = Some(padded),
        Some(kept) if *kept != padded => {
            anomalies.push(ImportAnomaly::ConflictingCrop {
                kept: kept.clone(),
                ignored: padded,
            });
        }
        Some(_) => {}
    }
}

/// Decode a 16-hex-digit packed crop quad into master pixel space.
///
/// The quad packs (left, top, right, bottom), each a 4-digit fraction of
/// 0xFFFF scaled by the master width or height respectively.
fn decode_crop_hex(hex: &str, master_width: f64, master_height: f64) -> Option<Rect> {
    let packed = u64::from_str_radix(hex, 16).ok()?;
    let frac = |v: u64| (v & 0xFFFF) as f64 / 0xFFFF as f64;
    let left = frac(packed >> 48) * master_width;
    let top = frac(packed >> 32) * master_height;
    let right = frac(packed >> 16) * master_width;
    let bottom = frac(packed) * master_height;
    Some(Rect::from_points(
        Point::new(left, top),
        Point::new(right, bottom),
    ))
}

/// Map a legacy crop rectangle (pre-rotation master pixel space) into the
/// internal post-transform crop frame.
///
/// Transforms the legacy crop's corners into a border polygon and its
/// center through the edit transform, swaps the target aspect when the
/// rotation is an odd quarter-turn count, and fits the largest
/// same-aspect axis-aligned rectangle at that center inside the polygon.
fn reconcile_crop(
    legacy_rect: &Rect,
    master_width: f64,
    master_height: f64,
    turns: u8,
    tilt: f64,
) -> CropRect {
    if turns == 0 && tilt == 0.0 {
        // Untransformed canvas: the crop only shifts into the centered frame
        return CropRect::from_rect(&Rect::new(
            legacy_rect.x - master_width / 2.0,
            legacy_rect.y - master_height / 2.0,
            legacy_rect.width,
            legacy_rect.height,
        ));
    }

    let transform = create_edit_transform(master_width, master_height, turns, tilt);
    let border_polygon: Vec<Point> = [
        Corner::NorthWest,
        Corner::NorthEast,
        Corner::SouthEast,
        Corner::SouthWest,
    ]
    .iter()
    .map(|&corner| transform.apply(legacy_rect.corner(corner)))
    .collect();
    let center = transform.apply(legacy_rect.center());

    let (aspect_width, aspect_height) = if turns % 2 == 1 {
        (legacy_rect.height, legacy_rect.width)
    } else {
        (legacy_rect.width, legacy_rect.height)
    };
    let aspect = Rect::new(0.0, 0.0, aspect_width, aspect_height);

    CropRect::from_rect(&fit_rect_in_polygon(center, &aspect, &border_polygon))
}
