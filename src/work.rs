//! The non-destructive edit record for a single photo.
//!
//! A [`PhotoWork`] is a sparse set of optional adjustments. A field that is
//! `None` means "no adjustment of that kind"; a record where every field is
//! `None` is equivalent to having no sidecar entry at all and is never
//! persisted.

use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Axis-aligned crop rectangle in edited-canvas coordinates, integer
/// pixels. The edited canvas frame has its origin at the canvas center
/// (see [`crate::geometry::create_edit_transform`]), so x and y are
/// usually negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CropRect {
    /// Round a geometric rectangle to an integer crop rectangle.
    pub fn from_rect(rect: &Rect) -> Self {
        let rounded = rect.round();
        Self {
            x: rounded.x as i32,
            y: rounded.y as i32,
            width: rounded.width as i32,
            height: rounded.height as i32,
        }
    }
}

/// Sparse, non-destructive edit record for one photo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoWork {
    /// Clockwise quarter-turn count, 1 to 3. Never 0: an unrotated photo
    /// has no entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_turns: Option<u8>,

    /// Tilt angle in degrees, positive tilting clockwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tilt: Option<f64>,

    /// Whether the photo mirrors horizontally before rotation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flipped: Option<bool>,

    /// Flag marker (legacy "star").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagged: Option<bool>,

    /// Crop in edited-canvas coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_rect: Option<CropRect>,

    /// Exposure adjustment in stops.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure: Option<f64>,
}

impl PhotoWork {
    /// Whether this record carries no adjustment at all.
    ///
    /// Empty records must not be persisted; storing one removes the
    /// photo's sidecar entry instead.
    pub fn is_empty(&self) -> bool {
        *self == PhotoWork::default()
    }

    /// Apply an additional rotation to the record.
    ///
    /// `turns` is a (possibly negative) quarter-turn count added to the
    /// current rotation; `flip` toggles horizontal mirroring. A resulting
    /// rotation of zero turns clears the field rather than storing 0.
    pub fn apply_rotation(&mut self, turns: i32, flip: bool) {
        let current = i32::from(self.rotation_turns.unwrap_or(0));
        let combined = (current + turns).rem_euclid(4) as u8;
        self.rotation_turns = if combined == 0 { None } else { Some(combined) };
        if flip {
            self.flipped = match self.flipped {
                Some(true) => None,
                _ => Some(true),
            };
        }
    }
}
