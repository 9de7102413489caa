//! Affine transforms over image coordinates.

use super::types::{Corner, Point, Rect};

/// A 2D affine transform.
///
/// Stored as the six coefficients of the augmented matrix
/// `[a c e; b d f]`, applied as `(a*x + c*y + e, b*x + d*y + f)`.
/// Equivalent in expressive power to a 4x4 matrix restricted to the
/// image plane, which is all the edit model needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Transform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// A translation by `(dx, dy)`.
    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: dx,
            f: dy,
        }
    }

    /// A rotation around the origin by `radians`.
    ///
    /// With y growing downward, a positive angle rotates clockwise on
    /// screen.
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Compose with another transform that is applied after this one.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    /// Apply the transform to a point.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }
}

/// Transform a rectangle and re-derive an axis-aligned result.
///
/// The `nw` and `se` corners are pushed through the transform and the
/// result is rebuilt with [`Rect::from_points`], which takes min/abs of
/// the transformed coordinates. This keeps the result a valid rectangle
/// (non-negative extent) even when the transform includes rotation, where
/// the transformed corners no longer pair up naively.
pub fn transform_rect(rect: &Rect, transform: &Transform) -> Rect {
    Rect::from_points(
        transform.apply(rect.corner(Corner::NorthWest)),
        transform.apply(rect.corner(Corner::SouthEast)),
    )
}

/// Build the edit transform for a master image.
///
/// Maps master-image pixel coordinates into the edited canvas frame: the
/// image center moves to the origin, then the canvas rotates by the
/// quarter-turn count plus the tilt angle. Crop rectangles in
/// [`crate::work::PhotoWork`] live in this centered output frame.
pub fn create_edit_transform(
    master_width: f64,
    master_height: f64,
    rotation_turns: u8,
    tilt_degrees: f64,
) -> Transform {
    let angle = (f64::from(rotation_turns) * 90.0 + tilt_degrees).to_radians();
    Transform::translation(-master_width / 2.0, -master_height / 2.0)
        .then(&Transform::rotation(angle))
}
