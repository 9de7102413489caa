//! Pure 2D geometry for crop reconciliation.
//!
//! Stateless functions over points, rectangles and polygons: rectangle
//! construction from arbitrary corners, affine transforms, line
//! intersection, polygon containment, and rectangle fitting inside a
//! transformed border polygon.

mod intersect;
mod transform;
mod types;

pub use intersect::{
    cut_line_with_polygon, fit_rect_in_polygon, line_line_intersection, point_in_polygon,
    CUT_EPSILON,
};
pub use transform::{create_edit_transform, transform_rect, Transform};
pub use types::{Corner, Point, Rect};
