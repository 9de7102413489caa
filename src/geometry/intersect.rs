//! Line and polygon intersection primitives.

use super::types::{Corner, Point, Rect};

/// Minimum line factor treated as "ahead of the line start" by
/// [`cut_line_with_polygon`]. Crossings closer than this are grouped with
/// the behind-the-start candidates.
pub const CUT_EPSILON: f64 = 1e-6;

/// Intersection parameters of two infinite lines given as segments.
///
/// Solves `seg1_start + s * (seg1_end - seg1_start) =
/// seg2_start + t * (seg2_end - seg2_start)` and returns `(s, t)`.
///
/// When the determinant is exactly zero (parallel or coincident lines)
/// both factors are NaN. No epsilon is applied to the determinant test;
/// callers must check with [`f64::is_nan`] before using the result.
pub fn line_line_intersection(
    seg1_start: Point,
    seg1_end: Point,
    seg2_start: Point,
    seg2_end: Point,
) -> (f64, f64) {
    let d1x = seg1_end.x - seg1_start.x;
    let d1y = seg1_end.y - seg1_start.y;
    let d2x = seg2_end.x - seg2_start.x;
    let d2y = seg2_end.y - seg2_start.y;

    let det = d2x * d1y - d1x * d2y;
    if det == 0.0 {
        return (f64::NAN, f64::NAN);
    }

    let dx = seg2_start.x - seg1_start.x;
    let dy = seg2_start.y - seg1_start.y;
    let s = (d2x * dy - d2y * dx) / det;
    let t = (d1x * dy - d1y * dx) / det;
    (s, t)
}

/// Ray-casting parity test for point-in-polygon.
///
/// Vertices may be in either winding order and the polygon may be
/// non-convex. Points exactly on the boundary have implementation-defined
/// inclusion, which is inherent to the parity method. An empty polygon
/// contains nothing.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    if polygon.is_empty() {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let pi = polygon[i];
        let pj = polygon[j];
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Where the infinite line through `line_start` and `line_end` leaves the
/// polygon.
///
/// Considers every polygon edge the line crosses within that edge's bounds
/// (edge factor in `[0, 1]`). Among those crossings, prefers the one with
/// the smallest line factor that is at least [`CUT_EPSILON`]; if no
/// crossing lies ahead of the start, falls back to the smallest line
/// factor overall, which covers a `line_start` already outside the polygon
/// with the crossing behind it. Returns `None` when no edge is crossed
/// within bounds.
pub fn cut_line_with_polygon(
    line_start: Point,
    line_end: Point,
    polygon: &[Point],
) -> Option<Point> {
    let mut min_ahead: Option<f64> = None;
    let mut min_overall: Option<f64> = None;

    for i in 0..polygon.len() {
        let edge_start = polygon[i];
        let edge_end = polygon[(i + 1) % polygon.len()];
        let (on_line, on_edge) = line_line_intersection(line_start, line_end, edge_start, edge_end);
        if on_line.is_nan() || !(0.0..=1.0).contains(&on_edge) {
            continue;
        }
        if on_line >= CUT_EPSILON && min_ahead.map_or(true, |f| on_line < f) {
            min_ahead = Some(on_line);
        }
        if min_overall.map_or(true, |f| on_line < f) {
            min_overall = Some(on_line);
        }
    }

    let factor = min_ahead.or(min_overall)?;
    Some(Point::new(
        line_start.x + factor * (line_end.x - line_start.x),
        line_start.y + factor * (line_end.y - line_start.y),
    ))
}

/// Largest same-aspect rectangle centered at `center` that fits inside
/// `polygon`.
///
/// Grows (or shrinks) `aspect` uniformly from the center: for each of the
/// four corner rays, the polygon crossing found by
/// [`cut_line_with_polygon`] bounds the growth factor, and the minimum
/// across the rays wins, so the result touches the polygon but never
/// crosses it. Rays without a crossing impose no bound; if no ray crosses
/// at all, the aspect rectangle is returned centered as-is.
pub fn fit_rect_in_polygon(center: Point, aspect: &Rect, polygon: &[Point]) -> Rect {
    let half_width = aspect.width / 2.0;
    let half_height = aspect.height / 2.0;
    let centered = Rect::new(
        center.x - half_width,
        center.y - half_height,
        aspect.width,
        aspect.height,
    );
    let ray_length = half_width.hypot(half_height);
    if ray_length == 0.0 {
        return centered;
    }

    let mut min_factor: Option<f64> = None;
    for corner in Corner::ALL {
        let corner_point = centered.corner(corner);
        if let Some(cut) = cut_line_with_polygon(center, corner_point, polygon) {
            let factor = center.distance_to(cut) / ray_length;
            if min_factor.map_or(true, |f| factor < f) {
                min_factor = Some(factor);
            }
        }
    }

    let factor = min_factor.unwrap_or(1.0);
    let width = aspect.width * factor;
    let height = aspect.height * factor;
    Rect::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_close(actual: Point, expected: Point) {
        assert!(
            (actual.x - expected.x).abs() < 1e-9 && (actual.y - expected.y).abs() < 1e-9,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn assert_rect_close(actual: Rect, expected: Rect) {
        assert!(
            (actual.x - expected.x).abs() < 1e-9
                && (actual.y - expected.y).abs() < 1e-9
                && (actual.width - expected.width).abs() < 1e-9
                && (actual.height - expected.height).abs() < 1e-9,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn unit_square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    fn square_10() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_line_line_intersection_basic() {
        let (s, t) = line_line_intersection(
            Point::new(0.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
            Point::new(2.0, 0.0),
        );
        assert_eq!(s, 0.5);
        assert_eq!(t, 0.5);
    }

    #[test]
    fn test_line_line_intersection_beyond_segments() {
        // The factors describe the infinite lines, not the segments
        let (s, t) = line_line_intersection(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(4.0, -1.0),
            Point::new(4.0, 1.0),
        );
        assert_eq!(s, 4.0);
        assert_eq!(t, 0.5);
    }

    #[test]
    fn test_line_line_intersection_parallel_is_nan() {
        let (s, t) = line_line_intersection(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
        );
        assert!(s.is_nan());
        assert!(t.is_nan());
    }

    #[test]
    fn test_line_line_intersection_coincident_is_nan() {
        let (s, t) = line_line_intersection(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(3.0, 3.0),
        );
        assert!(s.is_nan());
        assert!(t.is_nan());
    }

    #[test]
    fn test_point_in_polygon_square() {
        let poly = unit_square();
        assert!(point_in_polygon(Point::new(0.5, 0.5), &poly));
        assert!(!point_in_polygon(Point::new(1.5, 0.5), &poly));
        assert!(!point_in_polygon(Point::new(0.5, -0.5), &poly));
    }

    #[test]
    fn test_point_in_polygon_empty_is_outside() {
        assert!(!point_in_polygon(Point::new(0.0, 0.0), &[]));
        assert!(cut_line_with_polygon(Point::new(0.0, 0.0), Point::new(1.0, 0.0), &[]).is_none());
    }

    #[test]
    fn test_point_in_polygon_non_convex() {
        // L-shaped polygon with the notch at the top right
        let poly = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ];
        assert!(point_in_polygon(Point::new(0.5, 0.5), &poly));
        assert!(point_in_polygon(Point::new(1.5, 1.5), &poly));
        assert!(!point_in_polygon(Point::new(1.5, 0.5), &poly));
    }

    #[test]
    fn test_cut_line_unit_square() {
        let cut = cut_line_with_polygon(
            Point::new(0.5, 0.5),
            Point::new(2.0, 0.5),
            &unit_square(),
        )
        .unwrap();
        assert_point_close(cut, Point::new(1.0, 0.5));
    }

    #[test]
    fn test_cut_line_prefers_ahead_over_behind() {
        // From inside the square, both x=0 (behind) and x=1 (ahead) are
        // crossed; the ahead crossing wins
        let cut = cut_line_with_polygon(
            Point::new(0.25, 0.5),
            Point::new(2.0, 0.5),
            &unit_square(),
        )
        .unwrap();
        assert!((cut.x - 1.0).abs() < 1e-9);
        assert!((cut.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_cut_line_behind_start_takes_smallest_factor() {
        // Start outside the polygon, heading away: both crossings are
        // behind the start (factors -1 and -2); the smallest overall wins
        let cut = cut_line_with_polygon(
            Point::new(2.0, 0.5),
            Point::new(3.0, 0.5),
            &unit_square(),
        )
        .unwrap();
        assert!((cut.x - 0.0).abs() < 1e-9);
        assert!((cut.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_cut_line_no_crossing() {
        let cut = cut_line_with_polygon(
            Point::new(0.5, 5.0),
            Point::new(2.0, 5.0),
            &unit_square(),
        );
        assert!(cut.is_none());
    }

    #[test]
    fn test_fit_rect_centered_in_square() {
        let fitted = fit_rect_in_polygon(
            Point::new(5.0, 5.0),
            &Rect::new(0.0, 0.0, 2.0, 2.0),
            &square_10(),
        );
        assert_rect_close(fitted, Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_fit_rect_off_center_touches_nearest_edges() {
        let fitted = fit_rect_in_polygon(
            Point::new(2.0, 2.0),
            &Rect::new(0.0, 0.0, 2.0, 2.0),
            &square_10(),
        );
        // Constrained by the top-left corner rays: growth factor 2
        assert_rect_close(fitted, Rect::new(0.0, 0.0, 4.0, 4.0));
    }

    #[test]
    fn test_fit_rect_preserves_aspect() {
        let fitted = fit_rect_in_polygon(
            Point::new(5.0, 5.0),
            &Rect::new(0.0, 0.0, 4.0, 2.0),
            &square_10(),
        );
        assert!((fitted.width / fitted.height - 2.0).abs() < 1e-9);
        assert!(fitted.width <= 10.0 + 1e-9);
    }

    #[test]
    fn test_fit_rect_degenerate_aspect() {
        let fitted = fit_rect_in_polygon(
            Point::new(5.0, 5.0),
            &Rect::new(0.0, 0.0, 0.0, 0.0),
            &square_10(),
        );
        assert_eq!(fitted, Rect::new(5.0, 5.0, 0.0, 0.0));
    }
}
