//! Geometry type definitions.

/// A point in 2D image space.
///
/// Coordinates follow screen convention: x grows to the east (right),
/// y grows to the south (down).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// One of the four compass corners of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Corner {
    /// All four corners, in NW, NE, SW, SE order.
    pub const ALL: [Corner; 4] = [
        Corner::NorthWest,
        Corner::NorthEast,
        Corner::SouthWest,
        Corner::SouthEast,
    ];

    /// The diagonally opposite corner.
    pub fn opposite(self) -> Corner {
        match self {
            Corner::NorthWest => Corner::SouthEast,
            Corner::NorthEast => Corner::SouthWest,
            Corner::SouthWest => Corner::NorthEast,
            Corner::SouthEast => Corner::NorthWest,
        }
    }

    /// The corner sharing the same horizontal edge.
    pub fn horizontal_neighbor(self) -> Corner {
        match self {
            Corner::NorthWest => Corner::NorthEast,
            Corner::NorthEast => Corner::NorthWest,
            Corner::SouthWest => Corner::SouthEast,
            Corner::SouthEast => Corner::SouthWest,
        }
    }

    /// The corner sharing the same vertical edge.
    pub fn vertical_neighbor(self) -> Corner {
        match self {
            Corner::NorthWest => Corner::SouthWest,
            Corner::NorthEast => Corner::SouthEast,
            Corner::SouthWest => Corner::NorthWest,
            Corner::SouthEast => Corner::NorthEast,
        }
    }
}

/// An axis-aligned rectangle with non-negative width and height.
///
/// In master-image pixel space unless stated otherwise by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle. Width and height are expected to be >= 0;
    /// use [`Rect::from_points`] when the corner order is not known.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Construct the rectangle spanned by two arbitrary corner points.
    ///
    /// Order-independent: the result always has non-negative width and
    /// height regardless of which corners are passed, and in which order.
    pub fn from_points(p1: Point, p2: Point) -> Self {
        Self {
            x: p1.x.min(p2.x),
            y: p1.y.min(p2.y),
            width: (p2.x - p1.x).abs(),
            height: (p2.y - p1.y).abs(),
        }
    }

    /// The position of one compass corner.
    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::NorthWest => Point::new(self.x, self.y),
            Corner::NorthEast => Point::new(self.x + self.width, self.y),
            Corner::SouthWest => Point::new(self.x, self.y + self.height),
            Corner::SouthEast => Point::new(self.x + self.width, self.y + self.height),
        }
    }

    /// The center point of the rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Round all fields to the nearest integer value.
    pub fn round(&self) -> Rect {
        Rect {
            x: self.x.round(),
            y: self.y.round(),
            width: self.width.round(),
            height: self.height.round(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_points_order_independent() {
        let a = Rect::from_points(Point::new(5.0, 5.0), Point::new(1.0, 1.0));
        let b = Rect::from_points(Point::new(1.0, 1.0), Point::new(5.0, 5.0));
        assert_eq!(a, b);
        assert_eq!(a, Rect::new(1.0, 1.0, 4.0, 4.0));
    }

    #[test]
    fn test_rect_from_points_mixed_corners() {
        // NE and SW corners instead of NW and SE
        let rect = Rect::from_points(Point::new(10.0, 2.0), Point::new(4.0, 8.0));
        assert_eq!(rect, Rect::new(4.0, 2.0, 6.0, 6.0));
        assert!(rect.width >= 0.0 && rect.height >= 0.0);
    }

    #[test]
    fn test_rect_corners() {
        let rect = Rect::new(1.0, 2.0, 10.0, 20.0);
        assert_eq!(rect.corner(Corner::NorthWest), Point::new(1.0, 2.0));
        assert_eq!(rect.corner(Corner::NorthEast), Point::new(11.0, 2.0));
        assert_eq!(rect.corner(Corner::SouthWest), Point::new(1.0, 22.0));
        assert_eq!(rect.corner(Corner::SouthEast), Point::new(11.0, 22.0));
        assert_eq!(rect.center(), Point::new(6.0, 12.0));
    }

    #[test]
    fn test_corner_opposite() {
        for corner in Corner::ALL {
            assert_eq!(corner.opposite().opposite(), corner);
        }
        assert_eq!(Corner::NorthWest.opposite(), Corner::SouthEast);
        assert_eq!(Corner::NorthEast.opposite(), Corner::SouthWest);
    }

    #[test]
    fn test_corner_neighbors() {
        assert_eq!(Corner::NorthWest.horizontal_neighbor(), Corner::NorthEast);
        assert_eq!(Corner::SouthEast.horizontal_neighbor(), Corner::SouthWest);
        assert_eq!(Corner::NorthWest.vertical_neighbor(), Corner::SouthWest);
        assert_eq!(Corner::NorthEast.vertical_neighbor(), Corner::SouthEast);
        for corner in Corner::ALL {
            assert_eq!(
                corner.horizontal_neighbor().vertical_neighbor(),
                corner.opposite()
            );
        }
    }

    #[test]
    fn test_rect_round() {
        let rect = Rect::new(0.4, 0.6, 499.5, 500.49);
        assert_eq!(rect.round(), Rect::new(0.0, 1.0, 500.0, 500.0));
    }

    #[test]
    fn test_point_distance() {
        let p = Point::new(0.0, 0.0);
        assert_eq!(p.distance_to(Point::new(3.0, 4.0)), 5.0);
    }
}
