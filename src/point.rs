/// A two dimensional point.
///
/// This is the basic type used for defining positions. The mesh works in a right handed
/// coordinate system: a point with a positive determinant lies to the left of a line.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy, Default)]
pub struct Point2 {
    /// The point's x coordinate
    pub x: f64,
    /// The point's y coordinate
    pub y: f64,
}

impl Point2 {
    /// Creates a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Point2 { x, y }
    }

    /// Returns the squared distance of this point and another point.
    #[inline]
    pub fn distance_2(&self, other: Self) -> f64 {
        self.sub(other).length2()
    }

    /// Returns `true` if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub(crate) fn mul(&self, factor: f64) -> Self {
        Point2 {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    pub(crate) fn add(&self, other: Self) -> Self {
        Point2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    pub(crate) fn length2(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub(crate) fn sub(&self, other: Self) -> Self {
        Point2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    pub(crate) fn dot(&self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub(crate) fn to_robust(self) -> robust::Coord<f64> {
        robust::Coord {
            x: self.x,
            y: self.y,
        }
    }
}

impl From<Point2> for [f64; 2] {
    #[inline]
    fn from(point: Point2) -> Self {
        [point.x, point.y]
    }
}

impl From<[f64; 2]> for Point2 {
    #[inline]
    fn from(source: [f64; 2]) -> Self {
        Self::new(source[0], source[1])
    }
}

impl From<(f64, f64)> for Point2 {
    #[inline]
    fn from(source: (f64, f64)) -> Self {
        Self::new(source.0, source.1)
    }
}
