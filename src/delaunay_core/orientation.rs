/// Describes on which side of a directed line a point lies.
///
/// Created by [math::orientation](crate::math::orientation) and by
/// [DirectedEdgeHandle::side_query](crate::handles::DirectedEdgeHandle::side_query).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// The point lies on the left side (counterclockwise turn).
    Left,
    /// The point lies on the right side (clockwise turn).
    Right,
    /// The point lies on the line, or close enough for the epsilon aware variant.
    Straight,
}

impl Orientation {
    #[inline]
    pub(crate) fn from_determinant(s: f64) -> Orientation {
        if s > 0.0 {
            Orientation::Left
        } else if s < 0.0 {
            Orientation::Right
        } else {
            Orientation::Straight
        }
    }

    /// Returns `true` if a point lies on the left side of a line.
    pub fn is_left(self) -> bool {
        self == Orientation::Left
    }

    /// Returns `true` if a point lies on the right side of a line.
    pub fn is_right(self) -> bool {
        self == Orientation::Right
    }
}
