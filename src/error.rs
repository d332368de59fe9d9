use thiserror::Error;

/// Errors returned by mesh operations.
///
/// An operation returning an error leaves the mesh unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MeshError {
    /// The mesh's width or height is not a positive, finite number.
    #[error("mesh dimensions must be positive and finite")]
    InvalidDimensions,
    /// A position lies outside of the mesh's domain.
    #[error("position lies outside of the mesh domain")]
    OutOfBounds,
    /// Point location could not find a position inside the mesh.
    #[error("position could not be located")]
    LocationFailed,
    /// A constraint segment has zero length or both of its end points snap to the same vertex.
    #[error("constraint segment is degenerate")]
    DegenerateSegment,
    /// A constraint segment lies completely outside of the domain and clipping is enabled.
    #[error("constraint segment lies outside of the mesh domain")]
    SegmentClippedAway,
    /// Constrained edges cannot be flipped.
    #[error("cannot flip a constrained edge")]
    ConstrainedEdge,
    /// Edges next to a virtual face cannot be flipped.
    #[error("cannot flip an edge adjacent to a virtual face")]
    VirtualEdge,
    /// The quadrilateral around an edge is not strictly convex.
    #[error("cannot flip an edge of a non convex quadrilateral")]
    NonConvexQuad,
    /// The vertex cannot be removed without breaking a constraint.
    #[error("vertex cannot be removed without breaking a constraint")]
    VertexNotRemovable,
    /// A handle refers to an element that was removed.
    #[error("handle refers to a removed element")]
    InvalidHandle,
    /// Inserting a constraint segment failed to walk through the mesh.
    #[error("constraint segment could not be traced through the mesh")]
    ConstraintWalkFailed,
}

/// Errors returned when parsing a constraint record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum RecordError {
    /// The token at `index` is not a number.
    #[error("token {index} is not a valid number")]
    InvalidNumber {
        /// Zero based index of the offending token.
        index: usize,
    },
    /// The number of coordinates is not a multiple of four.
    #[error("record contains {len} coordinates, expected a multiple of 4")]
    InvalidLength {
        /// The number of coordinates found.
        len: usize,
    },
}
