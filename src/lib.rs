//! # cdt_mesh
//!
//! Dynamic constrained Delaunay triangulations for navigation meshes.
//!
//! A [Mesh] covers a rectangular domain and supports:
//! * Inserting and removing vertices at any time
//! * Inserting and removing constraint segments, single or grouped into shapes. Crossing and
//!   overlapping segments are split and shared automatically.
//! * Point location by a randomized jump-and-walk
//! * Movable [objects](Object) made of constraint segments
//! * Obstacle queries ([Mesh::is_circle_intersecting_any_constraint])
//!
//! All unconstrained edges are kept Delaunay after every operation.
//!
//! # Example
//! ```
//! use cdt_mesh::{Mesh, Point2, PositionInMesh};
//!
//! # fn main() -> Result<(), cdt_mesh::MeshError> {
//! let mut mesh = Mesh::build_rectangle(200.0, 100.0)?;
//! let shape = mesh.insert_polygon(&[
//!     Point2::new(50.0, 20.0),
//!     Point2::new(150.0, 20.0),
//!     Point2::new(100.0, 80.0),
//! ])?;
//!
//! assert_eq!(mesh.shape_segments(shape).map(<[_]>::len), Some(3));
//! assert!(mesh.is_circle_intersecting_any_constraint(Point2::new(100.0, 25.0), 10.0));
//! assert!(!mesh.is_circle_intersecting_any_constraint(Point2::new(20.0, 80.0), 5.0));
//!
//! match mesh.locate_position(Point2::new(100.0, 20.0)) {
//!     PositionInMesh::OnEdge(edge) => assert!(mesh.directed_edge(edge).unwrap().is_constrained()),
//!     _ => unreachable!(),
//! }
//!
//! mesh.delete_constraint_shape(shape)?;
//! assert_eq!(mesh.num_vertices(), 4);
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//! Degenerate situations (long point location walks, failing constraint walks, aborted
//! Delaunay restorations) are reported through [tracing](https://docs.rs/tracing). No
//! subscriber is installed by this crate.

#![forbid(unsafe_code)]

mod constraints;
mod delaunay_core;
mod error;
mod mesh;
mod objects;
mod point;
mod record;
mod simplify;

#[cfg(test)]
mod test_utilities;

pub use crate::delaunay_core::math;
pub use crate::delaunay_core::{Orientation, PositionInMesh, RandGenerator};
pub use crate::delaunay_core::{BOUNDING_OFFSET, WALK_ITERATION_LIMIT, WALK_WARNING_THRESHOLD};

pub use error::{MeshError, RecordError};
pub use mesh::Mesh;
pub use objects::Object;
pub use point::Point2;
pub use record::parse_constraint_record;
pub use simplify::simplify;

/// Handle types used for referencing and navigating mesh elements.
///
/// *Fixed handles* are plain indices that can be stored. *Dynamic handles* borrow the mesh
/// and allow to navigate it. Use [Mesh::vertex](crate::Mesh::vertex),
/// [Mesh::directed_edge](crate::Mesh::directed_edge) and similar methods to turn a fixed
/// handle into a dynamic one, use `fix()` for the opposite direction.
pub mod handles {
    pub use crate::delaunay_core::{
        DirectedEdgeHandle, FaceHandle, FixedDirectedEdgeHandle, FixedFaceHandle,
        FixedObjectHandle, FixedSegmentHandle, FixedShapeHandle, FixedUndirectedEdgeHandle,
        FixedVertexHandle, UndirectedEdgeHandle, VertexHandle,
    };

    pub use crate::delaunay_core::DynamicHandleImpl;
}

/// Iterators over mesh elements.
pub mod iterators {
    pub use crate::delaunay_core::iterators::{
        CircularIterator, DirectedEdgeIterator, FaceIterator, FixedSegmentIterator,
        FixedShapeIterator, UndirectedEdgeIterator, VertexIterator,
    };
}
