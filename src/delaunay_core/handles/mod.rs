//! Handle types used for exploring and referencing mesh elements.
//!
//! # Fixed and dynamic handles
//!
//! *Fixed handles* (e.g. [FixedVertexHandle]) are small, copyable keys. They can be stored
//! and stay valid until the element they refer to is removed. A handle of a removed element
//! never refers to an element created later.
//!
//! *Dynamic handles* (e.g. [VertexHandle]) borrow the mesh immutably and are used to
//! navigate it: an edge knows its origin, its successor, its reversed twin and its face.
//! Use `fix()` to turn a dynamic handle back into a fixed one.
//!
//! All faces of a mesh are triangles, including the two *virtual* faces that close the
//! surface outside of the bounding rectangle. Edges run counterclockwise around the face to
//! their left.
mod handle_defs;
mod handle_impls;
pub mod iterators;

pub use handle_defs::*;

/// Handle to a vertex of a mesh.
///
/// Use this handle to retrieve the vertex [position](Self::position), its
/// [outgoing edges](Self::out_edges) or the constraint segments passing through it.
pub type VertexHandle<'a> = DynamicHandleImpl<'a, FixedVertexHandle>;

/// Handle to a directed edge of a mesh.
///
/// Use [next()](Self::next), [prev()](Self::prev) and [rev()](Self::rev) to move to
/// adjacent edges, [from()](Self::from), [to()](Self::to) and [face()](Self::face) to access
/// the adjacent vertices and the face on the left side.
pub type DirectedEdgeHandle<'a> = DynamicHandleImpl<'a, FixedDirectedEdgeHandle>;

/// Handle to an undirected edge of a mesh.
pub type UndirectedEdgeHandle<'a> = DynamicHandleImpl<'a, FixedUndirectedEdgeHandle>;

/// Handle to a face of a mesh.
///
/// Every face is a triangle. Faces outside of the bounding rectangle are not
/// [real](Self::is_real).
pub type FaceHandle<'a> = DynamicHandleImpl<'a, FixedFaceHandle>;
