use slotmap::{new_key_type, Key};

use super::super::dcel::Dcel;

new_key_type! {
    /// Fixed handle to a vertex.
    ///
    /// *See also the [handles](crate::handles) module.*
    pub struct FixedVertexHandle;

    /// Fixed handle to an undirected edge.
    ///
    /// *See also the [handles](crate::handles) module.*
    pub struct FixedUndirectedEdgeHandle;

    /// Fixed handle to a face.
    ///
    /// *See also the [handles](crate::handles) module.*
    pub struct FixedFaceHandle;

    /// Fixed handle to a constraint segment.
    pub struct FixedSegmentHandle;

    /// Fixed handle to a constraint shape.
    pub struct FixedShapeHandle;

    /// Fixed handle to an object registered with
    /// [Mesh::insert_object](crate::Mesh::insert_object).
    pub struct FixedObjectHandle;
}

/// Fixed handle to a directed edge (a half-edge).
///
/// Both directions of an edge share the storage of their undirected edge and only differ in
/// their side.
///
/// *See also the [handles](crate::handles) module.*
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct FixedDirectedEdgeHandle {
    edge: FixedUndirectedEdgeHandle,
    reversed: bool,
}

impl FixedDirectedEdgeHandle {
    #[inline]
    pub(crate) fn new_normalized(edge: FixedUndirectedEdgeHandle) -> Self {
        FixedDirectedEdgeHandle {
            edge,
            reversed: false,
        }
    }

    /// Placeholder for links that get fixed before an operation returns.
    pub(crate) fn null() -> Self {
        Self::new_normalized(FixedUndirectedEdgeHandle::null())
    }

    pub(crate) fn is_null(&self) -> bool {
        self.edge.is_null()
    }

    /// Position of this half edge within its undirected edge entry.
    #[inline]
    pub(crate) fn side(self) -> usize {
        usize::from(self.reversed)
    }

    /// Returns this edge with its direction reversed.
    ///
    /// If this edge points from `v0` to `v1`, the returned edge would point from `v1` to `v0`.
    /// Calling `rev` twice will always return the original edge.
    #[inline]
    pub fn rev(self) -> Self {
        FixedDirectedEdgeHandle {
            edge: self.edge,
            reversed: !self.reversed,
        }
    }

    /// Converts this directed edge handle into an undirected edge handle.
    #[inline]
    pub fn as_undirected(self) -> FixedUndirectedEdgeHandle {
        self.edge
    }
}

impl FixedUndirectedEdgeHandle {
    /// Converts this undirected handle into a directed edge handle.
    ///
    /// Any undirected edge has exactly two directed edges associated with it. This method
    /// returns the one stored first.
    #[inline]
    pub fn as_directed(&self) -> FixedDirectedEdgeHandle {
        FixedDirectedEdgeHandle::new_normalized(*self)
    }

    /// Returns both directed edges of this undirected edge.
    pub fn directed_edges(&self) -> [FixedDirectedEdgeHandle; 2] {
        let directed = self.as_directed();
        [directed, directed.rev()]
    }
}

/// Internal type definition that is only exposed for documentation purposes.
///
/// Use the type aliases like [VertexHandle](crate::handles::VertexHandle) instead.
pub struct DynamicHandleImpl<'a, Handle> {
    pub(super) dcel: &'a Dcel,
    pub(super) handle: Handle,
}

impl<'a, Handle: Copy> DynamicHandleImpl<'a, Handle> {
    #[inline]
    pub(crate) fn new(dcel: &'a Dcel, handle: Handle) -> Self {
        Self { dcel, handle }
    }
}
