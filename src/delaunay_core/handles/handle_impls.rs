use super::super::math;
use super::iterators::{CcwEdgeFn, CircularIterator};
use super::*;
use crate::{Orientation, Point2};
use std::fmt::Debug;
use std::hash::{Hash, Hasher};

// Debug implementations
impl<'a> Debug for VertexHandle<'a> {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "VertexHandle({:?})", self.handle)
    }
}

impl<'a> Debug for DirectedEdgeHandle<'a> {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(
            f,
            "DirectedEdgeHandle - id: {:?} ({:?} -> {:?})",
            self.handle,
            self.from().fix(),
            self.to().fix()
        )
    }
}

impl<'a> Debug for UndirectedEdgeHandle<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> ::std::fmt::Result {
        let [v0, v1] = self.vertices();
        write!(
            f,
            "UndirectedEdgeHandle - id: {:?} ({:?} <-> {:?})",
            self.handle,
            v0.fix(),
            v1.fix(),
        )
    }
}

impl<'a> Debug for FaceHandle<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> ::std::fmt::Result {
        let [v0, v1, v2] = self.vertices();
        write!(
            f,
            "FaceHandle - id: {:?} ({:?}, {:?}, {:?}){}",
            self.handle,
            v0.fix(),
            v1.fix(),
            v2.fix(),
            if self.is_real() { "" } else { " virtual" }
        )
    }
}

impl<'a, Handle: Copy> Clone for DynamicHandleImpl<'a, Handle> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, Handle: Copy> Copy for DynamicHandleImpl<'a, Handle> {}

impl<'a, Handle: PartialEq> PartialEq for DynamicHandleImpl<'a, Handle> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<'a, Handle: Eq> Eq for DynamicHandleImpl<'a, Handle> {}

impl<'a, Handle: Hash> Hash for DynamicHandleImpl<'a, Handle> {
    fn hash<HA: Hasher>(&self, state: &mut HA) {
        self.handle.hash(state);
    }
}

impl<'a, Handle: Copy> DynamicHandleImpl<'a, Handle> {
    /// Converts this dynamic handle to its fixed variant.
    ///
    /// *See also the [handles module](crate::handles)*
    pub fn fix(&self) -> Handle {
        self.handle
    }
}

impl<'a> VertexHandle<'a> {
    /// Returns the vertex position.
    pub fn position(&self) -> Point2 {
        self.dcel.vertices[self.handle].position
    }

    /// Returns `false` for the four corners of the bounding rectangle.
    pub fn is_real(&self) -> bool {
        self.dcel.vertices[self.handle].is_real
    }

    /// Returns the constraint segments passing through or ending at this vertex.
    pub fn segments(&self) -> &'a [FixedSegmentHandle] {
        &self.dcel.vertices[self.handle].segments
    }

    /// Returns `true` if any constraint segment passes through or ends at this vertex.
    pub fn is_constrained(&self) -> bool {
        !self.segments().is_empty()
    }

    /// Returns an outgoing edge of this vertex.
    pub fn out_edge(&self) -> DirectedEdgeHandle<'a> {
        let edge = self.dcel.vertices[self.handle].out_edge;
        DirectedEdgeHandle::new(self.dcel, edge)
    }

    /// Returns all outgoing edges in counterclockwise order.
    ///
    /// This includes edges that are not real.
    pub fn out_edges(&self) -> CircularIterator<'a, CcwEdgeFn> {
        CircularIterator::new(self.out_edge())
    }

    /// Returns a real face adjacent to this vertex, if there is one.
    pub fn real_face(&self) -> Option<FaceHandle<'a>> {
        self.out_edges()
            .map(|edge| edge.face())
            .find(|face| face.is_real())
    }
}

impl<'a> DirectedEdgeHandle<'a> {
    /// Returns the edge's two vertices.
    ///
    /// The first vertex is `self.from()`, the second vertex is `self.to()`.
    pub fn vertices(&self) -> [VertexHandle<'a>; 2] {
        [self.from(), self.to()]
    }

    /// Returns the edge's origin vertex.
    pub fn from(&self) -> VertexHandle<'a> {
        let entry = self.dcel.half_edge(self.handle);
        DynamicHandleImpl::new(self.dcel, entry.origin)
    }

    /// Returns the edge's destination vertex.
    pub fn to(&self) -> VertexHandle<'a> {
        self.rev().from()
    }

    /// Returns this edge in reversed direction.
    #[inline]
    pub fn rev(&self) -> Self {
        DirectedEdgeHandle::new(self.dcel, self.handle.rev())
    }

    /// Returns the next edge around the face to the left.
    pub fn next(&self) -> DirectedEdgeHandle<'a> {
        let entry = self.dcel.half_edge(self.handle);
        DirectedEdgeHandle::new(self.dcel, entry.next)
    }

    /// Returns the previous edge around the face to the left.
    pub fn prev(&self) -> DirectedEdgeHandle<'a> {
        let entry = self.dcel.half_edge(self.handle);
        DirectedEdgeHandle::new(self.dcel, entry.prev)
    }

    /// Returns the edge from this edge's destination to the apex of the right face.
    ///
    /// For an edge `a -> b` with the right face `b -> a -> r`, this returns `b -> r`.
    pub fn next_right(&self) -> DirectedEdgeHandle<'a> {
        self.rev().prev().rev()
    }

    /// Returns the face located to the left of this edge.
    pub fn face(&self) -> FaceHandle<'a> {
        let entry = self.dcel.half_edge(self.handle);
        FaceHandle::new(self.dcel, entry.face)
    }

    /// Returns the face located to the right of this edge.
    pub fn right_face(&self) -> FaceHandle<'a> {
        self.rev().face()
    }

    /// Returns the next outgoing edge of `self.from()` in clockwise direction.
    pub fn cw(&self) -> DirectedEdgeHandle<'a> {
        self.rev().next()
    }

    /// Returns the next outgoing edge of `self.from()` in counterclockwise direction.
    pub fn ccw(&self) -> DirectedEdgeHandle<'a> {
        self.prev().rev()
    }

    /// Converts this directed edge into an undirected edge handle.
    #[inline]
    pub fn as_undirected(&self) -> UndirectedEdgeHandle<'a> {
        DynamicHandleImpl::new(self.dcel, self.handle.as_undirected())
    }

    /// Returns `true` if this edge is part of a user boundary.
    ///
    /// An edge and its reversed edge always share this flag.
    pub fn is_constrained(&self) -> bool {
        self.dcel.edges[self.handle.as_undirected()].is_constrained
    }

    /// Returns `false` for the edge that only exists to close the surface outside of the
    /// bounding rectangle.
    pub fn is_real(&self) -> bool {
        self.dcel.edges[self.handle.as_undirected()].is_real
    }

    /// Returns the constraint segments this edge realizes.
    pub fn segments(&self) -> &'a [FixedSegmentHandle] {
        &self.dcel.edges[self.handle.as_undirected()].segments
    }

    /// Returns the start and end position of this edge.
    pub fn positions(&self) -> [Point2; 2] {
        [self.from().position(), self.to().position()]
    }

    /// Returns the position of the apex of the face to the left.
    pub fn opposite_position(&self) -> Point2 {
        self.next().to().position()
    }

    /// Returns on which side of this edge a point lies.
    pub fn side_query(&self, query_point: Point2) -> Orientation {
        let [from, to] = self.positions();
        math::orientation(from, to, query_point)
    }

    /// Returns `true` if the apex of the right triangle lies outside of or on the circumcircle
    /// of the left triangle.
    pub fn is_delaunay(&self) -> bool {
        let [left, right] = self.positions();
        let corner = self.opposite_position();
        let opposite = self.next_right().to().position();
        math::is_delaunay(left, right, corner, opposite)
    }

    /// Returns `true` if the quadrilateral formed by both adjacent triangles is strictly
    /// convex, i.e. if this edge could be flipped.
    pub fn is_convex(&self) -> bool {
        let [from, to] = self.positions();
        let left_apex = self.opposite_position();
        let right_apex = self.next_right().to().position();
        math::is_convex_quad(from, right_apex, to, left_apex)
    }
}

impl<'a> UndirectedEdgeHandle<'a> {
    /// Returns the edge's two vertices.
    pub fn vertices(&self) -> [VertexHandle<'a>; 2] {
        self.as_directed().vertices()
    }

    /// Converts this undirected handle into a directed edge handle.
    #[inline]
    pub fn as_directed(&self) -> DirectedEdgeHandle<'a> {
        DirectedEdgeHandle::new(self.dcel, self.handle.as_directed())
    }

    /// Returns the end positions of this edge.
    pub fn positions(&self) -> [Point2; 2] {
        self.as_directed().positions()
    }

    /// See [DirectedEdgeHandle::is_constrained].
    pub fn is_constrained(&self) -> bool {
        self.as_directed().is_constrained()
    }

    /// See [DirectedEdgeHandle::is_real].
    pub fn is_real(&self) -> bool {
        self.as_directed().is_real()
    }

    /// See [DirectedEdgeHandle::segments].
    pub fn segments(&self) -> &'a [FixedSegmentHandle] {
        self.as_directed().segments()
    }
}

impl<'a> FaceHandle<'a> {
    /// Returns an edge that is adjacent to this face.
    pub fn adjacent_edge(&self) -> DirectedEdgeHandle<'a> {
        let edge = self.dcel.faces[self.handle].adjacent_edge;
        DirectedEdgeHandle::new(self.dcel, edge)
    }

    /// Returns the face's three edges in counterclockwise order.
    pub fn adjacent_edges(&self) -> [DirectedEdgeHandle<'a>; 3] {
        let e0 = self.adjacent_edge();
        let e1 = e0.next();
        let e2 = e1.next();
        [e0, e1, e2]
    }

    /// Returns the face's three vertices in counterclockwise order.
    pub fn vertices(&self) -> [VertexHandle<'a>; 3] {
        let [e0, e1, e2] = self.adjacent_edges();
        [e0.from(), e1.from(), e2.from()]
    }

    /// Returns the positions of the face's vertices.
    pub fn positions(&self) -> [Point2; 3] {
        let [v0, v1, v2] = self.vertices();
        [v0.position(), v1.position(), v2.position()]
    }

    /// Returns `false` for the two faces outside of the bounding rectangle.
    pub fn is_real(&self) -> bool {
        self.dcel.faces[self.handle].is_real
    }

    /// Returns the face's center of mass.
    pub fn center(&self) -> Point2 {
        let [p0, p1, p2] = self.positions();
        p0.add(p1).add(p2).mul(1.0 / 3.0)
    }
}
