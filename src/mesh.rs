use std::collections::VecDeque;

use slotmap::SlotMap;
use tracing::{debug, warn};

use crate::delaunay_core::dcel_operations::{self as dcel_operations, SplitHoles};
use crate::delaunay_core::iterators::*;
use crate::delaunay_core::locate;
use crate::delaunay_core::math;
use crate::delaunay_core::*;
use crate::objects::Object;
use crate::{MeshError, Point2};

/// Upper bound of edge flips per undirected edge during a single Delaunay restoration.
const FLIPS_PER_EDGE_LIMIT: usize = 16;

/// A dynamic constrained Delaunay triangulation covering a rectangular domain.
///
/// The mesh covers the domain `[0, width] x [0, height]`. It is bootstrapped with
/// [build_rectangle](Mesh::build_rectangle): four corner vertices, placed slightly outside of
/// the domain, span two real triangles. Two virtual triangles close the surface outside of the
/// rectangle, every face of the mesh is a triangle.
///
/// Vertices can be inserted and removed at any time. Constraint segments force edges into
/// the triangulation (see [insert_constraint_segment](Mesh::insert_constraint_segment)), all
/// other edges are kept Delaunay.
///
/// # Example
/// ```
/// use cdt_mesh::{Mesh, Point2, PositionInMesh};
///
/// # fn main() -> Result<(), cdt_mesh::MeshError> {
/// let mut mesh = Mesh::build_rectangle(100.0, 100.0)?;
/// mesh.insert_constraint_segment(Point2::new(10.0, 10.0), Point2::new(90.0, 90.0))?;
///
/// match mesh.locate_position(Point2::new(50.0, 50.0)) {
///     PositionInMesh::OnEdge(edge) => assert!(mesh.directed_edge(edge).unwrap().is_constrained()),
///     _ => unreachable!(),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Mesh {
    pub(crate) dcel: Dcel,
    width: f64,
    height: f64,
    clipping: bool,
    bound_shape: FixedShapeHandle,
    pub(crate) edges_to_check: VecDeque<FixedUndirectedEdgeHandle>,
    pub(crate) objects: SlotMap<FixedObjectHandle, Object>,
    pub(crate) objects_update_in_progress: bool,
    pub(crate) objects_update_requested: bool,
    /// Overrides the number of steps after which a constraint walk fails.
    pub(crate) constraint_step_limit: Option<usize>,
}

impl Mesh {
    /// Creates a mesh covering `[0, width] x [0, height]`.
    ///
    /// Returns [MeshError::InvalidDimensions] if either size is not positive and finite.
    pub fn build_rectangle(width: f64, height: f64) -> Result<Self, MeshError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(MeshError::InvalidDimensions);
        }
        let (dcel, bound_shape) = dcel_operations::build_rectangle(width, height);
        Ok(Mesh {
            dcel,
            width,
            height,
            clipping: true,
            bound_shape,
            edges_to_check: VecDeque::new(),
            objects: SlotMap::default(),
            objects_update_in_progress: false,
            objects_update_requested: false,
            constraint_step_limit: None,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns whether constraint segments are clipped to the domain.
    pub fn clipping(&self) -> bool {
        self.clipping
    }

    /// Enables or disables clipping of constraint segments.
    ///
    /// With clipping enabled (the default), segments reaching outside of the domain are cut at
    /// its border. Otherwise such segments are rejected with [MeshError::OutOfBounds].
    pub fn set_clipping(&mut self, clipping: bool) {
        self.clipping = clipping;
    }

    /// The constraint shape formed by the four border edges of the bounding rectangle.
    pub fn bound_shape(&self) -> FixedShapeHandle {
        self.bound_shape
    }

    pub(crate) fn is_in_domain(&self, position: Point2) -> bool {
        (0.0..=self.width).contains(&position.x) && (0.0..=self.height).contains(&position.y)
    }

    /// Returns the vertex, edge or face a position lies on.
    ///
    /// Positions closer than [EPSILON](crate::math::EPSILON) to a vertex or an edge snap to
    /// it. Positions outside of the bounding rectangle yield [PositionInMesh::Outside].
    pub fn locate_position(&self, position: Point2) -> PositionInMesh {
        locate::locate(&self.dcel, position)
    }

    /// Inserts a vertex and restores the Delaunay property around it.
    ///
    /// If the position snaps to an existing vertex, that vertex is returned instead. A position
    /// snapping to an edge splits the edge. The new vertex is projected onto the edge in this
    /// case and joins all constraint segments of the edge.
    pub fn insert_vertex(&mut self, position: Point2) -> Result<FixedVertexHandle, MeshError> {
        if !self.is_in_domain(position) {
            return Err(MeshError::OutOfBounds);
        }
        let vertex = self.insert_vertex_without_restore(position)?;
        self.restore_as_delaunay();
        Ok(vertex)
    }

    pub(crate) fn insert_vertex_without_restore(
        &mut self,
        position: Point2,
    ) -> Result<FixedVertexHandle, MeshError> {
        match self.locate_position(position) {
            PositionInMesh::OnVertex(vertex) => Ok(vertex),
            PositionInMesh::OnEdge(edge) => Ok(self.split_edge_at(edge, position)),
            PositionInMesh::OnFace(face) => {
                let edges = self.dcel.face(face).adjacent_edges().map(|edge| edge.fix());
                let vertex = dcel_operations::insert_into_triangle(&mut self.dcel, position, face);
                self.queue_edges(edges.iter().copied());
                Ok(vertex)
            }
            PositionInMesh::Outside => Err(MeshError::LocationFailed),
        }
    }

    /// Splits an edge at the projection of `position` onto it.
    ///
    /// Returns an end point of the edge instead if `position` lies close to it.
    pub(crate) fn split_edge_at(
        &mut self,
        edge: FixedDirectedEdgeHandle,
        position: Point2,
    ) -> FixedVertexHandle {
        let edge_handle = self.dcel.directed_edge(edge);
        let [from, to] = edge_handle.vertices();
        if from.position().distance_2(position) <= math::EPSILON_SQUARED {
            return from.fix();
        }
        if to.position().distance_2(position) <= math::EPSILON_SQUARED {
            return to.fix();
        }

        let outer = [
            edge_handle.next(),
            edge_handle.prev(),
            edge_handle.rev().next(),
            edge_handle.rev().prev(),
        ]
        .map(|edge| edge.fix());
        let projected = math::project_orthogonally(position, from.position(), to.position());
        let vertex = dcel_operations::split_edge(&mut self.dcel, edge, projected);
        self.queue_edges(outer.iter().copied());
        vertex
    }

    /// Removes a vertex and re-triangulates the hole it leaves.
    ///
    /// Vertices carrying constraint segments can only be removed if they lie in the interior
    /// of every segment and have exactly two constrained edges. Both edges are merged into one
    /// in this case. Corners of the bounding rectangle cannot be removed.
    pub fn delete_vertex(&mut self, vertex: FixedVertexHandle) -> Result<(), MeshError> {
        if !self.dcel.contains_vertex(vertex) {
            return Err(MeshError::InvalidHandle);
        }
        if self.try_delete_vertex(vertex) {
            Ok(())
        } else {
            Err(MeshError::VertexNotRemovable)
        }
    }

    pub(crate) fn try_delete_vertex(&mut self, vertex: FixedVertexHandle) -> bool {
        let handle = self.dcel.vertex(vertex);
        if !handle.is_real() {
            return false;
        }

        if handle.is_constrained() {
            match dcel_operations::remove_constrained_vertex(&mut self.dcel, vertex) {
                Some(SplitHoles { holes, .. }) => {
                    for (bound, is_real) in holes {
                        self.triangulate_hole(bound, is_real);
                    }
                }
                None => {
                    debug!(?vertex, "Refusing to delete constrained vertex");
                    return false;
                }
            }
        } else {
            let is_real = handle.out_edges().all(|edge| edge.face().is_real());
            let bound = dcel_operations::remove_vertex_star(&mut self.dcel, vertex);
            self.triangulate_hole(bound, is_real);
        }

        self.restore_as_delaunay();
        true
    }

    /// Fills a hole and queues its new and bounding edges for Delaunay restoration.
    pub(crate) fn triangulate_hole(&mut self, bound: Vec<FixedDirectedEdgeHandle>, is_real: bool) {
        let bound_edges: Vec<_> = bound.iter().map(|edge| edge.as_undirected()).collect();
        let new_edges = dcel_operations::triangulate(&mut self.dcel, bound, is_real);
        self.edges_to_check.extend(new_edges);
        self.edges_to_check.extend(bound_edges);
    }

    fn queue_edges(&mut self, edges: impl IntoIterator<Item = FixedDirectedEdgeHandle>) {
        self.edges_to_check
            .extend(edges.into_iter().map(|edge| edge.as_undirected()));
    }

    /// Replaces an edge by the other diagonal of the quadrilateral formed by its two faces.
    ///
    /// The edge keeps its handle. Fails if the edge is constrained, borders a virtual face or
    /// if its quadrilateral is not strictly convex.
    pub fn flip_edge(&mut self, edge: FixedUndirectedEdgeHandle) -> Result<(), MeshError> {
        if !self.dcel.contains_edge(edge.as_directed()) {
            return Err(MeshError::InvalidHandle);
        }
        let handle = self.dcel.undirected_edge(edge).as_directed();
        if handle.is_constrained() {
            return Err(MeshError::ConstrainedEdge);
        }
        if !handle.is_real() || !handle.face().is_real() || !handle.right_face().is_real() {
            return Err(MeshError::VirtualEdge);
        }
        if !handle.is_convex() {
            return Err(MeshError::NonConvexQuad);
        }
        dcel_operations::flip_cw(&mut self.dcel, edge);
        Ok(())
    }

    /// Like [flip_edge](Mesh::flip_edge) but only reports whether the flip took place.
    pub fn try_flip_edge(&mut self, edge: FixedUndirectedEdgeHandle) -> bool {
        self.flip_edge(edge).is_ok()
    }

    fn should_flip(&self, edge: FixedUndirectedEdgeHandle) -> bool {
        if !self.dcel.contains_edge(edge.as_directed()) {
            return false;
        }
        let handle = self.dcel.undirected_edge(edge).as_directed();
        !handle.is_constrained()
            && handle.is_real()
            && handle.face().is_real()
            && handle.right_face().is_real()
            && !handle.is_delaunay()
            && handle.is_convex()
    }

    /// Flips edges until every queued edge is Delaunay.
    ///
    /// Edges are queued by all operations modifying the mesh. After a flip, the four outer
    /// edges of the quadrilateral are checked again. Constrained edges are never flipped.
    pub fn restore_as_delaunay(&mut self) {
        let flip_limit = FLIPS_PER_EDGE_LIMIT * self.dcel.num_undirected_edges().max(1);
        let mut num_flips = 0;

        while let Some(edge) = self.edges_to_check.pop_front() {
            if !self.should_flip(edge) {
                continue;
            }
            if num_flips == flip_limit {
                warn!(
                    num_flips,
                    remaining = self.edges_to_check.len(),
                    "Aborting Delaunay restoration after too many flips"
                );
                self.edges_to_check.clear();
                return;
            }

            let handle = self.dcel.undirected_edge(edge).as_directed();
            let outer = [
                handle.next(),
                handle.prev(),
                handle.rev().next(),
                handle.rev().prev(),
            ]
            .map(|edge| edge.fix());
            dcel_operations::flip_cw(&mut self.dcel, edge);
            num_flips += 1;
            self.queue_edges(outer.iter().copied());
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.dcel.num_vertices()
    }

    pub fn num_directed_edges(&self) -> usize {
        self.dcel.num_directed_edges()
    }

    pub fn num_undirected_edges(&self) -> usize {
        self.dcel.num_undirected_edges()
    }

    /// Number of faces, including the two virtual faces.
    pub fn num_faces(&self) -> usize {
        self.dcel.num_faces()
    }

    pub fn num_constraint_segments(&self) -> usize {
        self.dcel.num_segments()
    }

    pub fn num_constraint_shapes(&self) -> usize {
        self.dcel.num_shapes()
    }

    /// Iterates over all vertices, including the corners of the bounding rectangle.
    pub fn vertices(&self) -> VertexIterator {
        VertexIterator::new(&self.dcel)
    }

    pub fn directed_edges(&self) -> DirectedEdgeIterator {
        DirectedEdgeIterator::new(&self.dcel)
    }

    pub fn undirected_edges(&self) -> UndirectedEdgeIterator {
        UndirectedEdgeIterator::new(&self.dcel)
    }

    /// Iterates over all faces, including the two virtual faces.
    pub fn faces(&self) -> FaceIterator {
        FaceIterator::new(&self.dcel)
    }

    pub fn constraint_segments(&self) -> FixedSegmentIterator {
        FixedSegmentIterator::new(&self.dcel)
    }

    pub fn constraint_shapes(&self) -> FixedShapeIterator {
        FixedShapeIterator::new(&self.dcel)
    }

    /// Returns a dynamic handle to a vertex, or `None` if the vertex was removed.
    pub fn vertex(&self, handle: FixedVertexHandle) -> Option<VertexHandle> {
        self.dcel
            .contains_vertex(handle)
            .then(|| self.dcel.vertex(handle))
    }

    pub fn directed_edge(&self, handle: FixedDirectedEdgeHandle) -> Option<DirectedEdgeHandle> {
        self.dcel
            .contains_edge(handle)
            .then(|| self.dcel.directed_edge(handle))
    }

    pub fn undirected_edge(
        &self,
        handle: FixedUndirectedEdgeHandle,
    ) -> Option<UndirectedEdgeHandle> {
        self.dcel
            .contains_edge(handle.as_directed())
            .then(|| self.dcel.undirected_edge(handle))
    }

    pub fn face(&self, handle: FixedFaceHandle) -> Option<FaceHandle> {
        self.dcel
            .contains_face(handle)
            .then(|| self.dcel.face(handle))
    }

    /// Returns the chain of edges realizing a constraint segment, from its first to its last
    /// vertex.
    pub fn segment_edges(&self, segment: FixedSegmentHandle) -> Option<&[FixedDirectedEdgeHandle]> {
        self.dcel
            .segment_entry(segment)
            .map(|entry| entry.edges.as_slice())
    }

    /// Returns the shape a segment belongs to. Segments inserted on their own belong to no
    /// shape.
    pub fn segment_shape(&self, segment: FixedSegmentHandle) -> Option<FixedShapeHandle> {
        self.dcel
            .segment_entry(segment)
            .and_then(|entry| entry.shape)
    }

    /// Returns the first and last vertex of a segment.
    pub fn segment_end_points(&self, segment: FixedSegmentHandle) -> Option<[FixedVertexHandle; 2]> {
        self.dcel.segment_end_points(segment)
    }

    pub fn shape_segments(&self, shape: FixedShapeHandle) -> Option<&[FixedSegmentHandle]> {
        self.dcel
            .shape_entry(shape)
            .map(|entry| entry.segments.as_slice())
    }

    #[cfg(test)]
    pub fn sanity_check(&self) {
        self.dcel.sanity_check();
        for vertex in self.vertices() {
            if vertex.is_real() {
                assert!(
                    self.is_in_domain(vertex.position()),
                    "Vertex {:?} lies outside of the domain",
                    vertex
                );
            }
        }
        for face in self.faces() {
            assert_eq!(face.adjacent_edge().face(), face);
        }
    }

    /// Checks the Delaunay property of all unconstrained edges, up to a small tolerance.
    #[cfg(test)]
    pub fn check_delaunay(&self) {
        for edge in self.undirected_edges() {
            let edge = edge.as_directed();
            if edge.is_constrained()
                || !edge.is_real()
                || !edge.face().is_real()
                || !edge.right_face().is_real()
            {
                continue;
            }
            let [from, to] = edge.positions();
            let corner = edge.opposite_position();
            let opposite = edge.next_right().to().position();
            if let Some((center, radius_2)) = math::circumcenter([corner, from, to]) {
                let distance_2 = opposite.distance_2(center);
                assert!(
                    distance_2 >= radius_2 * (1.0 - 1e-9) - 1e-9,
                    "Edge {:?} is not Delaunay",
                    edge
                );
            }
        }
    }
}
