use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::delaunay_core::dcel::{SegmentEntry, ShapeEntry};
use crate::delaunay_core::dcel_operations;
use crate::delaunay_core::math;
use crate::delaunay_core::*;
use crate::record::parse_constraint_record;
use crate::{Mesh, MeshError, Point2, RecordError};

/// The position of a constraint walk.
#[derive(Debug, Clone, Copy)]
enum WalkPosition {
    /// The walk stands on a vertex that is part of the segment.
    Vertex(FixedVertexHandle),
    /// The walk has just crossed an edge. The edge's origin lies left of the segment, its
    /// destination on the right side. The face left of the edge lies ahead.
    Edge(FixedDirectedEdgeHandle),
}

/// Edges collected while walking through the faces crossed by a constraint segment.
#[derive(Debug, Default)]
struct CrossedRegion {
    /// Crossed edges in walk order, each one crossed from its left to its right side.
    crossed: Vec<FixedDirectedEdgeHandle>,
    /// Bound of the region left of the segment, running back towards its start.
    left: VecDeque<FixedDirectedEdgeHandle>,
    /// Bound of the region right of the segment, running towards its end.
    right: Vec<FixedDirectedEdgeHandle>,
    /// Vertices created by splitting constrained edges on the way.
    created: Vec<FixedVertexHandle>,
}

impl Mesh {
    /// Inserts a constraint segment.
    ///
    /// The segment's end points are inserted as vertices unless they snap to existing ones.
    /// Edges crossing the segment are removed. Constrained edges crossing the segment are split
    /// at the intersection instead, splitting the new segment at the same vertex. Vertices lying
    /// on the segment are joined. The regions on both sides of the segment are re-triangulated
    /// and the Delaunay property is restored.
    ///
    /// Segments that overlap existing constrained edges share these edges.
    ///
    /// With [clipping](Mesh::set_clipping) enabled, the segment is first cut to the mesh domain.
    ///
    /// # Errors
    ///  - [MeshError::SegmentClippedAway] if the segment lies outside of the domain and
    ///    clipping is enabled.
    ///  - [MeshError::OutOfBounds] if an end point lies outside of the domain and clipping is
    ///    disabled.
    ///  - [MeshError::DegenerateSegment] if both end points snap to the same vertex.
    ///  - [MeshError::ConstraintWalkFailed] if the segment could not be traced through the
    ///    mesh. The partially inserted segment is removed again.
    pub fn insert_constraint_segment(
        &mut self,
        from: Point2,
        to: Point2,
    ) -> Result<FixedSegmentHandle, MeshError> {
        self.insert_segment_into_shape(from, to, None)
    }

    /// Inserts a constraint shape made of independent segments.
    ///
    /// `points[2 * k]` and `points[2 * k + 1]` form the `k`-th segment. Segments that are
    /// clipped away or degenerate are skipped. The shape is registered even if none of its
    /// segments could be inserted.
    ///
    /// Returns [MeshError::DegenerateSegment] without modifying the mesh if the number of
    /// points is odd.
    pub fn insert_constraint_shape(
        &mut self,
        points: &[Point2],
    ) -> Result<FixedShapeHandle, MeshError> {
        if points.len() % 2 != 0 {
            return Err(MeshError::DegenerateSegment);
        }
        let pairs: Vec<_> = points
            .chunks_exact(2)
            .map(|pair| [pair[0], pair[1]])
            .collect();
        Ok(self.insert_shape_from_pairs(&pairs))
    }

    /// Inserts a closed polygon `p0 -> p1 -> ... -> pn -> p0` as a constraint shape.
    pub fn insert_polygon(&mut self, points: &[Point2]) -> Result<FixedShapeHandle, MeshError> {
        if points.len() < 2 {
            return Err(MeshError::DegenerateSegment);
        }
        let pairs: Vec<_> = points
            .iter()
            .zip(points.iter().cycle().skip(1))
            .map(|(from, to)| [*from, *to])
            .collect();
        Ok(self.insert_shape_from_pairs(&pairs))
    }

    /// Parses a constraint record and inserts all of its segments as one shape.
    ///
    /// See [parse_constraint_record](crate::parse_constraint_record) for the format. The mesh
    /// is not modified if the record is malformed.
    pub fn insert_constraint_record(
        &mut self,
        record: &str,
    ) -> Result<FixedShapeHandle, RecordError> {
        let pairs = parse_constraint_record(record)?;
        Ok(self.insert_shape_from_pairs(&pairs))
    }

    pub(crate) fn insert_shape_from_pairs(&mut self, pairs: &[[Point2; 2]]) -> FixedShapeHandle {
        let shape = self.dcel.insert_shape(ShapeEntry::default());
        for [from, to] in pairs {
            if let Err(error) = self.insert_segment_into_shape(*from, *to, Some(shape)) {
                debug!(?error, ?from, ?to, "Skipping constraint segment");
            }
        }
        shape
    }

    fn clip_to_domain(&self, from: Point2, to: Point2) -> Result<[Point2; 2], MeshError> {
        if !from.is_finite() || !to.is_finite() {
            return Err(MeshError::OutOfBounds);
        }
        let [from, to] = if self.clipping() {
            let max = Point2::new(self.width(), self.height());
            math::clip_segment_by_rect(from, to, Point2::new(0.0, 0.0), max)
                .ok_or(MeshError::SegmentClippedAway)?
        } else if self.is_in_domain(from) && self.is_in_domain(to) {
            [from, to]
        } else {
            return Err(MeshError::OutOfBounds);
        };

        if from.distance_2(to) <= math::EPSILON_SQUARED {
            return Err(MeshError::DegenerateSegment);
        }
        Ok([from, to])
    }

    fn insert_segment_into_shape(
        &mut self,
        from: Point2,
        to: Point2,
        shape: Option<FixedShapeHandle>,
    ) -> Result<FixedSegmentHandle, MeshError> {
        let [from, to] = self.clip_to_domain(from, to)?;

        match [self.locate_position(from), self.locate_position(to)] {
            [PositionInMesh::Outside, _] | [_, PositionInMesh::Outside] => {
                return Err(MeshError::LocationFailed)
            }
            [PositionInMesh::OnVertex(v0), PositionInMesh::OnVertex(v1)] if v0 == v1 => {
                return Err(MeshError::DegenerateSegment)
            }
            _ => {}
        }

        let num_vertices = self.num_vertices();
        let start = self.insert_vertex_without_restore(from)?;
        let start_created = self.num_vertices() > num_vertices;
        self.restore_as_delaunay();
        let end = self.insert_vertex_without_restore(to)?;
        let end_created = self.num_vertices() > num_vertices + usize::from(start_created);
        self.restore_as_delaunay();

        if start == end {
            if start_created {
                self.try_delete_vertex(start);
            }
            return Err(MeshError::DegenerateSegment);
        }

        let segment = self.dcel.insert_segment(SegmentEntry {
            edges: Vec::new(),
            shape,
        });
        if let Some(entry) = shape.and_then(|shape| self.dcel.shape_entry_mut(shape)) {
            entry.segments.push(segment);
        }

        let mut region = CrossedRegion::default();
        match self.trace_segment(segment, start, end, &mut region) {
            Ok(()) => {
                self.restore_as_delaunay();
                Ok(segment)
            }
            Err(error) => {
                warn!(?from, ?to, "Failed to insert constraint segment");
                // Only vertices created by this call are removed again
                self.release_segment(segment)?;
                let created = [(start, start_created), (end, end_created)]
                    .into_iter()
                    .filter(|(_, created)| *created)
                    .map(|(vertex, _)| vertex)
                    .chain(region.created.into_iter().rev());
                for vertex in created.collect::<Vec<_>>() {
                    if self.dcel.contains_vertex(vertex) && !self.try_delete_vertex(vertex) {
                        warn!(?vertex, "Failed to remove vertex of a rolled back segment");
                    }
                }
                self.restore_as_delaunay();
                Err(error)
            }
        }
    }

    /// Splits a constrained edge crossed by a walk, see [split_edge_at](Mesh::split_edge_at).
    fn split_crossed_edge(
        &mut self,
        edge: FixedDirectedEdgeHandle,
        position: Point2,
        region: &mut CrossedRegion,
    ) -> FixedVertexHandle {
        let num_vertices = self.num_vertices();
        let vertex = self.split_edge_at(edge, position);
        if self.num_vertices() > num_vertices {
            region.created.push(vertex);
        }
        vertex
    }

    /// Walks from `start` to `end` and forces the segment's edges into the mesh.
    fn trace_segment(
        &mut self,
        segment: FixedSegmentHandle,
        start: FixedVertexHandle,
        end: FixedVertexHandle,
        region: &mut CrossedRegion,
    ) -> Result<(), MeshError> {
        let mut down = start;
        let mut position = WalkPosition::Vertex(start);
        let mut num_steps = 0;

        loop {
            num_steps += 1;
            // Every step crosses an edge or advances to a new vertex
            let step_limit = self
                .constraint_step_limit
                .unwrap_or(4 * self.num_undirected_edges() + 16);
            if num_steps > step_limit {
                debug!(?start, ?end, step_limit, "Constraint walk exceeds its step limit");
                return Err(MeshError::ConstraintWalkFailed);
            }

            let next = match position {
                WalkPosition::Vertex(current) => {
                    down = current;
                    self.walk_from_vertex(segment, current, end, region)?
                }
                WalkPosition::Edge(edge) => {
                    self.walk_from_edge(segment, down, end, edge, region)?
                }
            };

            match next {
                Some(next) => position = next,
                None => return Ok(()),
            }
        }
    }

    fn walk_from_vertex(
        &mut self,
        segment: FixedSegmentHandle,
        current: FixedVertexHandle,
        up: FixedVertexHandle,
        region: &mut CrossedRegion,
    ) -> Result<Option<WalkPosition>, MeshError> {
        let current_position = self.dcel.vertex(current).position();
        let up_position = self.dcel.vertex(up).position();
        let out_edges: Vec<_> = self
            .dcel
            .vertex(current)
            .out_edges()
            .map(|edge| edge.fix())
            .collect();

        // The end point is a direct neighbor
        if let Some(edge) = out_edges
            .iter()
            .find(|edge| self.dcel.directed_edge(**edge).to().fix() == up)
        {
            dcel_operations::append_segment_edge(&mut self.dcel, segment, *edge);
            return Ok(None);
        }

        // A neighbor lies on the segment
        let direction = up_position.sub(current_position);
        let on_segment = out_edges.iter().copied().find(|edge| {
            let target = self.dcel.directed_edge(*edge).to();
            let target_position = target.position();
            target.is_real()
                && target_position.sub(current_position).dot(direction) > 0.0
                && math::distance_squared_point_to_segment(
                    target_position,
                    current_position,
                    up_position,
                ) <= math::EPSILON_SQUARED
        });
        if let Some(edge) = on_segment {
            let target = self.dcel.directed_edge(edge).to().fix();
            dcel_operations::append_segment_edge(&mut self.dcel, segment, edge);
            return Ok(Some(WalkPosition::Vertex(target)));
        }

        // The segment leaves through the edge opposite of `current`
        for edge in out_edges {
            let opposite = self.dcel.directed_edge(edge).next();
            let [x, y] = opposite.positions();
            let hit = match math::intersections_2_segments(
                x,
                y,
                current_position,
                up_position,
                false,
            ) {
                Some(hit) => hit,
                None => continue,
            };

            let opposite_edge = opposite.fix();
            if opposite.is_constrained() {
                let new_vertex = self.split_crossed_edge(opposite_edge, hit.point, region);
                let connecting = self
                    .dcel
                    .vertex(current)
                    .out_edges()
                    .find(|edge| edge.to().fix() == new_vertex)
                    .map(|edge| edge.fix())
                    .ok_or(MeshError::ConstraintWalkFailed)?;
                dcel_operations::append_segment_edge(&mut self.dcel, segment, connecting);
                return Ok(Some(WalkPosition::Vertex(new_vertex)));
            }

            region.crossed.push(opposite_edge);
            region
                .left
                .push_front(self.dcel.directed_edge(opposite_edge).next().fix());
            region.right.push(edge);
            return Ok(Some(WalkPosition::Edge(opposite_edge.rev())));
        }

        Err(MeshError::ConstraintWalkFailed)
    }

    fn walk_from_edge(
        &mut self,
        segment: FixedSegmentHandle,
        down: FixedVertexHandle,
        up: FixedVertexHandle,
        current: FixedDirectedEdgeHandle,
        region: &mut CrossedRegion,
    ) -> Result<Option<WalkPosition>, MeshError> {
        let down_position = self.dcel.vertex(down).position();
        let up_position = self.dcel.vertex(up).position();

        // `current` runs from y to x, the face ahead is (y, x, z)
        let edge_x_z = self.dcel.directed_edge(current).next();
        let apex = edge_x_z.to();

        let apex_on_segment = apex.is_real()
            && math::distance_squared_point_to_segment(
                apex.position(),
                down_position,
                up_position,
            ) <= math::EPSILON_SQUARED;

        if apex.fix() == up || apex_on_segment {
            let apex = apex.fix();
            region.left.push_front(edge_x_z.next().fix());
            region.right.push(edge_x_z.fix());
            self.insert_new_constrained_edge(segment, down, apex, region);
            return Ok((apex != up).then_some(WalkPosition::Vertex(apex)));
        }

        let [x, z] = edge_x_z.positions();
        let (exit, hit) =
            match math::intersections_2_segments(x, z, down_position, up_position, false) {
                Some(hit) => (edge_x_z, Some(hit)),
                None => {
                    let edge_z_y = edge_x_z.next();
                    let [z, y] = edge_z_y.positions();
                    let hit =
                        math::intersections_2_segments(z, y, down_position, up_position, true);
                    (edge_z_y, hit)
                }
            };
        let crosses_x_z = exit == edge_x_z;
        let exit_edge = exit.fix();

        if exit.is_constrained() {
            let hit = hit.ok_or(MeshError::ConstraintWalkFailed)?;
            let left_origin = region
                .left
                .front()
                .map(|edge| self.dcel.directed_edge(*edge).from().fix());
            let right_target = region
                .right
                .last()
                .map(|edge| self.dcel.directed_edge(*edge).to().fix());
            let (left_origin, right_target) = left_origin
                .zip(right_target)
                .ok_or(MeshError::ConstraintWalkFailed)?;

            let new_vertex = self.split_crossed_edge(exit_edge, hit.point, region);
            if new_vertex == left_origin || new_vertex == right_target {
                return Err(MeshError::ConstraintWalkFailed);
            }

            let new_vertex_handle = self.dcel.vertex(new_vertex);
            let to_left = new_vertex_handle
                .out_edges()
                .find(|edge| edge.to().fix() == left_origin);
            let from_right = new_vertex_handle
                .out_edges()
                .find(|edge| edge.to().fix() == right_target);
            let (to_left, from_right) = to_left
                .zip(from_right)
                .map(|(to_left, from_right)| (to_left.fix(), from_right.fix().rev()))
                .ok_or(MeshError::ConstraintWalkFailed)?;

            region.left.push_front(to_left);
            region.right.push(from_right);
            self.insert_new_constrained_edge(segment, down, new_vertex, region);
            return Ok(Some(WalkPosition::Vertex(new_vertex)));
        }

        region.crossed.push(exit_edge);
        if crosses_x_z {
            region.left.push_front(exit.next().fix());
        } else {
            region.right.push(exit.prev().fix());
        }
        Ok(Some(WalkPosition::Edge(exit_edge.rev())))
    }

    /// Replaces the crossed region by a constrained edge from `down` to `up` and
    /// re-triangulates both sides.
    fn insert_new_constrained_edge(
        &mut self,
        segment: FixedSegmentHandle,
        down: FixedVertexHandle,
        up: FixedVertexHandle,
        region: &mut CrossedRegion,
    ) {
        let new_edge = dcel_operations::new_edge_pair(&mut self.dcel, down, up, true);
        dcel_operations::append_segment_edge(&mut self.dcel, segment, new_edge);
        dcel_operations::untriangulate(&mut self.dcel, &region.crossed);
        region.crossed.clear();

        let mut left_bound = vec![new_edge];
        left_bound.extend(region.left.drain(..));
        let mut right_bound = vec![new_edge.rev()];
        right_bound.append(&mut region.right);

        self.triangulate_hole(left_bound, true);
        self.triangulate_hole(right_bound, true);
    }

    /// Removes a constraint segment.
    ///
    /// Edges that are not part of any other segment become unconstrained and are
    /// re-triangulated. Vertices of the segment are removed if possible, see
    /// [delete_vertex](Mesh::delete_vertex).
    pub fn delete_constraint_segment(
        &mut self,
        segment: FixedSegmentHandle,
    ) -> Result<(), MeshError> {
        for vertex in self.release_segment(segment)? {
            if self.dcel.contains_vertex(vertex) {
                self.try_delete_vertex(vertex);
            }
        }

        self.restore_as_delaunay();
        Ok(())
    }

    /// Removes a segment and unconstrains its edges without removing any vertex.
    ///
    /// Returns the vertices the segment passed through.
    fn release_segment(
        &mut self,
        segment: FixedSegmentHandle,
    ) -> Result<Vec<FixedVertexHandle>, MeshError> {
        let entry = self
            .dcel
            .remove_segment(segment)
            .ok_or(MeshError::InvalidHandle)?;
        if let Some(shape) = entry.shape.and_then(|shape| self.dcel.shape_entry_mut(shape)) {
            shape.segments.retain(|other| *other != segment);
        }

        let mut vertices = Vec::new();
        let mut unconstrained = Vec::new();
        for edge in &entry.edges {
            if !self.dcel.contains_edge(*edge) {
                continue;
            }
            let edge_entry = self.dcel.edge_entry_mut(edge.as_undirected());
            edge_entry.segments.retain(|other| *other != segment);
            if edge_entry.segments.is_empty() {
                edge_entry.is_constrained = false;
                unconstrained.push(edge.as_undirected());
            }

            for vertex in self.dcel.directed_edge(*edge).vertices() {
                if !vertices.contains(&vertex.fix()) {
                    vertices.push(vertex.fix());
                }
            }
        }

        for vertex in &vertices {
            self.dcel
                .vertex_entry_mut(*vertex)
                .segments
                .retain(|other| *other != segment);
        }

        for edge in unconstrained {
            self.retriangulate_edge(edge);
        }
        Ok(vertices)
    }

    /// Removes all segments of a constraint shape and the shape itself.
    pub fn delete_constraint_shape(&mut self, shape: FixedShapeHandle) -> Result<(), MeshError> {
        let segments = self
            .shape_segments(shape)
            .ok_or(MeshError::InvalidHandle)?
            .to_vec();
        for segment in segments {
            self.delete_constraint_segment(segment)?;
        }
        self.dcel.remove_shape(shape);
        Ok(())
    }

    /// Removes the two faces next to an unconstrained edge and triangulates the quadrilateral
    /// they leave.
    fn retriangulate_edge(&mut self, edge: FixedUndirectedEdgeHandle) {
        let handle = match self.undirected_edge(edge) {
            Some(handle) => handle.as_directed(),
            None => return,
        };
        if handle.is_constrained()
            || !handle.is_real()
            || !handle.face().is_real()
            || !handle.right_face().is_real()
        {
            return;
        }

        let bound = vec![
            handle.next().fix(),
            handle.prev().fix(),
            handle.rev().next().fix(),
            handle.rev().prev().fix(),
        ];
        let edge = handle.fix();
        dcel_operations::untriangulate(&mut self.dcel, &[edge]);
        self.triangulate_hole(bound, true);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utilities::{random_points_in_domain, SEED, SEED2};

    fn constrained_edges(mesh: &Mesh) -> Vec<[i64; 4]> {
        // Positions rounded to avoid comparing floats
        let mut result: Vec<_> = mesh
            .undirected_edges()
            .filter(|edge| edge.is_constrained())
            .map(|edge| {
                let mut positions = edge
                    .positions()
                    .map(|p| [(p.x * 1e6).round() as i64, (p.y * 1e6).round() as i64]);
                positions.sort();
                [positions[0][0], positions[0][1], positions[1][0], positions[1][1]]
            })
            .collect();
        result.sort();
        result
    }

    #[test]
    fn test_insert_and_delete_diagonal() -> Result<(), MeshError> {
        let mut mesh = Mesh::build_rectangle(100.0, 100.0)?;
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_directed_edges(), 12);
        assert_eq!(mesh.num_faces(), 4);
        let num_edges = mesh.num_undirected_edges();

        let segment =
            mesh.insert_constraint_segment(Point2::new(10.0, 10.0), Point2::new(90.0, 90.0))?;
        mesh.sanity_check();
        mesh.check_delaunay();
        assert_eq!(mesh.segment_edges(segment).map(<[_]>::len), Some(1));
        assert_eq!(mesh.segment_shape(segment), None);

        match mesh.locate_position(Point2::new(50.0, 50.0)) {
            PositionInMesh::OnEdge(edge) => {
                let edge = mesh.directed_edge(edge).unwrap();
                assert!(edge.is_constrained());
                assert_eq!(edge.segments(), &[segment]);
            }
            other => panic!("Expected an edge, found {:?}", other),
        }

        mesh.delete_constraint_segment(segment)?;
        mesh.sanity_check();
        mesh.check_delaunay();
        assert_eq!(mesh.num_undirected_edges(), num_edges);
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(
            mesh.delete_constraint_segment(segment),
            Err(MeshError::InvalidHandle)
        );
        Ok(())
    }

    #[test]
    fn test_segment_through_many_faces() -> Result<(), MeshError> {
        let mut mesh = Mesh::build_rectangle(100.0, 100.0)?;
        for point in random_points_in_domain(100.0, 100.0, 200, SEED) {
            mesh.insert_vertex(point)?;
        }

        let segment =
            mesh.insert_constraint_segment(Point2::new(1.0, 2.0), Point2::new(98.0, 97.0))?;
        mesh.sanity_check();
        mesh.check_delaunay();

        let [start, end] = mesh.segment_end_points(segment).unwrap();
        let start = mesh.vertex(start).unwrap().position();
        let end = mesh.vertex(end).unwrap().position();
        assert!(start.distance_2(Point2::new(1.0, 2.0)) <= math::EPSILON_SQUARED);
        assert!(end.distance_2(Point2::new(98.0, 97.0)) <= math::EPSILON_SQUARED);

        // The edge chain is connected
        let edges = mesh.segment_edges(segment).unwrap();
        for pair in edges.windows(2) {
            let first = mesh.directed_edge(pair[0]).unwrap();
            let second = mesh.directed_edge(pair[1]).unwrap();
            assert_eq!(first.to(), second.from());
            assert!(first.is_constrained());
        }

        mesh.delete_constraint_segment(segment)?;
        mesh.sanity_check();
        mesh.check_delaunay();
        assert!(mesh.undirected_edges().filter(|e| e.is_constrained()).count() == 4);
        Ok(())
    }

    #[test]
    fn test_crossing_segments() -> Result<(), MeshError> {
        let mut mesh = Mesh::build_rectangle(100.0, 100.0)?;
        let horizontal =
            mesh.insert_constraint_segment(Point2::new(10.0, 50.0), Point2::new(90.0, 50.0))?;
        let vertical =
            mesh.insert_constraint_segment(Point2::new(50.0, 10.0), Point2::new(50.0, 90.0))?;
        mesh.sanity_check();
        mesh.check_delaunay();

        assert_eq!(mesh.num_vertices(), 9);
        assert_eq!(mesh.segment_edges(horizontal).map(<[_]>::len), Some(2));
        assert_eq!(mesh.segment_edges(vertical).map(<[_]>::len), Some(2));

        let center = match mesh.locate_position(Point2::new(50.0, 50.0)) {
            PositionInMesh::OnVertex(center) => center,
            other => panic!("Expected a vertex, found {:?}", other),
        };
        let center_segments = mesh.vertex(center).unwrap().segments();
        assert!(center_segments.contains(&horizontal));
        assert!(center_segments.contains(&vertical));

        mesh.delete_constraint_segment(horizontal)?;
        mesh.sanity_check();
        mesh.check_delaunay();
        // The intersection and the horizontal end points are gone
        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.segment_edges(vertical).map(<[_]>::len), Some(1));
        Ok(())
    }

    #[test]
    fn test_overlapping_segments() -> Result<(), MeshError> {
        let mut mesh = Mesh::build_rectangle(100.0, 100.0)?;
        let first =
            mesh.insert_constraint_segment(Point2::new(10.0, 10.0), Point2::new(60.0, 10.0))?;
        let second =
            mesh.insert_constraint_segment(Point2::new(30.0, 10.0), Point2::new(90.0, 10.0))?;
        mesh.sanity_check();

        let shared = mesh
            .undirected_edges()
            .filter(|edge| edge.segments().len() == 2)
            .count();
        assert_eq!(shared, 1);
        assert_eq!(mesh.segment_edges(first).map(<[_]>::len), Some(2));
        assert_eq!(mesh.segment_edges(second).map(<[_]>::len), Some(2));

        mesh.delete_constraint_segment(first)?;
        mesh.sanity_check();
        mesh.check_delaunay();
        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.segment_edges(second).map(<[_]>::len), Some(1));
        Ok(())
    }

    #[test]
    fn test_segment_through_existing_vertex() -> Result<(), MeshError> {
        let mut mesh = Mesh::build_rectangle(100.0, 100.0)?;
        let middle = mesh.insert_vertex(Point2::new(50.0, 30.0))?;
        let segment =
            mesh.insert_constraint_segment(Point2::new(20.0, 30.0), Point2::new(80.0, 30.0))?;
        mesh.sanity_check();
        assert_eq!(mesh.segment_edges(segment).map(<[_]>::len), Some(2));
        assert_eq!(mesh.vertex(middle).unwrap().segments(), &[segment]);
        Ok(())
    }

    #[test]
    fn test_delete_and_reinsert_round_trip() -> Result<(), MeshError> {
        let mut mesh = Mesh::build_rectangle(100.0, 100.0)?;
        mesh.insert_polygon(&[
            Point2::new(20.0, 20.0),
            Point2::new(80.0, 25.0),
            Point2::new(50.0, 80.0),
        ])?;
        let from = Point2::new(5.0, 60.0);
        let to = Point2::new(95.0, 40.0);
        let segment = mesh.insert_constraint_segment(from, to)?;
        mesh.sanity_check();
        let before = constrained_edges(&mesh);

        mesh.delete_constraint_segment(segment)?;
        mesh.sanity_check();
        mesh.check_delaunay();
        mesh.insert_constraint_segment(from, to)?;
        mesh.sanity_check();
        mesh.check_delaunay();
        assert_eq!(constrained_edges(&mesh), before);
        Ok(())
    }

    #[test]
    fn test_clipping() -> Result<(), MeshError> {
        let mut mesh = Mesh::build_rectangle(100.0, 100.0)?;
        let segment =
            mesh.insert_constraint_segment(Point2::new(-10.0, 50.0), Point2::new(50.0, 50.0))?;
        let [start, _] = mesh.segment_end_points(segment).unwrap();
        let start = mesh.vertex(start).unwrap().position();
        assert!(start.distance_2(Point2::new(0.0, 50.0)) < 1e-12);

        assert_eq!(
            mesh.insert_constraint_segment(Point2::new(-20.0, -20.0), Point2::new(-10.0, -5.0)),
            Err(MeshError::SegmentClippedAway)
        );
        assert_eq!(
            mesh.insert_constraint_segment(Point2::new(30.0, 30.0), Point2::new(30.0, 30.001)),
            Err(MeshError::DegenerateSegment)
        );

        mesh.set_clipping(false);
        let num_vertices = mesh.num_vertices();
        assert_eq!(
            mesh.insert_constraint_segment(Point2::new(-10.0, 60.0), Point2::new(50.0, 60.0)),
            Err(MeshError::OutOfBounds)
        );
        assert_eq!(mesh.num_vertices(), num_vertices);
        mesh.sanity_check();
        Ok(())
    }

    #[test]
    fn test_insert_and_delete_shape() -> Result<(), MeshError> {
        let mut mesh = Mesh::build_rectangle(100.0, 100.0)?;
        assert_eq!(
            mesh.insert_constraint_shape(&[Point2::new(1.0, 1.0)]),
            Err(MeshError::DegenerateSegment)
        );

        let shape = mesh.insert_constraint_shape(&[
            Point2::new(10.0, 10.0),
            Point2::new(40.0, 10.0),
            Point2::new(40.0, 10.0),
            Point2::new(40.0, 40.0),
            // Clipped away
            Point2::new(-10.0, -10.0),
            Point2::new(-5.0, -10.0),
        ])?;
        mesh.sanity_check();
        assert_eq!(mesh.shape_segments(shape).map(<[_]>::len), Some(2));
        for segment in mesh.shape_segments(shape).unwrap() {
            assert_eq!(mesh.segment_shape(*segment), Some(shape));
        }
        assert_eq!(mesh.constraint_shapes().count(), 2);

        mesh.delete_constraint_shape(shape)?;
        mesh.sanity_check();
        mesh.check_delaunay();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.constraint_shapes().count(), 1);
        assert_eq!(mesh.constraint_segments().count(), 4);
        assert_eq!(
            mesh.delete_constraint_shape(shape),
            Err(MeshError::InvalidHandle)
        );
        Ok(())
    }

    #[test]
    fn test_insert_polygon() -> Result<(), MeshError> {
        let mut mesh = Mesh::build_rectangle(100.0, 100.0)?;
        let square = [
            Point2::new(20.0, 20.0),
            Point2::new(60.0, 20.0),
            Point2::new(60.0, 60.0),
            Point2::new(20.0, 60.0),
        ];
        let shape = mesh.insert_polygon(&square)?;
        mesh.sanity_check();
        mesh.check_delaunay();
        assert_eq!(mesh.shape_segments(shape).map(<[_]>::len), Some(4));
        assert_eq!(mesh.num_vertices(), 8);

        // The ring is closed
        for segment in mesh.shape_segments(shape).unwrap() {
            let [from, to] = mesh.segment_end_points(*segment).unwrap();
            assert_eq!(mesh.vertex(from).unwrap().segments().len(), 2);
            assert_eq!(mesh.vertex(to).unwrap().segments().len(), 2);
        }
        assert_eq!(
            mesh.insert_polygon(&square[..1]),
            Err(MeshError::DegenerateSegment)
        );
        Ok(())
    }

    #[test]
    fn test_insert_constraint_record() -> Result<(), anyhow::Error> {
        let mut mesh = Mesh::build_rectangle(100.0, 100.0)?;
        let shape = mesh.insert_constraint_record("10;10;90;10;90;10;90;90")?;
        mesh.sanity_check();
        assert_eq!(mesh.shape_segments(shape).map(<[_]>::len), Some(2));

        let num_shapes = mesh.constraint_shapes().count();
        assert_eq!(
            mesh.insert_constraint_record("10;10;90"),
            Err(RecordError::InvalidLength { len: 3 })
        );
        assert_eq!(
            mesh.insert_constraint_record("10;x;90;10"),
            Err(RecordError::InvalidNumber { index: 1 })
        );
        assert_eq!(mesh.constraint_shapes().count(), num_shapes);
        Ok(())
    }

    #[test]
    fn test_random_segments() -> Result<(), MeshError> {
        let mut mesh = Mesh::build_rectangle(100.0, 100.0)?;
        let points = random_points_in_domain(100.0, 100.0, 60, SEED2);
        let mut segments = Vec::new();
        for pair in points.chunks_exact(2) {
            segments.push(mesh.insert_constraint_segment(pair[0], pair[1])?);
            mesh.sanity_check();
            mesh.check_delaunay();
        }
        assert_eq!(mesh.constraint_segments().count(), 4 + segments.len());

        for segment in segments {
            mesh.delete_constraint_segment(segment)?;
            mesh.sanity_check();
            mesh.check_delaunay();
        }
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_undirected_edges(), 6);
        Ok(())
    }

    #[test]
    fn test_failed_walk_keeps_existing_vertices() -> Result<(), MeshError> {
        let mut mesh = Mesh::build_rectangle(100.0, 100.0)?;
        let middle = mesh.insert_vertex(Point2::new(50.0, 50.0))?;
        let num_vertices = mesh.num_vertices();
        let num_edges = mesh.num_undirected_edges();
        let num_segments = mesh.num_constraint_segments();

        for limit in [0, 1] {
            mesh.constraint_step_limit = Some(limit);
            let result =
                mesh.insert_constraint_segment(Point2::new(10.0, 10.0), Point2::new(90.0, 90.0));
            assert!(matches!(result, Err(MeshError::ConstraintWalkFailed)));
            mesh.sanity_check();
            assert_eq!(mesh.num_vertices(), num_vertices);
            assert_eq!(mesh.num_undirected_edges(), num_edges);
            assert_eq!(mesh.num_constraint_segments(), num_segments);
            let middle = mesh.vertex(middle).unwrap();
            assert!(!middle.is_constrained());
        }
        Ok(())
    }

    #[test]
    fn test_failed_walk_merges_split_edges() -> Result<(), MeshError> {
        let mut mesh = Mesh::build_rectangle(100.0, 100.0)?;
        let crossing =
            mesh.insert_constraint_segment(Point2::new(10.0, 90.0), Point2::new(90.0, 10.0))?;
        mesh.insert_vertex(Point2::new(30.0, 60.0))?;
        mesh.insert_vertex(Point2::new(70.0, 40.0))?;
        let num_vertices = mesh.num_vertices();
        let num_edges = mesh.num_undirected_edges();
        let crossing_edges = mesh.segment_edges(crossing).map(<[_]>::len);

        let mut num_failures = 0;
        for limit in 0..24 {
            let mut mesh = mesh.clone();
            mesh.constraint_step_limit = Some(limit);
            match mesh.insert_constraint_segment(Point2::new(10.0, 10.0), Point2::new(90.0, 90.0)) {
                Err(MeshError::ConstraintWalkFailed) => num_failures += 1,
                Ok(_) => continue,
                Err(other) => panic!("Unexpected error {:?}", other),
            }
            mesh.sanity_check();
            assert_eq!(mesh.num_vertices(), num_vertices);
            assert_eq!(mesh.num_undirected_edges(), num_edges);
            assert_eq!(mesh.segment_edges(crossing).map(<[_]>::len), crossing_edges);
        }
        assert!(num_failures >= 2);
        Ok(())
    }
}
