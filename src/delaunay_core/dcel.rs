use slotmap::{Key, SlotMap};
use smallvec::SmallVec;

use super::handles::*;
use crate::Point2;

#[derive(Clone, Debug)]
pub(crate) struct VertexEntry {
    pub position: Point2,
    pub out_edge: FixedDirectedEdgeHandle,
    pub is_real: bool,
    pub segments: SmallVec<[FixedSegmentHandle; 2]>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct HalfEdgeEntry {
    pub next: FixedDirectedEdgeHandle,
    pub prev: FixedDirectedEdgeHandle,
    pub face: FixedFaceHandle,
    pub origin: FixedVertexHandle,
}

impl HalfEdgeEntry {
    /// A half edge that only knows its origin. All other links are set by the operation
    /// creating it.
    pub(crate) fn unlinked(origin: FixedVertexHandle) -> Self {
        HalfEdgeEntry {
            next: FixedDirectedEdgeHandle::null(),
            prev: FixedDirectedEdgeHandle::null(),
            face: FixedFaceHandle::null(),
            origin,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct EdgeEntry {
    pub entries: [HalfEdgeEntry; 2],
    pub is_real: bool,
    pub is_constrained: bool,
    pub segments: SmallVec<[FixedSegmentHandle; 2]>,
}

impl EdgeEntry {
    pub(crate) fn new(normalized: HalfEdgeEntry, not_normalized: HalfEdgeEntry) -> Self {
        EdgeEntry {
            entries: [normalized, not_normalized],
            is_real: true,
            is_constrained: false,
            segments: SmallVec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct FaceEntry {
    pub adjacent_edge: FixedDirectedEdgeHandle,
    pub is_real: bool,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct SegmentEntry {
    /// Edges realizing the segment, chained from its first to its last vertex.
    pub edges: Vec<FixedDirectedEdgeHandle>,
    pub shape: Option<FixedShapeHandle>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ShapeEntry {
    pub segments: Vec<FixedSegmentHandle>,
}

/// The half edge store of a [Mesh](crate::Mesh).
///
/// Edges are stored pairwise: a directed edge and its reversed twin share one entry, their
/// handles only differ in their side.
#[derive(Clone, Debug, Default)]
pub struct Dcel {
    pub(super) vertices: SlotMap<FixedVertexHandle, VertexEntry>,
    pub(super) edges: SlotMap<FixedUndirectedEdgeHandle, EdgeEntry>,
    pub(super) faces: SlotMap<FixedFaceHandle, FaceEntry>,
    pub(super) segments: SlotMap<FixedSegmentHandle, SegmentEntry>,
    pub(super) shapes: SlotMap<FixedShapeHandle, ShapeEntry>,
    /// Vertices point location draws its start samples from. May contain removed vertices
    /// until the next compaction.
    vertex_samples: Vec<FixedVertexHandle>,
}

impl Dcel {
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_directed_edges(&self) -> usize {
        self.edges.len() * 2
    }

    pub fn num_undirected_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    pub fn num_shapes(&self) -> usize {
        self.shapes.len()
    }

    pub(super) fn insert_vertex(&mut self, entry: VertexEntry) -> FixedVertexHandle {
        let handle = self.vertices.insert(entry);
        self.vertex_samples.push(handle);
        handle
    }

    pub(super) fn remove_vertex(&mut self, handle: FixedVertexHandle) -> Option<VertexEntry> {
        let removed = self.vertices.remove(handle);
        if self.vertex_samples.len() > 2 * self.vertices.len() + 16 {
            let vertices = &self.vertices;
            self.vertex_samples
                .retain(|vertex| vertices.contains_key(*vertex));
        }
        removed
    }

    /// Number of sample slots, see [sample_vertex](Self::sample_vertex).
    pub fn num_vertex_samples(&self) -> usize {
        self.vertex_samples.len()
    }

    /// Returns the vertex stored in a sample slot, or `None` if it was removed.
    pub fn sample_vertex(&self, slot: usize) -> Option<FixedVertexHandle> {
        self.vertex_samples
            .get(slot)
            .copied()
            .filter(|vertex| self.vertices.contains_key(*vertex))
    }

    pub fn contains_vertex(&self, handle: FixedVertexHandle) -> bool {
        self.vertices.contains_key(handle)
    }

    pub fn contains_edge(&self, handle: FixedDirectedEdgeHandle) -> bool {
        self.edges.contains_key(handle.as_undirected())
    }

    pub fn contains_face(&self, handle: FixedFaceHandle) -> bool {
        self.faces.contains_key(handle)
    }

    pub fn contains_segment(&self, handle: FixedSegmentHandle) -> bool {
        self.segments.contains_key(handle)
    }

    pub fn vertex(&self, handle: FixedVertexHandle) -> VertexHandle {
        DynamicHandleImpl::new(self, handle)
    }

    pub fn directed_edge(&self, handle: FixedDirectedEdgeHandle) -> DirectedEdgeHandle {
        DynamicHandleImpl::new(self, handle)
    }

    pub fn undirected_edge(&self, handle: FixedUndirectedEdgeHandle) -> UndirectedEdgeHandle {
        DynamicHandleImpl::new(self, handle)
    }

    pub fn face(&self, handle: FixedFaceHandle) -> FaceHandle {
        DynamicHandleImpl::new(self, handle)
    }

    pub(super) fn half_edge(&self, handle: FixedDirectedEdgeHandle) -> &HalfEdgeEntry {
        let entry = &self.edges[handle.as_undirected()];
        &entry.entries[handle.side()]
    }

    pub(super) fn half_edge_mut(&mut self, handle: FixedDirectedEdgeHandle) -> &mut HalfEdgeEntry {
        let entry = &mut self.edges[handle.as_undirected()];
        &mut entry.entries[handle.side()]
    }

    pub(crate) fn edge_entry_mut(&mut self, handle: FixedUndirectedEdgeHandle) -> &mut EdgeEntry {
        &mut self.edges[handle]
    }

    pub(crate) fn vertex_entry_mut(&mut self, handle: FixedVertexHandle) -> &mut VertexEntry {
        &mut self.vertices[handle]
    }

    pub(crate) fn segment_entry(&self, handle: FixedSegmentHandle) -> Option<&SegmentEntry> {
        self.segments.get(handle)
    }

    pub(crate) fn shape_entry(&self, handle: FixedShapeHandle) -> Option<&ShapeEntry> {
        self.shapes.get(handle)
    }

    pub(crate) fn shape_entry_mut(&mut self, handle: FixedShapeHandle) -> Option<&mut ShapeEntry> {
        self.shapes.get_mut(handle)
    }

    pub(crate) fn insert_segment(&mut self, entry: SegmentEntry) -> FixedSegmentHandle {
        self.segments.insert(entry)
    }

    pub(crate) fn remove_segment(&mut self, handle: FixedSegmentHandle) -> Option<SegmentEntry> {
        self.segments.remove(handle)
    }

    pub(crate) fn insert_shape(&mut self, entry: ShapeEntry) -> FixedShapeHandle {
        self.shapes.insert(entry)
    }

    pub(crate) fn remove_shape(&mut self, handle: FixedShapeHandle) -> Option<ShapeEntry> {
        self.shapes.remove(handle)
    }

    /// Returns the first and last vertex of a segment.
    pub fn segment_end_points(
        &self,
        handle: FixedSegmentHandle,
    ) -> Option<[FixedVertexHandle; 2]> {
        let entry = self.segments.get(handle)?;
        let first = entry.edges.first()?;
        let last = entry.edges.last()?;
        Some([
            self.directed_edge(*first).from().fix(),
            self.directed_edge(*last).to().fix(),
        ])
    }

    #[cfg(test)]
    pub fn sanity_check(&self) {
        use super::math;
        use hashbrown::HashSet;

        // Closed surface of genus 0
        assert_eq!(
            self.num_vertices() + self.num_faces(),
            self.num_undirected_edges() + 2
        );

        for (handle, face) in self.faces.iter() {
            assert!(self.contains_edge(face.adjacent_edge));
            let edge = self.directed_edge(face.adjacent_edge);
            assert_eq!(edge.face().fix(), handle);
            assert_eq!(edge, edge.next().next().next());
            assert_eq!(edge, edge.prev().prev().prev());
            if face.is_real {
                let [p0, p1, p2] = self.face(handle).positions();
                assert!(
                    !math::orientation(p0, p1, p2).is_right(),
                    "Real face {:?} is oriented clockwise",
                    handle
                );
            }
        }

        for (handle, vertex) in self.vertices.iter() {
            assert!(self.contains_edge(vertex.out_edge));
            assert_eq!(self.directed_edge(vertex.out_edge).from().fix(), handle);
            for segment in &vertex.segments {
                assert!(self.contains_segment(*segment));
            }
        }

        for (undirected, entry) in self.edges.iter() {
            assert_eq!(entry.is_constrained, !entry.segments.is_empty());
            for directed in undirected.directed_edges() {
                let edge = self.directed_edge(directed);
                assert!(self.contains_face(edge.face().fix()));
                assert!(self.contains_vertex(edge.from().fix()));
                assert_eq!(edge, edge.next().prev());
                assert_eq!(edge, edge.prev().next());
                assert_eq!(edge, edge.rev().rev());
                assert_eq!(edge.face(), edge.next().face());
                assert_ne!(edge.face(), edge.rev().face());
                assert_ne!(edge, edge.next());
                assert_ne!(edge.from(), edge.to());
                assert_eq!(edge.is_constrained(), edge.rev().is_constrained());

                assert_eq!(edge, edge.cw().ccw());
                assert_eq!(edge, edge.ccw().cw());
                assert_eq!(edge.from(), edge.cw().from());
            }
        }

        for (handle, segment) in self.segments.iter() {
            assert!(!segment.edges.is_empty());
            let mut vertices = HashSet::new();
            for window in segment.edges.windows(2) {
                assert_eq!(
                    self.directed_edge(window[0]).to(),
                    self.directed_edge(window[1]).from()
                );
            }
            for edge in &segment.edges {
                let edge = self.directed_edge(*edge);
                assert!(edge.is_constrained());
                assert!(edge.segments().contains(&handle));
                vertices.insert(edge.from().fix());
                vertices.insert(edge.to().fix());
            }
            for vertex in vertices {
                assert!(self.vertex(vertex).segments().contains(&handle));
            }
            if let Some(shape) = segment.shape {
                let shape = self.shape_entry(shape).expect("Segment refers to a removed shape");
                assert!(shape.segments.contains(&handle));
            }
        }
    }
}
