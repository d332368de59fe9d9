use smallvec::SmallVec;
use tracing::{debug, warn};

use super::dcel::{Dcel, EdgeEntry, FaceEntry, HalfEdgeEntry, SegmentEntry, ShapeEntry, VertexEntry};
use super::handles::*;
use super::math;
use crate::Point2;

/// Distance between the bounding rectangle and the domain it encloses.
pub const BOUNDING_OFFSET: f64 = math::EPSILON * 1000.0;

pub fn new_vertex(dcel: &mut Dcel, position: Point2, is_real: bool) -> FixedVertexHandle {
    dcel.insert_vertex(VertexEntry {
        position,
        out_edge: FixedDirectedEdgeHandle::null(),
        is_real,
        segments: SmallVec::new(),
    })
}

/// Creates an unlinked edge pair and returns the half edge pointing from `from` to `to`.
pub fn new_edge_pair(
    dcel: &mut Dcel,
    from: FixedVertexHandle,
    to: FixedVertexHandle,
    is_real: bool,
) -> FixedDirectedEdgeHandle {
    let mut entry = EdgeEntry::new(HalfEdgeEntry::unlinked(from), HalfEdgeEntry::unlinked(to));
    entry.is_real = is_real;
    FixedDirectedEdgeHandle::new_normalized(dcel.edges.insert(entry))
}

pub fn new_face(dcel: &mut Dcel, adjacent_edge: FixedDirectedEdgeHandle, is_real: bool) -> FixedFaceHandle {
    dcel.faces.insert(FaceEntry {
        adjacent_edge,
        is_real,
    })
}

/// Links three half edges into a counterclockwise cycle around `face`.
fn link_triangle(dcel: &mut Dcel, edges: [FixedDirectedEdgeHandle; 3], face: FixedFaceHandle) {
    for i in 0..3 {
        let entry = dcel.half_edge_mut(edges[i]);
        entry.next = edges[(i + 1) % 3];
        entry.prev = edges[(i + 2) % 3];
        entry.face = face;
    }
}

fn origin(dcel: &Dcel, edge: FixedDirectedEdgeHandle) -> FixedVertexHandle {
    dcel.half_edge(edge).origin
}

fn origin_position(dcel: &Dcel, edge: FixedDirectedEdgeHandle) -> Point2 {
    dcel.vertices[origin(dcel, edge)].position
}

fn add_segment_to_vertex(dcel: &mut Dcel, vertex: FixedVertexHandle, segment: FixedSegmentHandle) {
    let segments = &mut dcel.vertices[vertex].segments;
    if !segments.contains(&segment) {
        segments.push(segment);
    }
}

fn add_segment_to_edge(dcel: &mut Dcel, edge: FixedUndirectedEdgeHandle, segment: FixedSegmentHandle) {
    let entry = &mut dcel.edges[edge];
    entry.is_constrained = true;
    if !entry.segments.contains(&segment) {
        entry.segments.push(segment);
    }
}

/// Adds `edge` to the end of a segment's edge chain and tags the edge and both of its
/// vertices with the segment.
pub fn append_segment_edge(dcel: &mut Dcel, segment: FixedSegmentHandle, edge: FixedDirectedEdgeHandle) {
    add_segment_to_edge(dcel, edge.as_undirected(), segment);
    let from = origin(dcel, edge);
    let to = origin(dcel, edge.rev());
    add_segment_to_vertex(dcel, from, segment);
    add_segment_to_vertex(dcel, to, segment);
    if let Some(entry) = dcel.segments.get_mut(segment) {
        entry.edges.push(edge);
    }
}

/// Creates the initial mesh: a rectangle slightly larger than `width x height`.
///
/// ```text
///  D +---------+ C
///    | \       |
///    |   \  f2 |
///    |     \   |
///    | f1    \ |
///  A +---------+ B
/// ```
///
/// The four corners are not real. `A -> C` is a virtual edge closing the surface around the
/// rectangle; together with the border edges it forms two virtual faces. The border edges
/// are constrained by four segments that form one shape.
pub fn build_rectangle(width: f64, height: f64) -> (Dcel, FixedShapeHandle) {
    let mut dcel = Dcel::default();
    let offset = BOUNDING_OFFSET;

    let a = new_vertex(&mut dcel, Point2::new(-offset, -offset), false);
    let b = new_vertex(&mut dcel, Point2::new(width + offset, -offset), false);
    let c = new_vertex(&mut dcel, Point2::new(width + offset, height + offset), false);
    let d = new_vertex(&mut dcel, Point2::new(-offset, height + offset), false);

    let ab = new_edge_pair(&mut dcel, a, b, true);
    let bc = new_edge_pair(&mut dcel, b, c, true);
    let cd = new_edge_pair(&mut dcel, c, d, true);
    let da = new_edge_pair(&mut dcel, d, a, true);
    let bd = new_edge_pair(&mut dcel, b, d, true);
    let ac = new_edge_pair(&mut dcel, a, c, false);

    let f1 = new_face(&mut dcel, ab, true);
    let f2 = new_face(&mut dcel, bc, true);
    let f3 = new_face(&mut dcel, ab.rev(), false);
    let f4 = new_face(&mut dcel, cd.rev(), false);

    link_triangle(&mut dcel, [ab, bd, da], f1);
    link_triangle(&mut dcel, [bc, cd, bd.rev()], f2);
    link_triangle(&mut dcel, [ab.rev(), ac, bc.rev()], f3);
    link_triangle(&mut dcel, [cd.rev(), ac.rev(), da.rev()], f4);

    dcel.vertices[a].out_edge = ab;
    dcel.vertices[b].out_edge = bc;
    dcel.vertices[c].out_edge = cd;
    dcel.vertices[d].out_edge = da;

    let shape = dcel.insert_shape(ShapeEntry::default());
    for border in [ab, bc, cd, da] {
        let segment = dcel.insert_segment(SegmentEntry {
            edges: Vec::new(),
            shape: Some(shape),
        });
        append_segment_edge(&mut dcel, segment, border);
        if let Some(entry) = dcel.shape_entry_mut(shape) {
            entry.segments.push(segment);
        }
    }

    (dcel, shape)
}

/// Inserts a new vertex into a face, splitting it into three.
///
/// Returns the new vertex. The three edges of the original face keep their handles.
pub fn insert_into_triangle(dcel: &mut Dcel, position: Point2, f0: FixedFaceHandle) -> FixedVertexHandle {
    // Original triangle:
    //       v2
    //      /  \
    //     /    \
    //   e2  f0  e1
    //   /        \
    // v0 -- e0 -- v1
    //
    // After inserting v, f0 is bounded by e0, f1 by e1 and f2 by e2.
    let FaceEntry {
        adjacent_edge: e0,
        is_real,
    } = dcel.faces[f0];
    let e1 = dcel.half_edge(e0).next;
    let e2 = dcel.half_edge(e1).next;

    let v0 = origin(dcel, e0);
    let v1 = origin(dcel, e1);
    let v2 = origin(dcel, e2);

    let v = new_vertex(dcel, position, true);
    let to_v0 = new_edge_pair(dcel, v0, v, true);
    let to_v1 = new_edge_pair(dcel, v1, v, true);
    let to_v2 = new_edge_pair(dcel, v2, v, true);

    let f1 = new_face(dcel, e1, is_real);
    let f2 = new_face(dcel, e2, is_real);

    link_triangle(dcel, [e0, to_v1, to_v0.rev()], f0);
    link_triangle(dcel, [e1, to_v2, to_v1.rev()], f1);
    link_triangle(dcel, [e2, to_v0, to_v2.rev()], f2);

    dcel.faces[f0].adjacent_edge = e0;
    dcel.vertices[v].out_edge = to_v0.rev();

    v
}

/// Splits an edge and both of its adjacent faces by inserting a new vertex.
///
/// `position` should lie on the edge. If the edge is constrained, the new vertex and the new
/// edge join all of its segments.
pub fn split_edge(dcel: &mut Dcel, edge: FixedDirectedEdgeHandle, position: Point2) -> FixedVertexHandle {
    // Before:
    //
    //         c
    //       /   \
    //     ep  f0  en
    //     /   e->   \
    //    a --------- b
    //     \   <-t   /
    //     tn  f1  tp
    //       \   /
    //         d
    //
    // After splitting at v, e runs from a to v and t from v to a. The new edge v -> b
    // and its twin carry the flags of e.
    let t = edge.rev();
    let e_entry = *dcel.half_edge(edge);
    let t_entry = *dcel.half_edge(t);
    let en = e_entry.next;
    let ep = e_entry.prev;
    let tn = t_entry.next;
    let tp = t_entry.prev;
    let f0 = e_entry.face;
    let f1 = t_entry.face;

    let b = t_entry.origin;
    let c = origin(dcel, ep);
    let d = origin(dcel, tp);

    let f0_real = dcel.faces[f0].is_real;
    let f1_real = dcel.faces[f1].is_real;
    let old_entry = dcel.edges[edge.as_undirected()].clone();

    let v = new_vertex(dcel, position, true);
    let v_b = new_edge_pair(dcel, v, b, old_entry.is_real);
    let v_c = new_edge_pair(dcel, v, c, f0_real);
    let v_d = new_edge_pair(dcel, v, d, f1_real);
    {
        let new_entry = &mut dcel.edges[v_b.as_undirected()];
        new_entry.is_constrained = old_entry.is_constrained;
        new_entry.segments = old_entry.segments.clone();
    }

    let f2 = new_face(dcel, en, f0_real);
    let f3 = new_face(dcel, tp, f1_real);

    dcel.half_edge_mut(t).origin = v;
    link_triangle(dcel, [edge, v_c, ep], f0);
    link_triangle(dcel, [v_b, en, v_c.rev()], f2);
    link_triangle(dcel, [t, tn, v_d.rev()], f1);
    link_triangle(dcel, [v_b.rev(), v_d, tp], f3);

    dcel.faces[f0].adjacent_edge = edge;
    dcel.faces[f1].adjacent_edge = t;
    dcel.vertices[v].out_edge = v_b;
    dcel.vertices[b].out_edge = en;

    for segment in &old_entry.segments {
        add_segment_to_vertex(dcel, v, *segment);
        if let Some(entry) = dcel.segments.get_mut(*segment) {
            if let Some(index) = entry.edges.iter().position(|e| *e == edge) {
                entry.edges.insert(index + 1, v_b);
            } else if let Some(index) = entry.edges.iter().position(|e| *e == t) {
                entry.edges.insert(index, v_b.rev());
            }
        }
    }

    v
}

/// Flips an edge in clockwise direction.
///
/// The edge keeps its handle. Both adjacent faces must be triangles forming a convex
/// quadrilateral.
pub fn flip_cw(dcel: &mut Dcel, e: FixedUndirectedEdgeHandle) {
    let e = e.as_directed();
    let e_entry = *dcel.half_edge(e);
    let en = e_entry.next;
    let ep = e_entry.prev;
    let e_face = e_entry.face;
    let e_origin = e_entry.origin;

    let t = e.rev();
    let t_entry = *dcel.half_edge(t);
    let tn = t_entry.next;
    let tp = t_entry.prev;
    let t_face = t_entry.face;
    let t_origin = t_entry.origin;

    dcel.half_edge_mut(e).origin = dcel.half_edge(ep).origin;
    dcel.half_edge_mut(t).origin = dcel.half_edge(tp).origin;
    link_triangle(dcel, [e, tp, en], e_face);
    link_triangle(dcel, [t, ep, tn], t_face);

    dcel.vertices[e_origin].out_edge = tn;
    dcel.vertices[t_origin].out_edge = en;

    dcel.faces[e_face].adjacent_edge = e;
    dcel.faces[t_face].adjacent_edge = t;
}

/// Removes a chain of crossed edges together with the faces around them.
///
/// `crossed` lists edges in the order a path crosses them, each one oriented such that
/// the path crosses it from its left to its right side. The faces left of all edges and the
/// face right of the last one are removed, leaving a hole that must be filled with
/// [triangulate].
pub fn untriangulate(dcel: &mut Dcel, crossed: &[FixedDirectedEdgeHandle]) {
    let mut faces: Vec<FixedFaceHandle> = crossed.iter().map(|e| dcel.half_edge(*e).face).collect();
    if let Some(last) = crossed.last() {
        faces.push(dcel.half_edge(last.rev()).face);
    }
    for face in faces {
        dcel.faces.remove(face);
    }
    for edge in crossed {
        dcel.edges.remove(edge.as_undirected());
    }
}

/// Fills a hole with triangles.
///
/// `bound` lists the edges surrounding the hole in counterclockwise order, each one with the
/// hole on its left side. Starting at `bound[0]`, the hole is split along diagonals into
/// smaller holes until only triangles remain. Diagonals are Delaunay with respect to the
/// hole's vertices whenever possible. Returns all edges created to do so.
pub fn triangulate(
    dcel: &mut Dcel,
    bound: Vec<FixedDirectedEdgeHandle>,
    is_real: bool,
) -> Vec<FixedUndirectedEdgeHandle> {
    let mut new_edges = Vec::new();
    let mut holes = vec![bound];

    while let Some(bound) = holes.pop() {
        match bound.len() {
            0 | 1 => {
                warn!(len = bound.len(), "Skipping hole with less than two edges");
                continue;
            }
            2 => {
                merge_twin_edges(dcel, bound[0], bound[1]);
                continue;
            }
            3 => {
                let face = new_face(dcel, bound[0], is_real);
                link_triangle(dcel, [bound[0], bound[1], bound[2]], face);
                for edge in &bound {
                    let from = origin(dcel, *edge);
                    dcel.vertices[from].out_edge = *edge;
                }
                continue;
            }
            _ => {}
        }

        let corners: Vec<_> = bound.iter().map(|edge| origin(dcel, *edge)).collect();
        let positions: Vec<_> = bound.iter().map(|edge| origin_position(dcel, *edge)).collect();
        let apex = select_apex(&corners, &positions);
        if apex.is_none() {
            warn!(len = bound.len(), "Hole is degenerate, no corner lies left of its base");
        }
        debug_assert!(apex.is_some(), "Cannot triangulate a degenerate hole");
        let index = apex.unwrap_or(2);

        let base = bound[0];
        let a = corners[0];
        let b = corners[1];
        let c = corners[index];

        // c -> a
        let mut closing_edge = bound[index];
        if index < bound.len() - 1 {
            let a_c = new_edge_pair(dcel, a, c, is_real);
            new_edges.push(a_c.as_undirected());
            let mut sub_hole = vec![a_c];
            sub_hole.extend_from_slice(&bound[index..]);
            holes.push(sub_hole);
            closing_edge = a_c.rev();
        }

        // b -> c
        let mut middle_edge = bound[1];
        if index > 2 {
            let b_c = new_edge_pair(dcel, b, c, is_real);
            new_edges.push(b_c.as_undirected());
            let mut sub_hole = vec![b_c.rev()];
            sub_hole.extend_from_slice(&bound[1..index]);
            holes.push(sub_hole);
            middle_edge = b_c;
        }

        holes.push(vec![base, middle_edge, closing_edge]);
    }

    new_edges
}

/// Picks the corner forming a triangle with the hole's first edge.
///
/// Only corners whose triangle lies inside of the hole are considered. Among those, the first
/// one whose circumcircle contains no other corner left of the first edge wins. If there is no
/// such corner, the first valid one is used. Holes too thin for the epsilon tests fall back to
/// the first corner strictly left of the first edge. Returns `None` if there is none.
fn select_apex(corners: &[FixedVertexHandle], positions: &[Point2]) -> Option<usize> {
    let [pa, pb] = [positions[0], positions[1]];
    let is_left_of_base =
        |index: usize| math::orientation_with_epsilon(pa, pb, positions[index]).is_left();

    let valid: Vec<usize> = (2..positions.len())
        .filter(|index| is_left_of_base(*index) && is_valid_apex(corners, positions, *index))
        .collect();

    let delaunay = valid.iter().copied().find(|&index| {
        // Perfectly regular polygons have all corners on one circle. The test shrinks the
        // circle slightly to accept them.
        let circle = [pa, pb, positions[index]];
        (2..positions.len())
            .filter(|other| *other != index && is_left_of_base(*other))
            .all(|other| !math::contained_in_circumference(circle, positions[other]))
    });

    delaunay.or_else(|| valid.first().copied()).or_else(|| {
        let fallback = (2..positions.len())
            .find(|index| math::orientation(pa, pb, positions[*index]).is_left());
        debug!(len = positions.len(), ?fallback, "No valid apex found for hole");
        fallback
    })
}

fn is_valid_apex(corners: &[FixedVertexHandle], positions: &[Point2], apex: usize) -> bool {
    let len = positions.len();
    let triangle = [positions[0], positions[1], positions[apex]];
    let triangle_corners = [corners[0], corners[1], corners[apex]];

    let contains_corner = (2..len).any(|index| {
        !triangle_corners.contains(&corners[index])
            && (0..3).all(|i| {
                math::orientation(triangle[i], triangle[(i + 1) % 3], positions[index]).is_left()
            })
    });
    if contains_corner {
        return false;
    }

    let diagonals = [(0, apex), (1, apex)];
    !diagonals.iter().any(|(from, to)| {
        (0..len).any(|k| {
            let next = (k + 1) % len;
            let shares_corner = [corners[k], corners[next]]
                .iter()
                .any(|corner| *corner == corners[*from] || *corner == corners[*to]);
            !shares_corner
                && segments_cross(positions[*from], positions[*to], positions[k], positions[next])
        })
    })
}

/// Returns `true` if the segments intersect in a single point that is interior to both.
fn segments_cross(p0: Point2, p1: Point2, q0: Point2, q1: Point2) -> bool {
    let opposite = |o0: crate::Orientation, o1: crate::Orientation| {
        (o0.is_left() && o1.is_right()) || (o0.is_right() && o1.is_left())
    };
    opposite(math::orientation(p0, p1, q0), math::orientation(p0, p1, q1))
        && opposite(math::orientation(q0, q1, p0), math::orientation(q0, q1, p1))
}

/// Joins two half edges that connect the same vertices in opposite directions.
///
/// Both edges must border the same hole. The hole vanishes, one of the two edge pairs is
/// removed and the other one takes its place.
fn merge_twin_edges(dcel: &mut Dcel, e0: FixedDirectedEdgeHandle, e1: FixedDirectedEdgeHandle) {
    let is_linked = |dcel: &Dcel, edge: FixedDirectedEdgeHandle| {
        !dcel.half_edge(edge).next.is_null()
    };
    let (kept, dropped) = if is_linked(dcel, e1.rev()) {
        (e0, e1)
    } else if is_linked(dcel, e0.rev()) {
        (e1, e0)
    } else {
        warn!("Cannot close hole bounded by two unlinked edges");
        return;
    };

    let outer = *dcel.half_edge(dropped.rev());
    *dcel.half_edge_mut(kept) = outer;
    dcel.half_edge_mut(outer.next).prev = kept;
    dcel.half_edge_mut(outer.prev).next = kept;
    if dcel.faces[outer.face].adjacent_edge == dropped.rev() {
        dcel.faces[outer.face].adjacent_edge = kept;
    }

    let kept_to = origin(dcel, kept.rev());
    dcel.vertices[outer.origin].out_edge = kept;
    dcel.vertices[kept_to].out_edge = kept.rev();

    if let Some(removed) = dcel.edges.remove(dropped.as_undirected()) {
        for segment in removed.segments {
            add_segment_to_edge(dcel, kept.as_undirected(), segment);
            if let Some(entry) = dcel.segments.get_mut(segment) {
                for edge in &mut entry.edges {
                    if *edge == dropped {
                        *edge = kept.rev();
                    } else if *edge == dropped.rev() {
                        *edge = kept;
                    }
                }
            }
        }
    }
}

/// Removes a vertex and all of its adjacent edges and faces.
///
/// Returns the edges surrounding the resulting hole in counterclockwise order.
pub fn remove_vertex_star(dcel: &mut Dcel, vertex: FixedVertexHandle) -> Vec<FixedDirectedEdgeHandle> {
    let out_edges: Vec<_> = dcel.vertex(vertex).out_edges().map(|edge| edge.fix()).collect();
    let bound = out_edges.iter().map(|edge| dcel.half_edge(*edge).next).collect();
    remove_fan(dcel, vertex, &out_edges);
    bound
}

fn remove_fan(dcel: &mut Dcel, vertex: FixedVertexHandle, out_edges: &[FixedDirectedEdgeHandle]) {
    for edge in out_edges {
        let face = dcel.half_edge(*edge).face;
        dcel.faces.remove(face);
    }
    for edge in out_edges {
        dcel.edges.remove(edge.as_undirected());
    }
    dcel.remove_vertex(vertex);
}

/// The two holes left after removing a vertex lying inside of a constraint segment.
pub struct SplitHoles {
    pub holes: [(Vec<FixedDirectedEdgeHandle>, bool); 2],
}

/// Removes a vertex that lies on exactly two constrained edges and joins those edges.
///
/// Returns `None` without modifying the mesh if the vertex ends any segment or does not
/// have exactly two constrained edges.
pub fn remove_constrained_vertex(dcel: &mut Dcel, vertex: FixedVertexHandle) -> Option<SplitHoles> {
    let segments: SmallVec<[FixedSegmentHandle; 2]> =
        dcel.vertices[vertex].segments.iter().copied().collect();
    for segment in &segments {
        let end_points = dcel.segment_end_points(*segment)?;
        if end_points.contains(&vertex) {
            return None;
        }
    }

    let mut out_edges: Vec<_> = dcel.vertex(vertex).out_edges().map(|edge| edge.fix()).collect();
    let constrained: Vec<usize> = (0..out_edges.len())
        .filter(|i| dcel.edges[out_edges[*i].as_undirected()].is_constrained)
        .collect();
    if constrained.len() != 2 {
        return None;
    }
    out_edges.rotate_left(constrained[0]);
    let second = constrained[1] - constrained[0];

    let edge_a = out_edges[0];
    let edge_b = out_edges[second];
    let p = origin(dcel, edge_a.rev());
    let q = origin(dcel, edge_b.rev());
    let real_a = dcel.faces[dcel.half_edge(edge_a).face].is_real;
    let real_b = dcel.faces[dcel.half_edge(edge_b).face].is_real;

    // q -> p closes the hole between edge_a and edge_b, its twin p -> q the other one.
    let q_p = new_edge_pair(dcel, q, p, true);
    let p_q = q_p.rev();
    let merged_segments = dcel.edges[edge_a.as_undirected()].segments.clone();
    {
        let entry = &mut dcel.edges[q_p.as_undirected()];
        entry.is_constrained = true;
        entry.segments = merged_segments;
    }

    for segment in &segments {
        if let Some(entry) = dcel.segments.get_mut(*segment) {
            if let Some(index) = entry.edges.iter().position(|e| *e == edge_a) {
                // ... q -> vertex, vertex -> p ...
                entry.edges[index - 1] = q_p;
                entry.edges.remove(index);
            } else if let Some(index) = entry.edges.iter().position(|e| *e == edge_b) {
                // ... p -> vertex, vertex -> q ...
                entry.edges[index - 1] = p_q;
                entry.edges.remove(index);
            }
        }
    }

    let mut hole_a = vec![q_p];
    hole_a.extend(out_edges[..second].iter().map(|edge| dcel.half_edge(*edge).next));
    let mut hole_b = vec![p_q];
    hole_b.extend(out_edges[second..].iter().map(|edge| dcel.half_edge(*edge).next));

    remove_fan(dcel, vertex, &out_edges);

    Some(SplitHoles {
        holes: [(hole_a, real_a), (hole_b, real_b)],
    })
}
