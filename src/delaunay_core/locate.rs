use std::cmp::Ordering;

use hashbrown::HashSet;
use tracing::warn;

use super::dcel::Dcel;
use super::handles::*;
use super::math::{self, TrianglePosition};
use super::rand_generator::RandGenerator;
use crate::Point2;

/// Number of walk steps after which a warning is emitted.
pub const WALK_WARNING_THRESHOLD: usize = 50;

/// Number of walk steps after which the walk gives up and reports [PositionInMesh::Outside].
pub const WALK_ITERATION_LIMIT: usize = 1000;

/// Describes the position of a point in relation to a mesh.
///
/// Returned by [Mesh::locate_position](crate::Mesh::locate_position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionInMesh {
    /// The point snaps to a vertex.
    OnVertex(FixedVertexHandle),
    /// The point snaps to an edge. The edge's left face contains the point.
    OnEdge(FixedDirectedEdgeHandle),
    /// The point lies inside of a real face.
    OnFace(FixedFaceHandle),
    /// The point lies outside of the bounding rectangle or could not be found.
    Outside,
}

/// Picks a start vertex for walking to `position`.
///
/// Draws `ceil(n^(1/3))` random vertices and returns the one closest to `position`.
fn closest_sample(dcel: &Dcel, position: Point2) -> Option<FixedVertexHandle> {
    let num_vertices = dcel.num_vertices();
    if num_vertices == 0 {
        return None;
    }
    let num_samples = ((num_vertices as f64).cbrt().ceil() as usize).max(1);
    let seed = RandGenerator::seed_from_position(position.x, position.y);
    let mut generator = RandGenerator::new(seed, 0, dcel.num_vertex_samples() as i64 - 1);

    // Slots of removed vertices are skipped, at least half of all slots are alive.
    (0..2 * num_samples)
        .filter_map(|_| dcel.sample_vertex(generator.next_in_range().max(0) as usize))
        .take(num_samples)
        .map(|vertex| (vertex, dcel.vertex(vertex).position().distance_2(position)))
        .min_by(|(_, d0), (_, d1)| d0.partial_cmp(d1).unwrap_or(Ordering::Equal))
        .map(|(vertex, _)| vertex)
}

/// Locates a position with a jump-and-walk.
///
/// Starting at a face next to a randomly sampled vertex, the walk repeatedly crosses an edge
/// that has the target on its right side. Entering a virtual face means the target lies outside
/// of the bounding rectangle.
pub(crate) fn locate(dcel: &Dcel, position: Point2) -> PositionInMesh {
    if !position.is_finite() {
        return PositionInMesh::Outside;
    }

    let start = match closest_sample(dcel, position) {
        Some(start) => start,
        None => return PositionInMesh::Outside,
    };
    match dcel.vertex(start).real_face() {
        Some(face) => walk(face, position, WALK_ITERATION_LIMIT),
        None => PositionInMesh::Outside,
    }
}

/// Walks from `face` towards `position`, giving up after `iteration_limit` steps.
fn walk(mut face: FaceHandle, position: Point2, iteration_limit: usize) -> PositionInMesh {
    let mut visited = HashSet::new();
    for iteration in 0..iteration_limit {
        if iteration == WALK_WARNING_THRESHOLD {
            warn!(
                x = position.x,
                y = position.y,
                "Point location walk exceeds {} steps",
                WALK_WARNING_THRESHOLD
            );
        }

        if !face.is_real() {
            return PositionInMesh::Outside;
        }

        let edges = face.adjacent_edges();
        match math::point_in_triangle(face.positions(), position) {
            TrianglePosition::OnVertex(i) => {
                return PositionInMesh::OnVertex(edges[i].from().fix())
            }
            TrianglePosition::OnEdge(i) => return PositionInMesh::OnEdge(edges[i].fix()),
            TrianglePosition::Inside => return PositionInMesh::OnFace(face.fix()),
            TrianglePosition::Outside => {}
        }

        // Revisiting a face means the walk runs in circles. Rotating the order in which edges
        // are tested breaks the cycle.
        let rotation = if visited.insert(face.fix()) {
            0
        } else {
            iteration % 3
        };
        let crossed = (0..3)
            .map(|i| edges[(i + rotation) % 3])
            .find(|edge| edge.side_query(position).is_right());

        face = match crossed {
            Some(edge) => edge.right_face(),
            None => return PositionInMesh::Outside,
        };
    }

    warn!(
        x = position.x,
        y = position.y,
        "Point location walk aborted after {} steps",
        iteration_limit
    );
    PositionInMesh::Outside
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::delaunay_core::dcel_operations::{self, BOUNDING_OFFSET};
    use crate::test_utilities::{count_warnings, random_points_in_range, SEED, SEED2};
    use crate::Mesh;

    fn insert(dcel: &mut Dcel, position: Point2) -> FixedVertexHandle {
        match locate(dcel, position) {
            PositionInMesh::OnFace(face) => {
                dcel_operations::insert_into_triangle(dcel, position, face)
            }
            PositionInMesh::OnEdge(edge) => {
                let [from, to] = dcel.directed_edge(edge).positions();
                let projected = math::project_orthogonally(position, from, to);
                dcel_operations::split_edge(dcel, edge, projected)
            }
            other => panic!("Unexpected location {:?}", other),
        }
    }

    #[test]
    fn test_locate_in_rectangle() {
        let (dcel, _) = dcel_operations::build_rectangle(100.0, 100.0);

        let corner = Point2::new(-BOUNDING_OFFSET, -BOUNDING_OFFSET);
        match locate(&dcel, corner) {
            PositionInMesh::OnVertex(vertex) => {
                assert_eq!(dcel.vertex(vertex).position(), corner)
            }
            other => panic!("Expected vertex, got {:?}", other),
        }

        match locate(&dcel, Point2::new(20.0, 10.0)) {
            PositionInMesh::OnFace(face) => assert!(dcel.face(face).is_real()),
            other => panic!("Expected face, got {:?}", other),
        }

        // The diagonal runs from the bottom right to the top left corner
        match locate(&dcel, Point2::new(50.0, 50.0)) {
            PositionInMesh::OnEdge(edge) => {
                let edge = dcel.directed_edge(edge);
                assert!(edge.is_real());
                assert!(!edge.is_constrained());
            }
            other => panic!("Expected edge, got {:?}", other),
        }

        assert_eq!(
            locate(&dcel, Point2::new(200.0, 50.0)),
            PositionInMesh::Outside
        );
        assert_eq!(
            locate(&dcel, Point2::new(f64::NAN, 50.0)),
            PositionInMesh::Outside
        );
    }

    #[test]
    fn test_locate_inserted_vertices() {
        let (mut dcel, _) = dcel_operations::build_rectangle(100.0, 100.0);
        let points = random_points_in_range(45.0, 300, SEED);
        let mut inserted = Vec::new();
        for point in points {
            let point = Point2::new(point.x + 50.0, point.y + 50.0);
            if let PositionInMesh::OnVertex(_) = locate(&dcel, point) {
                continue;
            }
            inserted.push((insert(&mut dcel, point), point));
        }
        dcel.sanity_check();

        for (vertex, position) in inserted {
            assert_eq!(locate(&dcel, position), PositionInMesh::OnVertex(vertex));
        }
    }

    #[test]
    fn test_locate_face_centers() {
        let (mut dcel, _) = dcel_operations::build_rectangle(100.0, 100.0);
        let points = random_points_in_range(45.0, 100, SEED2);
        for point in points {
            let point = Point2::new(point.x + 50.0, point.y + 50.0);
            if let PositionInMesh::OnVertex(_) = locate(&dcel, point) {
                continue;
            }
            insert(&mut dcel, point);
        }

        for face in iterators::FaceIterator::new(&dcel) {
            if !face.is_real() {
                continue;
            }
            let center = face.center();
            match locate(&dcel, center) {
                PositionInMesh::OnFace(found) => assert_eq!(found, face.fix()),
                // Slivers may snap their center to an edge or vertex
                PositionInMesh::OnEdge(_) | PositionInMesh::OnVertex(_) => {}
                PositionInMesh::Outside => panic!("Face center not found"),
            }
        }
    }

    fn strip() -> Mesh {
        let mut mesh = Mesh::build_rectangle(1000.0, 10.0).unwrap();
        for i in 1..200 {
            let x = i as f64 * 5.0;
            mesh.insert_vertex(Point2::new(x, 3.0)).unwrap();
            mesh.insert_vertex(Point2::new(x, 7.0)).unwrap();
        }
        mesh
    }

    fn start_face(mesh: &Mesh) -> FaceHandle {
        let first = Point2::new(5.0, 3.0);
        let (vertex, _) = mesh
            .dcel
            .vertices
            .iter()
            .find(|(_, vertex)| vertex.position == first)
            .unwrap();
        mesh.dcel.vertex(vertex).real_face().unwrap()
    }

    #[test]
    fn test_long_walk_warns_once() {
        let mesh = strip();
        let start = start_face(&mesh);
        let target = Point2::new(991.0, 4.0);

        let (found, warnings) = count_warnings(|| walk(start, target, WALK_ITERATION_LIMIT));
        match found {
            PositionInMesh::OnFace(face) => {
                let face = mesh.dcel.face(face);
                assert_eq!(
                    math::point_in_triangle(face.positions(), target),
                    TrianglePosition::Inside
                );
            }
            other => panic!("Expected face, got {:?}", other),
        }
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_walk_aborts_at_iteration_limit() {
        let mesh = strip();
        let start = start_face(&mesh);
        let target = Point2::new(991.0, 4.0);

        let (found, warnings) =
            count_warnings(|| walk(start, target, WALK_WARNING_THRESHOLD + 1));
        assert_eq!(found, PositionInMesh::Outside);
        assert_eq!(warnings, 2);
    }
}
