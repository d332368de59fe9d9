use smallvec::SmallVec;

use crate::{Orientation, Point2};

/// Snapping tolerance used by all epsilon aware predicates.
///
/// Positions closer than this to a vertex or an edge are treated as lying on it.
pub const EPSILON: f64 = 0.01;

/// The square of [EPSILON]. Most predicates compare squared distances against this value.
pub const EPSILON_SQUARED: f64 = EPSILON * EPSILON;

/// An intersection of two segments (or lines).
///
/// Created by [intersections_2_segments].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentIntersection {
    /// The intersection point.
    pub point: Point2,
    /// The parameters of the intersection along both inputs. `0.0` marks the first point of
    /// an input, `1.0` its second point.
    pub t: [f64; 2],
}

/// The result of classifying a point against a single triangle.
///
/// Indices refer to the triangle's vertices in the order they were given. Edge `i` connects
/// vertex `i` with vertex `(i + 1) % 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrianglePosition {
    /// The point lies outside of the triangle.
    Outside,
    /// The point snaps to a vertex.
    OnVertex(usize),
    /// The point snaps to an edge.
    OnEdge(usize),
    /// The point lies in the triangle's interior.
    Inside,
}

#[inline]
fn cross(a: Point2, b: Point2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Returns on which side of the directed line `from -> to` a point lies.
///
/// The sign is computed with an adaptive precision determinant.
pub fn orientation(from: Point2, to: Point2, query_point: Point2) -> Orientation {
    let result = robust::orient2d(from.to_robust(), to.to_robust(), query_point.to_robust());
    Orientation::from_determinant(result)
}

/// Like [orientation] but reports [Orientation::Straight] for any point closer than [EPSILON]
/// to the line.
pub fn orientation_with_epsilon(from: Point2, to: Point2, query_point: Point2) -> Orientation {
    if distance_squared_point_to_line(query_point, from, to) <= EPSILON_SQUARED {
        Orientation::Straight
    } else {
        orientation(from, to, query_point)
    }
}

/// Squared distance of a point to the infinite line through `from` and `to`.
pub fn distance_squared_point_to_line(query_point: Point2, from: Point2, to: Point2) -> f64 {
    let dir = to.sub(from);
    let length_2 = dir.length2();
    let diff = query_point.sub(from);
    if length_2 == 0.0 {
        return diff.length2();
    }
    let dot = diff.dot(dir);
    (diff.length2() - dot * dot / length_2).max(0.0)
}

/// Returns the point on the segment `from -> to` closest to `query_point`.
pub fn nearest_point(from: Point2, to: Point2, query_point: Point2) -> Point2 {
    let dir = to.sub(from);
    let length_2 = dir.length2();
    if length_2 == 0.0 {
        return from;
    }
    let factor = query_point.sub(from).dot(dir) / length_2;
    if factor <= 0.0 {
        from
    } else if factor >= 1.0 {
        to
    } else {
        from.add(dir.mul(factor))
    }
}

/// Squared distance of a point to the segment `from -> to`.
pub fn distance_squared_point_to_segment(query_point: Point2, from: Point2, to: Point2) -> f64 {
    query_point.distance_2(nearest_point(from, to, query_point))
}

/// Projects a point onto the infinite line through `from` and `to`.
pub fn project_orthogonally(query_point: Point2, from: Point2, to: Point2) -> Point2 {
    let dir = to.sub(from);
    let length_2 = dir.length2();
    if length_2 == 0.0 {
        return from;
    }
    let factor = query_point.sub(from).dot(dir) / length_2;
    from.add(dir.mul(factor))
}

/// Calculates the circumcenter of a triangle and its squared radius.
///
/// Returns `None` if the three points are collinear.
pub fn circumcenter(positions: [Point2; 3]) -> Option<(Point2, f64)> {
    let [v0, v1, v2] = positions;
    let b = v1.sub(v0);
    let c = v2.sub(v0);

    let d = 2.0 * cross(b, c);
    if d == 0.0 {
        return None;
    }
    let len_b = b.dot(b);
    let len_c = c.dot(c);
    let d_inv = 1.0 / d;

    let x = (len_b * c.y - len_c * b.y) * d_inv;
    let y = (-len_b * c.x + len_c * b.x) * d_inv;
    let result = Point2::new(x, y);
    Some((result.add(v0), x * x + y * y))
}

/// Delaunay test for the edge `left -> right`.
///
/// `corner` is the apex of the triangle left of the edge, `opposite` the apex of the triangle
/// on its right side. Returns `true` if `opposite` lies outside of or on the circumcircle of
/// `corner`, `left` and `right`. Degenerate (collinear) triangles count as Delaunay.
pub fn is_delaunay(left: Point2, right: Point2, corner: Point2, opposite: Point2) -> bool {
    match circumcenter([corner, left, right]) {
        Some((center, radius_2)) => opposite.distance_2(center) >= radius_2,
        None => true,
    }
}

/// Returns `true` if `query_point` lies strictly inside of the circle through `v0`, `v1` and `v2`
/// shrunk by [EPSILON_SQUARED].
pub(crate) fn contained_in_circumference(positions: [Point2; 3], query_point: Point2) -> bool {
    match circumcenter(positions) {
        Some((center, radius_2)) => query_point.distance_2(center) < radius_2 - EPSILON_SQUARED,
        None => false,
    }
}

/// Classifies a point against a counterclockwise triangle.
///
/// The point must lie left of or on all three edges. It then snaps to a vertex if it is close
/// to that vertex or to both edges adjacent to it, or to an edge if it is close to that edge.
pub fn point_in_triangle(vertices: [Point2; 3], query_point: Point2) -> TrianglePosition {
    for i in 0..3 {
        let from = vertices[i];
        let to = vertices[(i + 1) % 3];
        if orientation(from, to, query_point).is_right() {
            return TrianglePosition::Outside;
        }
    }

    let nearest_vertex = (0..3)
        .filter(|i| vertices[*i].distance_2(query_point) <= EPSILON_SQUARED)
        .min_by(|i, j| {
            let d_i = vertices[*i].distance_2(query_point);
            let d_j = vertices[*j].distance_2(query_point);
            d_i.partial_cmp(&d_j).unwrap_or(core::cmp::Ordering::Equal)
        });
    if let Some(i) = nearest_vertex {
        return TrianglePosition::OnVertex(i);
    }

    let close = |i: usize| {
        distance_squared_point_to_line(query_point, vertices[i], vertices[(i + 1) % 3])
            <= EPSILON_SQUARED
    };
    let (close_01, close_12, close_20) = (close(0), close(1), close(2));

    match (close_01, close_12, close_20) {
        (true, _, true) => TrianglePosition::OnVertex(0),
        (true, true, _) => TrianglePosition::OnVertex(1),
        (true, false, false) => TrianglePosition::OnEdge(0),
        (false, true, true) => TrianglePosition::OnVertex(2),
        (false, true, false) => TrianglePosition::OnEdge(1),
        (false, false, true) => TrianglePosition::OnEdge(2),
        (false, false, false) => TrianglePosition::Inside,
    }
}

/// Intersects the segment `s0_from -> s0_to` with the segment `s1_from -> s1_to`.
///
/// Returns `None` for parallel inputs. Unless `infinite_line_mode` is set, intersections
/// outside of either segment are rejected.
pub fn intersections_2_segments(
    s0_from: Point2,
    s0_to: Point2,
    s1_from: Point2,
    s1_to: Point2,
    infinite_line_mode: bool,
) -> Option<SegmentIntersection> {
    let r = s0_to.sub(s0_from);
    let s = s1_to.sub(s1_from);
    let divisor = cross(r, s);
    if divisor == 0.0 {
        return None;
    }

    let diff = s1_from.sub(s0_from);
    let t0 = cross(diff, s) / divisor;
    let t1 = cross(diff, r) / divisor;

    if !infinite_line_mode && !((0.0..=1.0).contains(&t0) && (0.0..=1.0).contains(&t1)) {
        return None;
    }

    Some(SegmentIntersection {
        point: s0_from.add(r.mul(t0)),
        t: [t0, t1],
    })
}

fn circle_intersections(
    from: Point2,
    to: Point2,
    center: Point2,
    radius: f64,
    infinite_line_mode: bool,
) -> SmallVec<[(Point2, f64); 2]> {
    let mut result = SmallVec::new();
    let dir = to.sub(from);
    let f = from.sub(center);
    let a = dir.length2();
    if a == 0.0 {
        return result;
    }
    let b = 2.0 * f.dot(dir);
    let c = f.length2() - radius * radius;
    let delta = b * b - 4.0 * a * c;

    let mut push = |t: f64| {
        if infinite_line_mode || (0.0..=1.0).contains(&t) {
            result.push((from.add(dir.mul(t)), t));
        }
    };

    if delta < 0.0 {
        // No intersection
    } else if delta == 0.0 {
        push(-b / (2.0 * a));
    } else {
        let root = delta.sqrt();
        push((-b - root) / (2.0 * a));
        push((-b + root) / (2.0 * a));
    }
    result
}

/// Intersects a segment with a circle.
///
/// Returns up to two `(point, t)` pairs where `t` is the parameter along the segment.
pub fn intersections_segment_circle(
    from: Point2,
    to: Point2,
    center: Point2,
    radius: f64,
) -> SmallVec<[(Point2, f64); 2]> {
    circle_intersections(from, to, center, radius, false)
}

/// Intersects the infinite line through `from` and `to` with a circle.
pub fn intersections_line_circle(
    from: Point2,
    to: Point2,
    center: Point2,
    radius: f64,
) -> SmallVec<[(Point2, f64); 2]> {
    circle_intersections(from, to, center, radius, true)
}

/// Returns `true` if the closed disc touches the segment, either by crossing its boundary
/// or by containing the segment entirely.
pub fn is_segment_intersecting_circle(from: Point2, to: Point2, center: Point2, radius: f64) -> bool {
    from.distance_2(center) <= radius * radius
        || !intersections_segment_circle(from, to, center, radius).is_empty()
}

/// Intersects two circles.
///
/// Returns `None` if the circles are concentric, separate or nested.
pub fn intersections_2_circles(
    c0: Point2,
    r0: f64,
    c1: Point2,
    r1: f64,
) -> Option<[Point2; 2]> {
    let distance_2 = c0.distance_2(c1);
    let distance = distance_2.sqrt();
    if distance == 0.0 || distance > r0 + r1 || distance < (r0 - r1).abs() {
        return None;
    }

    let a = (r0 * r0 - r1 * r1 + distance_2) / (2.0 * distance);
    let h = (r0 * r0 - a * a).max(0.0).sqrt();
    let dir = c1.sub(c0);
    let base = c0.add(dir.mul(a / distance));
    let offset = Point2::new(-dir.y * h / distance, dir.x * h / distance);
    Some([base.add(offset), base.sub(offset)])
}

/// Returns the points where the two tangents through `point` touch a circle.
///
/// Returns `None` if `point` lies inside of the circle.
pub fn tangents_point_to_circle(point: Point2, center: Point2, radius: f64) -> Option<[Point2; 2]> {
    // Both tangent points see `point` and `center` at a right angle
    let thales_center = point.add(center).mul(0.5);
    let thales_radius = 0.5 * point.distance_2(center).sqrt();
    intersections_2_circles(thales_center, thales_radius, center, radius)
}

/// Returns the tangents crossing between two circles of the same radius.
///
/// The result is `[a0, a1, b0, b1]`: tangent points on the first circle followed by those on
/// the second one. One tangent runs from `a0` to `b0`, the other one from `a1` to `b1`.
/// Returns `None` if the circles touch or overlap.
pub fn tangents_cross_circle_to_circle(
    radius: f64,
    c0: Point2,
    c1: Point2,
) -> Option<[Point2; 4]> {
    let distance = c0.distance_2(c1).sqrt();
    if radius >= distance / 2.0 {
        return None;
    }

    // Crossing tangents pass through the middle of both centers
    let middle = c0.add(c1).mul(0.5);
    let [a0, a1] = tangents_point_to_circle(middle, c0, radius)?;
    let [b0, b1] = [a0, a1].map(|point| middle.mul(2.0).sub(point));
    Some([a0, a1, b0, b1])
}

/// Returns the two outer tangents of two circles of the same radius.
///
/// The result is `[a0, a1, b0, b1]` with the same layout as
/// [tangents_cross_circle_to_circle]. Returns `None` if the circles are concentric.
pub fn tangents_paral_circle_to_circle(
    radius: f64,
    c0: Point2,
    c1: Point2,
) -> Option<[Point2; 4]> {
    let distance = c0.distance_2(c1).sqrt();
    if distance == 0.0 {
        return None;
    }

    let dir = c1.sub(c0);
    let normal = Point2::new(dir.y, -dir.x).mul(radius / distance);
    let a0 = c0.add(normal);
    let a1 = c0.sub(normal);
    Some([a0, a1, a0.add(dir), a1.add(dir)])
}

/// Clips a segment against a triangle of any orientation.
///
/// Returns the part of the segment lying inside the triangle or `None` if there is no such
/// part or the triangle is degenerate.
pub fn clip_segment_by_triangle(
    from: Point2,
    to: Point2,
    triangle: [Point2; 3],
) -> Option<[Point2; 2]> {
    let [v0, mut v1, mut v2] = triangle;
    match orientation(v0, v1, v2) {
        Orientation::Straight => return None,
        Orientation::Right => core::mem::swap(&mut v1, &mut v2),
        Orientation::Left => {}
    }

    let dir = to.sub(from);
    let (mut t_min, mut t_max) = (0.0f64, 1.0f64);
    for (edge_from, edge_to) in [(v0, v1), (v1, v2), (v2, v0)] {
        let edge = edge_to.sub(edge_from);
        // Distance to the edge's line along the segment: f(t) = f0 + t * df
        let f0 = cross(edge, from.sub(edge_from));
        let df = cross(edge, dir);
        if df == 0.0 {
            if f0 < 0.0 {
                return None;
            }
            continue;
        }
        let t = -f0 / df;
        if df > 0.0 {
            t_min = t_min.max(t);
        } else {
            t_max = t_max.min(t);
        }
        if t_min > t_max {
            return None;
        }
    }

    Some([from.add(dir.mul(t_min)), from.add(dir.mul(t_max))])
}

/// Returns `true` if any part of the segment lies inside of or on the triangle.
pub fn is_segment_intersecting_triangle(from: Point2, to: Point2, triangle: [Point2; 3]) -> bool {
    clip_segment_by_triangle(from, to, triangle).is_some()
}

/// Clips a segment to the axis aligned rectangle `[min, max]` (Liang-Barsky).
pub fn clip_segment_by_rect(
    from: Point2,
    to: Point2,
    min: Point2,
    max: Point2,
) -> Option<[Point2; 2]> {
    let dir = to.sub(from);
    let (mut t_min, mut t_max) = (0.0f64, 1.0f64);
    let checks = [
        (-dir.x, from.x - min.x),
        (dir.x, max.x - from.x),
        (-dir.y, from.y - min.y),
        (dir.y, max.y - from.y),
    ];

    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t_min = t_min.max(r);
        } else {
            t_max = t_max.min(r);
        }
        if t_min > t_max {
            return None;
        }
    }

    let clipped_from = if t_min > 0.0 {
        from.add(dir.mul(t_min))
    } else {
        from
    };
    let clipped_to = if t_max < 1.0 {
        from.add(dir.mul(t_max))
    } else {
        to
    };
    Some([clipped_from, clipped_to])
}

/// Returns `true` if the quadrilateral `a, b, c, d` (in counterclockwise order) is strictly
/// convex.
pub fn is_convex_quad(a: Point2, b: Point2, c: Point2, d: Point2) -> bool {
    orientation(a, b, c).is_left()
        && orientation(b, c, d).is_left()
        && orientation(c, d, a).is_left()
        && orientation(d, a, b).is_left()
}

/// Sum of the lengths of all segments of a polyline.
pub fn path_length(path: &[Point2]) -> f64 {
    path.windows(2)
        .map(|pair| pair[0].distance_2(pair[1]).sqrt())
        .sum()
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orientation() {
        let from = Point2::new(0.0, 0.0);
        let to = Point2::new(10.0, 0.0);
        assert_eq!(orientation(from, to, Point2::new(5.0, 1.0)), Orientation::Left);
        assert_eq!(orientation(from, to, Point2::new(5.0, -1.0)), Orientation::Right);
        assert_eq!(orientation(from, to, Point2::new(20.0, 0.0)), Orientation::Straight);

        let near = Point2::new(5.0, 0.005);
        assert_eq!(orientation(from, to, near), Orientation::Left);
        assert_eq!(orientation_with_epsilon(from, to, near), Orientation::Straight);
        assert_eq!(
            orientation_with_epsilon(from, to, Point2::new(5.0, -0.5)),
            Orientation::Right
        );
    }

    #[test]
    fn test_distances() {
        let from = Point2::new(0.0, 0.0);
        let to = Point2::new(4.0, 0.0);
        assert_relative_eq!(distance_squared_point_to_line(Point2::new(8.0, 3.0), from, to), 9.0);
        assert_relative_eq!(
            distance_squared_point_to_segment(Point2::new(8.0, 3.0), from, to),
            25.0
        );
        assert_relative_eq!(
            distance_squared_point_to_segment(Point2::new(2.0, -2.0), from, to),
            4.0
        );
        assert_eq!(
            project_orthogonally(Point2::new(3.0, 7.0), from, to),
            Point2::new(3.0, 0.0)
        );
    }

    #[test]
    fn test_circumcenter() {
        let (center, radius_2) = circumcenter([
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
        ])
        .unwrap();
        assert_relative_eq!(center.x, 1.0);
        assert_relative_eq!(center.y, 1.0);
        assert_relative_eq!(radius_2, 2.0);

        let collinear = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
        ];
        assert!(circumcenter(collinear).is_none());
    }

    #[test]
    fn test_is_delaunay() {
        let left = Point2::new(0.0, 0.0);
        let right = Point2::new(2.0, 0.0);
        let corner = Point2::new(1.0, 1.0);
        // The circumcircle is centered at (1, 0) with radius 1
        assert!(is_delaunay(left, right, corner, Point2::new(1.0, -2.0)));
        assert!(is_delaunay(left, right, corner, Point2::new(1.0, -1.0)));
        assert!(!is_delaunay(left, right, corner, Point2::new(1.0, -0.5)));
    }

    #[test]
    fn test_point_in_triangle() {
        let triangle = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
        ];
        assert_eq!(
            point_in_triangle(triangle, Point2::new(2.0, 2.0)),
            TrianglePosition::Inside
        );
        assert_eq!(
            point_in_triangle(triangle, Point2::new(20.0, 2.0)),
            TrianglePosition::Outside
        );
        assert_eq!(
            point_in_triangle(triangle, Point2::new(5.0, 0.001)),
            TrianglePosition::OnEdge(0)
        );
        assert_eq!(
            point_in_triangle(triangle, Point2::new(5.0, 5.0)),
            TrianglePosition::OnEdge(1)
        );
        assert_eq!(
            point_in_triangle(triangle, Point2::new(0.0, 3.0)),
            TrianglePosition::OnEdge(2)
        );
        assert_eq!(
            point_in_triangle(triangle, Point2::new(0.001, 0.001)),
            TrianglePosition::OnVertex(0)
        );
        assert_eq!(
            point_in_triangle(triangle, Point2::new(10.0, 0.0)),
            TrianglePosition::OnVertex(1)
        );
        assert_eq!(
            point_in_triangle(triangle, Point2::new(0.0, 10.0)),
            TrianglePosition::OnVertex(2)
        );
    }

    #[test]
    fn test_segment_intersections() {
        let result = intersections_2_segments(
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(1.0, -1.0),
            Point2::new(1.0, 3.0),
            false,
        )
        .unwrap();
        assert_relative_eq!(result.point.x, 1.0);
        assert_relative_eq!(result.point.y, 0.0);
        assert_relative_eq!(result.t[0], 0.5);
        assert_relative_eq!(result.t[1], 0.25);

        let miss = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(3.0, -1.0),
            Point2::new(3.0, 1.0),
        ];
        assert!(intersections_2_segments(miss[0], miss[1], miss[2], miss[3], false).is_none());
        let line = intersections_2_segments(miss[0], miss[1], miss[2], miss[3], true).unwrap();
        assert_relative_eq!(line.t[0], 1.5);

        let parallel = intersections_2_segments(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            true,
        );
        assert!(parallel.is_none());
    }

    #[test]
    fn test_circle_intersections() {
        let center = Point2::new(0.0, 0.0);
        let hits = intersections_segment_circle(
            Point2::new(-2.0, 0.0),
            Point2::new(2.0, 0.0),
            center,
            1.0,
        );
        assert_eq!(hits.len(), 2);
        assert_relative_eq!(hits[0].0.x, -1.0);
        assert_relative_eq!(hits[0].1, 0.25);
        assert_relative_eq!(hits[1].0.x, 1.0);

        let inside = [Point2::new(-0.5, 0.0), Point2::new(0.5, 0.0)];
        assert!(intersections_segment_circle(inside[0], inside[1], center, 1.0).is_empty());
        assert_eq!(
            intersections_line_circle(inside[0], inside[1], center, 1.0).len(),
            2
        );
        assert!(is_segment_intersecting_circle(inside[0], inside[1], center, 1.0));
        assert!(!is_segment_intersecting_circle(
            Point2::new(-2.0, 3.0),
            Point2::new(2.0, 3.0),
            center,
            1.0
        ));

        let [a, b] =
            intersections_2_circles(center, 1.0, Point2::new(1.0, 0.0), 1.0).unwrap();
        assert_relative_eq!(a.x, 0.5);
        assert_relative_eq!(b.x, 0.5);
        assert_relative_eq!(a.y, -b.y);
        assert!(intersections_2_circles(center, 1.0, Point2::new(5.0, 0.0), 1.0).is_none());
        assert!(intersections_2_circles(center, 3.0, Point2::new(0.5, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_clip_segment_by_triangle() {
        let triangle = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 4.0),
            Point2::new(4.0, 0.0),
        ];
        let [from, to] =
            clip_segment_by_triangle(Point2::new(-1.0, 1.0), Point2::new(5.0, 1.0), triangle)
                .unwrap();
        assert_relative_eq!(from.x, 0.0);
        assert_relative_eq!(to.x, 3.0);
        assert_relative_eq!(to.y, 1.0);

        assert!(!is_segment_intersecting_triangle(
            Point2::new(5.0, 5.0),
            Point2::new(6.0, 5.0),
            triangle
        ));
        assert!(is_segment_intersecting_triangle(
            Point2::new(0.5, 0.5),
            Point2::new(1.0, 1.0),
            triangle
        ));
    }

    #[test]
    fn test_clip_segment_by_rect() {
        let min = Point2::new(0.0, 0.0);
        let max = Point2::new(10.0, 10.0);
        let [from, to] =
            clip_segment_by_rect(Point2::new(-5.0, 5.0), Point2::new(15.0, 5.0), min, max)
                .unwrap();
        assert_eq!(from, Point2::new(0.0, 5.0));
        assert_eq!(to, Point2::new(10.0, 5.0));

        let untouched = clip_segment_by_rect(Point2::new(1.0, 1.0), Point2::new(2.0, 3.0), min, max);
        assert_eq!(untouched, Some([Point2::new(1.0, 1.0), Point2::new(2.0, 3.0)]));

        assert!(clip_segment_by_rect(Point2::new(-5.0, -1.0), Point2::new(5.0, -1.0), min, max)
            .is_none());
    }

    #[test]
    fn test_is_convex_quad_and_path_length() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, 0.0);
        let c = Point2::new(2.0, 2.0);
        let d = Point2::new(0.0, 2.0);
        assert!(is_convex_quad(a, b, c, d));
        assert!(!is_convex_quad(a, b, Point2::new(0.5, 0.5), d));
        assert_relative_eq!(path_length(&[a, b, c, d]), 6.0);
        assert_relative_eq!(path_length(&[a]), 0.0);
    }

    #[test]
    fn test_tangents_point_to_circle() {
        let center = Point2::new(0.0, 0.0);
        let point = Point2::new(2.0, 0.0);
        let tangents = tangents_point_to_circle(point, center, 1.0).unwrap();
        for tangent in tangents {
            assert_relative_eq!(tangent.x, 0.5, epsilon = 1e-12);
            assert_relative_eq!(tangent.y.abs(), 0.75f64.sqrt(), epsilon = 1e-12);
            assert_relative_eq!(tangent.sub(center).dot(tangent.sub(point)), 0.0, epsilon = 1e-12);
        }
        assert_ne!(tangents[0], tangents[1]);

        assert!(tangents_point_to_circle(Point2::new(0.5, 0.0), center, 1.0).is_none());
    }

    #[test]
    fn test_tangents_cross_circle_to_circle() {
        let c0 = Point2::new(0.0, 0.0);
        let c1 = Point2::new(10.0, 0.0);
        let [a0, a1, b0, b1] = tangents_cross_circle_to_circle(1.0, c0, c1).unwrap();

        for point in [a0, a1] {
            assert_relative_eq!(point.distance_2(c0), 1.0, epsilon = 1e-9);
        }
        for point in [b0, b1] {
            assert_relative_eq!(point.distance_2(c1), 1.0, epsilon = 1e-9);
        }
        // Both tangents cross at the middle, on opposite sides of the center line
        for [a, b] in [[a0, b0], [a1, b1]] {
            let middle = a.add(b).mul(0.5);
            assert_relative_eq!(middle.x, 5.0, epsilon = 1e-9);
            assert_relative_eq!(middle.y, 0.0, epsilon = 1e-9);
            assert!(a.y * b.y < 0.0);
        }

        assert!(tangents_cross_circle_to_circle(1.0, c0, Point2::new(1.5, 0.0)).is_none());
        assert!(tangents_cross_circle_to_circle(1.0, c0, Point2::new(2.0, 0.0)).is_none());
    }

    #[test]
    fn test_tangents_paral_circle_to_circle() {
        let c0 = Point2::new(0.0, 0.0);
        let c1 = Point2::new(10.0, 0.0);
        let tangents = tangents_paral_circle_to_circle(2.0, c0, c1).unwrap();
        assert_eq!(
            tangents,
            [
                Point2::new(0.0, -2.0),
                Point2::new(0.0, 2.0),
                Point2::new(10.0, -2.0),
                Point2::new(10.0, 2.0),
            ]
        );
        assert!(tangents_paral_circle_to_circle(2.0, c0, c0).is_none());
    }
}
