use crate::delaunay_core::math;
use crate::Point2;

const MAX_RECURSION_DEPTH: usize = 512;

/// Reduces the number of points of a polyline (Ramer-Douglas-Peucker).
///
/// A point is kept if it lies farther than `epsilon` from the chord of the range it
/// belongs to. The first and last point are always kept. Polylines with at most two points
/// and any `epsilon` smaller than `1.0` return the input unchanged.
///
/// # Example
/// ```
/// use cdt_mesh::{simplify, Point2};
///
/// let zigzag = [
///     Point2::new(0.0, 0.0),
///     Point2::new(5.0, 0.2),
///     Point2::new(10.0, 0.0),
///     Point2::new(10.0, 10.0),
/// ];
/// let simplified = simplify(&zigzag, 1.0);
/// assert_eq!(simplified, vec![zigzag[0], zigzag[2], zigzag[3]]);
/// ```
pub fn simplify(points: &[Point2], epsilon: f64) -> Vec<Point2> {
    // Also rejects NaN
    if points.len() <= 2 || !(epsilon >= 1.0) {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    let last = points.len() - 1;
    keep[0] = true;
    keep[last] = true;
    mark_kept_points(points, 0, last, epsilon * epsilon, &mut keep, 0);

    points
        .iter()
        .zip(keep)
        .filter_map(|(point, keep)| keep.then_some(*point))
        .collect()
}

fn mark_kept_points(
    points: &[Point2],
    first: usize,
    last: usize,
    epsilon_2: f64,
    keep: &mut [bool],
    depth: usize,
) {
    if last <= first + 1 {
        return;
    }
    if depth == MAX_RECURSION_DEPTH {
        keep[first..=last].fill(true);
        return;
    }

    let (chord_from, chord_to) = (points[first], points[last]);
    let mut farthest = (first, 0.0);
    for (index, point) in points.iter().enumerate().take(last).skip(first + 1) {
        let distance_2 = math::distance_squared_point_to_segment(*point, chord_from, chord_to);
        if distance_2 > farthest.1 {
            farthest = (index, distance_2);
        }
    }

    let (index, distance_2) = farthest;
    if distance_2 > epsilon_2 {
        keep[index] = true;
        mark_kept_points(points, first, index, epsilon_2, keep, depth + 1);
        mark_kept_points(points, index, last, epsilon_2, keep, depth + 1);
    }
}
