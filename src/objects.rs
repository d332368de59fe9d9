use std::collections::VecDeque;

use hashbrown::HashSet;

use crate::delaunay_core::math;
use crate::delaunay_core::*;
use crate::{Mesh, MeshError, Point2};

/// A movable set of constraint segments.
///
/// An object stores its segments in local coordinates: `coordinates[2 * k]` and
/// `coordinates[2 * k + 1]` are the end points of the `k`-th segment. Its transformation maps
/// local coordinates into the mesh, see [transform_point](Object::transform_point).
///
/// Objects are owned by a mesh once [inserted](Mesh::insert_object). Changing an object
/// through [Mesh::object_mut] only marks it as changed, the mesh is updated by the next call
/// to [Mesh::update_objects].
///
/// # Example
/// ```
/// use cdt_mesh::{Mesh, Object, Point2};
///
/// # fn main() -> Result<(), cdt_mesh::MeshError> {
/// let mut mesh = Mesh::build_rectangle(100.0, 100.0)?;
/// let wall = Object::new(vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)]);
/// let handle = mesh.insert_object(wall);
///
/// if let Some(wall) = mesh.object_mut(handle) {
///     wall.set_translation(Point2::new(20.0, 50.0));
/// }
/// mesh.update_objects();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    coordinates: Vec<Point2>,
    pivot: Point2,
    scale: Point2,
    rotation: f64,
    translation: Point2,
    has_changed: bool,
    pub(crate) shape: Option<FixedShapeHandle>,
}

impl Object {
    /// Creates an object with an identity transformation.
    pub fn new(coordinates: Vec<Point2>) -> Self {
        Object {
            coordinates,
            pivot: Point2::new(0.0, 0.0),
            scale: Point2::new(1.0, 1.0),
            rotation: 0.0,
            translation: Point2::new(0.0, 0.0),
            has_changed: false,
            shape: None,
        }
    }

    pub fn coordinates(&self) -> &[Point2] {
        &self.coordinates
    }

    pub fn set_coordinates(&mut self, coordinates: Vec<Point2>) {
        self.coordinates = coordinates;
        self.has_changed = true;
    }

    pub fn pivot(&self) -> Point2 {
        self.pivot
    }

    pub fn set_pivot(&mut self, pivot: Point2) {
        self.pivot = pivot;
        self.has_changed = true;
    }

    pub fn scale(&self) -> Point2 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Point2) {
        self.scale = scale;
        self.has_changed = true;
    }

    /// The rotation in radians.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
        self.has_changed = true;
    }

    pub fn translation(&self) -> Point2 {
        self.translation
    }

    pub fn set_translation(&mut self, translation: Point2) {
        self.translation = translation;
        self.has_changed = true;
    }

    /// Returns `true` if the object was modified since it was last synchronized with its mesh.
    pub fn has_changed(&self) -> bool {
        self.has_changed
    }

    /// The constraint shape currently representing this object in its mesh.
    pub fn shape(&self) -> Option<FixedShapeHandle> {
        self.shape
    }

    /// Maps a point from local to mesh coordinates.
    ///
    /// The point is moved by `-pivot`, scaled, rotated around the origin and finally moved
    /// by the translation.
    pub fn transform_point(&self, point: Point2) -> Point2 {
        let local = point.sub(self.pivot);
        let scaled = Point2::new(local.x * self.scale.x, local.y * self.scale.y);
        let (sin, cos) = self.rotation.sin_cos();
        let rotated = Point2::new(
            scaled.x * cos - scaled.y * sin,
            scaled.x * sin + scaled.y * cos,
        );
        rotated.add(self.translation)
    }

    fn transformed_segments(&self) -> Vec<[Point2; 2]> {
        self.coordinates
            .chunks_exact(2)
            .map(|pair| [self.transform_point(pair[0]), self.transform_point(pair[1])])
            .collect()
    }
}

impl Mesh {
    /// Adds an object and inserts its transformed segments as one constraint shape.
    ///
    /// Segments that are clipped away or degenerate are skipped. A trailing unpaired
    /// coordinate is ignored.
    pub fn insert_object(&mut self, object: Object) -> FixedObjectHandle {
        let handle = self.objects.insert(object);
        self.attach_object(handle);
        handle
    }

    pub fn object(&self, handle: FixedObjectHandle) -> Option<&Object> {
        self.objects.get(handle)
    }

    /// Returns an object for modification.
    ///
    /// Changes take effect with the next call to [update_objects](Mesh::update_objects).
    pub fn object_mut(&mut self, handle: FixedObjectHandle) -> Option<&mut Object> {
        self.objects.get_mut(handle)
    }

    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    /// Removes an object and its constraint shape.
    pub fn delete_object(&mut self, handle: FixedObjectHandle) -> Result<Object, MeshError> {
        if !self.objects.contains_key(handle) {
            return Err(MeshError::InvalidHandle);
        }
        self.detach_object(handle)?;
        self.objects
            .remove(handle)
            .ok_or(MeshError::InvalidHandle)
    }

    /// Re-inserts all changed objects at their current transformation.
    ///
    /// A call issued while an update is already running is not executed immediately. The
    /// running update repeats its pass instead once it is done.
    pub fn update_objects(&mut self) {
        if self.objects_update_in_progress {
            self.objects_update_requested = true;
            return;
        }

        self.objects_update_in_progress = true;
        loop {
            self.objects_update_requested = false;
            let changed: Vec<_> = self
                .objects
                .iter()
                .filter(|(_, object)| object.has_changed)
                .map(|(handle, _)| handle)
                .collect();

            for handle in changed {
                // Both calls only fail for removed objects
                if self.detach_object(handle).is_ok() {
                    self.attach_object(handle);
                }
            }

            if !self.objects_update_requested {
                break;
            }
        }
        self.objects_update_in_progress = false;
    }

    fn attach_object(&mut self, handle: FixedObjectHandle) {
        let segments = match self.objects.get(handle) {
            Some(object) => object.transformed_segments(),
            None => return,
        };
        let shape = self.insert_shape_from_pairs(&segments);
        if let Some(object) = self.objects.get_mut(handle) {
            object.shape = Some(shape);
            object.has_changed = false;
        }
    }

    fn detach_object(&mut self, handle: FixedObjectHandle) -> Result<(), MeshError> {
        let object = self
            .objects
            .get_mut(handle)
            .ok_or(MeshError::InvalidHandle)?;
        match object.shape.take() {
            Some(shape) => self.delete_constraint_shape(shape),
            None => Ok(()),
        }
    }

    /// Returns `true` if a circle touches any constrained edge.
    ///
    /// Only constrained edges and their vertices block a circle, unconstrained vertices do
    /// not. Circles whose center does not lie strictly inside of the domain are reported as
    /// blocked, so are circles with a negative or NaN radius.
    pub fn is_circle_intersecting_any_constraint(&self, center: Point2, radius: f64) -> bool {
        let is_strictly_inside = center.x > 0.0
            && center.x < self.width()
            && center.y > 0.0
            && center.y < self.height();
        if !is_strictly_inside || !(radius >= 0.0) {
            return true;
        }

        let face = match self.locate_position(center) {
            PositionInMesh::OnVertex(vertex) => self.dcel.vertex(vertex).out_edge().face(),
            PositionInMesh::OnEdge(edge) => self.dcel.directed_edge(edge).face(),
            PositionInMesh::OnFace(face) => self.dcel.face(face),
            PositionInMesh::Outside => return true,
        };

        // Unconstrained vertices are no obstacles. A constrained vertex always ends a
        // constrained edge, checking it here catches circles too small to reach that edge's
        // interior.
        let radius_2 = radius * radius;
        if face.vertices().iter().any(|vertex| {
            vertex.is_constrained() && vertex.position().distance_2(center) <= radius_2
        }) {
            return true;
        }

        let mut edges_to_check: VecDeque<_> =
            face.adjacent_edges().iter().map(|edge| edge.fix()).collect();
        let mut checked_edges = HashSet::new();
        while let Some(edge) = edges_to_check.pop_front() {
            if !checked_edges.insert(edge.as_undirected()) {
                continue;
            }

            let edge = self.dcel.directed_edge(edge);
            let [from, to] = edge.positions();
            if !math::is_segment_intersecting_circle(from, to, center, radius) {
                continue;
            }
            if edge.is_constrained() {
                return true;
            }

            let next = edge.rev().next();
            edges_to_check.push_back(next.fix());
            edges_to_check.push_back(next.next().fix());
        }
        false
    }
}
