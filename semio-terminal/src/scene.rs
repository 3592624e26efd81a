/// Scene objects kept in step with the point store
use nalgebra::{Matrix4, Point3};
use std::collections::HashMap;

use semio_core::{Appearance, Mesh, PointId, RenderSync, Rgb, ShapeClass, Transform};

/// Radius of the sphere every shape fits in, in world units
pub const OBJECT_SIZE: f32 = 10.0;

/// Visual state of one point
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub position: Point3<f32>,
    pub model: Matrix4<f32>,
    pub color: Rgb,
    pub shape: ShapeClass,
}

impl SceneObject {
    fn from_appearance(appearance: &Appearance) -> Self {
        Self {
            position: appearance.position,
            model: Transform::model_matrix(&appearance.position, &appearance.orientation, 1.0),
            color: appearance.color,
            shape: appearance.shape,
        }
    }
}

/// Render sync for the terminal: one object per point, one shared mesh per
/// shape class.
pub struct SceneSync {
    objects: HashMap<PointId, SceneObject>,
    meshes: HashMap<ShapeClass, Mesh>,
    selected: Option<PointId>,
    geometry_swaps: usize,
}

impl SceneSync {
    pub fn new() -> Self {
        let meshes = [ShapeClass::Sphere, ShapeClass::Cone, ShapeClass::Octahedron]
            .into_iter()
            .map(|shape| (shape, Mesh::for_shape(shape, OBJECT_SIZE)))
            .collect();
        Self {
            objects: HashMap::new(),
            meshes,
            selected: None,
            geometry_swaps: 0,
        }
    }

    pub fn object(&self, id: PointId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    /// Every object with the mesh it is drawn with
    pub fn iter(&self) -> impl Iterator<Item = (PointId, &SceneObject, &Mesh)> {
        self.objects.iter().filter_map(|(id, object)| {
            self.meshes.get(&object.shape).map(|mesh| (*id, object, mesh))
        })
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn selected(&self) -> Option<PointId> {
        self.selected
    }

    /// Number of geometry swaps performed so far
    pub fn geometry_swaps(&self) -> usize {
        self.geometry_swaps
    }
}

impl Default for SceneSync {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSync for SceneSync {
    fn on_create(&mut self, id: PointId, appearance: &Appearance) {
        self.objects.insert(id, SceneObject::from_appearance(appearance));
    }

    fn on_destroy(&mut self, id: PointId) {
        self.objects.remove(&id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    fn on_update(&mut self, id: PointId, appearance: &Appearance, shape_class_changed: bool) {
        let Some(object) = self.objects.get_mut(&id) else {
            tracing::warn!(%id, "update for an object the scene never created");
            return;
        };
        let updated = SceneObject::from_appearance(appearance);
        object.position = updated.position;
        object.model = updated.model;
        object.color = updated.color;
        if shape_class_changed {
            object.shape = updated.shape;
            self.geometry_swaps += 1;
        }
    }

    fn on_selection_change(&mut self, selected: Option<PointId>) {
        self.selected = selected;
    }
}
