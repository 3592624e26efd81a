/// 3D transformation matrices and orientation state
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Euler orientation around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Orientation {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from an orientation
    pub fn rotation_matrix(orientation: &Orientation) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(orientation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, orientation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, orientation.z));

        // Apply rotations in order: X, Y, Z
        rz * ry * rx
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a uniform scale matrix
    pub fn scale_matrix(s: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(s)
    }

    /// Model matrix placing an object: scale, then orient, then translate
    pub fn model_matrix(position: &Point3<f32>, orientation: &Orientation, scale: f32) -> Matrix4<f32> {
        Self::translation_matrix(position.x, position.y, position.z)
            * Self::rotation_matrix(orientation)
            * Self::scale_matrix(scale)
    }
}
