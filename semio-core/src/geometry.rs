/// Geometry primitives for the shape classes a sign is drawn with
use nalgebra::{Point3, Vector3};
use std::f32::consts::{PI, TAU};

use crate::sign::ShapeClass;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Flat-shaded triangle; every vertex carries the face normal
    pub fn flat(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let n = (b - a).cross(&(c - a)).normalize();
        let vertex = |p: Point3<f32>| Vertex::new(p.x, p.y, p.z, n.x, n.y, n.z);
        Self::new(vertex(a), vertex(b), vertex(c))
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }

    pub fn centroid(&self) -> Point3<f32> {
        let [a, b, c] = self.vertices.map(|v| v.position.coords);
        Point3::from((a + b + c) / 3.0)
    }
}

/// A 3D mesh composed of triangles, wound counter-clockwise seen from outside
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Mesh for a shape class, reaching about `size` from its center
    pub fn for_shape(shape: ShapeClass, size: f32) -> Self {
        match shape {
            ShapeClass::Sphere => Self::sphere(size, 16, 8),
            ShapeClass::Cone => Self::cone(size, size * 2.0, 16),
            ShapeClass::Octahedron => Self::octahedron(size),
        }
    }

    /// UV sphere around the Z axis
    pub fn sphere(radius: f32, segments: usize, rings: usize) -> Self {
        let point = |ring: usize, segment: usize| {
            let phi = PI * ring as f32 / rings as f32;
            let theta = TAU * segment as f32 / segments as f32;
            Point3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            )
        };

        let mut mesh = Self::with_capacity(segments * rings * 2);
        for ring in 0..rings {
            for segment in 0..segments {
                let p00 = point(ring, segment);
                let p01 = point(ring, segment + 1);
                let p10 = point(ring + 1, segment);
                let p11 = point(ring + 1, segment + 1);

                // The pole rows collapse one triangle of each quad
                if ring + 1 < rings {
                    mesh.add_triangle(Triangle::flat(p00, p10, p11));
                }
                if ring > 0 {
                    mesh.add_triangle(Triangle::flat(p00, p11, p01));
                }
            }
        }
        mesh
    }

    /// Cone centered on the origin, apex on +Z
    pub fn cone(radius: f32, height: f32, segments: usize) -> Self {
        let half = height / 2.0;
        let apex = Point3::new(0.0, 0.0, half);
        let base_center = Point3::new(0.0, 0.0, -half);
        let rim = |segment: usize| {
            let theta = TAU * segment as f32 / segments as f32;
            Point3::new(radius * theta.cos(), radius * theta.sin(), -half)
        };

        let mut mesh = Self::with_capacity(segments * 2);
        for segment in 0..segments {
            let a = rim(segment);
            let b = rim(segment + 1);
            mesh.add_triangle(Triangle::flat(a, b, apex));
            mesh.add_triangle(Triangle::flat(base_center, b, a));
        }
        mesh
    }

    /// Regular octahedron with vertices on the axes
    pub fn octahedron(radius: f32) -> Self {
        let mut mesh = Self::with_capacity(8);
        for sx in [1.0f32, -1.0] {
            for sy in [1.0f32, -1.0] {
                for sz in [1.0f32, -1.0] {
                    let a = Point3::new(sx * radius, 0.0, 0.0);
                    let b = Point3::new(0.0, sy * radius, 0.0);
                    let c = Point3::new(0.0, 0.0, sz * radius);
                    if sx * sy * sz > 0.0 {
                        mesh.add_triangle(Triangle::flat(a, b, c));
                    } else {
                        mesh.add_triangle(Triangle::flat(a, c, b));
                    }
                }
            }
        }
        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(mesh: &Mesh) {
        for triangle in &mesh.triangles {
            let normal = triangle.calculate_normal();
            assert!(normal.iter().all(|c| c.is_finite()), "degenerate triangle");
            assert!(normal.dot(&triangle.centroid().coords) > 0.0);
        }
    }

    #[test]
    fn test_shape_meshes_are_closed_outward() {
        for shape in [ShapeClass::Sphere, ShapeClass::Cone, ShapeClass::Octahedron] {
            let mesh = Mesh::for_shape(shape, 10.0);
            assert!(!mesh.triangles.is_empty());
            assert_outward(&mesh);
        }
    }

    #[test]
    fn test_triangle_counts() {
        assert_eq!(Mesh::octahedron(1.0).triangles.len(), 8);
        assert_eq!(Mesh::cone(1.0, 2.0, 12).triangles.len(), 24);
        // Two triangles per quad minus one per segment at each pole
        assert_eq!(Mesh::sphere(1.0, 16, 8).triangles.len(), 16 * 8 * 2 - 32);
    }

    #[test]
    fn test_sphere_vertices_on_radius() {
        let mesh = Mesh::sphere(10.0, 12, 6);
        for triangle in &mesh.triangles {
            for vertex in &triangle.vertices {
                assert!((vertex.position.coords.norm() - 10.0).abs() < 1e-3);
            }
        }
    }
}
