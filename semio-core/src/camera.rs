/// Orbit camera and screen projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

const MIN_DISTANCE: f32 = 50.0;
const MAX_DISTANCE: f32 = 2000.0;
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.05;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera orbiting a target point
pub struct Camera {
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Rotation around the up axis (radians)
    pub yaw: f32,
    /// Elevation above the target's horizontal plane (radians)
    pub pitch: f32,
    pub distance: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: Point3::origin(),
            up: Vector3::new(0.0, 1.0, 0.0),
            yaw: 0.0,
            pitch: 0.0,
            distance: 450.0,
            fov: 75f32.to_radians(),
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: MAX_DISTANCE * 2.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Eye position derived from the orbit parameters
    pub fn position(&self) -> Point3<f32> {
        let offset = Vector3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        );
        self.target + offset * self.distance
    }

    /// Rotate around the target by delta angles (radians)
    pub fn orbit(&mut self, dyaw: f32, dpitch: f32) {
        self.yaw += dyaw;
        self.pitch = (self.pitch + dpitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Scale the orbit distance; `factor < 1` moves closer
    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        };
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position(), &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                // Match the perspective framing at the target distance
                let height = 2.0 * self.distance * (self.fov / 2.0).tan();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Project a 3D point to screen space.
    ///
    /// Returns `(x, y, depth)` where depth is the distance along the view
    /// direction, or `None` when the point is behind the camera or outside
    /// the viewport.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let view_point = (self.view_matrix() * model_matrix).transform_point(point);
        let depth = -view_point.z;
        if depth < self.near {
            return None;
        }

        let clip = self.projection_matrix() * view_point.to_homogeneous();
        // Prevent division by near-zero w
        if clip.w.abs() < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;

        // Clip test
        if !(-1.0..=1.0).contains(&ndc_x) || !(-1.0..=1.0).contains(&ndc_y) {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

        Some((screen_x, screen_y, depth))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert!((camera.position() - Point3::new(0.0, 0.0, 450.0)).norm() < 1e-3);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::new(800, 600);
        let view = camera.view_matrix();
        // View matrix should be non-zero
        assert!(view.norm() > 0.0);
    }

    #[test]
    fn test_target_projects_to_center() {
        for mode in [ProjectionMode::Perspective, ProjectionMode::Orthographic] {
            let mut camera = Camera::new(80, 40);
            camera.mode = mode;
            camera.orbit(0.7, 0.3);
            let (x, y, depth) = camera
                .project_to_screen(&Point3::origin(), &Matrix4::identity(), 80, 40)
                .unwrap();
            assert!((x - 40.0).abs() < 1e-3);
            assert!((y - 20.0).abs() < 1e-3);
            assert!((depth - 450.0).abs() < 1e-2);
        }
    }

    #[test]
    fn test_point_behind_camera_is_rejected() {
        let camera = Camera::new(80, 40);
        let behind = Point3::new(0.0, 0.0, 900.0);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 80, 40)
            .is_none());
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let camera = Camera::new(80, 40);
        let (_, y, _) = camera
            .project_to_screen(&Point3::new(0.0, 100.0, 0.0), &Matrix4::identity(), 80, 40)
            .unwrap();
        assert!(y < 20.0);
    }

    #[test]
    fn test_orbit_clamps_pitch_and_zoom() {
        let mut camera = Camera::default();
        camera.orbit(0.0, 10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        camera.zoom(100.0);
        assert_eq!(camera.distance, MAX_DISTANCE);
        camera.zoom(0.0);
        assert_eq!(camera.distance, MIN_DISTANCE);
    }
}
