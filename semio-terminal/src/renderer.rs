/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;
use semio_core::{Camera, Mesh, Rgb, Triangle};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Light floor so dark or unlit faces stay visible
const AMBIENT: f32 = 0.3;

/// Material of the selected object
pub const SELECTED_COLOR: Rgb = Rgb::new(0.98, 0.8, 0.08);

/// ASCII renderer that converts 3D meshes to colored terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Rgb>,
    light_dir: Vector3<f32>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Rgb::BLACK; size],
            // Key light above, right of and in front of the scene
            light_dir: Vector3::new(150.0, 200.0, 300.0).normalize(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Rgb::BLACK);
    }

    /// Character and color currently stored in a cell
    pub fn cell(&self, x: usize, y: usize) -> Option<(char, Rgb)> {
        (x < self.width && y < self.height).then(|| {
            let idx = y * self.width + x;
            (self.char_buffer[idx], self.color_buffer[idx])
        })
    }

    pub fn render_mesh(&mut self, mesh: &Mesh, model_matrix: &Matrix4<f32>, camera: &Camera, color: Rgb) {
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, model_matrix, camera, color);
        }
    }

    /// Plot a single world-space point, depth tested
    pub fn plot(&mut self, point: &Point3<f32>, camera: &Camera, character: char, color: Rgb) {
        let Some((x, y, depth)) =
            camera.project_to_screen(point, &Matrix4::identity(), self.width as u32, self.height as u32)
        else {
            return;
        };
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y * self.width + x;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
            self.color_buffer[idx] = color;
        }
    }

    fn render_triangle(&mut self, triangle: &Triangle, model_matrix: &Matrix4<f32>, camera: &Camera, color: Rgb) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(
                &vertex.position,
                model_matrix,
                self.width as u32,
                self.height as u32,
            ) {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        // Lambert shading with the face normal in world space
        let normal = model_matrix.transform_vector(&triangle.calculate_normal());
        let normal = normal.try_normalize(1e-6).unwrap_or(normal);
        let brightness = AMBIENT + (1.0 - AMBIENT) * normal.dot(&self.light_dir).max(0.0);

        // Map brightness to character
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);
        let character = LUMINOSITY_RAMP[char_index];

        // Rasterize triangle using scanline algorithm
        self.rasterize_triangle(&screen_coords, character, color.scale(brightness).clamped());
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char, color: Rgb) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) = barycentric(
                    (v0.0, v0.1),
                    (v1.0, v1.1),
                    (v2.0, v2.1),
                    (px, py),
                ) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = character;
                            self.color_buffer[idx] = color;
                        }
                    }
                }
            }
        }
    }

    /// Write the frame starting at terminal cell (`left`, `top`)
    pub fn draw<W: Write>(&self, writer: &mut W, left: u16, top: u16) -> std::io::Result<()> {
        let mut current: Option<Rgb> = None;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(left, top + y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let c = self.char_buffer[idx];
                let color = self.color_buffer[idx];

                if c != ' ' && current != Some(color) {
                    let (r, g, b) = color.to_u8();
                    writer.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
                    current = Some(color);
                }
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use semio_core::Transform;

    #[test]
    fn test_barycentric_degenerate() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
        let (w0, w1, w2) = barycentric((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (1.0, 1.0)).unwrap();
        assert!((w0 + w1 + w2 - 1.0).abs() < 1e-6);
        assert!(w0 > 0.0 && w1 > 0.0 && w2 > 0.0);
    }

    #[test]
    fn test_mesh_lands_in_center_with_its_color() {
        let camera = Camera::new(80, 40);
        let mut renderer = AsciiRenderer::new(80, 40);
        let mesh = Mesh::octahedron(40.0);
        let red = Rgb::from_hex(0xff0000);

        renderer.render_mesh(&mesh, &Transform::translation_matrix(0.0, 0.0, 0.0), &camera, red);
        let (c, color) = renderer.cell(40, 20).unwrap();
        assert_ne!(c, ' ');
        assert!(color.r > 0.0 && color.g == 0.0 && color.b == 0.0);

        renderer.clear();
        assert_eq!(renderer.cell(40, 20), Some((' ', Rgb::BLACK)));
    }

    #[test]
    fn test_plot_respects_depth() {
        let camera = Camera::new(80, 40);
        let mut renderer = AsciiRenderer::new(80, 40);
        renderer.plot(&Point3::new(0.0, 0.0, 0.0), &camera, 'f', Rgb::WHITE);
        renderer.plot(&Point3::new(0.0, 0.0, -150.0), &camera, 'b', Rgb::WHITE);
        renderer.plot(&Point3::new(0.0, 0.0, 150.0), &camera, 'n', Rgb::WHITE);
        assert_eq!(renderer.cell(40, 20).map(|(c, _)| c), Some('n'));
    }

    #[test]
    fn test_draw_writes_every_cell() {
        let renderer = AsciiRenderer::new(4, 2);
        let mut out = Vec::new();
        renderer.draw(&mut out, 0, 0).unwrap();
        assert!(!out.is_empty());
    }
}
