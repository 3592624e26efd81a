/// Mouse picking against projected point centers
use nalgebra::Matrix4;
use semio_core::{Camera, PointId, PointStore, RenderSync};

/// Hit radius around a point center, in terminal columns
pub const PICK_RADIUS: f32 = 2.5;

/// Point under viewport cell (`x`, `y`), if any.
///
/// Rows count double since a terminal cell is about twice as tall as it is
/// wide. Among several hits the one closest to the camera wins.
pub fn pick_at<S: RenderSync>(
    store: &PointStore<S>,
    camera: &Camera,
    width: usize,
    height: usize,
    x: u16,
    y: u16,
) -> Option<PointId> {
    let (cx, cy) = (f32::from(x) + 0.5, f32::from(y) + 0.5);
    store
        .points()
        .filter_map(|point| {
            let (sx, sy, depth) = camera.project_to_screen(
                &point.position(),
                &Matrix4::identity(),
                width as u32,
                height as u32,
            )?;
            let (dx, dy) = (sx - cx, (sy - cy) * 2.0);
            ((dx * dx + dy * dy).sqrt() <= PICK_RADIUS).then_some((point.id(), depth))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use semio_core::{EditorConfig, Intensities, SignLogic, SignType};

    fn store() -> PointStore {
        PointStore::from_config(&EditorConfig::default(), ())
    }

    #[test]
    fn test_click_on_center_hits_point() {
        let mut store = store();
        let id = store
            .add("mute", Intensities::new(0, 0, 0), SignType::Sinsign, SignLogic::Rheme)
            .unwrap();
        let camera = Camera::new(80, 40);
        assert_eq!(pick_at(&store, &camera, 80, 40, 40, 20), Some(id));
        assert_eq!(pick_at(&store, &camera, 80, 40, 39, 19), Some(id));
    }

    #[test]
    fn test_click_on_empty_space_misses() {
        let mut store = store();
        store
            .add("mute", Intensities::new(0, 0, 0), SignType::Sinsign, SignLogic::Rheme)
            .unwrap();
        let camera = Camera::new(80, 40);
        assert_eq!(pick_at(&store, &camera, 80, 40, 5, 5), None);
        let empty = PointStore::from_config(&EditorConfig::default(), ());
        assert_eq!(pick_at(&empty, &camera, 80, 40, 40, 20), None);
    }

    #[test]
    fn test_nearest_point_wins_when_overlapping() {
        let mut store = store();
        store
            .add("far", Intensities::new(0, 0, 0), SignType::Sinsign, SignLogic::Rheme)
            .unwrap();
        let near = store
            .add("near", Intensities::new(0, 0, 0), SignType::Legisign, SignLogic::Rheme)
            .unwrap();
        store
            .add("farther", Intensities::new(0, 0, 0), SignType::Qualisign, SignLogic::Rheme)
            .unwrap();
        let camera = Camera::new(80, 40);
        assert_eq!(pick_at(&store, &camera, 80, 40, 40, 20), Some(near));
    }
}
