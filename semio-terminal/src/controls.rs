/// Slider and selector state of the editing panel
use semio_core::{AnchorKey, ControlsConfig, Draft, PointUpdate, SemioticPoint, MAX_INTENSITY};

/// Panel state. While a point is selected it mirrors that point; otherwise
/// it holds the attributes the next added point starts with.
#[derive(Debug, Clone)]
pub struct Controls {
    pub draft: Draft,
    pub active: AnchorKey,
    step: u8,
}

impl Controls {
    pub fn new(config: &ControlsConfig) -> Self {
        Self {
            draft: Draft {
                sign_type: config.sign_type,
                sign_logic: config.sign_logic,
                ..Draft::default()
            },
            active: AnchorKey::Icon,
            step: config.slider_step.max(1),
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    /// Show the attributes of `point`
    pub fn load(&mut self, point: &SemioticPoint) {
        self.draft = Draft::of(point);
    }

    pub fn select_slider(&mut self, key: AnchorKey) {
        self.active = key;
    }

    /// Move the active slider `direction` steps, clamped to `0..=100`
    pub fn nudge(&mut self, direction: i32) -> PointUpdate {
        let current = i32::from(self.draft.intensities.get(self.active));
        let value = (current + direction * i32::from(self.step)).clamp(0, i32::from(MAX_INTENSITY));
        let changes = PointUpdate::new().with_intensity(self.active, value as u32);
        self.draft.apply(&changes);
        changes
    }

    pub fn cycle_type(&mut self) -> PointUpdate {
        let changes = PointUpdate::new().with_sign_type(self.draft.sign_type.next());
        self.draft.apply(&changes);
        changes
    }

    pub fn cycle_logic(&mut self) -> PointUpdate {
        let changes = PointUpdate::new().with_sign_logic(self.draft.sign_logic.next());
        self.draft.apply(&changes);
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semio_core::{SignLogic, SignType};

    #[test]
    fn test_nudge_clamps_to_range() {
        let mut controls = Controls::new(&ControlsConfig {
            slider_step: 30,
            ..ControlsConfig::default()
        });
        controls.select_slider(AnchorKey::Index);
        controls.nudge(1);
        let changes = controls.nudge(1);
        assert_eq!(changes.index, Some(100));
        assert_eq!(controls.draft.intensities.index(), 100);

        for _ in 0..5 {
            controls.nudge(-1);
        }
        assert_eq!(controls.draft.intensities.index(), 0);
        assert_eq!(controls.draft.intensities.icon(), 50);
    }

    #[test]
    fn test_cycles_follow_declaration_order() {
        let mut controls = Controls::new(&ControlsConfig::default());
        assert_eq!(controls.draft.sign_type, SignType::Sinsign);
        assert_eq!(controls.cycle_type().sign_type, Some(SignType::Legisign));
        assert_eq!(controls.draft.sign_type, SignType::Legisign);
        assert_eq!(controls.cycle_logic().sign_logic, Some(SignLogic::Dicent));
        assert_eq!(controls.cycle_logic().sign_logic, Some(SignLogic::Argument));
        assert_eq!(controls.cycle_logic().sign_logic, Some(SignLogic::Rheme));
    }
}
