/// Point store and selection state machine.
///
/// The store owns every [`SemioticPoint`] in insertion order and keeps each
/// derived appearance equal to the projection of the point's attributes.
/// Every state transition pushes one notification to the [`RenderSync`]; a
/// failed operation changes nothing and notifies nothing. At most one point
/// is selected and the selection always names a live point.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::EditorConfig;
use crate::error::StoreError;
use crate::projection::{Appearance, Projector};
use crate::sign::{AnchorKey, Intensities, ShapeClass, SignLogic, SignType};
use crate::sync::RenderSync;

/// Stable identifier of a point.
pub type PointId = Uuid;

/// What `select` does when asked to select the point that is already
/// selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Deselect it.
    #[default]
    Toggle,
    /// Leave it selected and emit nothing.
    Keep,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(PointId),
}

impl Selection {
    pub fn id(self) -> Option<PointId> {
        match self {
            Selection::Unselected => None,
            Selection::Selected(id) => Some(id),
        }
    }

    fn from_id(id: Option<PointId>) -> Self {
        id.map_or(Selection::Unselected, Selection::Selected)
    }
}

/// A sign placed in the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct SemioticPoint {
    id: PointId,
    name: String,
    intensities: Intensities,
    sign_type: SignType,
    sign_logic: SignLogic,
    appearance: Appearance,
}

impl SemioticPoint {
    pub fn id(&self) -> PointId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn intensities(&self) -> Intensities {
        self.intensities
    }

    pub fn sign_type(&self) -> SignType {
        self.sign_type
    }

    pub fn sign_logic(&self) -> SignLogic {
        self.sign_logic
    }

    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    pub fn position(&self) -> nalgebra::Point3<f32> {
        self.appearance.position
    }

    pub fn color(&self) -> crate::color::Rgb {
        self.appearance.color
    }

    pub fn shape(&self) -> ShapeClass {
        self.appearance.shape
    }
}

/// Partial attribute change for [`PointStore::update`].
///
/// Unset fields keep their current value. Intensities are clamped to
/// `0..=100` when applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointUpdate {
    pub icon: Option<u32>,
    pub index: Option<u32>,
    pub symbol: Option<u32>,
    pub sign_type: Option<SignType>,
    pub sign_logic: Option<SignLogic>,
}

impl PointUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// An update that overwrites every attribute
    pub fn full(values: Intensities, sign_type: SignType, sign_logic: SignLogic) -> Self {
        Self {
            icon: Some(values.icon() as u32),
            index: Some(values.index() as u32),
            symbol: Some(values.symbol() as u32),
            sign_type: Some(sign_type),
            sign_logic: Some(sign_logic),
        }
    }

    pub fn with_intensity(mut self, key: AnchorKey, value: u32) -> Self {
        match key {
            AnchorKey::Icon => self.icon = Some(value),
            AnchorKey::Index => self.index = Some(value),
            AnchorKey::Symbol => self.symbol = Some(value),
        }
        self
    }

    pub fn with_sign_type(mut self, sign_type: SignType) -> Self {
        self.sign_type = Some(sign_type);
        self
    }

    pub fn with_sign_logic(mut self, sign_logic: SignLogic) -> Self {
        self.sign_logic = Some(sign_logic);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply_intensities(&self, values: &mut Intensities) {
        let fields = [
            (AnchorKey::Icon, self.icon),
            (AnchorKey::Index, self.index),
            (AnchorKey::Symbol, self.symbol),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                values.set(key, value);
            }
        }
    }
}

/// Attributes of a sign that has not been placed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draft {
    pub intensities: Intensities,
    pub sign_type: SignType,
    pub sign_logic: SignLogic,
}

impl Draft {
    /// Merge a partial change, same rules as [`PointStore::update`]
    pub fn apply(&mut self, changes: &PointUpdate) {
        changes.apply_intensities(&mut self.intensities);
        if let Some(sign_type) = changes.sign_type {
            self.sign_type = sign_type;
        }
        if let Some(sign_logic) = changes.sign_logic {
            self.sign_logic = sign_logic;
        }
    }

    /// Attributes of an existing point
    pub fn of(point: &SemioticPoint) -> Self {
        Self {
            intensities: point.intensities,
            sign_type: point.sign_type,
            sign_logic: point.sign_logic,
        }
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            intensities: Intensities::new(50, 50, 50),
            sign_type: SignType::default(),
            sign_logic: SignLogic::default(),
        }
    }
}

/// Owner of every point and of the selection.
pub struct PointStore<S: RenderSync = ()> {
    points: Vec<SemioticPoint>,
    projector: Projector,
    policy: SelectionPolicy,
    selection: Selection,
    sync: S,
}

impl<S: RenderSync> PointStore<S> {
    pub fn new(projector: Projector, policy: SelectionPolicy, sync: S) -> Self {
        tracing::info!(policy = ?policy, "point store created");
        Self {
            points: Vec::new(),
            projector,
            policy,
            selection: Selection::Unselected,
            sync,
        }
    }

    pub fn from_config(config: &EditorConfig, sync: S) -> Self {
        Self::new(
            Projector::from_config(&config.projection),
            config.selection.policy,
            sync,
        )
    }

    /// Create a point and select it.
    ///
    /// # Errors
    /// - `StoreError::InvalidInput` when `name` is blank after trimming.
    pub fn add(
        &mut self,
        name: &str,
        intensities: Intensities,
        sign_type: SignType,
        sign_logic: SignLogic,
    ) -> Result<PointId, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            tracing::warn!("rejected point with blank name");
            return Err(StoreError::InvalidInput("name must not be blank".to_string()));
        }

        let id = Uuid::new_v4();
        let appearance = self.projector.appearance(&intensities, sign_type, sign_logic);
        self.points.push(SemioticPoint {
            id,
            name: name.to_string(),
            intensities,
            sign_type,
            sign_logic,
            appearance,
        });
        tracing::debug!(%id, name, ?sign_type, ?sign_logic, "point added");
        self.sync.on_create(id, &appearance);
        self.set_selection(Selection::Selected(id));
        Ok(id)
    }

    /// Remove a point. Returns `false` when `id` is unknown.
    pub fn delete(&mut self, id: PointId) -> bool {
        let Some(index) = self.position_of(id) else {
            tracing::debug!(%id, "delete ignored for unknown point");
            return false;
        };

        self.points.remove(index);
        tracing::debug!(%id, "point deleted");
        self.sync.on_destroy(id);
        if self.selection == Selection::Selected(id) {
            self.set_selection(Selection::Unselected);
        }
        true
    }

    /// Merge `changes` into a point and re-project it.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when `id` is unknown.
    pub fn update(&mut self, id: PointId, changes: &PointUpdate) -> Result<(), StoreError> {
        let index = self.position_of(id).ok_or(StoreError::NotFound(id))?;
        let point = &mut self.points[index];

        let previous_shape = point.appearance.shape;
        changes.apply_intensities(&mut point.intensities);
        if let Some(sign_type) = changes.sign_type {
            point.sign_type = sign_type;
        }
        if let Some(sign_logic) = changes.sign_logic {
            point.sign_logic = sign_logic;
        }
        point.appearance =
            self.projector
                .appearance(&point.intensities, point.sign_type, point.sign_logic);

        let shape_class_changed = point.appearance.shape != previous_shape;
        tracing::debug!(%id, shape_class_changed, "point updated");
        self.sync.on_update(id, &point.appearance, shape_class_changed);
        Ok(())
    }

    /// Move the selection pointer, honouring the selection policy.
    ///
    /// Returns the resulting selection.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when `id` names no point.
    pub fn select(&mut self, id: Option<PointId>) -> Result<Selection, StoreError> {
        let target = match id {
            Some(id) if self.position_of(id).is_none() => return Err(StoreError::NotFound(id)),
            Some(id) if self.selection == Selection::Selected(id) => match self.policy {
                SelectionPolicy::Toggle => Selection::Unselected,
                SelectionPolicy::Keep => Selection::Selected(id),
            },
            other => Selection::from_id(other),
        };
        self.set_selection(target);
        Ok(self.selection)
    }

    fn set_selection(&mut self, selection: Selection) {
        if self.selection == selection {
            return;
        }
        self.selection = selection;
        tracing::debug!(selected = ?selection.id(), "selection changed");
        self.sync.on_selection_change(selection.id());
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected_id(&self) -> Option<PointId> {
        self.selection.id()
    }

    pub fn selected(&self) -> Option<&SemioticPoint> {
        self.selection.id().and_then(|id| self.get(id))
    }

    pub fn is_selected(&self, id: PointId) -> bool {
        self.selection == Selection::Selected(id)
    }

    pub fn get(&self, id: PointId) -> Option<&SemioticPoint> {
        self.points.iter().find(|point| point.id == id)
    }

    /// Points in insertion order
    pub fn points(&self) -> impl Iterator<Item = &SemioticPoint> {
        self.points.iter()
    }

    /// Zero-based list position of a point
    pub fn position_of(&self, id: PointId) -> Option<usize> {
        self.points.iter().position(|point| point.id == id)
    }

    /// Point at a zero-based list position
    pub fn nth(&self, index: usize) -> Option<&SemioticPoint> {
        self.points.get(index)
    }

    /// First point whose name matches, ignoring ASCII case
    pub fn find_by_name(&self, name: &str) -> Option<&SemioticPoint> {
        let name = name.trim();
        self.points
            .iter()
            .find(|point| point.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn sync(&self) -> &S {
        &self.sync
    }

    pub fn sync_mut(&mut self) -> &mut S {
        &mut self.sync
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{EventQueue, RenderEvent};

    fn store() -> PointStore<EventQueue> {
        PointStore::new(Projector::default(), SelectionPolicy::Toggle, EventQueue::new())
    }

    fn add(store: &mut PointStore<EventQueue>, name: &str) -> PointId {
        store
            .add(name, Intensities::new(30, 30, 40), SignType::Sinsign, SignLogic::Rheme)
            .unwrap()
    }

    #[test]
    fn test_add_selects_and_notifies() {
        let mut store = store();
        let id = add(&mut store, "  Weathervane ");

        assert_eq!(store.get(id).unwrap().name(), "Weathervane");
        assert_eq!(store.selected_id(), Some(id));

        let events = store.sync_mut().drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], RenderEvent::Create { id: created, .. } if created == id));
        assert_eq!(events[1], RenderEvent::SelectionChange { selected: Some(id) });
    }

    #[test]
    fn test_blank_name_rejected_without_side_effects() {
        let mut store = store();
        let err = store
            .add("   ", Intensities::default(), SignType::Sinsign, SignLogic::Rheme)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
        assert!(store.is_empty());
        assert!(store.sync().is_empty());
        assert_eq!(store.selection(), Selection::Unselected);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut store = store();
        let first = add(&mut store, "a");
        let second = add(&mut store, "a");
        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut store = store();
        add(&mut store, "a");
        store.sync_mut().drain();

        assert!(!store.delete(Uuid::new_v4()));
        assert_eq!(store.len(), 1);
        assert!(store.sync().is_empty());
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let mut store = store();
        let first = add(&mut store, "a");
        let second = add(&mut store, "b");
        store.sync_mut().drain();

        assert!(store.delete(second));
        assert_eq!(store.selected_id(), None);
        assert!(store.get(first).is_some());
        assert_eq!(
            store.sync_mut().drain(),
            vec![
                RenderEvent::Destroy { id: second },
                RenderEvent::SelectionChange { selected: None },
            ]
        );
    }

    #[test]
    fn test_delete_unselected_keeps_selection() {
        let mut store = store();
        let first = add(&mut store, "a");
        let second = add(&mut store, "b");
        store.sync_mut().drain();

        assert!(store.delete(first));
        assert_eq!(store.selected_id(), Some(second));
        assert_eq!(store.sync_mut().drain(), vec![RenderEvent::Destroy { id: first }]);
    }

    #[test]
    fn test_update_merges_and_reprojects() {
        let mut store = store();
        let id = add(&mut store, "a");
        store.sync_mut().drain();

        let changes = PointUpdate::new()
            .with_intensity(AnchorKey::Icon, 100)
            .with_intensity(AnchorKey::Index, 0)
            .with_intensity(AnchorKey::Symbol, 0)
            .with_sign_type(SignType::Legisign);
        store.update(id, &changes).unwrap();

        let point = store.get(id).unwrap();
        let icon = store.projector().anchors().get(AnchorKey::Icon);
        assert_eq!(point.sign_logic(), SignLogic::Rheme);
        assert_eq!(point.position().x, icon.position.x);
        assert_eq!(point.position().z, 150.0);
        assert_eq!(point.color(), icon.color);

        let events = store.sync_mut().drain();
        assert!(matches!(
            events.as_slice(),
            [RenderEvent::Update { shape_class_changed: false, .. }]
        ));
    }

    #[test]
    fn test_update_clamps_intensities() {
        let mut store = store();
        let id = add(&mut store, "a");
        store
            .update(id, &PointUpdate::new().with_intensity(AnchorKey::Symbol, 900))
            .unwrap();
        assert_eq!(store.get(id).unwrap().intensities().symbol(), 100);
    }

    #[test]
    fn test_update_logic_signals_geometry_swap() {
        let mut store = store();
        let id = add(&mut store, "a");
        store.sync_mut().drain();

        store
            .update(id, &PointUpdate::new().with_sign_logic(SignLogic::Argument))
            .unwrap();
        assert_eq!(store.get(id).unwrap().shape(), ShapeClass::Octahedron);
        assert!(matches!(
            store.sync_mut().drain().as_slice(),
            [RenderEvent::Update { shape_class_changed: true, .. }]
        ));

        // Same logic again is a transform-only update.
        store
            .update(id, &PointUpdate::new().with_sign_logic(SignLogic::Argument))
            .unwrap();
        assert!(matches!(
            store.sync_mut().drain().as_slice(),
            [RenderEvent::Update { shape_class_changed: false, .. }]
        ));
    }

    #[test]
    fn test_update_unknown_fails() {
        let mut store = store();
        let missing = Uuid::new_v4();
        let err = store.update(missing, &PointUpdate::new()).unwrap_err();
        assert_eq!(err, StoreError::NotFound(missing));
        assert!(store.sync().is_empty());
    }

    #[test]
    fn test_empty_update_is_idempotent() {
        let mut store = store();
        let id = add(&mut store, "a");
        let before = *store.get(id).unwrap().appearance();

        store.update(id, &PointUpdate::new()).unwrap();
        assert_eq!(*store.get(id).unwrap().appearance(), before);
    }

    #[test]
    fn test_toggle_policy_deselects() {
        let mut store = store();
        let id = add(&mut store, "a");
        store.sync_mut().drain();

        assert_eq!(store.select(Some(id)).unwrap(), Selection::Unselected);
        assert_eq!(store.select(Some(id)).unwrap(), Selection::Selected(id));
        assert_eq!(
            store.sync_mut().drain(),
            vec![
                RenderEvent::SelectionChange { selected: None },
                RenderEvent::SelectionChange { selected: Some(id) },
            ]
        );
    }

    #[test]
    fn test_keep_policy_is_idempotent() {
        let mut store = PointStore::new(Projector::default(), SelectionPolicy::Keep, EventQueue::new());
        let id = store
            .add("a", Intensities::default(), SignType::Sinsign, SignLogic::Rheme)
            .unwrap();
        store.sync_mut().drain();

        assert_eq!(store.select(Some(id)).unwrap(), Selection::Selected(id));
        assert!(store.sync().is_empty());
    }

    #[test]
    fn test_select_none_and_unknown() {
        let mut store = store();
        let id = add(&mut store, "a");

        let missing = Uuid::new_v4();
        assert_eq!(store.select(Some(missing)), Err(StoreError::NotFound(missing)));
        assert_eq!(store.selected_id(), Some(id));

        assert_eq!(store.select(None).unwrap(), Selection::Unselected);
        assert!(store.selected().is_none());
    }

    #[test]
    fn test_lookup_helpers() {
        let mut store = store();
        let a = add(&mut store, "Alpha");
        let b = add(&mut store, "Beta");

        assert_eq!(store.position_of(b), Some(1));
        assert_eq!(store.nth(0).map(SemioticPoint::id), Some(a));
        assert_eq!(store.find_by_name("beta").map(SemioticPoint::id), Some(b));
        assert!(store.find_by_name("gamma").is_none());
        let names: Vec<_> = store.points().map(SemioticPoint::name).collect();
        assert_eq!(names, ["Alpha", "Beta"]);
    }
}
