/// Outbound notifications from the point store to a render surface.
use serde::Serialize;

use crate::projection::Appearance;
use crate::store::PointId;

/// Receiver of point lifecycle notifications.
///
/// Every store mutation pushes its notifications before returning. An
/// implementation reconciles its visual objects to match and must never call
/// back into the store, except through `select` on a later event.
pub trait RenderSync {
    fn on_create(&mut self, id: PointId, appearance: &Appearance);

    fn on_destroy(&mut self, id: PointId);

    /// `shape_class_changed` means the geometry must be swapped, not just
    /// re-posed.
    fn on_update(&mut self, id: PointId, appearance: &Appearance, shape_class_changed: bool);

    fn on_selection_change(&mut self, selected: Option<PointId>);
}

/// Sink that drops everything.
impl RenderSync for () {
    fn on_create(&mut self, _id: PointId, _appearance: &Appearance) {}

    fn on_destroy(&mut self, _id: PointId) {}

    fn on_update(&mut self, _id: PointId, _appearance: &Appearance, _shape_class_changed: bool) {}

    fn on_selection_change(&mut self, _selected: Option<PointId>) {}
}

/// A recorded notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RenderEvent {
    Create {
        id: PointId,
        appearance: Appearance,
    },
    Destroy {
        id: PointId,
    },
    Update {
        id: PointId,
        appearance: Appearance,
        shape_class_changed: bool,
    },
    SelectionChange {
        selected: Option<PointId>,
    },
}

/// Sink that records notifications in arrival order.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<RenderEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RenderEvent] {
        &self.events
    }

    /// Take every recorded event, leaving the queue empty
    pub fn drain(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl RenderSync for EventQueue {
    fn on_create(&mut self, id: PointId, appearance: &Appearance) {
        self.events.push(RenderEvent::Create {
            id,
            appearance: *appearance,
        });
    }

    fn on_destroy(&mut self, id: PointId) {
        self.events.push(RenderEvent::Destroy { id });
    }

    fn on_update(&mut self, id: PointId, appearance: &Appearance, shape_class_changed: bool) {
        self.events.push(RenderEvent::Update {
            id,
            appearance: *appearance,
            shape_class_changed,
        });
    }

    fn on_selection_change(&mut self, selected: Option<PointId>) {
        self.events.push(RenderEvent::SelectionChange { selected });
    }
}
