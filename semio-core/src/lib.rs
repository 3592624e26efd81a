/// Semio Core Library - point model and projection engine
///
/// Places semiotic signs in 3D space: three intensities become barycentric
/// weights over fixed attractors, the sign type picks an offset plane and the
/// sign logic picks a shape. The point store owns every sign, tracks the
/// single selection and notifies a render surface of each change.

pub mod anchor;
pub mod camera;
pub mod color;
pub mod command;
pub mod config;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod sign;
pub mod store;
pub mod sync;
pub mod transform;

// Re-export commonly used types
pub use anchor::{AnchorSet, Attractor};
pub use camera::{Camera, ProjectionMode};
pub use color::Rgb;
pub use command::{Command, Outcome, Target};
pub use config::{ControlsConfig, EditorConfig, ProjectionConfig, SelectionConfig};
pub use error::{CommandError, ConfigError, StoreError};
pub use geometry::{Mesh, Triangle, Vertex};
pub use projection::{Appearance, Projector, Weights};
pub use sign::{AnchorKey, Intensities, ShapeClass, SignLogic, SignType, MAX_INTENSITY};
pub use store::{Draft, PointId, PointStore, PointUpdate, Selection, SelectionPolicy, SemioticPoint};
pub use sync::{EventQueue, RenderEvent, RenderSync};
pub use transform::{Orientation, Transform};
