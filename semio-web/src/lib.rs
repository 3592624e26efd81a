/// Semio Web - sign editor bindings for browsers
///
/// The browser owns the drawing. This crate owns the points: every edit goes
/// through an [`EditorSession`], and the page pulls the resulting render
/// notifications as JSON to reconcile its own scene objects.
use semio_core::{
    ConfigError, EditorConfig, EventQueue, Intensities, PointId, PointStore, PointUpdate,
    Selection, SignLogic, SignType, StoreError,
};
use wasm_bindgen::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unknown sign type or sign logic name
    #[error("{0}")]
    InvalidValue(String),

    #[error("invalid point id `{id}`: {reason}")]
    InvalidId { id: String, reason: String },

    #[error("failed to encode events: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Point store plus the notifications not yet handed to the page
pub struct EditorSession {
    store: PointStore<EventQueue>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::with_config(&EditorConfig::default())
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        Self {
            store: PointStore::from_config(config, EventQueue::new()),
        }
    }

    pub fn from_toml(input: &str) -> Result<Self, SessionError> {
        let config = EditorConfig::from_toml_str(input)?;
        Ok(Self::with_config(&config))
    }

    pub fn store(&self) -> &PointStore<EventQueue> {
        &self.store
    }

    /// Add a point and select it; returns its id
    pub fn add(
        &mut self,
        name: &str,
        icon: u32,
        index: u32,
        symbol: u32,
        sign_type: &str,
        sign_logic: &str,
    ) -> Result<String, SessionError> {
        let sign_type = parse_value::<SignType>(sign_type)?;
        let sign_logic = parse_value::<SignLogic>(sign_logic)?;
        let id = self
            .store
            .add(name, Intensities::new(icon, index, symbol), sign_type, sign_logic)?;
        Ok(id.to_string())
    }

    /// Returns `false` when no point has this id
    pub fn remove(&mut self, id: &str) -> Result<bool, SessionError> {
        Ok(self.store.delete(parse_id(id)?))
    }

    pub fn set_intensities(&mut self, id: &str, icon: u32, index: u32, symbol: u32) -> Result<(), SessionError> {
        let changes = PointUpdate {
            icon: Some(icon),
            index: Some(index),
            symbol: Some(symbol),
            ..PointUpdate::default()
        };
        self.update(id, &changes)
    }

    pub fn set_sign_type(&mut self, id: &str, sign_type: &str) -> Result<(), SessionError> {
        let changes = PointUpdate::new().with_sign_type(parse_value(sign_type)?);
        self.update(id, &changes)
    }

    pub fn set_sign_logic(&mut self, id: &str, sign_logic: &str) -> Result<(), SessionError> {
        let changes = PointUpdate::new().with_sign_logic(parse_value(sign_logic)?);
        self.update(id, &changes)
    }

    /// Select a point, or clear the selection with `None`. Returns the id
    /// selected afterwards.
    pub fn select(&mut self, id: Option<&str>) -> Result<Option<String>, SessionError> {
        let id = id.map(parse_id).transpose()?;
        let selection = self.store.select(id)?;
        Ok(match selection {
            Selection::Selected(id) => Some(id.to_string()),
            Selection::Unselected => None,
        })
    }

    pub fn selected(&self) -> Option<String> {
        self.store.selected_id().map(|id| id.to_string())
    }

    pub fn point_count(&self) -> usize {
        self.store.len()
    }

    /// Pending render notifications as a JSON array, oldest first
    pub fn drain_events(&mut self) -> Result<String, SessionError> {
        let events = self.store.sync_mut().drain();
        Ok(serde_json::to_string(&events)?)
    }

    fn update(&mut self, id: &str, changes: &PointUpdate) -> Result<(), SessionError> {
        self.store.update(parse_id(id)?, changes)?;
        Ok(())
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_id(id: &str) -> Result<PointId, SessionError> {
    PointId::parse_str(id.trim()).map_err(|err| SessionError::InvalidId {
        id: id.to_string(),
        reason: err.to_string(),
    })
}

fn parse_value<T: std::str::FromStr<Err = String>>(value: &str) -> Result<T, SessionError> {
    value.parse().map_err(SessionError::InvalidValue)
}

/// JavaScript handle on an [`EditorSession`]
#[wasm_bindgen]
pub struct WebEditor {
    session: EditorSession,
}

#[wasm_bindgen]
impl WebEditor {
    /// Create an editor; `config` is an optional TOML document
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<WebEditor, JsValue> {
        let session = match config {
            Some(text) => EditorSession::from_toml(&text).map_err(js_error)?,
            None => EditorSession::new(),
        };
        Ok(WebEditor { session })
    }

    pub fn add(
        &mut self,
        name: &str,
        icon: u32,
        index: u32,
        symbol: u32,
        sign_type: &str,
        sign_logic: &str,
    ) -> Result<String, JsValue> {
        self.session
            .add(name, icon, index, symbol, sign_type, sign_logic)
            .map_err(js_error)
    }

    pub fn remove(&mut self, id: &str) -> Result<bool, JsValue> {
        self.session.remove(id).map_err(js_error)
    }

    #[wasm_bindgen(js_name = setIntensities)]
    pub fn set_intensities(&mut self, id: &str, icon: u32, index: u32, symbol: u32) -> Result<(), JsValue> {
        self.session
            .set_intensities(id, icon, index, symbol)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = setSignType)]
    pub fn set_sign_type(&mut self, id: &str, sign_type: &str) -> Result<(), JsValue> {
        self.session.set_sign_type(id, sign_type).map_err(js_error)
    }

    #[wasm_bindgen(js_name = setSignLogic)]
    pub fn set_sign_logic(&mut self, id: &str, sign_logic: &str) -> Result<(), JsValue> {
        self.session.set_sign_logic(id, sign_logic).map_err(js_error)
    }

    pub fn select(&mut self, id: Option<String>) -> Result<Option<String>, JsValue> {
        self.session.select(id.as_deref()).map_err(js_error)
    }

    pub fn selected(&self) -> Option<String> {
        self.session.selected()
    }

    #[wasm_bindgen(js_name = pointCount)]
    pub fn point_count(&self) -> usize {
        self.session.point_count()
    }

    /// JSON array of `{ "event": ..., ... }` objects
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        self.session.drain_events().map_err(js_error)
    }
}

fn js_error(err: SessionError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    web_sys::console::log_1(&JsValue::from_str(concat!(
        "semio-web ",
        env!("CARGO_PKG_VERSION"),
        " ready"
    )));
    Ok(())
}
