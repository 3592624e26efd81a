/// Editor configuration: projection constants, selection policy and control
/// defaults, loaded from TOML with every missing field defaulted. Loading
/// always validates.
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::Rgb;
use crate::error::ConfigError;
use crate::sign::{SignLogic, SignType};
use crate::store::SelectionPolicy;

/// Constants of the projection engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Radius of the circle the attractors sit on.
    pub radius: f32,
    /// Distance of the Legisign/Qualisign planes from the Sinsign plane.
    pub offset_depth: f32,
    /// Presentation-only multiplier applied to colors before clamping.
    pub intensity_boost: f32,
    pub icon_color: Rgb,
    pub index_color: Rgb,
    pub symbol_color: Rgb,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            radius: 200.0,
            offset_depth: 150.0,
            intensity_boost: 1.0,
            icon_color: Rgb::from_hex(0xef4444),
            index_color: Rgb::from_hex(0x22c56e),
            symbol_color: Rgb::from_hex(0x38bdf8),
        }
    }
}

impl ProjectionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "projection.radius must be a positive number, got {}",
                self.radius
            )));
        }
        if !self.offset_depth.is_finite() || self.offset_depth < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "projection.offset_depth must be zero or positive, got {}",
                self.offset_depth
            )));
        }
        if !self.intensity_boost.is_finite() || self.intensity_boost < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "projection.intensity_boost must be zero or positive, got {}",
                self.intensity_boost
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub policy: SelectionPolicy,
}

/// Defaults for the editing controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Amount one key press moves a slider.
    pub slider_step: u8,
    pub sign_type: SignType,
    pub sign_logic: SignLogic,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            slider_step: 5,
            sign_type: SignType::default(),
            sign_logic: SignLogic::default(),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub projection: ProjectionConfig,
    pub selection: SelectionConfig,
    pub controls: ControlsConfig,
}

impl EditorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    /// - `ConfigError::Io` when the file cannot be read.
    /// - `ConfigError::Parse` when the TOML is malformed or mistyped.
    /// - `ConfigError::Invalid` when a value is out of range.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded editor config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.projection.validate()?;
        if self.controls.slider_step == 0 || self.controls.slider_step > 100 {
            return Err(ConfigError::Invalid(format!(
                "controls.slider_step must be within 1..=100, got {}",
                self.controls.slider_step
            )));
        }
        Ok(())
    }
}
