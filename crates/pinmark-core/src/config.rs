//! Editor configuration.

use crate::curve::DEFAULT_PRECISION;
use crate::input::{DOUBLE_CLICK_DISTANCE, DOUBLE_CLICK_TIME_MS, InputState};
use crate::shapes::{MarkerKind, SerializableColor};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {message}")]
    Io { path: String, message: String },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Colors used by the scene builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub marker_fill: SerializableColor,
    pub marker_label: SerializableColor,
    pub label_plate: SerializableColor,
    pub grip_fill: SerializableColor,
    pub grip_stroke: SerializableColor,
    pub outline: SerializableColor,
    pub curve: SerializableColor,
    pub control_point: SerializableColor,
    pub control_label: SerializableColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            marker_fill: SerializableColor::rgb(0, 0, 255),
            marker_label: SerializableColor::rgb(255, 255, 0),
            label_plate: SerializableColor::new(0, 0, 0, 160),
            grip_fill: SerializableColor::rgb(0, 255, 255),
            grip_stroke: SerializableColor::rgb(0, 0, 255),
            outline: SerializableColor::rgb(0, 0, 0),
            curve: SerializableColor::rgb(0, 0, 255),
            control_point: SerializableColor::rgb(255, 0, 0),
            control_label: SerializableColor::rgb(255, 255, 255),
        }
    }
}

/// Tunables for the marker and curve editors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Side length of markers added with a right click.
    pub marker_size: f64,
    pub default_kind: MarkerKind,
    pub default_precision: f64,
    /// Pick radius around a control point.
    pub control_point_radius: f64,
    pub double_click_ms: u64,
    pub double_click_distance: f64,
    /// Stroke width of the outline and curve paths.
    pub path_width: f64,
    pub colors: Palette,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            marker_size: 40.0,
            default_kind: MarkerKind::Ellipse,
            default_precision: DEFAULT_PRECISION,
            control_point_radius: 15.0,
            double_click_ms: DOUBLE_CLICK_TIME_MS,
            double_click_distance: DOUBLE_CLICK_DISTANCE,
            path_width: 3.0,
            colors: Palette::default(),
        }
    }
}

impl EditorConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Input tracker using this config's double-click thresholds.
    pub fn input_state(&self) -> InputState {
        InputState::with_double_click(
            Duration::from_millis(self.double_click_ms),
            self.double_click_distance,
        )
    }
}
