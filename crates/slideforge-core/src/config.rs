//! Tunable settings for the viewport controller and the coordinate picker.
//!
//! All settings deserialize with `#[serde(default)]`, so a partial JSON
//! document only overrides the fields it names.

use crate::error::ConfigError;
use crate::units::{EMU_PER_INCH, point_to_emu};
use crate::viewport::{SLIDE_HEIGHT_PT, SLIDE_WIDTH_PT};
use kurbo::Size;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Viewport controller settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Arrow-key pan step in pixels.
    pub arrow_step: f64,
    /// Arrow-key pan step with Shift held.
    pub arrow_step_fast: f64,
    /// Scale change per wheel pixel when zooming.
    pub zoom_sensitivity: f64,
    /// Multiplier for Shift+wheel horizontal panning.
    pub shift_pan_factor: f64,
    /// Zoom factor for the zoom-in/zoom-out shortcuts.
    pub zoom_step: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            arrow_step: 20.0,
            arrow_step_fast: 50.0,
            zoom_sensitivity: 0.001,
            shift_pan_factor: 0.5,
            zoom_step: 1.1,
        }
    }
}

impl ControllerConfig {
    pub fn with_arrow_steps(mut self, step: f64, fast: f64) -> Self {
        self.arrow_step = step;
        self.arrow_step_fast = fast;
        self
    }

    pub fn with_zoom_sensitivity(mut self, sensitivity: f64) -> Self {
        self.zoom_sensitivity = sensitivity;
        self
    }
}

/// Coordinate picker settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Display size of the picker in pixels.
    pub display_size: Size,
    /// Slide size in EMU.
    pub slide_size: Size,
    /// Grid quantum in EMU.
    pub grid_quantum: f64,
    /// Whether clicks and drags snap to the grid.
    pub snap_to_grid: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            display_size: Size::new(400.0, 225.0),
            slide_size: Size::new(point_to_emu(SLIDE_WIDTH_PT), point_to_emu(SLIDE_HEIGHT_PT)),
            grid_quantum: EMU_PER_INCH,
            snap_to_grid: true,
        }
    }
}

impl PickerConfig {
    pub fn with_display_size(mut self, size: Size) -> Self {
        self.display_size = size;
        self
    }

    pub fn with_grid_quantum(mut self, quantum: f64) -> Self {
        self.grid_quantum = quantum;
        self
    }

    pub fn with_snap(mut self, snap: bool) -> Self {
        self.snap_to_grid = snap;
        self
    }
}

/// Parse a config value from JSON.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a JSON config file.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    from_json(&json)
}
