//! JSON-facing engine configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{TixelError, TixelResult};
use crate::grid::check_grid_size;
use crate::presets::{BUILTIN_PRESETS, DEFAULT_EXPRESSION, PresetLibrary};
use crate::render::frame::Palette;
use crate::viewport::Viewport;

/// Everything needed to build an [`crate::Engine`].
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Cells per side.
    pub grid_size: u32,
    /// Host viewport width; the canvas is half of it unless `canvas` is set.
    pub viewport_width: f64,
    /// Explicit raster canvas size, overriding `viewport_width`.
    pub canvas: Option<Canvas>,
    pub palette: Palette,
    /// Expression active before any user input. Must compile.
    pub initial_expression: String,
    /// Ordered preset sources for cycling. Must be non-empty.
    pub presets: Vec<String>,
    /// Start with the clock paused.
    pub start_paused: bool,
    /// Output frame rate for encoded renders.
    pub fps: Fps,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: 16,
            viewport_width: 640.0,
            canvas: None,
            palette: Palette::default(),
            initial_expression: DEFAULT_EXPRESSION.to_owned(),
            presets: BUILTIN_PRESETS.iter().map(|s| (*s).to_owned()).collect(),
            start_paused: false,
            fps: Fps { num: 60, den: 1 },
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> TixelResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| TixelError::serde(format!("parse engine config JSON: {e}")))
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json_str(s: &str) -> TixelResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| TixelError::serde(format!("parse engine config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> TixelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TixelError::validation(format!("open engine config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check value ranges. Does not compile the initial expression.
    pub fn validate(&self) -> TixelResult<()> {
        check_grid_size(self.grid_size)?;
        if self.presets.is_empty() {
            return Err(TixelError::validation("presets must not be empty"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        self.canvas()?;
        Ok(())
    }

    /// Raster canvas the engine lays the grid out on.
    pub fn canvas(&self) -> TixelResult<Canvas> {
        match self.canvas {
            Some(c) => Canvas::new(c.width, c.height),
            None => Viewport::new(self.viewport_width, self.viewport_width)?.raster_canvas(),
        }
    }

    pub fn preset_library(&self) -> TixelResult<PresetLibrary> {
        PresetLibrary::new(self.presets.clone())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
