//! Canvas sizing from the host viewport.

use crate::foundation::core::Canvas;
use crate::foundation::error::{TixelError, TixelResult};

/// Fraction of the viewport width the square canvas occupies.
pub const CANVAS_FRACTION: f64 = 0.5;

/// Host window size in device pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> TixelResult<Self> {
        for (name, v) in [("width", width), ("height", height)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(TixelError::validation(format!(
                    "viewport {name} must be finite and > 0, got {v}"
                )));
            }
        }
        Ok(Self { width, height })
    }

    /// Side of the square canvas, in (possibly fractional) pixels.
    pub fn canvas_side(&self) -> f64 {
        self.width * CANVAS_FRACTION
    }

    /// Square raster canvas, rounded to whole pixels and at least 1x1.
    pub fn raster_canvas(&self) -> TixelResult<Canvas> {
        let side = self.canvas_side().round().max(1.0);
        if side > f64::from(u32::MAX) {
            return Err(TixelError::validation(format!(
                "canvas side too large: {side}"
            )));
        }
        let side = side as u32;
        Canvas::new(side, side)
    }
}

#[cfg(test)]
#[path = "../tests/unit/viewport.rs"]
mod tests;
