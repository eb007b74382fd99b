use crate::expression::compile::{CompiledFn, EvalScratch};
use crate::foundation::core::Rgba8;
use crate::grid::Cell;
use crate::render::surface::DotSurface;

/// Colors used by the frame renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Full-surface fill at the start of each frame.
    pub background: Rgba8,
    /// Dots whose clamped value is `> 0`.
    pub positive: Rgba8,
    /// Dots whose clamped value is `< 0`.
    pub negative: Rgba8,
}

impl Palette {
    /// Gray 800.
    pub const DEFAULT_BACKGROUND: Rgba8 = Rgba8::rgb(0x1a, 0x20, 0x2c);
    /// Purple 200.
    pub const DEFAULT_POSITIVE: Rgba8 = Rgba8::rgb(0xd6, 0xbc, 0xfa);
    /// Tomato.
    pub const DEFAULT_NEGATIVE: Rgba8 = Rgba8::rgb(0xff, 0x63, 0x47);

    /// Color for a clamped value.
    pub fn dot_color(&self, clamped: f64) -> Rgba8 {
        if clamped > 0.0 {
            self.positive
        } else {
            self.negative
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Self::DEFAULT_BACKGROUND,
            positive: Self::DEFAULT_POSITIVE,
            negative: Self::DEFAULT_NEGATIVE,
        }
    }
}

/// Linear clamp to `[-1, 1]`. `NaN` passes through.
pub fn clamp_unit(raw: f64) -> f64 {
    if raw <= -1.0 {
        -1.0
    } else if raw >= 1.0 {
        1.0
    } else {
        raw
    }
}

/// Per-frame counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct FrameStats {
    /// Cells evaluated.
    pub cells: usize,
    /// Dots drawn with the positive color.
    pub positive: usize,
    /// Dots drawn with the negative color.
    pub negative: usize,
    /// Cells whose clamped value was zero (radius 0, nothing drawn).
    pub empty: usize,
    /// Cells whose value was `NaN` (nothing drawn).
    pub skipped: usize,
}

impl FrameStats {
    /// Dots actually drawn.
    pub fn drawn(&self) -> usize {
        self.positive + self.negative
    }
}

/// Paint one full frame: background, then one dot per cell.
///
/// Never fails on expression values; `NaN` results and zero radii draw nothing.
pub fn render_frame<S: DotSurface + ?Sized>(
    surface: &mut S,
    cells: &[Cell],
    handle: &CompiledFn,
    time: f64,
    max_radius: f64,
    palette: &Palette,
    scratch: &mut EvalScratch,
) -> FrameStats {
    surface.fill_background(palette.background);

    let mut stats = FrameStats {
        cells: cells.len(),
        ..FrameStats::default()
    };
    for cell in cells {
        let raw = handle.eval_with(
            scratch,
            time,
            f64::from(cell.index),
            f64::from(cell.col),
            f64::from(cell.row),
        );
        if raw.is_nan() {
            stats.skipped += 1;
            continue;
        }
        let clamped = clamp_unit(raw);
        let radius = max_radius * clamped.abs();
        if radius == 0.0 {
            stats.empty += 1;
            continue;
        }
        if clamped > 0.0 {
            stats.positive += 1;
        } else {
            stats.negative += 1;
        }
        surface.fill_circle(cell.center(), radius, palette.dot_color(clamped));
    }
    stats
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
