use crate::foundation::core::{Point, Rgba8};

/// The 2D drawing target a frame is painted onto.
///
/// Sizes are device pixels and are fixed before the first render.
pub trait DotSurface {
    /// Width in device pixels.
    fn width(&self) -> u32;
    /// Height in device pixels.
    fn height(&self) -> u32;
    /// Fill the whole surface with `color`, discarding previous contents.
    fn fill_background(&mut self, color: Rgba8);
    /// Fill a circle of `radius` pixels centered at `center`.
    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8);
}

/// One call recorded by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Background(Rgba8),
    Circle {
        center: Point,
        radius: f64,
        color: Rgba8,
    },
}

/// Surface that records draw calls instead of rasterizing them.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    /// Calls since the last background fill (or since creation).
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Recorded circles as `(center, radius, color)`.
    pub fn circles(&self) -> impl Iterator<Item = (Point, f64, Rgba8)> + '_ {
        self.calls.iter().filter_map(|c| match *c {
            DrawCall::Circle {
                center,
                radius,
                color,
            } => Some((center, radius, color)),
            DrawCall::Background(_) => None,
        })
    }

    /// Color of the most recent background fill.
    pub fn background(&self) -> Option<Rgba8> {
        self.calls.iter().rev().find_map(|c| match *c {
            DrawCall::Background(color) => Some(color),
            DrawCall::Circle { .. } => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl DotSurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_background(&mut self, color: Rgba8) {
        // A full repaint makes everything before it invisible.
        self.calls.clear();
        self.calls.push(DrawCall::Background(color));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
        });
    }
}
