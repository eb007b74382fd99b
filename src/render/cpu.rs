use vello_cpu::kurbo::Shape as _;

use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::error::{TixelError, TixelResult};
use crate::render::backend::FrameRGBA;
use crate::render::surface::DotSurface;

/// Flattening tolerance for circle outlines, in pixels.
const CIRCLE_TOLERANCE: f64 = 0.05;

/// Raster surface powered by `vello_cpu`.
///
/// Draw calls are recorded into a render context; [`CpuSurface::render`]
/// rasterizes them into a premultiplied RGBA8 frame.
pub struct CpuSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    /// Allocate a surface; both sides must be in `1..=65535`.
    pub fn new(width: u32, height: u32) -> TixelResult<Self> {
        let canvas = Canvas::new(width, height)?;
        let w: u16 = canvas.width.try_into().map_err(|_| {
            TixelError::validation(format!("surface width exceeds u16: {width}"))
        })?;
        let h: u16 = canvas.height.try_into().map_err(|_| {
            TixelError::validation(format!("surface height exceeds u16: {height}"))
        })?;
        Ok(Self {
            width: w,
            height: h,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    pub fn from_canvas(canvas: Canvas) -> TixelResult<Self> {
        Self::new(canvas.width, canvas.height)
    }

    /// Rasterize everything drawn since the last background fill.
    pub fn render(&mut self) -> FrameRGBA {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

fn paint(color: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

impl DotSurface for CpuSurface {
    fn width(&self) -> u32 {
        u32::from(self.width)
    }

    fn height(&self) -> u32 {
        u32::from(self.height)
    }

    fn fill_background(&mut self, color: Rgba8) {
        self.ctx.reset();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint(color));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        if !(radius.is_finite() && radius > 0.0) {
            return;
        }
        let circle = vello_cpu::kurbo::Circle::new((center.x, center.y), radius);
        self.ctx.set_paint(paint(color));
        self.ctx.fill_path(&circle.to_path(CIRCLE_TOLERANCE));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
