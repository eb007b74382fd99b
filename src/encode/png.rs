use std::path::{Path, PathBuf};

use crate::encode::sink::{FrameSink, SinkConfig, check_frame_size, unpremultiply};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{TixelError, TixelResult};
use crate::render::backend::FrameRGBA;

/// Write one frame as a straight-alpha RGBA PNG.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> TixelResult<()> {
    let expected = (frame.width as usize) * (frame.height as usize) * 4;
    if frame.data.len() != expected {
        return Err(TixelError::validation(
            "frame.data size mismatch with width*height*4",
        ));
    }
    let straight;
    let data = if frame.premultiplied {
        let mut buf = vec![0u8; expected];
        unpremultiply(&mut buf, &frame.data)?;
        straight = buf;
        &straight
    } else {
        &frame.data
    };
    save_rgba8(path, data, frame.width, frame.height)
}

fn save_rgba8(path: &Path, data: &[u8], width: u32, height: u32) -> TixelResult<()> {
    use anyhow::Context as _;
    image::save_buffer_with_format(
        path,
        data,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Sink writing `frame_00000.png`, `frame_00001.png`, ... into a directory.
///
/// Files are numbered by push order, not by [`FrameIndex`].
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    scratch: Vec<u8>,
    written: usize,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            scratch: Vec::new(),
            written: 0,
        }
    }

    /// Path of the `n`th file.
    pub fn frame_path(&self, n: usize) -> PathBuf {
        self.dir.join(format!("frame_{n:05}.png"))
    }

    /// Files written since the last `begin`.
    pub fn written(&self) -> usize {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> TixelResult<()> {
        use anyhow::Context as _;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create output directory '{}'", self.dir.display()))?;
        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.cfg = Some(cfg);
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &FrameRGBA) -> TixelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| TixelError::evaluation("png sink not started"))?;
        check_frame_size(cfg, frame)?;
        let (width, height) = (cfg.width, cfg.height);

        if frame.premultiplied {
            unpremultiply(&mut self.scratch, &frame.data)?;
        } else {
            self.scratch.copy_from_slice(&frame.data);
        }
        let path = self.frame_path(self.written);
        save_rgba8(&path, &self.scratch, width, height)?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> TixelResult<()> {
        if self.cfg.take().is_none() {
            return Err(TixelError::evaluation("png sink not started"));
        }
        tracing::debug!(dir = %self.dir.display(), frames = self.written, "png sequence done");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
