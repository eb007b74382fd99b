use std::ffi::OsString;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig, check_frame_size, flatten_premul_over_bg};
use crate::foundation::core::{FrameIndex, Rgba8};
use crate::foundation::error::{TixelError, TixelResult};
use crate::render::backend::FrameRGBA;

/// Where an MP4 goes and what the dots are flattened onto.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output file, replaced if it exists.
    pub out_path: PathBuf,
    /// Opaque color that transparent pixels are composited over.
    pub background: Rgba8,
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>, background: Rgba8) -> Self {
        Self {
            out_path: out_path.into(),
            background,
        }
    }
}

/// A running `ffmpeg` process fed raw RGBA on stdin.
struct Encoder {
    child: Child,
    stdin: ChildStdin,
    cfg: SinkConfig,
    next_min: u64,
}

/// Streams rendered grids to the system `ffmpeg` as H.264 MP4.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
    rgba: Vec<u8>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            rgba: Vec::new(),
        }
    }

    /// Close stdin and wait; a non-zero exit carries ffmpeg's stderr.
    fn finish(encoder: Encoder) -> TixelResult<()> {
        let Encoder { child, stdin, .. } = encoder;
        drop(stdin);
        let out = child
            .wait_with_output()
            .context("wait for ffmpeg to exit")?;
        if out.status.success() {
            return Ok(());
        }
        Err(TixelError::evaluation(format!(
            "ffmpeg exited with {}: {}",
            out.status,
            String::from_utf8_lossy(&out.stderr).trim()
        )))
    }
}

/// Validate the parameters `ffmpeg` needs for H.264 `yuv420p` output.
pub(crate) fn validate_config(cfg: &SinkConfig) -> TixelResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(TixelError::validation("fps must be non-zero"));
    }
    if cfg.width == 0 || cfg.height == 0 {
        return Err(TixelError::validation("mp4 frame size must be non-zero"));
    }
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(TixelError::validation(format!(
            "mp4 frame size must be even, got {}x{}",
            cfg.width, cfg.height
        )));
    }
    Ok(())
}

/// Command line for one encode: opaque RGBA frames in, `yuv420p` H.264 out.
pub(crate) fn encoder_args(cfg: &SinkConfig, out: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-y",
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push("-s".into());
    args.push(format!("{}x{}", cfg.width, cfg.height).into());
    // Input rate has to precede `-i` for rawvideo.
    args.push("-r".into());
    args.push(format!("{}/{}", cfg.fps.num, cfg.fps.den).into());
    args.extend(
        [
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]
        .into_iter()
        .map(OsString::from),
    );
    args.push(out.as_os_str().to_owned());
    args
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> TixelResult<()> {
        validate_config(&cfg)?;
        if self.encoder.is_some() {
            return Err(TixelError::evaluation("ffmpeg sink already started"));
        }
        if let Some(dir) = self.opts.out_path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create output dir '{}'", dir.display()))?;
        }

        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            "spawning ffmpeg"
        );
        let mut child = Command::new("ffmpeg")
            .args(encoder_args(&cfg, &self.opts.out_path))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                TixelError::evaluation(format!("mp4 output needs ffmpeg on PATH: {e}"))
            })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TixelError::evaluation("ffmpeg stdin is not piped"))?;

        self.rgba = vec![0; cfg.width as usize * cfg.height as usize * 4];
        self.encoder = Some(Encoder {
            child,
            stdin,
            cfg,
            next_min: 0,
        });
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TixelResult<()> {
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| TixelError::evaluation("ffmpeg sink not started"))?;
        if idx.0 < encoder.next_min {
            return Err(TixelError::evaluation(format!(
                "frame {} arrived after frame {}",
                idx.0,
                encoder.next_min - 1
            )));
        }
        check_frame_size(&encoder.cfg, frame)?;
        encoder.next_min = idx.0 + 1;

        flatten_premul_over_bg(&mut self.rgba, &frame.data, self.opts.background.to_array())?;
        if let Err(e) = encoder.stdin.write_all(&self.rgba) {
            // ffmpeg went away; its stderr says why.
            if let Some(encoder) = self.encoder.take() {
                Self::finish(encoder)?;
            }
            return Err(TixelError::evaluation(format!(
                "write frame {} to ffmpeg: {e}",
                idx.0
            )));
        }
        Ok(())
    }

    fn end(&mut self) -> TixelResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| TixelError::evaluation("ffmpeg sink not started"))?;
        Self::finish(encoder)
    }
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
