//! tixel renders an animated grid of dots driven by a one-line math expression.
//!
//! Every refresh the active expression is sampled at each cell with the inputs
//! `t` (animation time), `i` (flat cell index), `x` (column) and `y` (row). The
//! result, clamped to `[-1, 1]`, sets the dot's radius; its sign picks the color.
//!
//! - Build an [`Engine`] from an [`EngineConfig`]
//! - Drive it with [`Engine::refresh`] against any [`DotSurface`]
//! - Feed it new text with [`Engine::set_expression`] or step through presets
//!   with [`Engine::cycle_example`]
//!
//! Expressions are compiled by a small whitelisted grammar, never executed as
//! host code. Text that fails to compile, or evaluates to `NaN` at the canary
//! input, leaves the previous expression active.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod expression;

/// Interaction inputs: expression text and preset cycling.
pub mod bridge;
/// Animation time.
pub mod clock;
/// JSON-facing configuration.
pub mod config;
/// Frame sinks (in-memory, PNG sequence, ffmpeg MP4).
pub mod encode;
/// Composition root.
pub mod engine;
/// Grid geometry.
pub mod grid;
/// Built-in and configured preset expressions.
pub mod presets;
/// Surfaces and the frame renderer.
pub mod render;
/// Refresh registrations.
pub mod scheduler;
/// Canvas sizing from the viewport.
pub mod viewport;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Rgba8};
pub use crate::foundation::error::{TixelError, TixelResult};

pub use crate::expression::compile::{
    CANARY_INPUT, CompiledFn, EvalScratch, MAX_SOURCE_LEN, Program, Rejection, STATEMENT_SEPARATOR,
    compile,
};
pub use crate::expression::slot::{ExpressionSlot, SwapOutcome};

pub use crate::bridge::InteractionBridge;
pub use crate::clock::{Clock, ClockState};
pub use crate::config::EngineConfig;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::png::{PngSequenceSink, write_png};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::engine::{Engine, EngineTask};
pub use crate::grid::{Cell, DOT_FILL, GridConfig, GridLayout, MAX_GRID_SIZE, compute_cells};
pub use crate::presets::{BUILTIN_PRESETS, DEFAULT_EXPRESSION, PresetLibrary};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::cpu::CpuSurface;
pub use crate::render::frame::{FrameStats, Palette, clamp_unit, render_frame};
pub use crate::render::surface::{DotSurface, DrawCall, RecordingSurface};
pub use crate::scheduler::{RefreshId, RefreshScheduler, RepeatingTask};
pub use crate::viewport::Viewport;
