//! Frame sinks for headless renders.
//!
//! Sinks consume rendered frames in refresh order and are driven by the `tixel` binary.

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Numbered PNG files in a directory.
pub mod png;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
