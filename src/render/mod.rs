//! Drawing targets and the per-frame dot renderer.

pub mod backend;
pub mod cpu;
pub mod frame;
pub mod surface;
