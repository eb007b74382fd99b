//! Animation time advanced once per refresh tick.

use crate::foundation::error::{TixelError, TixelResult};

/// Whether [`Clock::tick`] advances time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockState {
    /// Time advances on every tick.
    #[default]
    Running,
    /// Ticks are ignored.
    Paused,
}

/// Monotonic animation time.
///
/// Time only moves forward through [`Clock::tick`]; [`Clock::reset`] is the one
/// way back to zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Clock {
    time: f64,
    incr: f64,
    state: ClockState,
}

impl Clock {
    /// Create a running clock at time 0 advancing `incr` per tick.
    pub fn new(incr: f64) -> TixelResult<Self> {
        validate_incr(incr)?;
        Ok(Self {
            time: 0.0,
            incr,
            state: ClockState::Running,
        })
    }

    /// Clock whose increment is `grid_size / 1000` per tick.
    pub fn for_grid(grid_size: u32) -> TixelResult<Self> {
        Self::new(increment_for_grid(grid_size))
    }

    /// Advance by one tick unless paused. Returns the new time.
    pub fn tick(&mut self) -> f64 {
        if self.state == ClockState::Running {
            self.time += self.incr;
        }
        self.time
    }

    /// Current animation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Per-tick increment.
    pub fn incr(&self) -> f64 {
        self.incr
    }

    /// Change the per-tick increment, keeping the current time.
    pub fn set_incr(&mut self, incr: f64) -> TixelResult<()> {
        validate_incr(incr)?;
        self.incr = incr;
        Ok(())
    }

    /// Set time back to 0. The running state is unchanged.
    pub fn reset(&mut self) {
        self.time = 0.0;
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Stop advancing on ticks.
    pub fn pause(&mut self) {
        self.state = ClockState::Paused;
    }

    /// Resume advancing on ticks.
    pub fn resume(&mut self) {
        self.state = ClockState::Running;
    }

    pub fn is_paused(&self) -> bool {
        self.state == ClockState::Paused
    }
}

/// Per-tick increment used for a grid of `grid_size` cells per side.
pub fn increment_for_grid(grid_size: u32) -> f64 {
    f64::from(grid_size) / 1000.0
}

fn validate_incr(incr: f64) -> TixelResult<()> {
    if !(incr.is_finite() && incr >= 0.0) {
        return Err(TixelError::validation(format!(
            "clock increment must be finite and >= 0, got {incr}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/clock.rs"]
mod tests;
