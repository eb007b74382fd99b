//! UI-facing inputs: new expression text and the "cycle example" trigger.

use crate::clock::Clock;
use crate::presets::PresetLibrary;

/// Holds the text most recently supplied by the user or by cycling, and the
/// cursor into the preset library.
#[derive(Clone, Debug)]
pub struct InteractionBridge {
    pending: String,
    cursor: usize,
    presets: PresetLibrary,
}

impl InteractionBridge {
    pub fn new(initial: impl Into<String>, presets: PresetLibrary) -> Self {
        Self {
            pending: initial.into(),
            cursor: 0,
            presets,
        }
    }

    /// Store `text` as the pending source and return it for compilation.
    pub fn set_expression(&mut self, text: &str) -> &str {
        self.pending.clear();
        self.pending.push_str(text);
        &self.pending
    }

    /// Reset time, load the preset under the cursor, then advance the cursor.
    pub fn cycle_example(&mut self, clock: &mut Clock) -> &str {
        clock.reset();
        let len = self.presets.len();
        if let Some(src) = self.presets.get(self.cursor) {
            self.pending.clear();
            self.pending.push_str(src);
        }
        self.cursor = (self.cursor + 1) % len.max(1);
        tracing::info!(cursor = self.cursor, source = %self.pending, "cycled preset");
        &self.pending
    }

    /// Text most recently supplied.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Index of the preset the next cycle will load.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn presets(&self) -> &PresetLibrary {
        &self.presets
    }
}

#[cfg(test)]
#[path = "../tests/unit/bridge.rs"]
mod tests;
