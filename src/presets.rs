//! The ordered library of preset expressions stepped through by "cycle".

use crate::expression::compile::{CompiledFn, compile};
use crate::foundation::error::{TixelError, TixelResult};

/// Expression installed when nothing else is configured.
pub const DEFAULT_EXPRESSION: &str = "hypot(x-=t%4*5,y-=8)<6&&x<y|y<-x";

/// Built-in presets, in cycling order.
pub const BUILTIN_PRESETS: &[&str] = &[
    "random()<0.1",
    "random()",
    "sin(t)",
    "i/256",
    "x/16",
    "y-7.5",
    "y-t",
    "y-t*4",
    "sin(t-sqrt((x-7.5)**2+(y-6)**2))",
    "sin(y/8+t)",
    "y-x",
    "(y>x)&&(14-x<y)",
    "i%4-y%4",
    "x%4&&y%4",
    "x>3&y>3&x<12&y<12",
    "-(x>t&y>t&x<15-t&y<15-t)",
    "(y-6)*(x-6)",
    "(y-4*t|0)*(x-2-t|0)",
    "4*t&i&x&y",
    "(t*10)&(1<<x)&&y==8",
    "random()*2-1",
    "sin(i**2)",
    "cos(t+i+x*y)",
    "sin(x/2)-sin(x-t)-y+6",
    "(x-8)*(y-8)-sin(t)*64",
    "-.4/(hypot(x-t%10,y-t%8)-t%2*9)",
    "sin(t-hypot(x-7.5,y-7.5))",
    "1/32*tan(t/64*x*tan(i-x))",
    "8*t%13-hypot(x-7.5,y-7.5)",
    "(x-y)-sin(t)*16",
    "(x-y)/24-sin(t)",
    "d=y*y%5.9+1,!((x+t*50/d)&15)/d",
    DEFAULT_EXPRESSION,
];

/// Fixed, non-empty, ordered sequence of preset sources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresetLibrary {
    entries: Vec<String>,
}

impl PresetLibrary {
    /// Build a library. Fails if `entries` is empty.
    ///
    /// Entries are not required to compile; a broken preset is simply
    /// rejected when cycled to, like any other offered text.
    pub fn new(entries: Vec<String>) -> TixelResult<Self> {
        if entries.is_empty() {
            return Err(TixelError::validation("preset library must not be empty"));
        }
        Ok(Self { entries })
    }

    /// The built-in library.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_PRESETS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    /// Preset at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(String::as_str)
    }

    /// Indices and rejections of presets that would not be accepted.
    pub fn invalid_entries(&self) -> Vec<(usize, String)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(idx, src)| match compile(src) {
                CompiledFn::Program(_) => None,
                CompiledFn::Error(r) => Some((idx, r.to_string())),
            })
            .collect()
    }
}

impl Default for PresetLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "../tests/unit/presets.rs"]
mod tests;
