use std::sync::Arc;

use crate::expression::compile::{CompiledFn, EvalScratch, Program, Rejection, compile};

/// What happened when a source string was offered to an [`ExpressionSlot`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The text compiled and validated; it is now the active program.
    Replaced,
    /// Same text as the previous offer; nothing was recompiled.
    Unchanged,
    /// The text was rejected and the previous program stays active.
    Rejected(Rejection),
}

impl SwapOutcome {
    /// Whether the active program changed.
    pub fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced)
    }
}

/// Holds the single active program.
///
/// Replaced only by a successful compile; a rejected offer leaves it alone.
#[derive(Debug)]
pub struct ExpressionSlot {
    active: Arc<Program>,
    generation: u64,
    last_offered: String,
    last_rejection: Option<Rejection>,
}

impl ExpressionSlot {
    /// Build a slot around an initial expression, which must compile.
    pub fn new(initial: &str) -> Result<Self, Rejection> {
        match compile(initial) {
            CompiledFn::Program(active) => Ok(Self {
                active,
                generation: 0,
                last_offered: initial.to_owned(),
                last_rejection: None,
            }),
            CompiledFn::Error(r) => Err(Rejection::clone(&r)),
        }
    }

    /// Offer new source text. Repeats of the previous offer are ignored.
    pub fn offer(&mut self, source: &str) -> SwapOutcome {
        if source == self.last_offered {
            return SwapOutcome::Unchanged;
        }
        self.last_offered.clear();
        self.last_offered.push_str(source);

        match compile(source) {
            CompiledFn::Program(p) => {
                self.active = p;
                self.generation += 1;
                self.last_rejection = None;
                tracing::info!(generation = self.generation, source, "expression replaced");
                SwapOutcome::Replaced
            }
            CompiledFn::Error(r) => {
                let r = Rejection::clone(&r);
                self.last_rejection = Some(r.clone());
                SwapOutcome::Rejected(r)
            }
        }
    }

    /// Current program handle.
    pub fn active(&self) -> &Arc<Program> {
        &self.active
    }

    /// Callable handle sharing the active program.
    pub fn handle(&self) -> CompiledFn {
        CompiledFn::Program(Arc::clone(&self.active))
    }

    /// Source of the active program.
    pub fn active_source(&self) -> &str {
        self.active.source()
    }

    /// Number of successful replacements since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Most recently offered text, accepted or not.
    pub fn last_offered(&self) -> &str {
        &self.last_offered
    }

    /// Why the most recent offer was rejected, if it was.
    pub fn last_rejection(&self) -> Option<&Rejection> {
        self.last_rejection.as_ref()
    }

    /// Evaluate the active program.
    pub fn eval_with(&self, scratch: &mut EvalScratch, t: f64, i: f64, x: f64, y: f64) -> f64 {
        self.active.eval_with(scratch, t, i, x, y)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/slot.rs"]
mod tests;
