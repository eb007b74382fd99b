use std::fmt;
use std::sync::Arc;

use crate::expression::bind::bind_script;
use crate::expression::bytecode::{BytecodeProgram, INPUT_SLOTS};
use crate::expression::lexer::ExprError;
use crate::expression::lower::lower_to_bytecode;
use crate::expression::parser::parse_script;
use crate::expression::vm::{VmScratch, eval_program};

/// Inputs `(t, i, x, y)` used to smoke-test a freshly compiled program.
pub const CANARY_INPUT: [f64; 4] = [1.0, 1.0, 1.0, 1.0];

/// Character accepted in place of `;` so programs fit on one line.
pub const STATEMENT_SEPARATOR: char = '\\';

/// Longest source text, in bytes, that is worth compiling.
pub const MAX_SOURCE_LEN: usize = 4096;

#[derive(Debug)]
pub(crate) struct ExprCompileError {
    pub(crate) offset: Option<usize>,
    pub(crate) message: String,
}

impl ExprCompileError {
    fn new(msg: impl Into<String>) -> Self {
        Self {
            offset: None,
            message: msg.into(),
        }
    }
}

impl fmt::Display for ExprCompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(at) => write!(f, "expr compile error at byte {at}: {}", self.message),
            None => write!(f, "expr compile error: {}", self.message),
        }
    }
}

impl std::error::Error for ExprCompileError {}

impl From<ExprError> for ExprCompileError {
    fn from(e: ExprError) -> Self {
        Self {
            offset: Some(e.offset),
            message: e.message,
        }
    }
}

/// Reusable evaluation buffers for [`Program::eval_with`].
#[derive(Debug, Default, Clone)]
pub struct EvalScratch(VmScratch);

impl EvalScratch {
    /// Create empty scratch storage.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A validated expression compiled to bytecode.
#[derive(Debug)]
pub struct Program {
    source: String,
    bytecode: BytecodeProgram,
}

impl Program {
    /// Source text exactly as it was offered (before separator translation).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of local variables the program assigns.
    pub fn local_count(&self) -> usize {
        usize::from(self.bytecode.slot_count.saturating_sub(INPUT_SLOTS))
    }

    /// Evaluate with fresh scratch storage.
    pub fn eval(&self, t: f64, i: f64, x: f64, y: f64) -> f64 {
        self.eval_with(&mut EvalScratch::new(), t, i, x, y)
    }

    /// Evaluate reusing `scratch`. Internal VM faults read as `NaN`.
    pub fn eval_with(&self, scratch: &mut EvalScratch, t: f64, i: f64, x: f64, y: f64) -> f64 {
        eval_program(&self.bytecode, [t, i, x, y], &mut scratch.0).unwrap_or(f64::NAN)
    }
}

/// Why a candidate expression was not accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The text failed to lex, parse, or resolve.
    Invalid {
        /// Byte offset into the translated source, when known.
        offset: Option<usize>,
        /// Human-readable reason.
        message: String,
    },
    /// The canary evaluation produced `NaN`.
    NotANumber,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid {
                offset: Some(at),
                message,
            } => write!(f, "invalid expression at byte {at}: {message}"),
            Self::Invalid {
                offset: None,
                message,
            } => write!(f, "invalid expression: {message}"),
            Self::NotANumber => write!(
                f,
                "expression evaluates to NaN at t=1, i=1, x=1, y=1"
            ),
        }
    }
}

impl From<ExprCompileError> for Rejection {
    fn from(e: ExprCompileError) -> Self {
        Self::Invalid {
            offset: e.offset,
            message: e.message,
        }
    }
}

/// Result of [`compile`]: a callable program or the error sentinel.
#[derive(Clone, Debug)]
pub enum CompiledFn {
    /// Validated program.
    Program(Arc<Program>),
    /// Sentinel that evaluates to `NaN` everywhere.
    Error(Arc<Rejection>),
}

impl CompiledFn {
    /// Evaluate; the sentinel yields `NaN`.
    pub fn eval(&self, t: f64, i: f64, x: f64, y: f64) -> f64 {
        match self {
            Self::Program(p) => p.eval(t, i, x, y),
            Self::Error(_) => f64::NAN,
        }
    }

    /// Evaluate reusing `scratch`; the sentinel yields `NaN`.
    pub fn eval_with(&self, scratch: &mut EvalScratch, t: f64, i: f64, x: f64, y: f64) -> f64 {
        match self {
            Self::Program(p) => p.eval_with(scratch, t, i, x, y),
            Self::Error(_) => f64::NAN,
        }
    }

    /// Whether this is the error sentinel.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The compiled program, if any.
    pub fn program(&self) -> Option<&Arc<Program>> {
        match self {
            Self::Program(p) => Some(p),
            Self::Error(_) => None,
        }
    }

    /// The rejection reason, if this is the sentinel.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Program(_) => None,
            Self::Error(r) => Some(r),
        }
    }
}

/// Compile `source` into a callable. Never fails: invalid text, or a program
/// that yields `NaN` at [`CANARY_INPUT`], comes back as [`CompiledFn::Error`].
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn compile(source: &str) -> CompiledFn {
    let program = match try_compile(source) {
        Ok(p) => p,
        Err(e) => {
            tracing::debug!(error = %e, source, "expression rejected");
            return CompiledFn::Error(Arc::new(e.into()));
        }
    };

    let [t, i, x, y] = CANARY_INPUT;
    if program.eval(t, i, x, y).is_nan() {
        tracing::debug!(source, "expression rejected: NaN at canary input");
        return CompiledFn::Error(Arc::new(Rejection::NotANumber));
    }
    CompiledFn::Program(Arc::new(program))
}

pub(crate) fn try_compile(source: &str) -> Result<Program, ExprCompileError> {
    if source.len() > MAX_SOURCE_LEN {
        return Err(ExprCompileError::new(format!(
            "expression is {} bytes, longer than the {MAX_SOURCE_LEN} byte limit",
            source.len()
        )));
    }
    let translated = translate_separators(source);
    let script = parse_script(&translated)?;
    let bound = bind_script(script)?;
    let bytecode = lower_to_bytecode(&bound)?;
    if bytecode.ops.is_empty() {
        return Err(ExprCompileError::new("program produced no bytecode"));
    }
    Ok(Program {
        source: source.to_owned(),
        bytecode,
    })
}

fn translate_separators(source: &str) -> String {
    source.replace(STATEMENT_SEPARATOR, ";")
}

#[cfg(test)]
#[path = "../../tests/unit/expression/compile.rs"]
mod tests;
