use crate::expression::bytecode::{BuiltinId, SlotId};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Lit(f64),
    /// A dotted identifier path as written: `x`, `Math.PI`, `Math.sin`.
    Path {
        segments: Vec<String>,
        offset: usize,
    },
    /// Resolved variable reference (input or local).
    Slot(SlotId),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// `target = value` when `op` is `None`, otherwise `target op= value`.
    Assign {
        target: Place,
        op: Option<BinaryOp>,
        value: Box<Expr>,
    },
    /// `++`/`--` in prefix or postfix position.
    Update {
        target: Place,
        delta: f64,
        prefix: bool,
    },
    Call {
        callee: Callee,
        args: Vec<Expr>,
        offset: usize,
    },
    Sequence(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Place {
    Path { segments: Vec<String>, offset: usize },
    Slot(SlotId),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Callee {
    Path(Vec<String>),
    Builtin(BuiltinId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogicalOp {
    And,
    Or,
}

/// Statements in source order; the last one yields the program's value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Script {
    pub(crate) statements: Vec<Expr>,
}
