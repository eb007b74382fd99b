#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ConstIdx(pub(crate) u32);

/// Variable slot. `0..4` are the inputs `t, i, x, y`; locals follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct SlotId(pub(crate) u16);

/// Number of input slots preceding the locals.
pub(crate) const INPUT_SLOTS: u16 = 4;

/// Whitelisted `Math` functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BuiltinId {
    Abs,
    Acos,
    Acosh,
    Asin,
    Asinh,
    Atan,
    Atanh,
    Atan2,
    Cbrt,
    Ceil,
    Clz32,
    Cos,
    Cosh,
    Exp,
    Expm1,
    Floor,
    Fround,
    Hypot,
    Imul,
    Log,
    Log1p,
    Log10,
    Log2,
    Max,
    Min,
    Pow,
    Random,
    Round,
    Sign,
    Sin,
    Sinh,
    Sqrt,
    Tan,
    Tanh,
    Trunc,
}

impl BuiltinId {
    pub(crate) const ALL: [BuiltinId; 35] = [
        Self::Abs,
        Self::Acos,
        Self::Acosh,
        Self::Asin,
        Self::Asinh,
        Self::Atan,
        Self::Atanh,
        Self::Atan2,
        Self::Cbrt,
        Self::Ceil,
        Self::Clz32,
        Self::Cos,
        Self::Cosh,
        Self::Exp,
        Self::Expm1,
        Self::Floor,
        Self::Fround,
        Self::Hypot,
        Self::Imul,
        Self::Log,
        Self::Log1p,
        Self::Log10,
        Self::Log2,
        Self::Max,
        Self::Min,
        Self::Pow,
        Self::Random,
        Self::Round,
        Self::Sign,
        Self::Sin,
        Self::Sinh,
        Self::Sqrt,
        Self::Tan,
        Self::Tanh,
        Self::Trunc,
    ];

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::Acos => "acos",
            Self::Acosh => "acosh",
            Self::Asin => "asin",
            Self::Asinh => "asinh",
            Self::Atan => "atan",
            Self::Atanh => "atanh",
            Self::Atan2 => "atan2",
            Self::Cbrt => "cbrt",
            Self::Ceil => "ceil",
            Self::Clz32 => "clz32",
            Self::Cos => "cos",
            Self::Cosh => "cosh",
            Self::Exp => "exp",
            Self::Expm1 => "expm1",
            Self::Floor => "floor",
            Self::Fround => "fround",
            Self::Hypot => "hypot",
            Self::Imul => "imul",
            Self::Log => "log",
            Self::Log1p => "log1p",
            Self::Log10 => "log10",
            Self::Log2 => "log2",
            Self::Max => "max",
            Self::Min => "min",
            Self::Pow => "pow",
            Self::Random => "random",
            Self::Round => "round",
            Self::Sign => "sign",
            Self::Sin => "sin",
            Self::Sinh => "sinh",
            Self::Sqrt => "sqrt",
            Self::Tan => "tan",
            Self::Tanh => "tanh",
            Self::Trunc => "trunc",
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }
}

/// Named `Math` constants.
pub(crate) const MATH_CONSTANTS: [(&str, f64); 8] = [
    ("PI", std::f64::consts::PI),
    ("E", std::f64::consts::E),
    ("LN2", std::f64::consts::LN_2),
    ("LN10", std::f64::consts::LN_10),
    ("LOG2E", std::f64::consts::LOG2_E),
    ("LOG10E", std::f64::consts::LOG10_E),
    ("SQRT1_2", std::f64::consts::FRAC_1_SQRT_2),
    ("SQRT2", std::f64::consts::SQRT_2),
];

/// Global value names available without the `Math.` prefix only.
pub(crate) const GLOBAL_CONSTANTS: [(&str, f64); 3] = [
    ("NaN", f64::NAN),
    ("Infinity", f64::INFINITY),
    ("undefined", f64::NAN),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    PushConst(ConstIdx),
    Load(SlotId),
    /// Write the top of stack into a slot, leaving it on the stack.
    Store(SlotId),
    Pop,
    Dup,

    Neg,
    Not,
    BitNot,

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

    /// Unconditional forward jump to an op index.
    Jump(u32),
    /// Pop the condition and jump when it is falsy.
    JumpIfFalsy(u32),
    /// Jump keeping the value when falsy, otherwise pop it (`&&`).
    JumpIfFalsyKeep(u32),
    /// Jump keeping the value when truthy, otherwise pop it (`||`).
    JumpIfTruthyKeep(u32),

    CallBuiltin { id: BuiltinId, argc: u8 },
}

#[derive(Debug, Clone)]
pub(crate) struct BytecodeProgram {
    pub(crate) ops: Vec<Op>,
    pub(crate) consts: Vec<f64>,
    /// Inputs plus locals.
    pub(crate) slot_count: u16,
}

impl BytecodeProgram {
    pub(crate) fn new(slot_count: u16) -> Self {
        Self {
            ops: Vec::new(),
            consts: Vec::new(),
            slot_count,
        }
    }

    pub(crate) fn push_const(&mut self, c: f64) -> ConstIdx {
        // Reuse identical constants; compare bits so NaN dedups too.
        if let Some(i) = self.consts.iter().position(|v| v.to_bits() == c.to_bits()) {
            return ConstIdx(i as u32);
        }
        let idx = ConstIdx(self.consts.len() as u32);
        self.consts.push(c);
        idx
    }

    /// Index the next pushed op will get.
    pub(crate) fn here(&self) -> u32 {
        self.ops.len() as u32
    }

    /// Point a previously emitted jump at `target`.
    pub(crate) fn patch_jump(&mut self, at: u32, target: u32) {
        if let Some(op) = self.ops.get_mut(at as usize) {
            match op {
                Op::Jump(t)
                | Op::JumpIfFalsy(t)
                | Op::JumpIfFalsyKeep(t)
                | Op::JumpIfTruthyKeep(t) => *t = target,
                _ => {}
            }
        }
    }
}
