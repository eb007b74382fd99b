use crate::expression::bytecode::{BuiltinId, BytecodeProgram, INPUT_SLOTS, Op};
use crate::foundation::math::{Fnv1a64, unit_interval};

#[derive(Debug, Clone)]
pub(crate) struct VmError {
    pub(crate) message: String,
}

impl VmError {
    fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for VmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "vm error: {}", self.message)
    }
}

impl std::error::Error for VmError {}

/// Stack and slot storage reused across evaluations.
#[derive(Debug, Default, Clone)]
pub(crate) struct VmScratch {
    stack: Vec<f64>,
    slots: Vec<f64>,
}

/// Sequence state for `random()`; seeded lazily from the inputs.
struct RandomSeq {
    inputs: [f64; 4],
    seed: Option<u64>,
    calls: u64,
}

impl RandomSeq {
    fn next(&mut self) -> f64 {
        let seed = *self.seed.get_or_insert_with(|| {
            let mut h = Fnv1a64::new_default();
            for v in self.inputs {
                h.write_f64(v);
            }
            h.finish()
        });
        let mut h = Fnv1a64::new_default();
        h.write_u64(seed);
        h.write_u64(self.calls);
        self.calls += 1;
        unit_interval(h.finish())
    }
}

pub(crate) fn eval_program(
    p: &BytecodeProgram,
    inputs: [f64; 4],
    scratch: &mut VmScratch,
) -> Result<f64, VmError> {
    let stack = &mut scratch.stack;
    stack.clear();
    let slots = &mut scratch.slots;
    slots.clear();
    slots.extend_from_slice(&inputs);
    slots.resize(usize::from(p.slot_count.max(INPUT_SLOTS)), f64::NAN);

    let mut random = RandomSeq {
        inputs,
        seed: None,
        calls: 0,
    };

    let mut pc = 0usize;
    while let Some(&op) = p.ops.get(pc) {
        pc += 1;
        match op {
            Op::PushConst(idx) => {
                let c = p
                    .consts
                    .get(idx.0 as usize)
                    .copied()
                    .ok_or_else(|| VmError::new("const idx out of range"))?;
                stack.push(c);
            }
            Op::Load(id) => {
                let v = slots
                    .get(usize::from(id.0))
                    .copied()
                    .ok_or_else(|| VmError::new("slot out of range"))?;
                stack.push(v);
            }
            Op::Store(id) => {
                let v = peek(stack)?;
                let slot = slots
                    .get_mut(usize::from(id.0))
                    .ok_or_else(|| VmError::new("slot out of range"))?;
                *slot = v;
            }
            Op::Pop => {
                pop(stack)?;
            }
            Op::Dup => {
                let v = peek(stack)?;
                stack.push(v);
            }

            Op::Neg => unary(stack, |v| -v)?,
            Op::Not => unary(stack, |v| bool_num(!truthy(v)))?,
            Op::BitNot => unary(stack, |v| f64::from(!to_int32(v)))?,

            Op::Add => binary(stack, |a, b| a + b)?,
            Op::Sub => binary(stack, |a, b| a - b)?,
            Op::Mul => binary(stack, |a, b| a * b)?,
            Op::Div => binary(stack, |a, b| a / b)?,
            // Rust's `%` is the truncated remainder, same as JS.
            Op::Mod => binary(stack, |a, b| a % b)?,
            Op::Pow => binary(stack, js_pow)?,
            Op::Shl => binary(stack, |a, b| {
                f64::from(to_int32(a).wrapping_shl(to_uint32(b) & 31))
            })?,
            Op::Shr => binary(stack, |a, b| f64::from(to_int32(a) >> (to_uint32(b) & 31)))?,
            Op::UShr => binary(stack, |a, b| {
                f64::from(to_uint32(a) >> (to_uint32(b) & 31))
            })?,
            Op::BitAnd => binary(stack, |a, b| f64::from(to_int32(a) & to_int32(b)))?,
            Op::BitOr => binary(stack, |a, b| f64::from(to_int32(a) | to_int32(b)))?,
            Op::BitXor => binary(stack, |a, b| f64::from(to_int32(a) ^ to_int32(b)))?,

            Op::Eq => binary(stack, |a, b| bool_num(a == b))?,
            Op::Ne => binary(stack, |a, b| bool_num(a != b))?,
            Op::Lt => binary(stack, |a, b| bool_num(a < b))?,
            Op::Le => binary(stack, |a, b| bool_num(a <= b))?,
            Op::Gt => binary(stack, |a, b| bool_num(a > b))?,
            Op::Ge => binary(stack, |a, b| bool_num(a >= b))?,

            Op::Jump(target) => pc = target as usize,
            Op::JumpIfFalsy(target) => {
                if !truthy(pop(stack)?) {
                    pc = target as usize;
                }
            }
            Op::JumpIfFalsyKeep(target) => {
                if truthy(peek(stack)?) {
                    pop(stack)?;
                } else {
                    pc = target as usize;
                }
            }
            Op::JumpIfTruthyKeep(target) => {
                if truthy(peek(stack)?) {
                    pc = target as usize;
                } else {
                    pop(stack)?;
                }
            }

            Op::CallBuiltin { id, argc } => {
                let argc = usize::from(argc);
                if stack.len() < argc {
                    return Err(VmError::new("stack underflow in builtin call"));
                }
                let base = stack.len() - argc;
                let v = call_builtin(id, &stack[base..], &mut random);
                stack.truncate(base);
                stack.push(v);
            }
        }
    }

    if stack.len() != 1 {
        return Err(VmError::new(format!(
            "stack has {} values at end of program",
            stack.len()
        )));
    }
    pop(stack)
}

fn pop(stack: &mut Vec<f64>) -> Result<f64, VmError> {
    stack.pop().ok_or_else(|| VmError::new("stack underflow"))
}

fn peek(stack: &[f64]) -> Result<f64, VmError> {
    stack
        .last()
        .copied()
        .ok_or_else(|| VmError::new("stack underflow"))
}

fn unary(stack: &mut Vec<f64>, f: impl FnOnce(f64) -> f64) -> Result<(), VmError> {
    let v = pop(stack)?;
    stack.push(f(v));
    Ok(())
}

fn binary(stack: &mut Vec<f64>, f: impl FnOnce(f64, f64) -> f64) -> Result<(), VmError> {
    let b = pop(stack)?;
    let a = pop(stack)?;
    stack.push(f(a, b));
    Ok(())
}

/// `0` and `NaN` are falsy.
pub(crate) fn truthy(v: f64) -> bool {
    v != 0.0 && !v.is_nan()
}

fn bool_num(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

/// ECMAScript ToInt32: truncate, wrap modulo 2^32.
pub(crate) fn to_int32(v: f64) -> i32 {
    if !v.is_finite() {
        return 0;
    }
    let wrapped = v.trunc().rem_euclid(4_294_967_296.0);
    wrapped as u32 as i32
}

pub(crate) fn to_uint32(v: f64) -> u32 {
    to_int32(v) as u32
}

pub(crate) fn js_pow(base: f64, exp: f64) -> f64 {
    if exp.is_nan() {
        return f64::NAN;
    }
    if exp == 0.0 {
        return 1.0;
    }
    if base.abs() == 1.0 && exp.is_infinite() {
        return f64::NAN;
    }
    base.powf(exp)
}

/// Rounds half up, toward +∞.
pub(crate) fn js_round(v: f64) -> f64 {
    if !v.is_finite() {
        return v;
    }
    let f = v.floor();
    if v - f >= 0.5 { f + 1.0 } else { f }
}

fn js_sign(v: f64) -> f64 {
    if v.is_nan() || v == 0.0 { v } else { v.signum() }
}

fn js_max(args: &[f64]) -> f64 {
    let mut acc = f64::NEG_INFINITY;
    for &v in args {
        if v.is_nan() {
            return f64::NAN;
        }
        // +0 beats -0.
        if v > acc || (v == 0.0 && acc == 0.0 && acc.is_sign_negative()) {
            acc = v;
        }
    }
    acc
}

fn js_min(args: &[f64]) -> f64 {
    let mut acc = f64::INFINITY;
    for &v in args {
        if v.is_nan() {
            return f64::NAN;
        }
        if v < acc || (v == 0.0 && acc == 0.0 && v.is_sign_negative()) {
            acc = v;
        }
    }
    acc
}

fn js_hypot(args: &[f64]) -> f64 {
    if args.iter().any(|v| v.is_infinite()) {
        return f64::INFINITY;
    }
    if args.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    args.iter().fold(0.0, |acc: f64, &v| acc.hypot(v))
}

fn call_builtin(id: BuiltinId, args: &[f64], random: &mut RandomSeq) -> f64 {
    let arg = |k: usize| args.get(k).copied().unwrap_or(f64::NAN);
    let x = arg(0);
    match id {
        BuiltinId::Abs => x.abs(),
        BuiltinId::Acos => x.acos(),
        BuiltinId::Acosh => x.acosh(),
        BuiltinId::Asin => x.asin(),
        BuiltinId::Asinh => x.asinh(),
        BuiltinId::Atan => x.atan(),
        BuiltinId::Atanh => x.atanh(),
        BuiltinId::Atan2 => x.atan2(arg(1)),
        BuiltinId::Cbrt => x.cbrt(),
        BuiltinId::Ceil => x.ceil(),
        BuiltinId::Clz32 => f64::from(to_uint32(x).leading_zeros()),
        BuiltinId::Cos => x.cos(),
        BuiltinId::Cosh => x.cosh(),
        BuiltinId::Exp => x.exp(),
        BuiltinId::Expm1 => x.exp_m1(),
        BuiltinId::Floor => x.floor(),
        BuiltinId::Fround => f64::from(x as f32),
        BuiltinId::Hypot => js_hypot(args),
        BuiltinId::Imul => f64::from(to_int32(x).wrapping_mul(to_int32(arg(1)))),
        BuiltinId::Log => x.ln(),
        BuiltinId::Log1p => x.ln_1p(),
        BuiltinId::Log10 => x.log10(),
        BuiltinId::Log2 => x.log2(),
        BuiltinId::Max => js_max(args),
        BuiltinId::Min => js_min(args),
        BuiltinId::Pow => js_pow(x, arg(1)),
        BuiltinId::Random => random.next(),
        BuiltinId::Round => js_round(x),
        BuiltinId::Sign => js_sign(x),
        BuiltinId::Sin => x.sin(),
        BuiltinId::Sinh => x.sinh(),
        BuiltinId::Sqrt => x.sqrt(),
        BuiltinId::Tan => x.tan(),
        BuiltinId::Tanh => x.tanh(),
        BuiltinId::Trunc => x.trunc(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/vm.rs"]
mod tests;
