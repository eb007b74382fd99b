use crate::expression::ast::{BinaryOp, Callee, Expr, LogicalOp, Place, UnaryOp};
use crate::expression::bind::BoundScript;
use crate::expression::bytecode::{BytecodeProgram, Op, SlotId};
use crate::expression::lexer::ExprError;

pub(crate) fn lower_to_bytecode(script: &BoundScript) -> Result<BytecodeProgram, ExprError> {
    let mut p = BytecodeProgram::new(script.slot_count());
    let Some((last, init)) = script.statements.split_last() else {
        return Err(ExprError::new(0, "empty program"));
    };
    for s in init {
        lower_expr(s, &mut p)?;
        p.ops.push(Op::Pop);
    }
    lower_expr(last, &mut p)?;
    Ok(p)
}

fn lower_expr(e: &Expr, out: &mut BytecodeProgram) -> Result<(), ExprError> {
    match e {
        Expr::Lit(v) => {
            let idx = out.push_const(*v);
            out.ops.push(Op::PushConst(idx));
        }
        Expr::Slot(id) => out.ops.push(Op::Load(*id)),
        Expr::Path { offset, .. } => {
            return Err(ExprError::new(
                *offset,
                "unresolved path in lowering; bind names before lowering",
            ));
        }
        Expr::Unary { op, expr } => {
            lower_expr(expr, out)?;
            match op {
                // Every value is already a number.
                UnaryOp::Plus => {}
                UnaryOp::Neg => out.ops.push(Op::Neg),
                UnaryOp::Not => out.ops.push(Op::Not),
                UnaryOp::BitNot => out.ops.push(Op::BitNot),
            }
        }
        Expr::Binary { op, left, right } => {
            lower_expr(left, out)?;
            lower_expr(right, out)?;
            out.ops.push(binary_op(*op));
        }
        Expr::Logical { op, left, right } => {
            lower_expr(left, out)?;
            let jump_at = out.here();
            out.ops.push(match op {
                LogicalOp::And => Op::JumpIfFalsyKeep(0),
                LogicalOp::Or => Op::JumpIfTruthyKeep(0),
            });
            lower_expr(right, out)?;
            let end = out.here();
            out.patch_jump(jump_at, end);
        }
        Expr::Conditional {
            test,
            then,
            otherwise,
        } => {
            lower_expr(test, out)?;
            let to_else = out.here();
            out.ops.push(Op::JumpIfFalsy(0));
            lower_expr(then, out)?;
            let to_end = out.here();
            out.ops.push(Op::Jump(0));
            let else_start = out.here();
            out.patch_jump(to_else, else_start);
            lower_expr(otherwise, out)?;
            let end = out.here();
            out.patch_jump(to_end, end);
        }
        Expr::Assign { target, op, value } => {
            let slot = place_slot(target)?;
            match op {
                None => lower_expr(value, out)?,
                Some(op) => {
                    out.ops.push(Op::Load(slot));
                    lower_expr(value, out)?;
                    out.ops.push(binary_op(*op));
                }
            }
            out.ops.push(Op::Store(slot));
        }
        Expr::Update {
            target,
            delta,
            prefix,
        } => {
            let slot = place_slot(target)?;
            let one = out.push_const(delta.abs());
            let step = if *delta < 0.0 { Op::Sub } else { Op::Add };
            out.ops.push(Op::Load(slot));
            if *prefix {
                out.ops.extend([Op::PushConst(one), step, Op::Store(slot)]);
            } else {
                // Leave the old value underneath the stored one.
                out.ops
                    .extend([Op::Dup, Op::PushConst(one), step, Op::Store(slot), Op::Pop]);
            }
        }
        Expr::Call {
            callee,
            args,
            offset,
        } => {
            let Callee::Builtin(id) = callee else {
                return Err(ExprError::new(
                    *offset,
                    "unresolved call target in lowering",
                ));
            };
            let argc = u8::try_from(args.len()).map_err(|_| {
                ExprError::new(*offset, format!("too many arguments to {}", id.name()))
            })?;
            for a in args {
                lower_expr(a, out)?;
            }
            out.ops.push(Op::CallBuiltin { id: *id, argc });
        }
        Expr::Sequence(items) => {
            let Some((last, init)) = items.split_last() else {
                return Err(ExprError::new(0, "empty sequence"));
            };
            for a in init {
                lower_expr(a, out)?;
                out.ops.push(Op::Pop);
            }
            lower_expr(last, out)?;
        }
    }
    Ok(())
}

fn place_slot(target: &Place) -> Result<SlotId, ExprError> {
    match target {
        Place::Slot(id) => Ok(*id),
        Place::Path { offset, .. } => Err(ExprError::new(
            *offset,
            "unresolved assignment target in lowering",
        )),
    }
}

fn binary_op(op: BinaryOp) -> Op {
    match op {
        BinaryOp::Add => Op::Add,
        BinaryOp::Sub => Op::Sub,
        BinaryOp::Mul => Op::Mul,
        BinaryOp::Div => Op::Div,
        BinaryOp::Mod => Op::Mod,
        BinaryOp::Pow => Op::Pow,
        BinaryOp::Shl => Op::Shl,
        BinaryOp::Shr => Op::Shr,
        BinaryOp::UShr => Op::UShr,
        BinaryOp::BitAnd => Op::BitAnd,
        BinaryOp::BitOr => Op::BitOr,
        BinaryOp::BitXor => Op::BitXor,
        BinaryOp::Eq => Op::Eq,
        BinaryOp::Ne => Op::Ne,
        BinaryOp::Lt => Op::Lt,
        BinaryOp::Le => Op::Le,
        BinaryOp::Gt => Op::Gt,
        BinaryOp::Ge => Op::Ge,
    }
}
