use crate::expression::ast::{Callee, Expr, Place, Script};
use crate::expression::bytecode::{
    BuiltinId, GLOBAL_CONSTANTS, INPUT_SLOTS, MATH_CONSTANTS, SlotId,
};
use crate::expression::lexer::ExprError;

/// Input variable names, in slot order.
pub(crate) const INPUT_NAMES: [&str; INPUT_SLOTS as usize] = ["t", "i", "x", "y"];

/// A script whose names are all resolved to slots, constants, or builtins.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BoundScript {
    pub(crate) statements: Vec<Expr>,
    /// Local names in slot order, starting at [`INPUT_SLOTS`].
    pub(crate) locals: Vec<String>,
}

impl BoundScript {
    pub(crate) fn slot_count(&self) -> u16 {
        INPUT_SLOTS + self.locals.len() as u16
    }
}

enum Resolved {
    Slot(SlotId),
    Const(f64),
    Builtin(BuiltinId),
}

struct BindCtx {
    locals: Vec<String>,
}

pub(crate) fn bind_script(script: Script) -> Result<BoundScript, ExprError> {
    let mut locals = Vec::new();
    for s in &script.statements {
        collect_locals(s, &mut locals)?;
    }
    if locals.len() > usize::from(u16::MAX - INPUT_SLOTS) {
        return Err(ExprError::new(0, "too many local variables"));
    }

    let ctx = BindCtx { locals };
    let mut statements = Vec::with_capacity(script.statements.len());
    for s in script.statements {
        statements.push(bind_expr(s, &ctx)?);
    }
    Ok(BoundScript {
        statements,
        locals: ctx.locals,
    })
}

/// Every plain name assigned anywhere becomes a local unless it is an input.
fn collect_locals(e: &Expr, out: &mut Vec<String>) -> Result<(), ExprError> {
    match e {
        Expr::Lit(_) | Expr::Path { .. } | Expr::Slot(_) => Ok(()),
        Expr::Unary { expr, .. } => collect_locals(expr, out),
        Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
            collect_locals(left, out)?;
            collect_locals(right, out)
        }
        Expr::Conditional {
            test,
            then,
            otherwise,
        } => {
            collect_locals(test, out)?;
            collect_locals(then, out)?;
            collect_locals(otherwise, out)
        }
        Expr::Assign { target, value, .. } => {
            note_target(target, out)?;
            collect_locals(value, out)
        }
        Expr::Update { target, .. } => note_target(target, out),
        Expr::Call { args, .. } => {
            for a in args {
                collect_locals(a, out)?;
            }
            Ok(())
        }
        Expr::Sequence(items) => {
            for a in items {
                collect_locals(a, out)?;
            }
            Ok(())
        }
    }
}

fn note_target(target: &Place, out: &mut Vec<String>) -> Result<(), ExprError> {
    let Place::Path { segments, offset } = target else {
        return Ok(());
    };
    let [name] = segments.as_slice() else {
        return Err(ExprError::new(
            *offset,
            format!("cannot assign to \"{}\"", segments.join(".")),
        ));
    };
    if INPUT_NAMES.contains(&name.as_str()) || out.contains(name) {
        return Ok(());
    }
    if lookup_constant(name).is_some() || GLOBAL_CONSTANTS.iter().any(|(n, _)| n == name) {
        return Err(ExprError::new(
            *offset,
            format!("cannot assign to constant \"{name}\""),
        ));
    }
    if BuiltinId::from_name(name).is_some() || name == "Math" {
        return Err(ExprError::new(
            *offset,
            format!("cannot assign to builtin \"{name}\""),
        ));
    }
    out.push(name.clone());
    Ok(())
}

fn bind_expr(e: Expr, ctx: &BindCtx) -> Result<Expr, ExprError> {
    match e {
        Expr::Lit(_) | Expr::Slot(_) => Ok(e),
        Expr::Path { segments, offset } => match resolve(&segments, offset, ctx)? {
            Resolved::Slot(id) => Ok(Expr::Slot(id)),
            Resolved::Const(v) => Ok(Expr::Lit(v)),
            Resolved::Builtin(id) => Err(ExprError::new(
                offset,
                format!("function \"{}\" used as a value", id.name()),
            )),
        },
        Expr::Unary { op, expr } => Ok(Expr::Unary {
            op,
            expr: Box::new(bind_expr(*expr, ctx)?),
        }),
        Expr::Binary { op, left, right } => Ok(Expr::Binary {
            op,
            left: Box::new(bind_expr(*left, ctx)?),
            right: Box::new(bind_expr(*right, ctx)?),
        }),
        Expr::Logical { op, left, right } => Ok(Expr::Logical {
            op,
            left: Box::new(bind_expr(*left, ctx)?),
            right: Box::new(bind_expr(*right, ctx)?),
        }),
        Expr::Conditional {
            test,
            then,
            otherwise,
        } => Ok(Expr::Conditional {
            test: Box::new(bind_expr(*test, ctx)?),
            then: Box::new(bind_expr(*then, ctx)?),
            otherwise: Box::new(bind_expr(*otherwise, ctx)?),
        }),
        Expr::Assign { target, op, value } => Ok(Expr::Assign {
            target: bind_place(target, ctx)?,
            op,
            value: Box::new(bind_expr(*value, ctx)?),
        }),
        Expr::Update {
            target,
            delta,
            prefix,
        } => Ok(Expr::Update {
            target: bind_place(target, ctx)?,
            delta,
            prefix,
        }),
        Expr::Call {
            callee,
            args,
            offset,
        } => {
            let callee = match callee {
                Callee::Builtin(_) => callee,
                Callee::Path(segments) => match resolve(&segments, offset, ctx)? {
                    Resolved::Builtin(id) => Callee::Builtin(id),
                    Resolved::Slot(_) | Resolved::Const(_) => {
                        return Err(ExprError::new(
                            offset,
                            format!("\"{}\" is not a function", segments.join(".")),
                        ));
                    }
                },
            };
            let mut out_args = Vec::with_capacity(args.len());
            for a in args {
                out_args.push(bind_expr(a, ctx)?);
            }
            Ok(Expr::Call {
                callee,
                args: out_args,
                offset,
            })
        }
        Expr::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for a in items {
                out.push(bind_expr(a, ctx)?);
            }
            Ok(Expr::Sequence(out))
        }
    }
}

fn bind_place(target: Place, ctx: &BindCtx) -> Result<Place, ExprError> {
    match target {
        Place::Slot(_) => Ok(target),
        Place::Path { segments, offset } => match resolve(&segments, offset, ctx)? {
            Resolved::Slot(id) => Ok(Place::Slot(id)),
            Resolved::Const(_) | Resolved::Builtin(_) => Err(ExprError::new(
                offset,
                format!("cannot assign to \"{}\"", segments.join(".")),
            )),
        },
    }
}

fn resolve(segments: &[String], offset: usize, ctx: &BindCtx) -> Result<Resolved, ExprError> {
    match segments {
        [math, member] if math == "Math" => {
            if let Some(v) = lookup_constant(member) {
                return Ok(Resolved::Const(v));
            }
            if let Some(id) = BuiltinId::from_name(member) {
                return Ok(Resolved::Builtin(id));
            }
            Err(ExprError::new(
                offset,
                format!("unknown member \"Math.{member}\""),
            ))
        }
        [name] => {
            if let Some(k) = INPUT_NAMES.iter().position(|n| n == name) {
                return Ok(Resolved::Slot(SlotId(k as u16)));
            }
            if let Some(k) = ctx.locals.iter().position(|n| n == name) {
                return Ok(Resolved::Slot(SlotId(INPUT_SLOTS + k as u16)));
            }
            if let Some(v) = lookup_constant(name) {
                return Ok(Resolved::Const(v));
            }
            if let Some((_, v)) = GLOBAL_CONSTANTS.iter().find(|(n, _)| n == name) {
                return Ok(Resolved::Const(*v));
            }
            if let Some(id) = BuiltinId::from_name(name) {
                return Ok(Resolved::Builtin(id));
            }
            Err(ExprError::new(
                offset,
                format!("unknown identifier \"{name}\""),
            ))
        }
        _ => Err(ExprError::new(
            offset,
            format!("unknown path \"{}\"", segments.join(".")),
        )),
    }
}

fn lookup_constant(name: &str) -> Option<f64> {
    MATH_CONSTANTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| *v)
}

#[cfg(test)]
#[path = "../../tests/unit/expression/bind.rs"]
mod tests;
