//! Property normalization.
//!
//! The unrolling engine accepts SVA operators plus LTL `X` and `F`. This pass
//! rewrites the remaining LTL/CTL operators into that subset:
//!
//! - `G p` becomes `always p`
//! - `A φ` becomes `φ` (bounded model checking explores all paths anyway)
//! - `p R q` becomes `q until (p && q)`, the weak form, so a release still
//!   pending at the last timeframe passes
//! - `E φ` is rejected
//!
//! Negations over temporal operands are pushed inward through Boolean
//! connectives, `X` and fixed `##n` delays, where the instantiator's
//! horizon stand-ins are only sound in positive position.

use thiserror::Error;

use crate::expr::{DelayUpper, Expr, ExprKind, Op};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Existential path quantifier is not supported by bounded model checking: {0}")]
    ExistentialPath(String),
}

fn normalize_boxed(expr: &Expr) -> Result<Box<Expr>, NormalizeError> {
    normalize_property(expr).map(Box::new)
}

fn normalize_all(exprs: &[Expr]) -> Result<Vec<Expr>, NormalizeError> {
    exprs.iter().map(normalize_property).collect()
}

fn has_temporal(expr: &Expr) -> bool {
    expr.contains(&|e| e.kind.is_temporal())
}

/// `!expr`, with the negation moved below the operators that have a dual
/// in the supported subset. `expr` is already normalized.
fn negate(expr: Expr) -> Expr {
    if !has_temporal(&expr) {
        return Expr::not(expr);
    }
    let ty = expr.ty.clone();
    match expr.kind {
        ExprKind::Op(Op::Not, mut operands) if operands.len() == 1 => operands.remove(0),
        ExprKind::Op(Op::And, operands) => Expr::or(operands.into_iter().map(negate).collect()),
        ExprKind::Op(Op::Or, operands) => Expr::and(operands.into_iter().map(negate).collect()),
        ExprKind::Op(Op::Implies, mut operands) if operands.len() == 2 => {
            let rhs = operands.remove(1);
            let lhs = operands.remove(0);
            Expr::and(vec![lhs, negate(rhs)])
        }
        ExprKind::Next(op) => Expr::ltl_next(negate(*op)),
        ExprKind::CycleDelay { from, to: None, op } => Expr::new(
            ExprKind::CycleDelay {
                from,
                to: None,
                op: Box::new(negate(*op)),
            },
            ty,
        ),
        kind => Expr::not(Expr::new(kind, ty)),
    }
}

pub fn normalize_property(expr: &Expr) -> Result<Expr, NormalizeError> {
    let kind = match &expr.kind {
        ExprKind::Symbol(_) | ExprKind::NextSymbol(_) | ExprKind::Constant(_) => {
            return Ok(expr.clone())
        }
        ExprKind::Globally(op) => return Ok(Expr::always(normalize_property(op)?)),
        ExprKind::AllPaths(op) => return normalize_property(op),
        ExprKind::ExistsPath(_) => {
            return Err(NormalizeError::ExistentialPath(expr.to_string()))
        }
        ExprKind::Release(lhs, rhs) => {
            let lhs = normalize_property(lhs)?;
            let rhs = normalize_property(rhs)?;
            return Ok(Expr::until(rhs.clone(), Expr::and(vec![lhs, rhs])));
        }
        ExprKind::Op(Op::Not, operands) if operands.len() == 1 => {
            return Ok(negate(normalize_property(&operands[0])?));
        }
        ExprKind::Op(Op::Implies, operands)
            if operands.len() == 2 && has_temporal(&operands[0]) =>
        {
            let lhs = normalize_property(&operands[0])?;
            let rhs = normalize_property(&operands[1])?;
            return Ok(Expr::or(vec![negate(lhs), rhs]));
        }
        ExprKind::Op(op, operands) => ExprKind::Op(*op, normalize_all(operands)?),
        ExprKind::Past { op, ticks } => ExprKind::Past {
            op: normalize_boxed(op)?,
            ticks: normalize_boxed(ticks)?,
        },
        ExprKind::Next(op) => ExprKind::Next(normalize_boxed(op)?),
        ExprKind::Eventually(op) => ExprKind::Eventually(normalize_boxed(op)?),
        ExprKind::Always(op) => ExprKind::Always(normalize_boxed(op)?),
        ExprKind::StrongEventually(op) => ExprKind::StrongEventually(normalize_boxed(op)?),
        ExprKind::FirstMatch(op) => ExprKind::FirstMatch(normalize_boxed(op)?),
        ExprKind::RangedEventually { lower, upper, op } => ExprKind::RangedEventually {
            lower: normalize_boxed(lower)?,
            upper: normalize_boxed(upper)?,
            op: normalize_boxed(op)?,
        },
        ExprKind::Until {
            strength,
            overlapping,
            lhs,
            rhs,
        } => ExprKind::Until {
            strength: *strength,
            overlapping: *overlapping,
            lhs: normalize_boxed(lhs)?,
            rhs: normalize_boxed(rhs)?,
        },
        ExprKind::CycleDelay { from, to, op } => ExprKind::CycleDelay {
            from: normalize_boxed(from)?,
            to: match to {
                None => None,
                Some(DelayUpper::Bounded(to)) => {
                    Some(DelayUpper::Bounded(normalize_boxed(to)?))
                }
                Some(DelayUpper::Unbounded) => Some(DelayUpper::Unbounded),
            },
            op: normalize_boxed(op)?,
        },
        ExprKind::SequenceConcat(lhs, rhs) => {
            ExprKind::SequenceConcat(normalize_boxed(lhs)?, normalize_boxed(rhs)?)
        }
        ExprKind::SequenceAnd(operands) => ExprKind::SequenceAnd(normalize_all(operands)?),
        ExprKind::SequenceOr(operands) => ExprKind::SequenceOr(normalize_all(operands)?),
        ExprKind::SequenceIntersect(lhs, rhs) => {
            ExprKind::SequenceIntersect(normalize_boxed(lhs)?, normalize_boxed(rhs)?)
        }
        ExprKind::Throughout(lhs, rhs) => {
            ExprKind::Throughout(normalize_boxed(lhs)?, normalize_boxed(rhs)?)
        }
        ExprKind::Within(lhs, rhs) => {
            ExprKind::Within(normalize_boxed(lhs)?, normalize_boxed(rhs)?)
        }
        ExprKind::Implication {
            overlapped,
            lhs,
            rhs,
        } => ExprKind::Implication {
            overlapped: *overlapped,
            lhs: normalize_boxed(lhs)?,
            rhs: normalize_boxed(rhs)?,
        },
    };
    Ok(Expr::new(kind, expr.ty.clone()))
}
