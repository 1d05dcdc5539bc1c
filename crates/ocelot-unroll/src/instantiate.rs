//! Bounded instantiation.
//!
//! [`Instantiator::instantiate`] rewrites an expression rooted at timeframe
//! `t` into a flat expression over `x@0 .. x@(bound-1)` and reports the
//! furthest timeframe the result refers to (the high-water mark).
//!
//! Obligations that fall past the last timeframe are replaced by `true`.
//! That is only sound where the operator occurs positively: under a
//! negation the stand-in turns into `false` and the property is reported
//! violated without evidence. `normalize_property` moves negations below
//! Boolean connectives, `X` and fixed `##n` delays; a negation that still
//! encloses `always`, an until, an implication or a ranged delay is
//! instantiated as written.

use std::cmp::max;

use num::traits::Zero;
use num::BigUint;
use ocelot_ir::expr::{DelayUpper, Expr, ExprKind};
use ocelot_ir::symbols::SymbolTable;
use ocelot_ir::types::Type;
use tracing::trace;

use crate::error::{InstantiationError, Result};
use crate::timeframe::{lasso_symbol, timeframe_symbol, Timeframe};

/// Instantiation context for one session: the number of timeframes and the
/// symbol table used to build `$past` default values.
#[derive(Debug, Clone, Copy)]
pub struct Instantiator<'a> {
    bound: &'a Timeframe,
    symbols: &'a SymbolTable,
}

impl<'a> Instantiator<'a> {
    pub fn new(bound: &'a Timeframe, symbols: &'a SymbolTable) -> Result<Self> {
        if bound.is_zero() {
            return Err(InstantiationError::EmptyHorizon);
        }
        Ok(Self { bound, symbols })
    }

    pub fn bound(&self) -> &Timeframe {
        self.bound
    }

    /// Index of the last timeframe.
    pub(crate) fn last(&self) -> Timeframe {
        self.bound - 1u32
    }

    /// Mark for operators that look at the whole remaining horizon.
    pub(crate) fn horizon_mark(&self, t: &Timeframe) -> Timeframe {
        max(t.clone(), self.last())
    }

    /// Literal `true` standing in for an obligation past the last timeframe.
    pub(crate) fn beyond_horizon(&self, t: &Timeframe, what: &'static str) -> (Timeframe, Expr) {
        trace!(operator = what, t = %t, bound = %self.bound, "obligation beyond horizon");
        (self.horizon_mark(t), Expr::bool(true))
    }

    pub fn instantiate(&self, expr: &Expr, t: &Timeframe) -> Result<(Timeframe, Expr)> {
        match &expr.kind {
            ExprKind::Symbol(name) => Ok((t.clone(), timeframe_symbol(t, name, expr.ty.clone())?)),
            ExprKind::NextSymbol(name) => {
                let u = t + 1u32;
                let sym = timeframe_symbol(&u, name, expr.ty.clone())?;
                Ok((u, sym))
            }
            ExprKind::Constant(_) => Ok((t.clone(), expr.clone())),
            ExprKind::Op(op, operands) => {
                let mut mark = t.clone();
                let mut flat = Vec::with_capacity(operands.len());
                for operand in operands {
                    let (m, e) = self.instantiate(operand, t)?;
                    mark = max(mark, m);
                    flat.push(e);
                }
                Ok((mark, Expr::op(*op, flat, expr.ty.clone())))
            }

            ExprKind::Past { op, ticks } => {
                let ticks = offset(ticks, "$past ticks")?;
                if &ticks > t {
                    return Ok((t.clone(), self.default_value(&expr.ty)?));
                }
                let (m, e) = self.instantiate(op, &(t - &ticks))?;
                Ok((max(t.clone(), m), e))
            }

            ExprKind::Next(op) => {
                let next = t + 1u32;
                if &next < self.bound {
                    self.instantiate(op, &next)
                } else {
                    Ok(self.beyond_horizon(t, "X"))
                }
            }

            ExprKind::CycleDelay { from, to, op } => {
                let from = offset(from, "cycle delay")?;
                match to {
                    None => {
                        let u = t + &from;
                        if &u >= self.bound {
                            Ok(self.beyond_horizon(t, "##"))
                        } else {
                            self.instantiate(op, &u)
                        }
                    }
                    Some(to) => {
                        let to = self.delay_upper(to)?;
                        if from > to {
                            return Err(empty_range("##[from:to]", &from, &to));
                        }
                        let upper = t + &to;
                        if &upper >= self.bound {
                            return Ok(self.beyond_horizon(t, "##[from:to]"));
                        }
                        let mut mark = upper.clone();
                        let mut disjuncts = Vec::new();
                        for u in num::range_inclusive(t + &from, upper) {
                            let (m, e) = self.instantiate(op, &u)?;
                            mark = max(mark, m);
                            disjuncts.push(e);
                        }
                        Ok((mark, Expr::disjunction(disjuncts)))
                    }
                }
            }

            ExprKind::Always(op) => {
                let mut mark = self.horizon_mark(t);
                let mut conjuncts = Vec::new();
                for u in num::range(t.clone(), self.bound.clone()) {
                    let (m, e) = self.instantiate(op, &u)?;
                    mark = max(mark, m);
                    conjuncts.push(e);
                }
                Ok((mark, Expr::conjunction(conjuncts)))
            }

            ExprKind::RangedEventually { lower, upper, op } => {
                let lower = offset(lower, "eventually lower bound")?;
                let upper = offset(upper, "eventually upper bound")?;
                if lower > upper {
                    return Err(empty_range("eventually", &lower, &upper));
                }
                // weak: passes when part of the window does not exist
                if t + &lower >= *self.bound || t + &upper >= *self.bound {
                    return Ok(self.beyond_horizon(t, "eventually"));
                }
                let mut mark = self.horizon_mark(t);
                let mut disjuncts = Vec::new();
                for u in num::range_inclusive(t + lower, t + upper) {
                    let (m, e) = self.instantiate(op, &u)?;
                    mark = max(mark, m);
                    disjuncts.push(e);
                }
                Ok((mark, Expr::disjunction(disjuncts)))
            }

            ExprKind::StrongEventually(op) | ExprKind::Eventually(op) => {
                self.lasso_eventually(op, t)
            }

            ExprKind::Until {
                overlapping: false,
                lhs,
                rhs,
                ..
            } => self.until(lhs, rhs, t),
            ExprKind::Until {
                overlapping: true,
                lhs,
                rhs,
                ..
            } => {
                let rhs = Expr::ltl_next((**rhs).clone());
                self.until(lhs, &rhs, t)
            }

            ExprKind::SequenceConcat(..) | ExprKind::SequenceAnd(_) | ExprKind::SequenceOr(_) => {
                let matches = self.match_sequence(expr, t)?;
                let mark = matches.iter().fold(t.clone(), |m, p| max(m, p.mark.clone()));
                let conditions = matches.into_iter().map(|p| p.condition).collect();
                Ok((mark, Expr::disjunction(conditions)))
            }

            ExprKind::Implication {
                overlapped,
                lhs,
                rhs,
            } => self.implication(*overlapped, lhs, rhs, t),

            ExprKind::SequenceIntersect(..)
            | ExprKind::FirstMatch(_)
            | ExprKind::Throughout(..)
            | ExprKind::Within(..) => Err(InstantiationError::Unsupported(expr.kind.name())),

            ExprKind::Globally(_)
            | ExprKind::Release(..)
            | ExprKind::AllPaths(_)
            | ExprKind::ExistsPath(_) => Err(InstantiationError::Unnormalized(expr.kind.name())),
        }
    }

    /// `F op` / `s_eventually op` at `t`.
    ///
    /// A counterexample needs a loop from `t` back to some `k < t` such that
    /// `op` fails in every state `k..=t` of the loop. Trivially true at
    /// `t = 0`.
    fn lasso_eventually(&self, op: &Expr, t: &Timeframe) -> Result<(Timeframe, Expr)> {
        let mut mark = self.horizon_mark(t);
        let mut conjuncts = Vec::new();
        for k in num::range(BigUint::zero(), t.clone()) {
            let mut disjuncts = vec![Expr::not(lasso_symbol(&k, t))];
            for j in num::range_inclusive(k, t.clone()) {
                let (m, e) = self.instantiate(op, &j)?;
                mark = max(mark, m);
                disjuncts.push(e);
            }
            conjuncts.push(Expr::disjunction(disjuncts));
        }
        Ok((mark, Expr::conjunction(conjuncts)))
    }

    /// Non-overlapping until, expanded as `q || (p && X(p U q))`.
    ///
    /// At the last timeframe the recursive term is dropped, for both the weak
    /// and the strong variant.
    fn until(&self, p: &Expr, q: &Expr, t: &Timeframe) -> Result<(Timeframe, Expr)> {
        let (mq, q_t) = self.instantiate(q, t)?;
        let (mp, p_t) = self.instantiate(p, t)?;
        let mut mark = max(self.horizon_mark(t), max(mq, mp));

        let next = t + 1u32;
        let expansion = if &next < self.bound {
            let (m, rest) = self.until(p, q, &next)?;
            mark = max(mark, m);
            Expr::and(vec![p_t, rest])
        } else {
            p_t
        };
        Ok((mark, Expr::or(vec![q_t, expansion])))
    }

    /// `lhs |-> rhs` / `lhs |=> rhs` at `t`.
    ///
    /// Every match of the antecedent obliges the consequent to match from
    /// that match's end (or the timeframe after it). Antecedent matches that
    /// only exist past the horizon impose nothing, and neither do consequents
    /// that would start past it.
    fn implication(
        &self,
        overlapped: bool,
        lhs: &Expr,
        rhs: &Expr,
        t: &Timeframe,
    ) -> Result<(Timeframe, Expr)> {
        let mut mark = t.clone();
        let mut conjuncts = Vec::new();
        for antecedent in self.match_sequence(lhs, t)? {
            if antecedent.clipped {
                continue;
            }
            mark = max(mark, antecedent.mark);
            let start = if overlapped {
                antecedent.end
            } else {
                antecedent.end + 1u32
            };
            if &start >= self.bound {
                trace!(t = %t, start = %start, "consequent starts beyond horizon");
                continue;
            }
            let mut alternatives = Vec::new();
            for consequent in self.match_sequence(rhs, &start)? {
                mark = max(mark, consequent.mark);
                alternatives.push(consequent.condition);
            }
            conjuncts.push(Expr::implies(
                antecedent.condition,
                Expr::disjunction(alternatives),
            ));
        }
        Ok((mark, Expr::conjunction(conjuncts)))
    }

    pub(crate) fn delay_upper(&self, to: &DelayUpper) -> Result<Timeframe> {
        match to {
            DelayUpper::Bounded(to) => offset(to, "cycle delay"),
            DelayUpper::Unbounded => Ok(self.last()),
        }
    }

    /// Zero of `ty`, used for `$past` before timeframe 0.
    fn default_value(&self, ty: &Type) -> Result<Expr> {
        match self.symbols.resolve_type(ty)? {
            Type::Bool => Ok(Expr::bool(false)),
            Type::Array { .. } => Err(InstantiationError::NoDefaultValue(ty.clone())),
            resolved => Ok(Expr::constant(0, resolved)),
        }
    }
}

/// Evaluates a delay, tick count or window bound to a timeframe offset.
pub(crate) fn offset(expr: &Expr, what: &'static str) -> Result<Timeframe> {
    let value = expr
        .as_constant()
        .ok_or_else(|| InstantiationError::NonConstantOffset {
            what,
            found: expr.to_string(),
        })?;
    value
        .to_biguint()
        .ok_or_else(|| InstantiationError::NegativeOffset {
            what,
            value: value.to_string(),
        })
}

pub(crate) fn empty_range(
    what: &'static str,
    lower: &Timeframe,
    upper: &Timeframe,
) -> InstantiationError {
    InstantiationError::EmptyRange {
        what,
        lower: lower.to_string(),
        upper: upper.to_string(),
    }
}
