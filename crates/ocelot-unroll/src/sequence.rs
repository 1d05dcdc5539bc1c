//! SVA sequence matching.
//!
//! A sequence started at `t` may match in several ways, each ending at some
//! timeframe under some condition. The matcher enumerates those alternatives;
//! callers combine them (disjunction in Boolean context, per-antecedent
//! obligations for implications).

use std::cmp::max;

use ocelot_ir::expr::{Expr, ExprKind};

use crate::error::{InstantiationError, Result};
use crate::instantiate::{empty_range, offset, Instantiator};
use crate::timeframe::Timeframe;

/// One way a sequence matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPoint {
    /// Timeframe the match ends in.
    pub end: Timeframe,
    /// Flat condition under which the match happens.
    pub condition: Expr,
    /// Furthest timeframe `condition` refers to.
    pub mark: Timeframe,
    /// The match runs past the last timeframe. The missing tail is taken as
    /// `true` and `end` is the last timeframe.
    pub clipped: bool,
}

impl MatchPoint {
    fn new(end: Timeframe, condition: Expr, mark: Timeframe) -> Self {
        let mark = max(mark, end.clone());
        Self {
            end,
            condition,
            mark,
            clipped: false,
        }
    }
}

#[derive(Clone, Copy)]
enum Join {
    /// Concatenation: right starts where left ends, `l && r`.
    Concat,
    /// `|->`: right starts where left ends, `l -> r`.
    Overlapped,
    /// `|=>`: right starts one after left ends, `l -> r`.
    NonOverlapped,
}

fn and2(lhs: Expr, rhs: Expr) -> Expr {
    if lhs.is_true() {
        rhs
    } else if rhs.is_true() {
        lhs
    } else {
        Expr::and(vec![lhs, rhs])
    }
}

impl Instantiator<'_> {
    fn clipped(&self, t: &Timeframe) -> MatchPoint {
        let (mark, condition) = self.beyond_horizon(t, "sequence");
        MatchPoint {
            end: self.last(),
            condition,
            mark,
            clipped: true,
        }
    }

    /// All ways `expr` matches when started at `t`.
    pub fn match_sequence(&self, expr: &Expr, t: &Timeframe) -> Result<Vec<MatchPoint>> {
        match &expr.kind {
            ExprKind::CycleDelay { from, to, op } => {
                let from = offset(from, "cycle delay")?;
                match to {
                    None => {
                        let u = t + &from;
                        if &u >= self.bound() {
                            Ok(vec![self.clipped(t)])
                        } else {
                            self.match_sequence(op, &u)
                        }
                    }
                    Some(to) => {
                        let to = self.delay_upper(to)?;
                        if from > to {
                            return Err(empty_range("##[from:to]", &from, &to));
                        }
                        let upper = t + &to;
                        if &upper >= self.bound() {
                            return Ok(vec![self.clipped(t)]);
                        }
                        let mut out = Vec::new();
                        for u in num::range_inclusive(t + &from, upper) {
                            out.extend(self.match_sequence(op, &u)?);
                        }
                        Ok(out)
                    }
                }
            }

            ExprKind::SequenceConcat(lhs, rhs) => self.join(Join::Concat, lhs, rhs, t),
            ExprKind::Implication {
                overlapped: true,
                lhs,
                rhs,
            } => self.join(Join::Overlapped, lhs, rhs, t),
            ExprKind::Implication {
                overlapped: false,
                lhs,
                rhs,
            } => self.join(Join::NonOverlapped, lhs, rhs, t),

            // Operands must hold at the start; multi-cycle operands are not
            // aligned on their end times.
            ExprKind::SequenceAnd(operands) => {
                let mut mark = t.clone();
                let mut conjuncts = Vec::with_capacity(operands.len());
                for operand in operands {
                    let (m, e) = self.instantiate(operand, t)?;
                    mark = max(mark, m);
                    conjuncts.push(e);
                }
                Ok(vec![MatchPoint::new(
                    t.clone(),
                    Expr::conjunction(conjuncts),
                    mark,
                )])
            }

            ExprKind::SequenceOr(operands) => {
                let mut out = Vec::new();
                for operand in operands {
                    out.extend(self.match_sequence(operand, t)?);
                }
                Ok(out)
            }

            ExprKind::SequenceIntersect(..)
            | ExprKind::FirstMatch(_)
            | ExprKind::Throughout(..)
            | ExprKind::Within(..) => Err(InstantiationError::Unsupported(expr.kind.name())),

            _ => {
                let (mark, condition) = self.instantiate(expr, t)?;
                Ok(vec![MatchPoint::new(t.clone(), condition, mark)])
            }
        }
    }

    /// Cross product of left and right matches, the right side started at
    /// (or one after) each left end.
    fn join(&self, join: Join, lhs: &Expr, rhs: &Expr, t: &Timeframe) -> Result<Vec<MatchPoint>> {
        let mut out = Vec::new();
        for left in self.match_sequence(lhs, t)? {
            if left.clipped {
                out.push(left);
                continue;
            }
            let start = match join {
                Join::Concat | Join::Overlapped => left.end.clone(),
                Join::NonOverlapped => &left.end + 1u32,
            };
            if &start >= self.bound() {
                out.push(self.clipped(t));
                continue;
            }
            for right in self.match_sequence(rhs, &start)? {
                let condition = match join {
                    Join::Concat => and2(left.condition.clone(), right.condition),
                    Join::Overlapped | Join::NonOverlapped => {
                        Expr::implies(left.condition.clone(), right.condition)
                    }
                };
                out.push(MatchPoint {
                    end: right.end,
                    condition,
                    mark: max(left.mark.clone(), right.mark),
                    clipped: right.clipped,
                });
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::ToPrimitive;
    use ocelot_ir::symbols::SymbolTable;

    fn tf(n: u32) -> Timeframe {
        Timeframe::from(n)
    }

    fn sym(name: &str) -> Expr {
        Expr::bool_symbol(name)
    }

    fn matches(expr: &Expr, t: u32, bound: u32) -> Result<Vec<MatchPoint>> {
        let symbols = SymbolTable::new();
        let bound = tf(bound);
        Instantiator::new(&bound, &symbols)?.match_sequence(expr, &tf(t))
    }

    fn summary(points: &[MatchPoint]) -> Vec<(u32, String)> {
        points
            .iter()
            .map(|p| {
                let end = p.end.to_u32().unwrap();
                (end, p.condition.to_string())
            })
            .collect()
    }

    #[test]
    fn range_delay_matches_at_every_offset() {
        let e = Expr::cycle_delay_range(1, 3, sym("q"));
        let got = matches(&e, 0, 5).unwrap();
        assert_eq!(
            summary(&got),
            vec![(1, "q@1".into()), (2, "q@2".into()), (3, "q@3".into())]
        );
        assert!(got.iter().all(|p| !p.clipped));
    }

    #[test]
    fn delay_past_horizon_is_a_clipped_true_match() {
        let got = matches(&Expr::cycle_delay(4, sym("q")), 0, 3).unwrap();
        assert_eq!(got.len(), 1);
        assert!(got[0].clipped);
        assert!(got[0].condition.is_true());
        assert_eq!(got[0].end, tf(2));
    }

    #[test]
    fn concatenation_chains_end_times() {
        // p ##[1:2] q ##1 r
        let e = Expr::sequence_concat(
            Expr::sequence_concat(sym("p"), Expr::cycle_delay_range(1, 2, sym("q"))),
            Expr::cycle_delay(1, sym("r")),
        );
        let got = matches(&e, 0, 5).unwrap();
        assert_eq!(
            summary(&got),
            vec![
                (2, "((p@0 && q@1) && r@2)".into()),
                (3, "((p@0 && q@2) && r@3)".into()),
            ]
        );
    }

    #[test]
    fn concatenation_running_off_the_end_is_clipped() {
        let e = Expr::sequence_concat(sym("p"), Expr::cycle_delay(3, sym("q")));
        let got = matches(&e, 0, 3).unwrap();
        assert_eq!(summary(&got), vec![(2, "p@0".into())]);
        assert!(got[0].clipped);
    }

    #[test]
    fn sequence_or_unions_and_sequence_and_aligns_on_start() {
        let or = Expr::sequence_or(vec![sym("a"), Expr::cycle_delay(1, sym("b"))]);
        assert_eq!(
            summary(&matches(&or, 1, 4).unwrap()),
            vec![(1, "a@1".into()), (2, "b@2".into())]
        );
        let and = Expr::sequence_and(vec![sym("a"), sym("b")]);
        assert_eq!(
            summary(&matches(&and, 1, 4).unwrap()),
            vec![(1, "(a@1 && b@1)".into())]
        );
    }

    #[test]
    fn implication_pairs_each_antecedent_with_each_consequent() {
        let e = Expr::non_overlapped_implication(
            sym("p"),
            Expr::cycle_delay_range(0, 1, sym("q")),
        );
        assert_eq!(
            summary(&matches(&e, 0, 4).unwrap()),
            vec![(1, "(p@0 -> q@1)".into()), (2, "(p@0 -> q@2)".into())]
        );
        let got = matches(&e, 3, 4).unwrap();
        assert_eq!(got.len(), 1);
        assert!(got[0].clipped);
    }

    #[test]
    fn mark_covers_nested_horizon_operators() {
        let e = Expr::sequence_concat(Expr::always(sym("a")), Expr::cycle_delay(1, sym("b")));
        let got = matches(&e, 0, 4).unwrap();
        assert_eq!(got[0].end, tf(1));
        assert_eq!(got[0].mark, tf(3));
    }

    #[test]
    fn unsupported_sequence_operators() {
        for e in [
            Expr::throughout(sym("a"), sym("b")),
            Expr::within(sym("a"), sym("b")),
            Expr::first_match(sym("a")),
        ] {
            assert!(matches!(
                matches(&e, 0, 2),
                Err(InstantiationError::Unsupported(_))
            ));
        }
    }
}
