//! Word-level expression tree.
//!
//! Expressions are built once by elaboration and consumed read-only by the
//! later passes. Every operator the model checker understands is a variant of
//! [`ExprKind`]; passes match on it exhaustively.

use std::fmt;

use indexmap::IndexSet;
use num::bigint::BigInt;
use num::traits::{One, Zero};

use crate::types::Type;

/// Structural operators. Unrolling passes recurse into their operands at the
/// same timeframe without interpreting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Not,
    And,
    Or,
    Xor,
    Implies,
    Equal,
    NotEqual,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Neg,
    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    /// `cond ? then : else`
    Ite,
}

impl Op {
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Not => "!",
            Op::And => "&&",
            Op::Or => "||",
            Op::Xor => "^^",
            Op::Implies => "->",
            Op::Equal => "==",
            Op::NotEqual => "!=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Neg => "-",
            Op::BitAnd => "&",
            Op::BitOr => "|",
            Op::BitXor => "^",
            Op::BitNot => "~",
            Op::Ite => "?:",
        }
    }

    /// Operators whose result is Boolean regardless of operand types.
    pub fn is_predicate(self) -> bool {
        matches!(
            self,
            Op::Not
                | Op::And
                | Op::Or
                | Op::Xor
                | Op::Implies
                | Op::Equal
                | Op::NotEqual
                | Op::Lt
                | Op::Le
                | Op::Gt
                | Op::Ge
        )
    }
}

/// Weak operators pass vacuously when the trace ends first; strong ones need
/// positive evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UntilStrength {
    Weak,
    Strong,
}

/// Upper end of a cycle-delay range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DelayUpper {
    Bounded(Box<Expr>),
    /// `##[n:$]`
    Unbounded,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprKind {
    /// Variable in the current timeframe.
    Symbol(String),
    /// Variable in the following timeframe (next-state relation).
    NextSymbol(String),
    Constant(BigInt),
    Op(Op, Vec<Expr>),

    /// `$past(op, ticks)`
    Past {
        op: Box<Expr>,
        ticks: Box<Expr>,
    },

    // LTL
    /// `X op`
    Next(Box<Expr>),
    /// `F op`
    Eventually(Box<Expr>),
    /// `G op`; rewritten to `always` by normalization.
    Globally(Box<Expr>),
    /// `p R q`; rewritten by normalization.
    Release(Box<Expr>, Box<Expr>),

    // CTL path quantifiers; removed by normalization.
    AllPaths(Box<Expr>),
    ExistsPath(Box<Expr>),

    // SVA properties
    Always(Box<Expr>),
    /// `eventually [lower:upper] op`
    RangedEventually {
        lower: Box<Expr>,
        upper: Box<Expr>,
        op: Box<Expr>,
    },
    /// `s_eventually op`
    StrongEventually(Box<Expr>),
    /// `until`, `s_until`, `until_with`, `s_until_with`
    Until {
        strength: UntilStrength,
        overlapping: bool,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    // SVA sequences
    /// `##from op`, `##[from:to] op`, `##[from:$] op`
    CycleDelay {
        from: Box<Expr>,
        to: Option<DelayUpper>,
        op: Box<Expr>,
    },
    SequenceConcat(Box<Expr>, Box<Expr>),
    SequenceAnd(Vec<Expr>),
    SequenceOr(Vec<Expr>),
    SequenceIntersect(Box<Expr>, Box<Expr>),
    FirstMatch(Box<Expr>),
    Throughout(Box<Expr>, Box<Expr>),
    Within(Box<Expr>, Box<Expr>),
    /// `lhs |-> rhs` (overlapped) or `lhs |=> rhs`
    Implication {
        overlapped: bool,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl ExprKind {
    /// Short operator name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ExprKind::Symbol(_) => "symbol",
            ExprKind::NextSymbol(_) => "next_symbol",
            ExprKind::Constant(_) => "constant",
            ExprKind::Op(..) => "operator",
            ExprKind::Past { .. } => "$past",
            ExprKind::Next(_) => "X",
            ExprKind::Eventually(_) => "F",
            ExprKind::Globally(_) => "G",
            ExprKind::Release(..) => "R",
            ExprKind::AllPaths(_) => "A",
            ExprKind::ExistsPath(_) => "E",
            ExprKind::Always(_) => "always",
            ExprKind::RangedEventually { .. } => "eventually",
            ExprKind::StrongEventually(_) => "s_eventually",
            ExprKind::Until {
                strength: UntilStrength::Weak,
                overlapping: false,
                ..
            } => "until",
            ExprKind::Until {
                strength: UntilStrength::Strong,
                overlapping: false,
                ..
            } => "s_until",
            ExprKind::Until {
                strength: UntilStrength::Weak,
                overlapping: true,
                ..
            } => "until_with",
            ExprKind::Until {
                strength: UntilStrength::Strong,
                overlapping: true,
                ..
            } => "s_until_with",
            ExprKind::CycleDelay { .. } => "##",
            ExprKind::SequenceConcat(..) => "sequence concatenation",
            ExprKind::SequenceAnd(_) => "sequence and",
            ExprKind::SequenceOr(_) => "sequence or",
            ExprKind::SequenceIntersect(..) => "intersect",
            ExprKind::FirstMatch(_) => "first_match",
            ExprKind::Throughout(..) => "throughout",
            ExprKind::Within(..) => "within",
            ExprKind::Implication {
                overlapped: true, ..
            } => "|->",
            ExprKind::Implication {
                overlapped: false,
                ..
            } => "|=>",
        }
    }

    /// Temporal and sequence operators, i.e. everything that must not survive
    /// bounded instantiation.
    pub fn is_temporal(&self) -> bool {
        !matches!(
            self,
            ExprKind::Symbol(_) | ExprKind::NextSymbol(_) | ExprKind::Constant(_) | ExprKind::Op(..)
        )
    }

    pub fn is_sequence(&self) -> bool {
        matches!(
            self,
            ExprKind::CycleDelay { .. }
                | ExprKind::SequenceConcat(..)
                | ExprKind::SequenceAnd(_)
                | ExprKind::SequenceOr(_)
                | ExprKind::SequenceIntersect(..)
                | ExprKind::FirstMatch(_)
                | ExprKind::Throughout(..)
                | ExprKind::Within(..)
        )
    }
}

/// A typed expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
}

fn boxed(e: Expr) -> Box<Expr> {
    Box::new(e)
}

impl Expr {
    pub fn new(kind: ExprKind, ty: Type) -> Self {
        Self { kind, ty }
    }

    pub fn symbol(name: impl Into<String>, ty: Type) -> Self {
        Self::new(ExprKind::Symbol(name.into()), ty)
    }

    pub fn bool_symbol(name: impl Into<String>) -> Self {
        Self::symbol(name, Type::Bool)
    }

    pub fn next_symbol(name: impl Into<String>, ty: Type) -> Self {
        Self::new(ExprKind::NextSymbol(name.into()), ty)
    }

    pub fn constant(value: impl Into<BigInt>, ty: Type) -> Self {
        Self::new(ExprKind::Constant(value.into()), ty)
    }

    pub fn bool(value: bool) -> Self {
        let v = if value { BigInt::one() } else { BigInt::zero() };
        Self::constant(v, Type::Bool)
    }

    /// Natural-number literal, the usual shape of offsets and tick counts.
    pub fn natural(value: u64) -> Self {
        Self::constant(value, Type::Natural)
    }

    pub fn op(op: Op, operands: Vec<Expr>, ty: Type) -> Self {
        Self::new(ExprKind::Op(op, operands), ty)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Expr) -> Self {
        Self::op(Op::Not, vec![operand], Type::Bool)
    }

    pub fn and(operands: Vec<Expr>) -> Self {
        Self::op(Op::And, operands, Type::Bool)
    }

    pub fn or(operands: Vec<Expr>) -> Self {
        Self::op(Op::Or, operands, Type::Bool)
    }

    pub fn implies(lhs: Expr, rhs: Expr) -> Self {
        Self::op(Op::Implies, vec![lhs, rhs], Type::Bool)
    }

    pub fn equal(lhs: Expr, rhs: Expr) -> Self {
        Self::op(Op::Equal, vec![lhs, rhs], Type::Bool)
    }

    pub fn ite(cond: Expr, then_expr: Expr, else_expr: Expr) -> Self {
        let ty = then_expr.ty.clone();
        Self::op(Op::Ite, vec![cond, then_expr, else_expr], ty)
    }

    /// `true` for no operands, the operand itself for one, `And` otherwise.
    pub fn conjunction(mut operands: Vec<Expr>) -> Self {
        match operands.len() {
            0 => Self::bool(true),
            1 => operands.remove(0),
            _ => Self::and(operands),
        }
    }

    /// `false` for no operands, the operand itself for one, `Or` otherwise.
    pub fn disjunction(mut operands: Vec<Expr>) -> Self {
        match operands.len() {
            0 => Self::bool(false),
            1 => operands.remove(0),
            _ => Self::or(operands),
        }
    }

    // ── temporal constructors ───────────────────────────────────────

    pub fn past(op: Expr, ticks: u64) -> Self {
        Self::past_by(op, Self::natural(ticks))
    }

    pub fn past_by(op: Expr, ticks: Expr) -> Self {
        let ty = op.ty.clone();
        Self::new(
            ExprKind::Past {
                op: boxed(op),
                ticks: boxed(ticks),
            },
            ty,
        )
    }

    pub fn ltl_next(op: Expr) -> Self {
        Self::new(ExprKind::Next(boxed(op)), Type::Bool)
    }

    pub fn ltl_eventually(op: Expr) -> Self {
        Self::new(ExprKind::Eventually(boxed(op)), Type::Bool)
    }

    pub fn globally(op: Expr) -> Self {
        Self::new(ExprKind::Globally(boxed(op)), Type::Bool)
    }

    pub fn release(lhs: Expr, rhs: Expr) -> Self {
        Self::new(ExprKind::Release(boxed(lhs), boxed(rhs)), Type::Bool)
    }

    pub fn all_paths(op: Expr) -> Self {
        Self::new(ExprKind::AllPaths(boxed(op)), Type::Bool)
    }

    pub fn exists_path(op: Expr) -> Self {
        Self::new(ExprKind::ExistsPath(boxed(op)), Type::Bool)
    }

    pub fn always(op: Expr) -> Self {
        Self::new(ExprKind::Always(boxed(op)), Type::Bool)
    }

    pub fn ranged_eventually(lower: u64, upper: u64, op: Expr) -> Self {
        Self::new(
            ExprKind::RangedEventually {
                lower: boxed(Self::natural(lower)),
                upper: boxed(Self::natural(upper)),
                op: boxed(op),
            },
            Type::Bool,
        )
    }

    pub fn s_eventually(op: Expr) -> Self {
        Self::new(ExprKind::StrongEventually(boxed(op)), Type::Bool)
    }

    fn until_kind(strength: UntilStrength, overlapping: bool, lhs: Expr, rhs: Expr) -> Self {
        Self::new(
            ExprKind::Until {
                strength,
                overlapping,
                lhs: boxed(lhs),
                rhs: boxed(rhs),
            },
            Type::Bool,
        )
    }

    pub fn until(lhs: Expr, rhs: Expr) -> Self {
        Self::until_kind(UntilStrength::Weak, false, lhs, rhs)
    }

    pub fn s_until(lhs: Expr, rhs: Expr) -> Self {
        Self::until_kind(UntilStrength::Strong, false, lhs, rhs)
    }

    pub fn until_with(lhs: Expr, rhs: Expr) -> Self {
        Self::until_kind(UntilStrength::Weak, true, lhs, rhs)
    }

    pub fn s_until_with(lhs: Expr, rhs: Expr) -> Self {
        Self::until_kind(UntilStrength::Strong, true, lhs, rhs)
    }

    pub fn cycle_delay(from: u64, op: Expr) -> Self {
        Self::new(
            ExprKind::CycleDelay {
                from: boxed(Self::natural(from)),
                to: None,
                op: boxed(op),
            },
            Type::Bool,
        )
    }

    pub fn cycle_delay_range(from: u64, to: u64, op: Expr) -> Self {
        Self::new(
            ExprKind::CycleDelay {
                from: boxed(Self::natural(from)),
                to: Some(DelayUpper::Bounded(boxed(Self::natural(to)))),
                op: boxed(op),
            },
            Type::Bool,
        )
    }

    pub fn cycle_delay_unbounded(from: u64, op: Expr) -> Self {
        Self::new(
            ExprKind::CycleDelay {
                from: boxed(Self::natural(from)),
                to: Some(DelayUpper::Unbounded),
                op: boxed(op),
            },
            Type::Bool,
        )
    }

    pub fn sequence_concat(lhs: Expr, rhs: Expr) -> Self {
        Self::new(ExprKind::SequenceConcat(boxed(lhs), boxed(rhs)), Type::Bool)
    }

    pub fn sequence_and(operands: Vec<Expr>) -> Self {
        Self::new(ExprKind::SequenceAnd(operands), Type::Bool)
    }

    pub fn sequence_or(operands: Vec<Expr>) -> Self {
        Self::new(ExprKind::SequenceOr(operands), Type::Bool)
    }

    pub fn sequence_intersect(lhs: Expr, rhs: Expr) -> Self {
        Self::new(ExprKind::SequenceIntersect(boxed(lhs), boxed(rhs)), Type::Bool)
    }

    pub fn first_match(op: Expr) -> Self {
        Self::new(ExprKind::FirstMatch(boxed(op)), Type::Bool)
    }

    pub fn throughout(lhs: Expr, rhs: Expr) -> Self {
        Self::new(ExprKind::Throughout(boxed(lhs), boxed(rhs)), Type::Bool)
    }

    pub fn within(lhs: Expr, rhs: Expr) -> Self {
        Self::new(ExprKind::Within(boxed(lhs), boxed(rhs)), Type::Bool)
    }

    pub fn overlapped_implication(lhs: Expr, rhs: Expr) -> Self {
        Self::new(
            ExprKind::Implication {
                overlapped: true,
                lhs: boxed(lhs),
                rhs: boxed(rhs),
            },
            Type::Bool,
        )
    }

    pub fn non_overlapped_implication(lhs: Expr, rhs: Expr) -> Self {
        Self::new(
            ExprKind::Implication {
                overlapped: false,
                lhs: boxed(lhs),
                rhs: boxed(rhs),
            },
            Type::Bool,
        )
    }

    // ── queries ─────────────────────────────────────────────────────

    pub fn as_constant(&self) -> Option<&BigInt> {
        match &self.kind {
            ExprKind::Constant(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_true(&self) -> bool {
        self.ty.is_bool() && self.as_constant().is_some_and(|v| !v.is_zero())
    }

    pub fn is_false(&self) -> bool {
        self.ty.is_bool() && self.as_constant().is_some_and(|v| v.is_zero())
    }

    /// Direct sub-expressions, including offset and bound operands.
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Symbol(_) | ExprKind::NextSymbol(_) | ExprKind::Constant(_) => Vec::new(),
            ExprKind::Op(_, operands)
            | ExprKind::SequenceAnd(operands)
            | ExprKind::SequenceOr(operands) => operands.iter().collect(),
            ExprKind::Past { op, ticks } => vec![op, ticks],
            ExprKind::Next(op)
            | ExprKind::Eventually(op)
            | ExprKind::Globally(op)
            | ExprKind::AllPaths(op)
            | ExprKind::ExistsPath(op)
            | ExprKind::Always(op)
            | ExprKind::StrongEventually(op)
            | ExprKind::FirstMatch(op) => vec![op],
            ExprKind::Release(lhs, rhs)
            | ExprKind::SequenceConcat(lhs, rhs)
            | ExprKind::SequenceIntersect(lhs, rhs)
            | ExprKind::Throughout(lhs, rhs)
            | ExprKind::Within(lhs, rhs)
            | ExprKind::Until { lhs, rhs, .. }
            | ExprKind::Implication { lhs, rhs, .. } => vec![lhs, rhs],
            ExprKind::RangedEventually { lower, upper, op } => vec![lower, upper, op],
            ExprKind::CycleDelay { from, to, op } => {
                let mut out: Vec<&Expr> = vec![from];
                if let Some(DelayUpper::Bounded(to)) = to {
                    out.push(to);
                }
                out.push(op);
                out
            }
        }
    }

    /// Depth-first search for a node satisfying `pred`.
    pub fn contains(&self, pred: &dyn Fn(&Expr) -> bool) -> bool {
        pred(self) || self.children().into_iter().any(|c| c.contains(pred))
    }

    /// No next-state references and no temporal or sequence operators.
    pub fn is_flat(&self) -> bool {
        !self.contains(&|e| matches!(e.kind, ExprKind::NextSymbol(_)) || e.kind.is_temporal())
    }

    /// Identifiers of all symbols (current and next-state), in first-seen order.
    pub fn symbol_names(&self) -> IndexSet<String> {
        let mut out = IndexSet::new();
        self.collect_symbol_names(&mut out);
        out
    }

    fn collect_symbol_names(&self, out: &mut IndexSet<String>) {
        match &self.kind {
            ExprKind::Symbol(name) | ExprKind::NextSymbol(name) => {
                out.insert(name.clone());
            }
            _ => {
                for child in self.children() {
                    child.collect_symbol_names(out);
                }
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Expr], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " {sep} ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, ")")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Symbol(name) => write!(f, "{name}"),
            ExprKind::NextSymbol(name) => write!(f, "{name}'"),
            ExprKind::Constant(v) if self.ty.is_bool() => {
                write!(f, "{}", if v.is_zero() { "false" } else { "true" })
            }
            ExprKind::Constant(v) => write!(f, "{v}"),
            ExprKind::Op(op, operands) => match (op, operands.as_slice()) {
                (Op::And, []) => write!(f, "true"),
                (Op::Or, []) => write!(f, "false"),
                (Op::Not | Op::Neg | Op::BitNot, [x]) => write!(f, "{}{x}", op.symbol()),
                (Op::Ite, [c, a, b]) => write!(f, "({c} ? {a} : {b})"),
                _ => write_joined(f, operands, op.symbol()),
            },
            ExprKind::Past { op, ticks } => write!(f, "$past({op}, {ticks})"),
            ExprKind::Next(op) => write!(f, "X {op}"),
            ExprKind::Eventually(op) => write!(f, "F {op}"),
            ExprKind::Globally(op) => write!(f, "G {op}"),
            ExprKind::Release(lhs, rhs) => write!(f, "({lhs} R {rhs})"),
            ExprKind::AllPaths(op) => write!(f, "A {op}"),
            ExprKind::ExistsPath(op) => write!(f, "E {op}"),
            ExprKind::Always(op) => write!(f, "always {op}"),
            ExprKind::RangedEventually { lower, upper, op } => {
                write!(f, "eventually [{lower}:{upper}] {op}")
            }
            ExprKind::StrongEventually(op) => write!(f, "s_eventually {op}"),
            ExprKind::Until { lhs, rhs, .. } => write!(f, "({lhs} {} {rhs})", self.kind.name()),
            ExprKind::CycleDelay { from, to, op } => match to {
                None => write!(f, "##{from} {op}"),
                Some(DelayUpper::Bounded(to)) => write!(f, "##[{from}:{to}] {op}"),
                Some(DelayUpper::Unbounded) => write!(f, "##[{from}:$] {op}"),
            },
            ExprKind::SequenceConcat(lhs, rhs) => {
                if matches!(rhs.kind, ExprKind::CycleDelay { .. }) {
                    write!(f, "({lhs} {rhs})")
                } else {
                    write!(f, "({lhs} ##0 {rhs})")
                }
            }
            ExprKind::SequenceAnd(operands) => write_joined(f, operands, "and"),
            ExprKind::SequenceOr(operands) => write_joined(f, operands, "or"),
            ExprKind::SequenceIntersect(lhs, rhs) => write!(f, "({lhs} intersect {rhs})"),
            ExprKind::FirstMatch(op) => write!(f, "first_match({op})"),
            ExprKind::Throughout(lhs, rhs) => write!(f, "({lhs} throughout {rhs})"),
            ExprKind::Within(lhs, rhs) => write!(f, "({lhs} within {rhs})"),
            ExprKind::Implication { lhs, rhs, .. } => {
                write!(f, "({lhs} {} {rhs})", self.kind.name())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conjunction_and_disjunction_collapse_trivial_cases() {
        assert!(Expr::conjunction(vec![]).is_true());
        assert!(Expr::disjunction(vec![]).is_false());
        let x = Expr::bool_symbol("x");
        assert_eq!(Expr::conjunction(vec![x.clone()]), x);
        assert_eq!(Expr::disjunction(vec![x.clone()]), x);
        assert!(matches!(
            Expr::conjunction(vec![x.clone(), x]).kind,
            ExprKind::Op(Op::And, ref ops) if ops.len() == 2
        ));
    }

    #[test]
    fn flatness_rejects_next_symbols_and_temporal_nodes() {
        let x = Expr::bool_symbol("x");
        assert!(Expr::and(vec![x.clone(), Expr::not(x.clone())]).is_flat());
        assert!(!Expr::next_symbol("x", Type::Bool).is_flat());
        assert!(!Expr::or(vec![x.clone(), Expr::always(x.clone())]).is_flat());
        assert!(!Expr::cycle_delay(1, x).is_flat());
    }

    #[test]
    fn children_include_offset_operands() {
        let e = Expr::cycle_delay_range(1, 3, Expr::bool_symbol("q"));
        assert_eq!(e.children().len(), 3);
        let e = Expr::cycle_delay_unbounded(1, Expr::bool_symbol("q"));
        assert_eq!(e.children().len(), 2);
    }

    #[test]
    fn symbol_names_are_deduplicated_in_order() {
        let e = Expr::until(
            Expr::and(vec![Expr::bool_symbol("b"), Expr::bool_symbol("a")]),
            Expr::next_symbol("b", Type::Bool),
        );
        let names: Vec<_> = e.symbol_names().into_iter().collect();
        assert_eq!(names, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn display_renders_sva_syntax() {
        let p = Expr::bool_symbol("p");
        let q = Expr::bool_symbol("q");
        let seq = Expr::sequence_concat(p.clone(), Expr::cycle_delay(1, q.clone()));
        assert_eq!(seq.to_string(), "(p ##1 q)");
        let imp = Expr::non_overlapped_implication(p.clone(), q.clone());
        assert_eq!(imp.to_string(), "(p |=> q)");
        let u = Expr::s_until_with(p.clone(), q.clone());
        assert_eq!(u.to_string(), "(p s_until_with q)");
        let d = Expr::cycle_delay_unbounded(2, q);
        assert_eq!(d.to_string(), "##[2:$] q");
        assert_eq!(Expr::past(p, 2).to_string(), "$past(p, 2)");
    }

    #[test]
    fn temporal_classification() {
        let p = Expr::bool_symbol("p");
        assert!(!p.kind.is_temporal());
        assert!(Expr::ltl_next(p.clone()).kind.is_temporal());
        assert!(Expr::sequence_or(vec![p.clone()]).kind.is_sequence());
        assert!(!Expr::always(p).kind.is_sequence());
    }
}
