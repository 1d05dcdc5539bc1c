//! Canonical keys for assertion deduplication.
//!
//! Two terms that differ only in the order of commutative operands map to the
//! same key.

use crate::backends::smtlib_printer::{bv_cmp_to_smtlib, bv_op_to_smtlib, symbol_to_smtlib};
use crate::terms::{BvOp, SmtTerm};

fn canonical_binary_commutative(tag: &str, lhs: &SmtTerm, rhs: &SmtTerm) -> String {
    let left = canonical_term_key(lhs);
    let right = canonical_term_key(rhs);
    if left <= right {
        format!("({tag} {left} {right})")
    } else {
        format!("({tag} {right} {left})")
    }
}

fn canonical_binary(tag: &str, lhs: &SmtTerm, rhs: &SmtTerm) -> String {
    format!(
        "({tag} {} {})",
        canonical_term_key(lhs),
        canonical_term_key(rhs)
    )
}

fn canonical_nary(tag: &str, terms: &[SmtTerm]) -> String {
    let mut items = terms.iter().map(canonical_term_key).collect::<Vec<_>>();
    items.sort();
    items.dedup();
    format!("({tag} {})", items.join(" "))
}

pub(crate) fn canonical_term_key(term: &SmtTerm) -> String {
    match term {
        SmtTerm::Var(name) => format!("(var {})", symbol_to_smtlib(name)),
        SmtTerm::IntLit(v) => format!("(int {v})"),
        SmtTerm::BoolLit(v) => format!("(bool {v})"),
        SmtTerm::BvLit { value, width } => format!("(bv {value} {width})"),
        SmtTerm::Add(lhs, rhs) => canonical_binary_commutative("+", lhs, rhs),
        SmtTerm::Sub(lhs, rhs) => canonical_binary("-", lhs, rhs),
        SmtTerm::Mul(lhs, rhs) => canonical_binary_commutative("*", lhs, rhs),
        SmtTerm::Eq(lhs, rhs) => canonical_binary_commutative("=", lhs, rhs),
        SmtTerm::Lt(lhs, rhs) => canonical_binary("<", lhs, rhs),
        SmtTerm::Le(lhs, rhs) => canonical_binary("<=", lhs, rhs),
        SmtTerm::Gt(lhs, rhs) => canonical_binary(">", lhs, rhs),
        SmtTerm::Ge(lhs, rhs) => canonical_binary(">=", lhs, rhs),
        SmtTerm::And(terms) => canonical_nary("and", terms),
        SmtTerm::Or(terms) => canonical_nary("or", terms),
        SmtTerm::Not(inner) => format!("(not {})", canonical_term_key(inner)),
        SmtTerm::Xor(lhs, rhs) => canonical_binary_commutative("xor", lhs, rhs),
        SmtTerm::Implies(lhs, rhs) => canonical_binary("=>", lhs, rhs),
        SmtTerm::BvBinary(op, lhs, rhs) => match op {
            BvOp::Sub => canonical_binary(bv_op_to_smtlib(*op), lhs, rhs),
            _ => canonical_binary_commutative(bv_op_to_smtlib(*op), lhs, rhs),
        },
        SmtTerm::BvNeg(inner) => format!("(bvneg {})", canonical_term_key(inner)),
        SmtTerm::BvNot(inner) => format!("(bvnot {})", canonical_term_key(inner)),
        SmtTerm::BvCompare {
            op,
            signed,
            lhs,
            rhs,
        } => canonical_binary(bv_cmp_to_smtlib(*op, *signed), lhs, rhs),
        SmtTerm::Ite(cond, then_term, else_term) => format!(
            "(ite {} {} {})",
            canonical_term_key(cond),
            canonical_term_key(then_term),
            canonical_term_key(else_term)
        ),
    }
}
