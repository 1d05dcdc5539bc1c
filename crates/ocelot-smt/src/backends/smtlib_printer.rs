use num::Signed;

use crate::sorts::SmtSort;
use crate::terms::{BvCmp, BvOp, SmtTerm};

/// Quotes identifiers that are not SMT-LIB2 simple symbols.
pub fn symbol_to_smtlib(name: &str) -> String {
    const EXTRA: &str = "~!@$%^&*_-+=<>.?/";
    let simple = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || EXTRA.contains(c));
    if simple {
        name.to_string()
    } else {
        format!("|{name}|")
    }
}

fn binary(tag: &str, lhs: &SmtTerm, rhs: &SmtTerm) -> String {
    format!("({tag} {} {})", to_smtlib(lhs), to_smtlib(rhs))
}

fn nary(tag: &str, empty: &str, terms: &[SmtTerm]) -> String {
    match terms {
        [] => empty.to_string(),
        [single] => to_smtlib(single),
        _ => {
            let inner: Vec<String> = terms.iter().map(to_smtlib).collect();
            format!("({tag} {})", inner.join(" "))
        }
    }
}

/// Print an SmtTerm as SMT-LIB2 format.
pub fn to_smtlib(term: &SmtTerm) -> String {
    match term {
        SmtTerm::Var(name) => symbol_to_smtlib(name),
        SmtTerm::IntLit(n) => {
            if n.is_negative() {
                format!("(- {})", -n)
            } else {
                n.to_string()
            }
        }
        SmtTerm::BoolLit(b) => {
            if *b {
                "true".to_string()
            } else {
                "false".to_string()
            }
        }
        SmtTerm::BvLit { value, width } => format!("(_ bv{value} {width})"),
        SmtTerm::Add(lhs, rhs) => binary("+", lhs, rhs),
        SmtTerm::Sub(lhs, rhs) => binary("-", lhs, rhs),
        SmtTerm::Mul(lhs, rhs) => binary("*", lhs, rhs),
        SmtTerm::Eq(lhs, rhs) => binary("=", lhs, rhs),
        SmtTerm::Lt(lhs, rhs) => binary("<", lhs, rhs),
        SmtTerm::Le(lhs, rhs) => binary("<=", lhs, rhs),
        SmtTerm::Gt(lhs, rhs) => binary(">", lhs, rhs),
        SmtTerm::Ge(lhs, rhs) => binary(">=", lhs, rhs),
        SmtTerm::And(terms) => nary("and", "true", terms),
        SmtTerm::Or(terms) => nary("or", "false", terms),
        SmtTerm::Not(inner) => format!("(not {})", to_smtlib(inner)),
        SmtTerm::Xor(lhs, rhs) => binary("xor", lhs, rhs),
        SmtTerm::Implies(lhs, rhs) => binary("=>", lhs, rhs),
        SmtTerm::BvBinary(op, lhs, rhs) => binary(bv_op_to_smtlib(*op), lhs, rhs),
        SmtTerm::BvNeg(inner) => format!("(bvneg {})", to_smtlib(inner)),
        SmtTerm::BvNot(inner) => format!("(bvnot {})", to_smtlib(inner)),
        SmtTerm::BvCompare {
            op,
            signed,
            lhs,
            rhs,
        } => binary(bv_cmp_to_smtlib(*op, *signed), lhs, rhs),
        SmtTerm::Ite(cond, then, els) => {
            format!(
                "(ite {} {} {})",
                to_smtlib(cond),
                to_smtlib(then),
                to_smtlib(els)
            )
        }
    }
}

pub fn bv_op_to_smtlib(op: BvOp) -> &'static str {
    match op {
        BvOp::Add => "bvadd",
        BvOp::Sub => "bvsub",
        BvOp::Mul => "bvmul",
        BvOp::And => "bvand",
        BvOp::Or => "bvor",
        BvOp::Xor => "bvxor",
    }
}

pub fn bv_cmp_to_smtlib(op: BvCmp, signed: bool) -> &'static str {
    match (op, signed) {
        (BvCmp::Lt, false) => "bvult",
        (BvCmp::Le, false) => "bvule",
        (BvCmp::Gt, false) => "bvugt",
        (BvCmp::Ge, false) => "bvuge",
        (BvCmp::Lt, true) => "bvslt",
        (BvCmp::Le, true) => "bvsle",
        (BvCmp::Gt, true) => "bvsgt",
        (BvCmp::Ge, true) => "bvsge",
    }
}

/// Print a sort as SMT-LIB2 format.
pub fn sort_to_smtlib(sort: &SmtSort) -> String {
    sort.to_string()
}
