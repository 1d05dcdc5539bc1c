//! Proptest strategies for generating well-formed temporal expressions.

use proptest::prelude::*;

use crate::expr::Expr;

/// Boolean leaves: the state bits `a`, `b`, `c` and the two literals.
pub fn arb_bool_leaf() -> impl Strategy<Value = Expr> {
    prop_oneof![
        3 => prop_oneof![Just("a"), Just("b"), Just("c")].prop_map(Expr::bool_symbol),
        1 => any::<bool>().prop_map(Expr::bool),
    ]
}

/// Sequence-shaped expressions: delays, concatenation and sequence `or`/`and`.
pub fn arb_sequence() -> impl Strategy<Value = Expr> {
    arb_bool_leaf().prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            (0..4u64, inner.clone()).prop_map(|(n, op)| Expr::cycle_delay(n, op)),
            (0..3u64, 0..3u64, inner.clone())
                .prop_map(|(from, len, op)| Expr::cycle_delay_range(from, from + len, op)),
            (0..3u64, inner.clone()).prop_map(|(n, op)| Expr::cycle_delay_unbounded(n, op)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expr::sequence_concat(l, r)),
            proptest::collection::vec(inner.clone(), 1..=3).prop_map(Expr::sequence_or),
            proptest::collection::vec(inner, 1..=2).prop_map(Expr::sequence_and),
        ]
    })
}

/// Normalized temporal properties over Boolean state bits, with small
/// constant offsets and no next-state references.
pub fn arb_temporal_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![4 => arb_bool_leaf(), 1 => arb_sequence()];
    leaf.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(Expr::not),
            proptest::collection::vec(inner.clone(), 2..=3).prop_map(Expr::and),
            proptest::collection::vec(inner.clone(), 2..=3).prop_map(Expr::or),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expr::implies(l, r)),
            (inner.clone(), 0..3u64).prop_map(|(op, n)| Expr::past(op, n)),
            inner.clone().prop_map(Expr::ltl_next),
            inner.clone().prop_map(Expr::ltl_eventually),
            inner.clone().prop_map(Expr::always),
            inner.clone().prop_map(Expr::s_eventually),
            (0..3u64, 0..3u64, inner.clone())
                .prop_map(|(lo, len, op)| Expr::ranged_eventually(lo, lo + len, op)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expr::until(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expr::s_until_with(l, r)),
            (arb_sequence(), inner.clone())
                .prop_map(|(l, r)| Expr::overlapped_implication(l, r)),
            (arb_sequence(), inner).prop_map(|(l, r)| Expr::non_overlapped_implication(l, r)),
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ExprKind;

    proptest! {
        #[test]
        fn generated_expressions_have_no_next_state_symbols(e in arb_temporal_expr()) {
            prop_assert!(!e.contains(&|n| matches!(n.kind, ExprKind::NextSymbol(_))));
        }

        #[test]
        fn generated_expressions_are_normalized(e in arb_temporal_expr()) {
            prop_assert_eq!(crate::normalize::normalize_property(&e), Ok(e));
        }
    }
}
