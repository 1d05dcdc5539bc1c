//! Loop-back constraints for liveness counterexamples.

use num::traits::Zero;
use ocelot_ir::expr::Expr;
use ocelot_ir::symbols::SymbolTable;

use crate::error::Result;
use crate::instantiate::Instantiator;
use crate::timeframe::{lasso_symbol, Timeframe};

/// Defines every lasso symbol of an unrolling with `timeframes` states:
/// `lasso(k, i) <-> (v@k == v@i for every state variable v)` for
/// `0 <= k < i < timeframes`.
pub fn lasso_constraints(
    state_variables: &[Expr],
    timeframes: &Timeframe,
    symbols: &SymbolTable,
) -> Result<Vec<Expr>> {
    let inst = Instantiator::new(timeframes, symbols)?;
    let mut constraints = Vec::new();
    for i in num::range(Timeframe::zero(), timeframes.clone()) {
        for k in num::range(Timeframe::zero(), i.clone()) {
            let mut equalities = Vec::with_capacity(state_variables.len());
            for var in state_variables {
                let (_, at_k) = inst.instantiate(var, &k)?;
                let (_, at_i) = inst.instantiate(var, &i)?;
                equalities.push(Expr::equal(at_k, at_i));
            }
            constraints.push(Expr::equal(
                lasso_symbol(&k, &i),
                Expr::conjunction(equalities),
            ));
        }
    }
    Ok(constraints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocelot_ir::types::Type;

    #[test]
    fn one_constraint_per_loop_candidate() {
        let vars = vec![Expr::bool_symbol("x"), Expr::symbol("c", Type::Unsigned(2))];
        let got = lasso_constraints(&vars, &Timeframe::from(3u32), &SymbolTable::new()).unwrap();
        assert_eq!(got.len(), 3);
        assert_eq!(got[0].to_string(), "(lasso@1-to-0 == ((x@0 == x@1) && (c@0 == c@1)))");
        assert!(got.iter().all(Expr::is_flat));
    }

    #[test]
    fn no_state_means_every_loop_is_possible() {
        let got = lasso_constraints(&[], &Timeframe::from(2u32), &SymbolTable::new()).unwrap();
        let expected = Expr::equal(
            lasso_symbol(&Timeframe::zero(), &Timeframe::from(1u32)),
            Expr::bool(true),
        );
        assert_eq!(got, vec![expected]);
    }
}
