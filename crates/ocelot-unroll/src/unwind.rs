//! Unrolling of the transition relation.

use num::traits::Zero;
use ocelot_ir::expr::Expr;
use ocelot_ir::transition_system::TransitionSystem;

use crate::error::Result;
use crate::instantiate::Instantiator;
use crate::timeframe::Timeframe;

/// `init@0` followed by `trans@t` for every `t` in `0 .. timeframes-1`.
pub fn unwind(ts: &TransitionSystem, timeframes: &Timeframe) -> Result<Vec<Expr>> {
    let inst = Instantiator::new(timeframes, &ts.symbols)?;
    let zero = Timeframe::zero();
    let mut constraints = vec![inst.instantiate(&ts.init, &zero)?.1];
    for t in num::range(zero, timeframes - 1u32) {
        constraints.push(inst.instantiate(&ts.trans, &t)?.1);
    }
    Ok(constraints)
}
