//! Per-timeframe identifiers.
//!
//! Variable `x` in timeframe `t` becomes `x@t`. The mapping is injective as
//! long as base identifiers do not contain the separator, which
//! [`timeframe_symbol`] enforces.

use num::BigUint;
use ocelot_ir::expr::Expr;
use ocelot_ir::types::Type;

use crate::error::{InstantiationError, Result};

/// Index of a timeframe in the unrolling.
pub type Timeframe = BigUint;

pub const TIMEFRAME_SEPARATOR: char = '@';

pub fn timeframe_identifier(t: &Timeframe, base: &str) -> String {
    format!("{base}{TIMEFRAME_SEPARATOR}{t}")
}

/// Symbol `base` renamed into timeframe `t`.
pub fn timeframe_symbol(t: &Timeframe, base: &str, ty: Type) -> Result<Expr> {
    if base.contains(TIMEFRAME_SEPARATOR) {
        return Err(InstantiationError::ReservedSeparator {
            identifier: base.to_string(),
        });
    }
    Ok(Expr::symbol(timeframe_identifier(t, base), ty))
}

/// Splits `base@t` back into its parts. Returns `None` for identifiers that
/// were not produced by [`timeframe_identifier`].
pub fn split_timeframe_identifier(identifier: &str) -> Option<(&str, Timeframe)> {
    let (base, t) = identifier.rsplit_once(TIMEFRAME_SEPARATOR)?;
    if base.is_empty() || t.is_empty() || !t.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((base, t.parse().ok()?))
}

/// Name of the Boolean that holds when state `i` equals state `k`, i.e. the
/// trace can loop back from `i` to `k`.
pub fn lasso_identifier(k: &Timeframe, i: &Timeframe) -> String {
    format!("lasso{TIMEFRAME_SEPARATOR}{i}-to-{k}")
}

pub fn lasso_symbol(k: &Timeframe, i: &Timeframe) -> Expr {
    Expr::bool_symbol(lasso_identifier(k, i))
}
