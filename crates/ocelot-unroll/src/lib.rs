#![doc = include_str!("../README.md")]

//! Ocelot bounded instantiation engine.
//!
//! The entry points are pure functions of the expression, the start
//! timeframe, the bound and the symbol table. Independent calls may run in
//! parallel.

pub mod error;
pub mod instantiate;
pub mod lasso;
pub mod sequence;
pub mod timeframe;
pub mod unwind;

use ocelot_ir::expr::Expr;
use ocelot_ir::symbols::SymbolTable;
use tracing::debug;

pub use error::{InstantiationError, Result};
pub use instantiate::Instantiator;
pub use lasso::lasso_constraints;
pub use sequence::MatchPoint;
pub use timeframe::{timeframe_identifier, Timeframe};
pub use unwind::unwind;

/// Instantiates `expr` at timeframe `t` for an unrolling of `bound`
/// timeframes, for callers that already know how many timeframes they build.
pub fn instantiate(
    expr: &Expr,
    t: impl Into<Timeframe>,
    bound: impl Into<Timeframe>,
    symbols: &SymbolTable,
) -> Result<Expr> {
    Ok(instantiate_property(expr, t, bound, symbols)?.1)
}

/// Like [`instantiate`], also returning the furthest timeframe the result
/// refers to, so the caller can size the unrolled transition relation.
pub fn instantiate_property(
    expr: &Expr,
    current: impl Into<Timeframe>,
    bound: impl Into<Timeframe>,
    symbols: &SymbolTable,
) -> Result<(Timeframe, Expr)> {
    let current = current.into();
    let bound = bound.into();
    let (mark, flat) = Instantiator::new(&bound, symbols)?.instantiate(expr, &current)?;
    debug!(t = %current, bound = %bound, mark = %mark, "instantiated property");
    Ok((mark, flat))
}

/// Every way the sequence `expr` can match when started at `t`.
pub fn sequence_matches(
    expr: &Expr,
    t: impl Into<Timeframe>,
    bound: impl Into<Timeframe>,
    symbols: &SymbolTable,
) -> Result<Vec<MatchPoint>> {
    let bound = bound.into();
    Instantiator::new(&bound, symbols)?.match_sequence(expr, &t.into())
}
