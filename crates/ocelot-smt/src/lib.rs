#![doc = include_str!("../README.md")]

//! SMT encoding and solver integration for word-level bounded model checking.
//!
//! Properties are instantiated by `ocelot-unroll`, lowered to [`terms::SmtTerm`]
//! by the [`encoder`], and checked by any [`solver::SmtSolver`] backend.

pub mod backends;
pub mod bmc;
pub mod encoder;
pub mod random_traces;
pub mod solver;
pub mod sorts;
pub mod terms;
