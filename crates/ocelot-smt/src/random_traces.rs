//! Random simulation traces.
//!
//! Inputs are fixed to random values at every timeframe, and state variables
//! the initial-state predicate leaves free are fixed at timeframe 0. The
//! solver then fills in the rest of the unrolling.

use num::BigUint;
use ocelot_ir::expr::Expr;
use ocelot_ir::transition_system::TransitionSystem;
use ocelot_unroll::timeframe::split_timeframe_identifier;
use ocelot_unroll::{instantiate, unwind, InstantiationError, Timeframe};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::bmc::Trace;
use crate::encoder::{EncodeError, ExprEncoder};
use crate::solver::{SatResult, SmtSolver};
use crate::sorts::SmtSort;
use crate::terms::SmtTerm;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomTraceOptions {
    pub seed: u64,
    /// Number of traces to generate.
    pub traces: usize,
    /// Transitions per trace; each trace has `steps + 1` states.
    pub steps: usize,
}

impl Default for RandomTraceOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            traces: 10,
            steps: 10,
        }
    }
}

#[derive(Debug, Error)]
pub enum RandomTraceError<E: std::error::Error + 'static> {
    #[error("Solver error: {0}")]
    Solver(#[source] E),
    #[error("transition system has no inputs")]
    NoInputs,
    #[error("cannot pick a random value for {name} of sort {sort}")]
    UnsupportedSort { name: String, sort: SmtSort },
    #[error(transparent)]
    Instantiation(#[from] InstantiationError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

fn solver_error<E: std::error::Error + 'static>(err: E) -> RandomTraceError<E> {
    RandomTraceError::Solver(err)
}

fn random_bits(rng: &mut StdRng, width: u32) -> BigUint {
    let bytes: Vec<u8> = (0..width.div_ceil(8)).map(|_| rng.gen()).collect();
    let value = BigUint::from_bytes_le(&bytes);
    value % (BigUint::from(1u32) << width)
}

fn random_value<E: std::error::Error + 'static>(
    rng: &mut StdRng,
    name: &str,
    sort: &SmtSort,
) -> Result<SmtTerm, RandomTraceError<E>> {
    match sort {
        SmtSort::Bool => Ok(SmtTerm::bool(rng.gen())),
        SmtSort::BitVec(width) => Ok(SmtTerm::bv(random_bits(rng, *width), *width)),
        SmtSort::Int => Err(RandomTraceError::UnsupportedSort {
            name: name.to_string(),
            sort: sort.clone(),
        }),
    }
}

/// Generates `options.traces` traces of `ts`, each driven by random inputs.
///
/// Traces whose random choices contradict the constraints of `ts` are
/// skipped, so fewer than `options.traces` traces may be returned. The same
/// seed yields the same traces.
pub fn random_traces<S: SmtSolver>(
    solver: &mut S,
    ts: &TransitionSystem,
    options: &RandomTraceOptions,
) -> Result<Vec<Trace>, RandomTraceError<S::Error>>
where
    S::Error: 'static,
{
    solver.reset().map_err(solver_error)?;
    let inputs = ts.inputs();
    if inputs.is_empty() {
        return Err(RandomTraceError::NoInputs);
    }
    let constrained = ts.init.symbol_names();
    let free_state: Vec<Expr> = ts
        .state_variables()
        .into_iter()
        .filter(|v| !v.symbol_names().iter().any(|n| constrained.contains(n)))
        .collect();
    info!(
        inputs = inputs.len(),
        free_state = free_state.len(),
        "RANDOM: found inputs and unconstrained state variables"
    );

    let timeframes = Timeframe::from(options.steps + 1);
    let mut encoder = ExprEncoder::new(&ts.symbols);
    for constraint in unwind(ts, &timeframes)? {
        encoder.assert(&constraint)?;
    }

    let mut frozen: Vec<(String, SmtTerm, SmtSort)> = Vec::new();
    for t in 0..=options.steps {
        let state: &[Expr] = if t == 0 { &free_state } else { &[] };
        for var in inputs.iter().chain(state) {
            let flat = instantiate(var, t, timeframes.clone(), &ts.symbols)?;
            let term = encoder.encode(&flat)?;
            let sort = encoder.sort_of(&var.ty)?;
            frozen.push((flat.to_string(), term, sort));
        }
    }
    let encoding = encoder.into_encoding();
    for (name, sort) in &encoding.declarations {
        solver.declare_var(name, sort).map_err(solver_error)?;
    }
    for assertion in &encoding.assertions {
        solver.assert(assertion).map_err(solver_error)?;
    }

    let model_vars: Vec<(&str, &SmtSort)> = encoding
        .declarations
        .iter()
        .filter(|(name, _)| split_timeframe_identifier(name).is_some())
        .map(|(name, sort)| (name.as_str(), sort))
        .collect();

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut traces = Vec::with_capacity(options.traces);
    for index in 0..options.traces {
        let mut choices = Vec::with_capacity(frozen.len());
        for (name, term, sort) in &frozen {
            choices.push(term.clone().eq(random_value(&mut rng, name, sort)?));
        }
        solver.push().map_err(solver_error)?;
        solver.assert(&SmtTerm::and(choices)).map_err(solver_error)?;
        let (result, model) = solver
            .check_sat_with_model(&model_vars)
            .map_err(solver_error)?;
        solver.pop().map_err(solver_error)?;

        match (result, model) {
            (SatResult::Sat, Some(model)) => traces.push(Trace::from_model(&model)),
            (SatResult::Sat, None) => {
                warn!(trace = index, "RANDOM: solver returned SAT without a model");
            }
            (SatResult::Unsat, _) => {
                debug!(trace = index, "RANDOM: random choices contradict the constraints");
            }
            (SatResult::Unknown(reason), _) => {
                warn!(trace = index, %reason, "RANDOM: unknown result");
            }
        }
    }
    info!(
        requested = options.traces,
        generated = traces.len(),
        "RANDOM: traces generated"
    );
    Ok(traces)
}
