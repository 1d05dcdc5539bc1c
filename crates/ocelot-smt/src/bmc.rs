use std::collections::{BTreeMap, HashMap};

use num::ToPrimitive;
use ocelot_ir::expr::Expr;
use ocelot_ir::properties::{PropertySet, PropertyStatus};
use ocelot_ir::transition_system::TransitionSystem;
use ocelot_unroll::timeframe::split_timeframe_identifier;
use ocelot_unroll::{instantiate_property, lasso_constraints, unwind, InstantiationError, Timeframe};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::encoder::{EncodeError, ExprEncoder};
use crate::solver::{Model, ModelValue, SatResult, SmtSolver};
use crate::sorts::SmtSort;
use crate::terms::SmtTerm;

/// Options for a BMC run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BmcOptions {
    /// Number of timeframes to unroll.
    pub bound: usize,
    pub stop_on_first_refutation: bool,
    /// Ask the solver for a model of every refuted property.
    pub extract_witness: bool,
}

impl Default for BmcOptions {
    fn default() -> Self {
        Self {
            bound: 10,
            stop_on_first_refutation: false,
            extract_witness: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum BmcError<E: std::error::Error + 'static> {
    #[error("Solver error: {0}")]
    Solver(#[source] E),
    #[error(transparent)]
    Instantiation(#[from] InstantiationError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// One state of a witness trace.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TraceState {
    pub timeframe: usize,
    pub values: BTreeMap<String, ModelValue>,
}

/// A counterexample, one state per timeframe.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Trace {
    pub states: Vec<TraceState>,
}

impl Trace {
    /// Groups the timeframe variables of `model` by timeframe.
    pub fn from_model(model: &Model) -> Self {
        let mut frames: BTreeMap<usize, BTreeMap<String, ModelValue>> = BTreeMap::new();
        for (name, value) in &model.values {
            let Some((base, t)) = split_timeframe_identifier(name) else {
                continue;
            };
            let Some(t) = t.to_usize() else {
                continue;
            };
            frames
                .entry(t)
                .or_default()
                .insert(base.to_string(), value.clone());
        }
        Self {
            states: frames
                .into_iter()
                .map(|(timeframe, values)| TraceState { timeframe, values })
                .collect(),
        }
    }

    /// Value of `base` in timeframe `t`.
    pub fn value(&self, t: usize, base: &str) -> Option<&ModelValue> {
        self.states
            .iter()
            .find(|s| s.timeframe == t)
            .and_then(|s| s.values.get(base))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyOutcome {
    pub identifier: String,
    pub status: PropertyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub witness: Option<Trace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// Result of a BMC run over a property set.
#[derive(Debug, Clone, Serialize)]
pub struct BmcReport {
    pub bound: usize,
    /// Timeframes actually unrolled; at least `bound`.
    pub timeframes: usize,
    pub results: Vec<PropertyOutcome>,
}

impl BmcReport {
    pub fn outcome(&self, identifier: &str) -> Option<&PropertyOutcome> {
        self.results.iter().find(|o| o.identifier == identifier)
    }
}

fn solver_error<E: std::error::Error + 'static>(err: E) -> BmcError<E> {
    BmcError::Solver(err)
}

/// Checks every enabled property of `properties` on the first
/// `options.bound` timeframes of `ts`, updating their status.
///
/// Properties that cannot be instantiated or encoded are marked `Failure`
/// and the run continues with the others. Liveness properties are only ever
/// refuted; UNSAT leaves them `Inconclusive`.
pub fn run_bmc<S: SmtSolver>(
    solver: &mut S,
    ts: &TransitionSystem,
    properties: &mut PropertySet,
    options: &BmcOptions,
) -> Result<BmcReport, BmcError<S::Error>>
where
    S::Error: 'static,
{
    solver.reset().map_err(solver_error)?;
    if options.bound == 0 {
        return Err(InstantiationError::EmptyHorizon.into());
    }
    let bound = Timeframe::from(options.bound);
    let mut timeframes = bound.clone();
    let mut needs_lasso = false;
    let mut pending: Vec<(String, Expr)> = Vec::new();
    let mut assumptions: Vec<Expr> = Vec::new();

    for property in properties.iter_mut() {
        if property.is_disabled() || property.is_failure() {
            continue;
        }
        let Some(expr) = property.normalized_expr.as_ref() else {
            continue;
        };
        match instantiate_property(expr, 0u32, bound.clone(), &ts.symbols) {
            Ok((mark, flat)) => {
                debug!(property = %property.identifier, mark = %mark, "BMC: instantiated property");
                timeframes = timeframes.max(mark + 1u32);
                needs_lasso |= property.requires_lasso_constraints();
                if property.is_assumed() {
                    assumptions.push(flat);
                } else {
                    pending.push((property.identifier.clone(), flat));
                }
            }
            Err(err) => {
                warn!(property = %property.identifier, %err, "BMC: cannot instantiate property");
                property.failure(err.to_string());
            }
        }
    }

    let mut constraints = unwind(ts, &timeframes)?;
    if needs_lasso {
        constraints.extend(lasso_constraints(
            &ts.state_variables(),
            &timeframes,
            &ts.symbols,
        )?);
    }
    constraints.extend(assumptions);

    let mut encoder = ExprEncoder::new(&ts.symbols);
    for constraint in &constraints {
        encoder.assert(constraint)?;
    }
    let mut goals: Vec<(String, SmtTerm)> = Vec::new();
    for (identifier, flat) in pending {
        match encoder.encode(&flat) {
            Ok(term) => goals.push((identifier, term)),
            Err(err) => {
                warn!(property = %identifier, %err, "BMC: cannot encode property");
                if let Some(property) = properties.get_mut(&identifier) {
                    property.failure(err.to_string());
                }
            }
        }
    }
    let encoding = encoder.into_encoding();
    let unrolled = timeframes.to_usize().unwrap_or(usize::MAX);
    info!(
        bound = options.bound,
        timeframes = unrolled,
        declarations = encoding.declarations.len(),
        assertions = encoding.assertion_unique(),
        dedup_hits = encoding.assertion_dedup_hits(),
        "BMC: unrolling encoded"
    );

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

    let mut witnesses: HashMap<String, Trace> = HashMap::new();
    for (identifier, goal) in goals {
        info!(property = %identifier, "BMC: checking property");
        solver.push().map_err(solver_error)?;
        solver.assert(&goal.not()).map_err(solver_error)?;
        let (result, model) = if options.extract_witness {
            solver
                .check_sat_with_model(&model_vars)
                .map_err(solver_error)?
        } else {
            (solver.check_sat().map_err(solver_error)?, None)
        };
        solver.pop().map_err(solver_error)?;

        let Some(property) = properties.get_mut(&identifier) else {
            continue;
        };
        match result {
            SatResult::Sat => {
                info!(property = %identifier, "BMC: REFUTED - counterexample found");
                property.refuted();
                match model {
                    Some(model) => {
                        witnesses.insert(identifier.clone(), Trace::from_model(&model));
                    }
                    None if options.extract_witness => {
                        warn!(property = %identifier, "BMC: solver returned SAT without a model");
                    }
                    None => {}
                }
                if options.stop_on_first_refutation {
                    break;
                }
            }
            SatResult::Unsat if property.requires_lasso_constraints() => {
                info!(property = %identifier, "BMC: no lasso counterexample within bound");
                property.inconclusive();
            }
            SatResult::Unsat => {
                info!(property = %identifier, bound = options.bound, "BMC: proved up to bound");
                property.proved_with_bound(options.bound);
            }
            SatResult::Unknown(reason) => {
                warn!(property = %identifier, %reason, "BMC: unknown result");
                property.inconclusive();
            }
        }
    }

    let results = properties
        .iter()
        .filter(|p| !p.is_disabled())
        .map(|p| PropertyOutcome {
            identifier: p.identifier.clone(),
            status: p.status.clone(),
            witness: witnesses.remove(&p.identifier),
            failure_reason: p.failure_reason.clone(),
        })
        .collect();

    Ok(BmcReport {
        bound: options.bound,
        timeframes: unrolled,
        results,
    })
}
