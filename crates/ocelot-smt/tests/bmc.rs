mod common;

use common::{counter, follower, stuck, toggle, x, BruteForceSolver};
use num::BigUint;
use ocelot_ir::expr::{Expr, Op};
use ocelot_ir::properties::{PropertySet, PropertyStatus};
use ocelot_ir::types::Type;
use ocelot_smt::bmc::{run_bmc, BmcOptions};
use ocelot_smt::solver::ModelValue;

fn options(bound: usize) -> BmcOptions {
    BmcOptions {
        bound,
        ..BmcOptions::default()
    }
}

fn status(properties: &PropertySet, identifier: &str) -> PropertyStatus {
    properties
        .get(identifier)
        .map(|p| p.status.clone())
        .unwrap_or(PropertyStatus::Unknown)
}

#[test]
fn safety_violation_is_refuted_with_witness() {
    let mut properties = PropertySet::new();
    properties.add("never_x", Expr::always(Expr::not(x())));
    let mut solver = BruteForceSolver::new();

    let report = run_bmc(&mut solver, &toggle(), &mut properties, &options(3)).unwrap();

    assert_eq!(status(&properties, "never_x"), PropertyStatus::Refuted);
    let witness = report
        .outcome("never_x")
        .and_then(|o| o.witness.as_ref())
        .expect("refutation carries a witness");
    assert_eq!(witness.value(0, "x"), Some(&ModelValue::Bool(false)));
    assert_eq!(witness.value(1, "x"), Some(&ModelValue::Bool(true)));
}

#[test]
fn safety_holding_up_to_bound_is_proved_with_bound() {
    let mut properties = PropertySet::new();
    let below_three = Expr::op(
        Op::Lt,
        vec![common::cnt(), Expr::constant(3, Type::Unsigned(2))],
        Type::Bool,
    );
    properties.add("below_three", Expr::globally(below_three.clone()));
    let mut solver = BruteForceSolver::new();

    run_bmc(&mut solver, &counter(), &mut properties, &options(3)).unwrap();
    assert_eq!(
        status(&properties, "below_three"),
        PropertyStatus::ProvedWithBound(3)
    );

    let mut properties = PropertySet::new();
    properties.add("below_three", Expr::globally(below_three));
    let report = run_bmc(&mut solver, &counter(), &mut properties, &options(4)).unwrap();
    assert_eq!(status(&properties, "below_three"), PropertyStatus::Refuted);
    let witness = report
        .outcome("below_three")
        .and_then(|o| o.witness.as_ref())
        .expect("witness");
    assert_eq!(
        witness.value(3, "cnt"),
        Some(&ModelValue::BitVec(BigUint::from(3u32)))
    );
}

#[test]
fn liveness_is_refuted_by_a_lasso() {
    let mut properties = PropertySet::new();
    properties.add("eventually_x", Expr::always(Expr::s_eventually(x())));
    let mut solver = BruteForceSolver::new();

    run_bmc(&mut solver, &stuck(), &mut properties, &options(3)).unwrap();
    assert_eq!(status(&properties, "eventually_x"), PropertyStatus::Refuted);
}

#[test]
fn liveness_is_never_proved() {
    let mut properties = PropertySet::new();
    properties.add(
        "infinitely_often_x",
        Expr::globally(Expr::ltl_eventually(x())),
    );
    let mut solver = BruteForceSolver::new();

    run_bmc(&mut solver, &toggle(), &mut properties, &options(3)).unwrap();
    assert_eq!(
        status(&properties, "infinitely_often_x"),
        PropertyStatus::Inconclusive
    );
}

#[test]
fn assumptions_constrain_the_unrolling() {
    let mut properties = PropertySet::new();
    properties.add("never_x", Expr::always(Expr::not(x())));
    let mut solver = BruteForceSolver::new();
    run_bmc(&mut solver, &follower(), &mut properties, &options(3)).unwrap();
    assert_eq!(status(&properties, "never_x"), PropertyStatus::Refuted);

    let mut properties = PropertySet::new();
    properties.add("never_x", Expr::always(Expr::not(x())));
    properties
        .add("input_low", Expr::always(Expr::not(Expr::bool_symbol("i"))))
        .assume();
    let report = run_bmc(&mut solver, &follower(), &mut properties, &options(3)).unwrap();
    assert_eq!(
        status(&properties, "never_x"),
        PropertyStatus::ProvedWithBound(3)
    );
    assert_eq!(status(&properties, "input_low"), PropertyStatus::Assumed);
    assert_eq!(report.results.len(), 2);
}

#[test]
fn failing_properties_do_not_stop_the_run() {
    let mut properties = PropertySet::new();
    properties.add("exists", Expr::exists_path(Expr::ltl_eventually(x())));
    properties.add("renamed", Expr::always(Expr::bool_symbol("x@0")));
    properties.add("never_x", Expr::always(Expr::not(x())));
    let mut solver = BruteForceSolver::new();

    let report = run_bmc(&mut solver, &toggle(), &mut properties, &options(2)).unwrap();

    assert_eq!(status(&properties, "exists"), PropertyStatus::Failure);
    assert_eq!(status(&properties, "renamed"), PropertyStatus::Failure);
    assert!(report
        .outcome("renamed")
        .and_then(|o| o.failure_reason.as_deref())
        .is_some_and(|reason| reason.contains("x@0")));
    assert_eq!(status(&properties, "never_x"), PropertyStatus::Refuted);
}

#[test]
fn selection_and_early_stop() {
    let mut properties = PropertySet::new();
    properties.add("first", Expr::always(Expr::not(x())));
    properties.add("second", Expr::always(x()));
    properties.add("third", Expr::always(Expr::or(vec![x(), Expr::not(x())])));
    let mut solver = BruteForceSolver::new();
    let stop = BmcOptions {
        bound: 2,
        stop_on_first_refutation: true,
        extract_witness: false,
    };

    let report = run_bmc(&mut solver, &toggle(), &mut properties, &stop).unwrap();
    assert_eq!(status(&properties, "first"), PropertyStatus::Refuted);
    assert_eq!(status(&properties, "second"), PropertyStatus::Unknown);
    assert!(report.outcome("first").is_some_and(|o| o.witness.is_none()));
    assert_eq!(solver.checks, 1);

    properties.select("third").unwrap();
    let report = run_bmc(&mut solver, &toggle(), &mut properties, &options(2)).unwrap();
    assert_eq!(report.results.len(), 1);
    assert_eq!(
        status(&properties, "third"),
        PropertyStatus::ProvedWithBound(2)
    );
}

#[test]
fn report_serializes_to_json() {
    let mut properties = PropertySet::new();
    properties.add("never_x", Expr::always(Expr::not(x())));
    let mut solver = BruteForceSolver::new();
    let report = run_bmc(&mut solver, &toggle(), &mut properties, &options(2)).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["bound"], 2);
    assert_eq!(json["results"][0]["status"], "refuted");
    assert_eq!(json["results"][0]["witness"]["states"][1]["values"]["x"], true);
}

#[test]
fn release_with_false_trigger_matches_globally() {
    let mut properties = PropertySet::new();
    properties.add(
        "released",
        Expr::release(Expr::bool(false), Expr::not(x())),
    );
    properties.add("globally", Expr::globally(Expr::not(x())));
    let mut solver = BruteForceSolver::new();

    run_bmc(&mut solver, &stuck(), &mut properties, &options(3)).unwrap();
    assert_eq!(
        status(&properties, "globally"),
        PropertyStatus::ProvedWithBound(3)
    );
    assert_eq!(
        status(&properties, "released"),
        PropertyStatus::ProvedWithBound(3)
    );
}

#[test]
fn negated_delay_beyond_the_bound_is_not_refuted() {
    let mut properties = PropertySet::new();
    properties.add("late_x", Expr::not(Expr::cycle_delay(5, x())));
    let mut solver = BruteForceSolver::new();

    run_bmc(&mut solver, &toggle(), &mut properties, &options(3)).unwrap();
    assert_eq!(
        status(&properties, "late_x"),
        PropertyStatus::ProvedWithBound(3)
    );
}
