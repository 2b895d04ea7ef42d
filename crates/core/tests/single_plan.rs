//! Integration tests for the single optimal-plan search

use testresult::TestResult;

use reprice::{
    bounds::{BoundsError, resolve_all},
    model::{ModelShape, build},
    params::{PlanParams, ValueMode},
    plan::AdjustmentPlan,
    roles::{Role, Roster},
    search::{PlanError, optimal_plan},
    solvers::{MilpSolver, SolveOutcome, Solver, SolverError},
    tiers::PopularityTier,
};

/// A backend that must never be reached; used to show that structural
/// input errors surface before any solve.
struct NeverSolver;

impl Solver for NeverSolver {
    fn solve(&self, _model: reprice::model::PlanModel) -> Result<SolveOutcome, SolverError> {
        Err(SolverError::ExecutionFailed(
            "the backend must not be invoked for structurally invalid input".to_string(),
        ))
    }

    fn name(&self) -> &'static str {
        "never"
    }
}

fn duo_roster() -> Result<Roster, reprice::roles::RosterError> {
    Roster::new(
        [Role::new("asuka", 10), Role::new("rei", 10)],
        &["asuka".to_string(), "rei".to_string()],
    )
}

fn delta(plan: &AdjustmentPlan, role: &str) -> TestResult<f64> {
    Ok(*plan
        .adjustments
        .get(role)
        .ok_or_else(|| format!("plan has no adjustment for `{role}`"))?)
}

#[test]
fn two_equal_roles_get_an_ordered_revenue_neutral_plan() -> TestResult {
    let params = PlanParams::new(100.0, duo_roster()?, ValueMode::Integer)?;

    let plan = optimal_plan(&params, &MilpSolver)?.ok_or("expected a feasible plan")?;

    let asuka = delta(&plan, "asuka")?;
    let rei = delta(&plan, "rei")?;

    // The more popular role must sit strictly above its neighbour, and with
    // symmetric counts the minimal surplus is exactly zero.
    assert!(asuka - rei >= 1.0 - 1e-6, "strict ordering, got {asuka} vs {rei}");
    assert!(plan.diff.abs() < 1e-6, "minimal surplus is zero, got {}", plan.diff);

    for role in ["asuka", "rei"] {
        let value = delta(&plan, role)?;

        assert!((-30.0..=30.0).contains(&value), "{role} within ±30% of base");
        assert!((value - value.round()).abs() < 1e-9, "{role} is whole-unit");
    }

    Ok(())
}

#[test]
fn rerunning_the_same_input_yields_the_same_diff() -> TestResult {
    let params = PlanParams::new(100.0, duo_roster()?, ValueMode::Integer)?;

    let first = optimal_plan(&params, &MilpSolver)?.ok_or("expected a feasible plan")?;
    let second = optimal_plan(&params, &MilpSolver)?.ok_or("expected a feasible plan")?;

    assert!((first.diff - second.diff).abs() < 1e-9, "diff is deterministic");

    Ok(())
}

#[test]
fn tiered_roles_honor_their_resolved_intervals() -> TestResult {
    let params = PlanParams::new(100.0, duo_roster()?, ValueMode::Integer)?
        .with_tier("asuka", PopularityTier::TriplePlus)?
        .with_tier("rei", PopularityTier::DoubleMinus)?;

    let plan = optimal_plan(&params, &MilpSolver)?.ok_or("expected a feasible plan")?;

    let asuka = delta(&plan, "asuka")?;
    let rei = delta(&plan, "rei")?;

    assert!((15.0..=30.0).contains(&asuka), "`+++` bounds, got {asuka}");
    assert!((-50.0..=-20.0).contains(&rei), "`--` bounds, got {rei}");
    assert!(plan.diff >= -1e-6, "total revenue never drops below baseline");

    Ok(())
}

#[test]
fn inverted_tier_interval_fails_before_the_backend_runs() -> TestResult {
    // The shipped `---` row is declared as (-0.15, -0.30): empty once
    // resolved. That is a structural input error, not solver infeasibility,
    // so the backend must never be invoked.
    let params = PlanParams::new(100.0, duo_roster()?, ValueMode::Integer)?
        .with_tier("rei", PopularityTier::TripleMinus)?;

    let result = optimal_plan(&params, &NeverSolver);

    assert!(
        matches!(
            result,
            Err(PlanError::Bounds(BoundsError::Infeasible { ref role, .. })) if role == "rei"
        ),
        "expected empty-interval bounds for `rei`"
    );

    Ok(())
}

#[test]
fn solver_infeasibility_is_an_empty_result_not_an_error() -> TestResult {
    let params =
        PlanParams::new(100.0, duo_roster()?, ValueMode::Integer)?.with_limits(Some(0.0), Some(0.0))?;

    let plan = optimal_plan(&params, &MilpSolver)?;

    assert!(plan.is_none(), "zero-pinned bounds admit no plan");

    Ok(())
}

#[test]
fn continuous_mode_orders_roles_with_a_small_gap() -> TestResult {
    let params = PlanParams::new(100.0, duo_roster()?, ValueMode::Continuous)?;

    let plan = optimal_plan(&params, &MilpSolver)?.ok_or("expected a feasible plan")?;

    let asuka = delta(&plan, "asuka")?;
    let rei = delta(&plan, "rei")?;

    assert!(asuka - rei >= 0.01 - 1e-9, "gap of at least one hundredth");
    assert!(plan.diff.abs() < 1e-6, "minimal surplus is zero");

    Ok(())
}

#[test]
fn magnitudes_sit_tight_against_adjustments_at_the_optimum() -> TestResult {
    let params = PlanParams::new(100.0, duo_roster()?, ValueMode::Integer)?;
    let bounds = resolve_all(&params)?;
    let model = build(&params, &bounds, ModelShape::MinimalSurplus, &[])?;
    let variables = model.variables().clone();

    let assignment = MilpSolver
        .solve(model)?
        .into_optimal_assignment()
        .ok_or("expected an optimal outcome")?;

    let mut total_movement = 0.0;

    for (key, role) in params.roster().iter() {
        let adj = variables
            .adjustment(key)
            .and_then(|var| assignment.value(var))
            .ok_or("missing adjustment value")?;
        let mag = variables
            .magnitude(key)
            .and_then(|var| assignment.value(var))
            .ok_or("missing magnitude value")?;

        assert!(
            (mag - adj.abs()).abs() < 1e-6,
            "magnitude of `{}` equals |adjustment|",
            role.name()
        );

        total_movement += mag;
    }

    assert!(total_movement >= 1.0 - 1e-6, "movement floor holds");

    for gap in variables.gaps() {
        let value = assignment.value(*gap).ok_or("missing gap value")?;

        assert!(value >= 1.0 - 1e-6, "ranking gap of at least one unit");
    }

    Ok(())
}
