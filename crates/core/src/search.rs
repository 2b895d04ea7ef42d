//! Plan Search

use rustc_hash::FxHashSet;
use slotmap::SecondaryMap;
use thiserror::Error;

use crate::{
    bounds::{self, BoundsError},
    model::{self, Exclusion, ModelError, ModelShape, PlanVariables},
    params::PlanParams,
    plan::{self, AdjustmentPlan},
    roles::RoleKey,
    solvers::{Solver, SolverError, VariableAssignment},
};

/// Default cap on the number of plans one alternatives search may return.
pub const DEFAULT_MAX_SOLUTIONS: usize = 10;

/// Errors raised while searching for plans.
///
/// These are structural or backend failures; a solver verdict of
/// "infeasible" is a legitimate business outcome and shows up as an empty
/// or truncated result instead.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Bound resolution failed before any solve.
    #[error(transparent)]
    Bounds(#[from] BoundsError),

    /// Model construction failed before any solve.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The solver backend failed outright.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Find the feasible plan with the smallest revenue surplus over the
/// baseline.
///
/// Returns `Ok(None)` when the solver reports anything other than an
/// optimal verdict: no valid price plan exists under the given rules.
///
/// # Errors
///
/// Returns a [`PlanError`] for structural input problems (empty bounds,
/// unrepresentable numbers) or backend failures.
pub fn optimal_plan(
    params: &PlanParams,
    solver: &dyn Solver,
) -> Result<Option<AdjustmentPlan>, PlanError> {
    let bounds = bounds::resolve_all(params)?;
    let built = model::build(params, &bounds, ModelShape::MinimalSurplus, &[])?;
    let variables = built.variables().clone();

    let Some(assignment) = solver.solve(built)?.into_optimal_assignment() else {
        return Ok(None);
    };

    let adjustments = snapped_adjustments(params, &variables, &assignment)?;

    Ok(Some(AdjustmentPlan::from_adjustments(params, &adjustments)))
}

/// Enumerate up to `max_solutions` structurally distinct plans.
///
/// Each accepted plan is recorded in the search state and excluded from
/// later solves; the sequence ends early — normally, not as an error —
/// when the model turns infeasible or a solve re-derives an already
/// accepted assignment despite the exclusions.
///
/// # Errors
///
/// Returns a [`PlanError`] for structural input problems or backend
/// failures.
pub fn alternative_plans(
    params: &PlanParams,
    max_solutions: usize,
    solver: &dyn Solver,
) -> Result<Vec<AdjustmentPlan>, PlanError> {
    let bounds = bounds::resolve_all(params)?;
    let mut state = SearchState::default();
    let mut plans = Vec::new();

    while plans.len() < max_solutions {
        let built = model::build(params, &bounds, ModelShape::Alternatives, state.exclusions())?;
        let variables = built.variables().clone();

        let Some(assignment) = solver.solve(built)?.into_optimal_assignment() else {
            break;
        };

        let adjustments = snapped_adjustments(params, &variables, &assignment)?;

        if !state.accept(params, &adjustments) {
            break;
        }

        plans.push(AdjustmentPlan::from_adjustments(params, &adjustments));
    }

    Ok(plans)
}

/// Read every role's adjustment from the assignment and snap it onto the
/// mode's value grid.
fn snapped_adjustments(
    params: &PlanParams,
    variables: &PlanVariables,
    assignment: &VariableAssignment,
) -> Result<SecondaryMap<RoleKey, f64>, PlanError> {
    let mut adjustments = SecondaryMap::new();

    for (key, _) in params.roster().iter() {
        let raw = variables
            .adjustment(key)
            .and_then(|var| assignment.value(var))
            .ok_or(SolverError::InvariantViolation {
                message: "backend reported no value for an adjustment variable",
            })?;

        adjustments.insert(key, plan::snap(params.mode(), raw));
    }

    Ok(adjustments)
}

/// Accepted-assignment bookkeeping threaded through the alternatives loop.
#[derive(Debug, Default)]
struct SearchState {
    seen: FxHashSet<Vec<i64>>,
    exclusions: Vec<Exclusion>,
}

impl SearchState {
    fn exclusions(&self) -> &[Exclusion] {
        &self.exclusions
    }

    /// Record a candidate assignment. Returns `false` for an exact
    /// duplicate of an earlier acceptance, which ends the search: it means
    /// an exclusion failed to bite and later rounds would loop forever.
    fn accept(&mut self, params: &PlanParams, adjustments: &SecondaryMap<RoleKey, f64>) -> bool {
        if !self.seen.insert(plan::quantized_key(params, adjustments)) {
            return false;
        }

        self.exclusions.push(Exclusion::new(adjustments.clone()));

        true
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SecondaryMap;
    use testresult::TestResult;

    use crate::{
        params::ValueMode,
        roles::{Role, Roster},
        solvers::MilpSolver,
    };

    use super::*;

    fn duo_params() -> TestResult<PlanParams> {
        let roster = Roster::new(
            [Role::new("a", 10), Role::new("b", 10)],
            &["a".to_string(), "b".to_string()],
        )?;

        Ok(PlanParams::new(100.0, roster, ValueMode::Integer)?)
    }

    #[test]
    fn search_state_rejects_exact_duplicates() -> TestResult {
        let params = duo_params()?;
        let mut state = SearchState::default();

        let mut adjustments = SecondaryMap::new();
        adjustments.insert(params.roster().key("a").ok_or("role a missing")?, 1.0);
        adjustments.insert(params.roster().key("b").ok_or("role b missing")?, -1.0);

        assert!(state.accept(&params, &adjustments), "first acceptance");
        assert!(!state.accept(&params, &adjustments), "duplicate rejected");
        assert_eq!(state.exclusions().len(), 1);

        Ok(())
    }

    #[test]
    fn optimal_plan_reports_none_for_contradictory_bounds() -> TestResult {
        let params = duo_params()?.with_limits(Some(0.0), Some(0.0))?;

        let plan = optimal_plan(&params, &MilpSolver)?;

        assert!(plan.is_none(), "zero-pinned bounds admit no plan");

        Ok(())
    }

    #[test]
    fn alternative_plans_are_distinct_and_capped() -> TestResult {
        let params = duo_params()?;

        let plans = alternative_plans(&params, 3, &MilpSolver)?;

        assert_eq!(plans.len(), 3, "default bounds admit many distinct plans");

        for (index, first) in plans.iter().enumerate() {
            for second in plans.iter().skip(index + 1) {
                assert_ne!(
                    first.adjustments, second.adjustments,
                    "accepted plans must not repeat an adjustment tuple"
                );
            }
        }

        Ok(())
    }
}
