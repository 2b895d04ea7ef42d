//! MILP Backend

use good_lp::{ResolutionError, Solution, SolverModel};
use rustc_hash::FxHashMap;

#[cfg(feature = "solver-highs")]
use good_lp::solvers::highs::highs as default_solver;
#[cfg(all(not(feature = "solver-highs"), feature = "solver-microlp"))]
use good_lp::solvers::microlp::microlp as default_solver;

use crate::{
    model::{ConstraintRelation, ModelConstraint, PlanModel},
    solvers::{SolveOutcome, SolveStatus, Solver, SolverError, VariableAssignment},
};

/// Backend driving the `good_lp` engine selected at build time.
#[derive(Debug, Clone, Copy, Default)]
pub struct MilpSolver;

impl Solver for MilpSolver {
    fn solve(&self, model: PlanModel) -> Result<SolveOutcome, SolverError> {
        let (pb, objective, constraints, variables) = model.into_solver_parts();

        let problem = pb.minimise(objective).using(default_solver);
        let problem = apply_recorded_constraints(problem, constraints);

        match problem.solve() {
            Ok(solution) => {
                let values: FxHashMap<_, _> = variables
                    .tracked()
                    .map(|var| (var, solution.value(var)))
                    .collect();

                Ok(SolveOutcome::optimal(VariableAssignment::new(values)))
            }
            Err(ResolutionError::Infeasible) => {
                Ok(SolveOutcome::status_only(SolveStatus::Infeasible))
            }
            Err(ResolutionError::Unbounded) => {
                Ok(SolveOutcome::status_only(SolveStatus::Unbounded))
            }
            Err(_other) => Ok(SolveOutcome::status_only(SolveStatus::Other)),
        }
    }

    fn name(&self) -> &'static str {
        if cfg!(feature = "solver-highs") {
            "highs"
        } else {
            "microlp"
        }
    }
}

fn apply_recorded_constraints<S: SolverModel>(mut model: S, constraints: Vec<ModelConstraint>) -> S {
    for constraint in constraints {
        model = match constraint.relation {
            ConstraintRelation::Eq => model.with(constraint.lhs.eq(constraint.rhs)),
            ConstraintRelation::Leq => model.with(constraint.lhs.leq(constraint.rhs)),
            ConstraintRelation::Geq => model.with(constraint.lhs.geq(constraint.rhs)),
        };
    }

    model
}
