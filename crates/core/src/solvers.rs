//! Solvers

use good_lp::Variable;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::model::PlanModel;

pub mod milp;

pub use milp::MilpSolver;

/// Solver Errors
///
/// A backend reports these only for genuine failures; infeasibility and
/// unboundedness are ordinary [`SolveStatus`] verdicts, not errors.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The backend failed in a way that is not a feasibility verdict.
    #[error("solver execution failed: {0}")]
    ExecutionFailed(String),

    /// Internal solver invariant was violated (this is a bug).
    #[error("solver invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

/// Terminal verdict of one solve attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// An optimal assignment was found.
    Optimal,

    /// No assignment satisfies all constraints.
    Infeasible,

    /// The objective can be improved without bound.
    Unbounded,

    /// Any other backend verdict (limits, interruptions, engine trouble).
    Other,
}

/// Variable values reported by a backend for one optimal solve.
#[derive(Debug, Clone, Default)]
pub struct VariableAssignment {
    values: FxHashMap<Variable, f64>,
}

impl VariableAssignment {
    /// Wrap the values a backend extracted.
    #[must_use]
    pub fn new(values: FxHashMap<Variable, f64>) -> Self {
        Self { values }
    }

    /// The reported value of a variable, if the backend tracked it.
    #[must_use]
    pub fn value(&self, variable: Variable) -> Option<f64> {
        self.values.get(&variable).copied()
    }
}

/// Status and (for optimal solves) variable assignment of one attempt.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Verdict reported by the backend.
    pub status: SolveStatus,

    /// Values of the model's tracked variables; present only when the
    /// status is [`SolveStatus::Optimal`].
    pub assignment: Option<VariableAssignment>,
}

impl SolveOutcome {
    /// An optimal outcome carrying its assignment.
    #[must_use]
    pub fn optimal(assignment: VariableAssignment) -> Self {
        Self {
            status: SolveStatus::Optimal,
            assignment: Some(assignment),
        }
    }

    /// A terminal non-optimal outcome.
    #[must_use]
    pub fn status_only(status: SolveStatus) -> Self {
        Self {
            status,
            assignment: None,
        }
    }

    /// The assignment when the verdict is optimal, `None` otherwise.
    #[must_use]
    pub fn into_optimal_assignment(self) -> Option<VariableAssignment> {
        match self.status {
            SolveStatus::Optimal => self.assignment,
            _ => None,
        }
    }
}

/// Boundary to an external MILP/LP engine.
///
/// The planning layers never assume a particular algorithm or transport,
/// only this status/assignment contract, so backends can be swapped without
/// touching model construction or the search loop.
pub trait Solver {
    /// Solve one plan model.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the backend fails outright; feasibility
    /// verdicts are reported through the outcome's status.
    fn solve(&self, model: PlanModel) -> Result<SolveOutcome, SolverError>;

    /// Name of the backend, for reporting.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_optimal_outcomes_carry_no_assignment() {
        let outcome = SolveOutcome::status_only(SolveStatus::Infeasible);

        assert!(outcome.into_optimal_assignment().is_none());
    }

    #[test]
    fn optimal_outcome_exposes_its_assignment() {
        let outcome = SolveOutcome::optimal(VariableAssignment::default());

        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert!(outcome.into_optimal_assignment().is_some());
    }
}
