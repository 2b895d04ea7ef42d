//! Reprice prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    bounds::{AdjustmentBounds, BoundsError, resolve_all},
    fixtures::{FixtureError, Scenario, ScenarioRole},
    model::{Exclusion, ModelError, ModelShape, PlanModel, PlanVariables},
    params::{ParamsError, PlanParams, ValueMode},
    plan::AdjustmentPlan,
    report::{plan_table, plans_table},
    roles::{Role, RoleKey, Roster, RosterError},
    search::{DEFAULT_MAX_SOLUTIONS, PlanError, alternative_plans, optimal_plan},
    solvers::{
        MilpSolver, SolveOutcome, SolveStatus, Solver, SolverError, VariableAssignment,
    },
    tiers::{PopularityTier, TierBounds, TierTable, UnknownTier},
};
