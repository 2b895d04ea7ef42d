//! Plan Model

use std::fmt;

use good_lp::{Expression, ProblemVariables, Variable, variable};
use num_traits::ToPrimitive;
use slotmap::SecondaryMap;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    bounds::AdjustmentBounds,
    params::{PlanParams, ValueMode},
    roles::{Role, RoleKey},
};

/// Errors raised while assembling a plan model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A role's unit count has no exact `f64` form, so it cannot become a
    /// solver coefficient without silently changing the objective.
    #[error("unit count of role `{role}` cannot be represented exactly as a solver coefficient")]
    CountNotRepresentable {
        /// Role whose count is out of exact range.
        role: String,
    },

    /// No resolved bounds were supplied for a roster role.
    #[error("no resolved bounds for role `{role}`")]
    MissingBounds {
        /// Role missing from the resolved bounds.
        role: String,
    },

    /// Internal model invariant was violated (this is a bug).
    #[error("model invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

/// Relation operator for a recorded linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintRelation {
    /// Equality (`lhs == rhs`)
    Eq,

    /// Less than or equal (`lhs <= rhs`)
    Leq,

    /// Greater than or equal (`lhs >= rhs`)
    Geq,
}

/// Recorded linear constraint emitted during model construction.
///
/// Constraints are collected here and applied once the backend has turned
/// the variables into a concrete solver model.
#[derive(Debug, Clone)]
pub(crate) struct ModelConstraint {
    /// Left-hand side expression
    pub(crate) lhs: Expression,

    /// Relation operator
    pub(crate) relation: ConstraintRelation,

    /// Right-hand side scalar
    pub(crate) rhs: f64,
}

/// Which single-call model shape to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelShape {
    /// One optimal plan: minimize the non-negative revenue surplus over the
    /// baseline.
    MinimalSurplus,

    /// One step of the alternatives search: keep total revenue at (or, in
    /// whole-unit mode, above) the baseline while minimizing drift.
    Alternatives,
}

/// A previously accepted assignment that later solves must avoid.
///
/// Values are keyed by role and expressed in the same units the adjustment
/// variables use (whole units in integer mode).
#[derive(Debug, Clone, Default)]
pub struct Exclusion {
    values: SecondaryMap<RoleKey, f64>,
}

impl Exclusion {
    /// Record the per-role adjustment values of an accepted plan.
    #[must_use]
    pub fn new(values: SecondaryMap<RoleKey, f64>) -> Self {
        Self { values }
    }

    /// The excluded adjustment for a role.
    #[must_use]
    pub fn value(&self, key: RoleKey) -> Option<f64> {
        self.values.get(key).copied()
    }
}

/// Decision variables of one plan model, keyed by role.
#[derive(Debug, Clone, Default)]
pub struct PlanVariables {
    adjustments: SecondaryMap<RoleKey, Variable>,
    magnitudes: SecondaryMap<RoleKey, Variable>,
    gaps: SmallVec<[Variable; 10]>,
    surplus: Option<Variable>,
}

impl PlanVariables {
    /// The signed price-delta variable of a role.
    #[must_use]
    pub fn adjustment(&self, key: RoleKey) -> Option<Variable> {
        self.adjustments.get(key).copied()
    }

    /// The non-negative magnitude variable linked to a role's adjustment.
    #[must_use]
    pub fn magnitude(&self, key: RoleKey) -> Option<Variable> {
        self.magnitudes.get(key).copied()
    }

    /// Gap variables, one per consecutive pair of the popularity ranking.
    #[must_use]
    pub fn gaps(&self) -> &[Variable] {
        &self.gaps
    }

    /// The surplus variable, present in the minimal-surplus shape only.
    #[must_use]
    pub fn surplus(&self) -> Option<Variable> {
        self.surplus
    }

    /// Every variable a backend should report values for.
    pub(crate) fn tracked(&self) -> impl Iterator<Item = Variable> + '_ {
        self.adjustments
            .values()
            .copied()
            .chain(self.magnitudes.values().copied())
            .chain(self.gaps.iter().copied())
            .chain(self.surplus)
    }
}

/// One solvable pricing model: variables, objective and recorded
/// constraints, ready to hand to a [`Solver`](crate::solvers::Solver).
pub struct PlanModel {
    variables: PlanVariables,
    pb: ProblemVariables,
    objective: Expression,
    constraints: Vec<ModelConstraint>,
}

impl fmt::Debug for PlanModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanModel")
            .field("pb", &"<ProblemVariables>")
            .field("objective", &"<Expression>")
            .field(
                "constraints",
                &format!("[{} constraints]", self.constraints.len()),
            )
            .finish()
    }
}

impl PlanModel {
    /// The model's decision variables, keyed by role.
    #[must_use]
    pub fn variables(&self) -> &PlanVariables {
        &self.variables
    }

    /// Split the model into the parts a backend consumes.
    pub(crate) fn into_solver_parts(
        self,
    ) -> (
        ProblemVariables,
        Expression,
        Vec<ModelConstraint>,
        PlanVariables,
    ) {
        (self.pb, self.objective, self.constraints, self.variables)
    }
}

/// Assemble one plan model.
///
/// Every call builds the same shape: bounded adjustment variables, their
/// linearized magnitudes, the at-least-one-change floor, the strict
/// popularity ordering with a minimum gap, the revenue-drift constraint of
/// the requested [`ModelShape`], and one avoidance block per entry of
/// `exclusions`.
///
/// # Errors
///
/// Returns a [`ModelError`] when bounds are missing for a role or a unit
/// count has no exact solver representation.
pub fn build(
    params: &PlanParams,
    bounds: &SecondaryMap<RoleKey, AdjustmentBounds>,
    shape: ModelShape,
    exclusions: &[Exclusion],
) -> Result<PlanModel, ModelError> {
    let mode = params.mode();
    let epsilon = mode.epsilon();

    let mut pb = ProblemVariables::new();
    let mut constraints = Vec::new();
    let mut adjustments: SecondaryMap<RoleKey, Variable> = SecondaryMap::new();
    let mut magnitudes: SecondaryMap<RoleKey, Variable> = SecondaryMap::new();

    // Adjustment and magnitude variables, with the two-inequality
    // linearization `mag >= adj`, `mag >= -adj` tying them together.
    for (key, role) in params.roster().iter() {
        let role_bounds = bounds.get(key).ok_or_else(|| ModelError::MissingBounds {
            role: role.name().to_string(),
        })?;

        let adj = add_variable(&mut pb, mode, role_bounds.lower, Some(role_bounds.upper));
        let mag = add_variable(&mut pb, mode, 0.0, None);

        let mut above = Expression::default();
        above += mag * 1.0;
        above += adj * -1.0;
        constraints.push(geq(above, 0.0));

        let mut below = Expression::default();
        below += mag * 1.0;
        below += adj * 1.0;
        constraints.push(geq(below, 0.0));

        adjustments.insert(key, adj);
        magnitudes.insert(key, mag);
    }

    // The all-zero plan is not a plan: total movement must clear epsilon.
    let mut magnitude_sum = Expression::default();
    for mag in magnitudes.values() {
        magnitude_sum += *mag * 1.0;
    }
    constraints.push(geq(magnitude_sum, epsilon));

    // Strict ordering along the popularity ranking: each more popular role
    // must sit at least one gap above its neighbour.
    let mut gaps: SmallVec<[Variable; 10]> = SmallVec::new();
    for (higher, lower) in params.roster().popularity_pairs() {
        let adj_higher = lookup(&adjustments, higher)?;
        let adj_lower = lookup(&adjustments, lower)?;
        let gap = add_variable(&mut pb, mode, epsilon, None);

        let mut ordering = Expression::default();
        ordering += adj_higher * 1.0;
        ordering += adj_lower * -1.0;
        ordering += gap * -1.0;
        constraints.push(geq(ordering, 0.0));

        gaps.push(gap);
    }

    // Revenue drift from the baseline as a linear expression:
    // total_adjusted - total_original = sum(count_r * adj_r).
    let mut drift = Expression::default();
    for (key, role) in params.roster().iter() {
        let adj = lookup(&adjustments, key)?;
        drift += adj * count_coefficient(role)?;
    }

    let weight = magnitude_pressure_weight(params, bounds, epsilon);

    let (mut objective, surplus) = match shape {
        ModelShape::MinimalSurplus => {
            let surplus = add_variable(&mut pb, mode, 0.0, None);

            let mut balance = drift;
            balance += surplus * -1.0;
            constraints.push(eq(balance, 0.0));

            let mut objective = Expression::default();
            objective += surplus * 1.0;

            (objective, Some(surplus))
        }
        ModelShape::Alternatives => match mode {
            ValueMode::Integer => {
                constraints.push(geq(drift.clone(), 0.0));

                (drift, None)
            }
            ValueMode::Continuous => {
                constraints.push(eq(drift, 0.0));

                (Expression::default(), None)
            }
        },
    };

    // Light downward pressure on the magnitudes keeps them tight against
    // the adjustments at the optimum; the weight is chosen below the
    // resolution of the primary objective so it only breaks ties.
    // In the continuous alternatives shape the magnitude sum *is* the
    // objective and the pressure coefficient is simply one.
    let magnitude_coeff =
        if shape == ModelShape::Alternatives && mode == ValueMode::Continuous {
            1.0
        } else {
            weight
        };
    for mag in magnitudes.values() {
        objective += *mag * magnitude_coeff;
    }

    // One avoidance block per previously accepted plan: at least one role
    // must move at least epsilon away from its recorded value. The selector
    // binaries pick which side of the recorded value the role lands on.
    for exclusion in exclusions {
        let mut selectors = Expression::default();

        for (key, role) in params.roster().iter() {
            let adj = lookup(&adjustments, key)?;
            let role_bounds = bounds.get(key).ok_or_else(|| ModelError::MissingBounds {
                role: role.name().to_string(),
            })?;
            let target = exclusion
                .value(key)
                .ok_or(ModelError::InvariantViolation {
                    message: "exclusion is missing a roster role",
                })?;

            let big_m = role_bounds.span() + epsilon;
            let up = pb.add(variable().binary());
            let down = pb.add(variable().binary());

            // up = 1 forces adj >= target + epsilon; up = 0 relaxes the
            // inequality past the lower bound.
            let mut above = Expression::default();
            above += adj * 1.0;
            above += up * -big_m;
            constraints.push(geq(above, target + epsilon - big_m));

            // down = 1 forces adj <= target - epsilon.
            let mut below = Expression::default();
            below += adj * 1.0;
            below += down * big_m;
            constraints.push(leq(below, target - epsilon + big_m));

            selectors += up * 1.0;
            selectors += down * 1.0;
        }

        constraints.push(geq(selectors, 1.0));
    }

    Ok(PlanModel {
        variables: PlanVariables {
            adjustments,
            magnitudes,
            gaps,
            surplus,
        },
        pb,
        objective,
        constraints,
    })
}

/// Tie-break weight for the magnitude pressure: small enough that the
/// primary objective always dominates one epsilon step.
fn magnitude_pressure_weight(
    params: &PlanParams,
    bounds: &SecondaryMap<RoleKey, AdjustmentBounds>,
    epsilon: f64,
) -> f64 {
    let total_magnitude_cap: f64 = params
        .roster()
        .iter()
        .filter_map(|(key, _)| bounds.get(key))
        .map(AdjustmentBounds::max_magnitude)
        .sum();

    epsilon / (2.0 * (total_magnitude_cap + epsilon))
}

/// Add a variable with the given bounds, integer-valued when the mode asks
/// for whole units.
fn add_variable(
    pb: &mut ProblemVariables,
    mode: ValueMode,
    lower: f64,
    upper: Option<f64>,
) -> Variable {
    let definition = variable().min(lower);
    let definition = match upper {
        Some(upper) => definition.max(upper),
        None => definition,
    };

    if mode.is_integer() {
        pb.add(definition.integer())
    } else {
        pb.add(definition)
    }
}

fn lookup(
    variables: &SecondaryMap<RoleKey, Variable>,
    key: RoleKey,
) -> Result<Variable, ModelError> {
    variables
        .get(key)
        .copied()
        .ok_or(ModelError::InvariantViolation {
            message: "variable registry is missing a roster role",
        })
}

/// Convert a unit count to an `f64` coefficient if it round-trips exactly.
fn count_coefficient(role: &Role) -> Result<f64, ModelError> {
    let count = role.count();

    count
        .to_f64()
        .filter(|coeff| coeff.to_u64() == Some(count))
        .ok_or_else(|| ModelError::CountNotRepresentable {
            role: role.name().to_string(),
        })
}

fn eq(lhs: Expression, rhs: f64) -> ModelConstraint {
    ModelConstraint {
        lhs,
        relation: ConstraintRelation::Eq,
        rhs,
    }
}

fn leq(lhs: Expression, rhs: f64) -> ModelConstraint {
    ModelConstraint {
        lhs,
        relation: ConstraintRelation::Leq,
        rhs,
    }
}

fn geq(lhs: Expression, rhs: f64) -> ModelConstraint {
    ModelConstraint {
        lhs,
        relation: ConstraintRelation::Geq,
        rhs,
    }
}
