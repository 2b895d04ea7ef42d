//! Adjustment Bounds

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use slotmap::SecondaryMap;
use thiserror::Error;

use crate::{
    params::PlanParams,
    roles::RoleKey,
    tiers::PopularityTier,
};

/// Errors raised while resolving per-role adjustment intervals.
///
/// All of these surface before any solver call; an empty interval is a
/// structural input problem, distinct from the solver finding no feasible
/// pricing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundsError {
    /// The resolved interval is empty (`lower > upper`), either because the
    /// configured tier row is inverted or because integer rounding crossed
    /// the ends over.
    #[error("adjustment bounds for role `{role}` are empty: lower {lower} exceeds upper {upper}")]
    Infeasible {
        /// Role whose interval came out empty.
        role: String,

        /// Resolved lower end.
        lower: Decimal,

        /// Resolved upper end.
        upper: Decimal,
    },

    /// The active tier table has no row for an assigned tier.
    #[error("the active tier table has no bounds for tier `{0}`")]
    MissingTierBounds(PopularityTier),

    /// A price or limit cannot be represented as a decimal for exact bound
    /// arithmetic.
    #[error("value {0} cannot be represented as a decimal")]
    NotRepresentable(f64),
}

/// Solver-ready adjustment interval for one role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustmentBounds {
    /// Inclusive lower bound on the price delta.
    pub lower: f64,

    /// Inclusive upper bound on the price delta.
    pub upper: f64,
}

impl AdjustmentBounds {
    /// Width of the interval.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.upper - self.lower
    }

    /// Largest absolute delta the interval allows.
    #[must_use]
    pub fn max_magnitude(&self) -> f64 {
        self.lower.abs().max(self.upper.abs())
    }
}

/// Fraction of the base price used for the global fallback interval when the
/// caller supplies no explicit limits.
const DEFAULT_LIMIT_FRACTION: Decimal = Decimal::from_parts(3, 0, 0, false, 1);

/// Resolve the adjustment interval of every role in the roster.
///
/// Tiered roles take `base_price × fraction` from the active tier table;
/// the rest fall back to the caller's global limits or the ±30%-of-base
/// default. Integer mode pulls the ends inward to whole units
/// (`ceil(lower)`, `floor(upper)`) so a fractional bound never widens the
/// feasible range.
///
/// # Errors
///
/// Returns a [`BoundsError`] when an interval resolves empty, a tier row is
/// missing, or a supplied number has no exact decimal form.
pub fn resolve_all(
    params: &PlanParams,
) -> Result<SecondaryMap<RoleKey, AdjustmentBounds>, BoundsError> {
    let base = to_decimal(params.base_price())?;

    let global_lower = match params.min_adj() {
        Some(limit) => to_decimal(limit)?,
        None => -base * DEFAULT_LIMIT_FRACTION,
    };
    let global_upper = match params.max_adj() {
        Some(limit) => to_decimal(limit)?,
        None => base * DEFAULT_LIMIT_FRACTION,
    };

    let mut resolved = SecondaryMap::new();

    for (key, role) in params.roster().iter() {
        let (mut lower, mut upper) = match params.tier_of(key) {
            Some(tier) => {
                let tier_bounds = params
                    .tier_table()
                    .bounds(tier)
                    .ok_or(BoundsError::MissingTierBounds(tier))?;

                (
                    base * tier_bounds.min_fraction,
                    base * tier_bounds.max_fraction,
                )
            }
            None => (global_lower, global_upper),
        };

        if params.mode().is_integer() {
            lower = lower.ceil();
            upper = upper.floor();
        }

        if lower > upper {
            return Err(BoundsError::Infeasible {
                role: role.name().to_string(),
                lower,
                upper,
            });
        }

        resolved.insert(
            key,
            AdjustmentBounds {
                lower: lower.to_f64().ok_or_else(|| {
                    BoundsError::NotRepresentable(params.base_price())
                })?,
                upper: upper.to_f64().ok_or_else(|| {
                    BoundsError::NotRepresentable(params.base_price())
                })?,
            },
        );
    }

    Ok(resolved)
}

/// Convert an `f64` into a decimal, rejecting values without an exact form.
fn to_decimal(value: f64) -> Result<Decimal, BoundsError> {
    Decimal::from_f64_retain(value).ok_or(BoundsError::NotRepresentable(value))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        params::{PlanParams, ValueMode},
        roles::{Role, Roster},
        tiers::PopularityTier,
    };

    use super::*;

    fn solo_params(mode: ValueMode) -> TestResult<PlanParams> {
        let roster = Roster::new([Role::new("a", 10)], &[])?;

        Ok(PlanParams::new(100.0, roster, mode)?)
    }

    fn bounds_of(params: &PlanParams, name: &str) -> TestResult<AdjustmentBounds> {
        let resolved = resolve_all(params)?;
        let key = params.roster().key(name).ok_or("role not in roster")?;

        Ok(*resolved.get(key).ok_or("bounds not resolved")?)
    }

    #[test]
    fn default_interval_is_thirty_percent_of_base() -> TestResult {
        let params = solo_params(ValueMode::Integer)?;

        let bounds = bounds_of(&params, "a")?;

        assert!((bounds.lower - -30.0).abs() < f64::EPSILON);
        assert!((bounds.upper - 30.0).abs() < f64::EPSILON);

        Ok(())
    }

    #[test]
    fn explicit_limits_replace_the_default() -> TestResult {
        let params = solo_params(ValueMode::Continuous)?.with_limits(Some(-5.5), Some(12.25))?;

        let bounds = bounds_of(&params, "a")?;

        assert!((bounds.lower - -5.5).abs() < f64::EPSILON);
        assert!((bounds.upper - 12.25).abs() < f64::EPSILON);

        Ok(())
    }

    #[test]
    fn integer_mode_pulls_fractional_ends_inward() -> TestResult {
        let params = solo_params(ValueMode::Integer)?.with_limits(Some(-5.5), Some(12.25))?;

        let bounds = bounds_of(&params, "a")?;

        assert!((bounds.lower - -5.0).abs() < f64::EPSILON);
        assert!((bounds.upper - 12.0).abs() < f64::EPSILON);

        Ok(())
    }

    #[test]
    fn tier_bounds_scale_with_the_base_price() -> TestResult {
        let params = solo_params(ValueMode::Integer)?.with_tier("a", PopularityTier::TriplePlus)?;

        let bounds = bounds_of(&params, "a")?;

        assert!((bounds.lower - 15.0).abs() < f64::EPSILON);
        assert!((bounds.upper - 30.0).abs() < f64::EPSILON);

        Ok(())
    }

    #[test]
    fn double_minus_tier_resolves_to_a_markdown_interval() -> TestResult {
        let params = solo_params(ValueMode::Integer)?.with_tier("a", PopularityTier::DoubleMinus)?;

        let bounds = bounds_of(&params, "a")?;

        assert!((bounds.lower - -50.0).abs() < f64::EPSILON);
        assert!((bounds.upper - -20.0).abs() < f64::EPSILON);

        Ok(())
    }

    #[test]
    fn inverted_tier_row_fails_before_any_solve() -> TestResult {
        let params = solo_params(ValueMode::Integer)?.with_tier("a", PopularityTier::TripleMinus)?;

        let result = resolve_all(&params);

        assert!(
            matches!(result, Err(BoundsError::Infeasible { ref role, .. }) if role == "a"),
            "the shipped `---` row is inverted and must surface as empty bounds"
        );

        Ok(())
    }

    #[test]
    fn rounding_that_crosses_the_ends_is_infeasible() -> TestResult {
        // A sub-unit window like [0.2, 0.8] holds no whole number at all.
        let params = solo_params(ValueMode::Integer)?.with_limits(Some(0.2), Some(0.8))?;

        let result = resolve_all(&params);

        assert!(matches!(result, Err(BoundsError::Infeasible { .. })));

        Ok(())
    }

    #[test]
    fn continuous_mode_keeps_fractional_ends() -> TestResult {
        let params = solo_params(ValueMode::Continuous)?.with_limits(Some(0.2), Some(0.8))?;

        let bounds = bounds_of(&params, "a")?;

        assert!((bounds.lower - 0.2).abs() < 1e-12);
        assert!((bounds.upper - 0.8).abs() < 1e-12);

        Ok(())
    }
}
