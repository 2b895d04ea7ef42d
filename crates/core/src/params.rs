//! Plan Parameters

use slotmap::SecondaryMap;
use thiserror::Error;

use crate::{
    roles::{RoleKey, Roster},
    tiers::{PopularityTier, TierTable},
};

/// Whether adjustments are restricted to whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMode {
    /// Whole-unit adjustments; the minimum separation is one unit.
    Integer,

    /// Fractional adjustments; the minimum separation is one hundredth.
    Continuous,
}

impl ValueMode {
    /// Minimum separation / non-zero threshold for this mode.
    #[must_use]
    pub fn epsilon(self) -> f64 {
        match self {
            ValueMode::Integer => 1.0,
            ValueMode::Continuous => 0.01,
        }
    }

    /// Whether decision variables are integer-valued.
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(self, ValueMode::Integer)
    }

    /// Map the `integer_only` payload flag to a mode.
    #[must_use]
    pub fn from_integer_only(integer_only: bool) -> Self {
        if integer_only {
            ValueMode::Integer
        } else {
            ValueMode::Continuous
        }
    }
}

/// Errors raised while assembling [`PlanParams`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    /// The base price must be a positive, finite number.
    #[error("base price must be positive and finite, got {0}")]
    InvalidBasePrice(f64),

    /// A global adjustment limit must be finite.
    #[error("global adjustment limit must be finite, got {0}")]
    NonFiniteLimit(f64),

    /// A tier was assigned to a role that is not part of the roster.
    #[error("popularity tier assigned to unknown role `{0}`")]
    UnknownRole(String),
}

/// Everything one planning call needs: the roster, the shared base price,
/// the value mode, optional global limits and per-role tier assignments.
///
/// Parameters are validated at construction so the model builder can assume
/// a well-formed input.
#[derive(Debug, Clone)]
pub struct PlanParams {
    base_price: f64,
    roster: Roster,
    mode: ValueMode,
    min_adj: Option<f64>,
    max_adj: Option<f64>,
    tiers: SecondaryMap<RoleKey, PopularityTier>,
    table: TierTable,
}

impl PlanParams {
    /// Create parameters for the given roster and base price.
    ///
    /// # Errors
    ///
    /// Returns [`ParamsError::InvalidBasePrice`] unless the base price is
    /// positive and finite.
    pub fn new(base_price: f64, roster: Roster, mode: ValueMode) -> Result<Self, ParamsError> {
        if !base_price.is_finite() || base_price <= 0.0 {
            return Err(ParamsError::InvalidBasePrice(base_price));
        }

        Ok(Self {
            base_price,
            roster,
            mode,
            min_adj: None,
            max_adj: None,
            tiers: SecondaryMap::new(),
            table: TierTable::default(),
        })
    }

    /// Override the global adjustment interval used for roles without a
    /// tier. Either side may stay `None` to keep the ±30%-of-base default.
    ///
    /// # Errors
    ///
    /// Returns [`ParamsError::NonFiniteLimit`] for non-finite limits.
    pub fn with_limits(
        mut self,
        min_adj: Option<f64>,
        max_adj: Option<f64>,
    ) -> Result<Self, ParamsError> {
        for limit in [min_adj, max_adj].into_iter().flatten() {
            if !limit.is_finite() {
                return Err(ParamsError::NonFiniteLimit(limit));
            }
        }

        self.min_adj = min_adj;
        self.max_adj = max_adj;

        Ok(self)
    }

    /// Assign a popularity tier to a role by name.
    ///
    /// # Errors
    ///
    /// Returns [`ParamsError::UnknownRole`] when the name is not part of the
    /// roster.
    pub fn with_tier(mut self, role: &str, tier: PopularityTier) -> Result<Self, ParamsError> {
        let Some(key) = self.roster.key(role) else {
            return Err(ParamsError::UnknownRole(role.to_string()));
        };

        self.tiers.insert(key, tier);

        Ok(self)
    }

    /// Replace the tier-to-interval table.
    #[must_use]
    pub fn with_tier_table(mut self, table: TierTable) -> Self {
        self.table = table;
        self
    }

    /// Shared base price of every role.
    #[must_use]
    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    /// The validated role set and popularity ranking.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Integer or continuous adjustments.
    #[must_use]
    pub fn mode(&self) -> ValueMode {
        self.mode
    }

    /// Caller-supplied global lower adjustment limit, if any.
    #[must_use]
    pub fn min_adj(&self) -> Option<f64> {
        self.min_adj
    }

    /// Caller-supplied global upper adjustment limit, if any.
    #[must_use]
    pub fn max_adj(&self) -> Option<f64> {
        self.max_adj
    }

    /// Tier assigned to the role, if any.
    #[must_use]
    pub fn tier_of(&self, key: RoleKey) -> Option<PopularityTier> {
        self.tiers.get(key).copied()
    }

    /// The active tier-to-interval table.
    #[must_use]
    pub fn tier_table(&self) -> &TierTable {
        &self.table
    }

    /// Baseline revenue: base price times total units.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "unit counts far below 2^52 in practice; used for reporting"
    )]
    pub fn total_original(&self) -> f64 {
        self.base_price * self.roster.total_count() as f64
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::roles::Role;

    use super::*;

    fn duo() -> Result<Roster, crate::roles::RosterError> {
        Roster::new(
            [Role::new("a", 10), Role::new("b", 10)],
            &["a".to_string(), "b".to_string()],
        )
    }

    #[test]
    fn epsilon_matches_mode() {
        assert!((ValueMode::Integer.epsilon() - 1.0).abs() < f64::EPSILON);
        assert!((ValueMode::Continuous.epsilon() - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn non_positive_base_price_is_rejected() -> TestResult {
        let result = PlanParams::new(0.0, duo()?, ValueMode::Integer);

        assert_eq!(result.err(), Some(ParamsError::InvalidBasePrice(0.0)));

        Ok(())
    }

    #[test]
    fn non_finite_limits_are_rejected() -> TestResult {
        let params = PlanParams::new(100.0, duo()?, ValueMode::Integer)?;

        let result = params.with_limits(Some(f64::NEG_INFINITY), None);

        assert!(matches!(result, Err(ParamsError::NonFiniteLimit(_))));

        Ok(())
    }

    #[test]
    fn tier_assignment_requires_a_known_role() -> TestResult {
        let params = PlanParams::new(100.0, duo()?, ValueMode::Integer)?;

        let result = params.with_tier("ghost", crate::tiers::PopularityTier::Plus);

        assert_eq!(result.err(), Some(ParamsError::UnknownRole("ghost".into())));

        Ok(())
    }

    #[test]
    fn total_original_is_base_price_times_units() -> TestResult {
        let params = PlanParams::new(100.0, duo()?, ValueMode::Integer)?;

        assert!((params.total_original() - 2000.0).abs() < f64::EPSILON);

        Ok(())
    }
}
