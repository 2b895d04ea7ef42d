//! Adjustment Plans

use std::collections::BTreeMap;

use serde::Serialize;
use slotmap::SecondaryMap;

use crate::{
    params::{PlanParams, ValueMode},
    roles::RoleKey,
};

/// One accepted pricing plan.
///
/// `adjustments` maps role names to signed price deltas, whole-unit in
/// integer mode. `diff` is the revenue drift from the unadjusted baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjustmentPlan {
    /// Signed price delta per role.
    pub adjustments: BTreeMap<String, f64>,

    /// Total revenue once the deltas are applied.
    pub final_total: f64,

    /// `final_total` minus the baseline revenue.
    pub diff: f64,
}

impl AdjustmentPlan {
    /// Build the plan record for a per-role assignment.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "unit counts far below 2^52 in practice; used for reporting"
    )]
    pub(crate) fn from_adjustments(
        params: &PlanParams,
        adjustments: &SecondaryMap<RoleKey, f64>,
    ) -> Self {
        let mut by_name = BTreeMap::new();
        let mut final_total = 0.0;

        for (key, role) in params.roster().iter() {
            let delta = adjustments.get(key).copied().unwrap_or_default();

            final_total += (params.base_price() + delta) * role.count() as f64;
            by_name.insert(role.name().to_string(), delta);
        }

        Self {
            adjustments: by_name,
            final_total,
            diff: final_total - params.total_original(),
        }
    }
}

/// Snap a raw solver value onto the mode's value grid.
pub(crate) fn snap(mode: ValueMode, value: f64) -> f64 {
    match mode {
        ValueMode::Integer => value.round(),
        ValueMode::Continuous => value,
    }
}

/// Quantize an assignment into epsilon units for exact duplicate detection.
///
/// Values follow the roster's declaration order, so equal keys mean equal
/// per-role tuples.
#[expect(
    clippy::cast_possible_truncation,
    reason = "adjustments are bounded by the role intervals, far inside i64"
)]
pub(crate) fn quantized_key(
    params: &PlanParams,
    adjustments: &SecondaryMap<RoleKey, f64>,
) -> Vec<i64> {
    let epsilon = params.mode().epsilon();

    params
        .roster()
        .iter()
        .map(|(key, _)| {
            let value = adjustments.get(key).copied().unwrap_or_default();

            (value / epsilon).round() as i64
        })
        .collect()
}
