//! Price plan request and response payloads

use std::collections::BTreeMap;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use reprice::{
    params::{ParamsError, PlanParams, ValueMode},
    plan::AdjustmentPlan,
    roles::{Role, Roster, RosterError},
    tiers::{PopularityTier, TierTable, UnknownTier},
};

/// Errors turning a payload into validated planning parameters.
#[derive(Debug, Error)]
pub(crate) enum RequestError {
    /// A declared role has no entry in `role_counts`.
    #[error("role `{0}` has no unit count")]
    MissingCount(String),

    /// Unrecognized tier label in `popularity_levels`.
    #[error(transparent)]
    UnknownTier(#[from] UnknownTier),

    /// Invalid role set or popularity ranking.
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// Invalid base price or adjustment limits.
    #[error(transparent)]
    Params(#[from] ParamsError),
}

fn default_integer_only() -> bool {
    true
}

/// Payload of the single optimal-plan endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SolveRequest {
    /// Shared base price of every role.
    pub base_price: f64,

    /// Role names, unique within the request.
    pub role_names: Vec<String>,

    /// Units sold/produced per role.
    pub role_counts: BTreeMap<String, u64>,

    /// Role names, most popular first.
    pub popularity: Vec<String>,

    /// Whole-unit adjustments when `true` (the default).
    #[serde(default = "default_integer_only")]
    pub integer_only: bool,

    /// Optional global upper adjustment limit.
    #[serde(default)]
    pub max_adj: Option<f64>,

    /// Optional global lower adjustment limit.
    #[serde(default)]
    pub min_adj: Option<f64>,

    /// Optional tier label per role (`+++` … `---`).
    #[serde(default)]
    pub popularity_levels: BTreeMap<String, String>,
}

impl SolveRequest {
    /// Validate the payload into planning parameters.
    pub(crate) fn into_params(self, table: TierTable) -> Result<PlanParams, RequestError> {
        let mut params = assemble_params(
            self.base_price,
            &self.role_names,
            &self.role_counts,
            &self.popularity,
            self.integer_only,
            self.min_adj,
            self.max_adj,
        )?
        .with_tier_table(table);

        for (role, label) in &self.popularity_levels {
            params = params.with_tier(role, label.parse::<PopularityTier>()?)?;
        }

        Ok(params)
    }
}

/// Payload of the alternatives endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AlternativesRequest {
    /// Shared base price of every role.
    pub base_price: f64,

    /// Role names, unique within the request.
    pub role_names: Vec<String>,

    /// Units sold/produced per role.
    pub role_counts: BTreeMap<String, u64>,

    /// Role names, most popular first.
    pub popularity: Vec<String>,

    /// Whole-unit adjustments when `true` (the default).
    #[serde(default = "default_integer_only")]
    pub integer_only: bool,

    /// Optional global upper adjustment limit.
    #[serde(default)]
    pub max_adj: Option<f64>,

    /// Optional global lower adjustment limit.
    #[serde(default)]
    pub min_adj: Option<f64>,

    /// Cap on the number of returned plans (default 10).
    #[serde(default)]
    pub max_solutions: Option<usize>,
}

impl AlternativesRequest {
    /// Validate the payload into planning parameters.
    pub(crate) fn into_params(self) -> Result<PlanParams, RequestError> {
        assemble_params(
            self.base_price,
            &self.role_names,
            &self.role_counts,
            &self.popularity,
            self.integer_only,
            self.min_adj,
            self.max_adj,
        )
    }
}

fn assemble_params(
    base_price: f64,
    role_names: &[String],
    role_counts: &BTreeMap<String, u64>,
    popularity: &[String],
    integer_only: bool,
    min_adj: Option<f64>,
    max_adj: Option<f64>,
) -> Result<PlanParams, RequestError> {
    let mut roles = Vec::with_capacity(role_names.len());

    for name in role_names {
        let count = role_counts
            .get(name)
            .copied()
            .ok_or_else(|| RequestError::MissingCount(name.clone()))?;

        roles.push(Role::new(name.clone(), count));
    }

    let roster = Roster::new(roles, popularity)?;

    Ok(PlanParams::new(
        base_price,
        roster,
        ValueMode::from_integer_only(integer_only),
    )?
    .with_limits(min_adj, max_adj)?)
}

/// One price plan as returned to the caller.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PlanResponse {
    /// Signed price delta per role.
    pub adjustments: BTreeMap<String, f64>,

    /// Total revenue once the deltas are applied.
    pub final_total: f64,

    /// Revenue drift from the unadjusted baseline.
    pub diff: f64,
}

impl From<AdjustmentPlan> for PlanResponse {
    fn from(plan: AdjustmentPlan) -> Self {
        Self {
            adjustments: plan.adjustments,
            final_total: plan.final_total,
            diff: plan.diff,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn base_request() -> SolveRequest {
        SolveRequest {
            base_price: 100.0,
            role_names: vec!["a".to_string(), "b".to_string()],
            role_counts: BTreeMap::from([("a".to_string(), 10), ("b".to_string(), 10)]),
            popularity: vec!["a".to_string(), "b".to_string()],
            integer_only: true,
            max_adj: None,
            min_adj: None,
            popularity_levels: BTreeMap::new(),
        }
    }

    #[test]
    fn integer_only_defaults_to_true_in_json() -> TestResult {
        let request: SolveRequest = serde_json::from_str(
            r#"{
                "base_price": 100,
                "role_names": ["a"],
                "role_counts": {"a": 1},
                "popularity": ["a"]
            }"#,
        )?;

        assert!(request.integer_only, "whole units by default");

        Ok(())
    }

    #[test]
    fn payloads_validate_into_params() -> TestResult {
        let params = base_request().into_params(TierTable::default())?;

        assert_eq!(params.roster().len(), 2);
        assert!(params.mode().is_integer(), "integer mode carried over");

        Ok(())
    }

    #[test]
    fn missing_counts_are_reported_by_role_name() {
        let mut request = base_request();
        request.role_counts.remove("b");

        let result = request.into_params(TierTable::default());

        assert!(
            matches!(result, Err(RequestError::MissingCount(ref name)) if name == "b"),
            "missing count must name the role"
        );
    }

    #[test]
    fn unknown_tier_labels_are_rejected() {
        let mut request = base_request();
        request
            .popularity_levels
            .insert("a".to_string(), "++++".to_string());

        let result = request.into_params(TierTable::default());

        assert!(matches!(result, Err(RequestError::UnknownTier(_))));
    }
}
