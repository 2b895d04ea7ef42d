//! Optimal Plan Handler

use std::sync::Arc;

use salvo::{Depot, oapi::extract::JsonBody, prelude::*};

use reprice::search::optimal_plan;

use crate::{
    extensions::*,
    plans::{
        errors::{plan_error_into_status, request_error_into_status},
        requests::{PlanResponse, SolveRequest},
    },
    state::State,
};

/// Optimal Plan Handler
///
/// Computes the feasible price plan with the smallest revenue surplus over
/// the baseline. An empty list means no feasible plan exists under the
/// given rules.
#[endpoint(
    tags("plans"),
    summary = "Compute the minimal-surplus price plan",
    responses(
        (status_code = StatusCode::OK, description = "Zero or one plan"),
        (status_code = StatusCode::BAD_REQUEST, description = "Structurally invalid pricing rules"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Solver backend failure"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<SolveRequest>,
    depot: &mut Depot,
) -> Result<Json<Vec<PlanResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let params = json
        .into_inner()
        .into_params(state.table.clone())
        .map_err(request_error_into_status)?;

    let plan = optimal_plan(&params, &state.solver).map_err(plan_error_into_status)?;

    Ok(Json(plan.map(PlanResponse::from).into_iter().collect()))
}
