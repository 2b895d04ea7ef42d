//! Alternative Plans Handler

use std::sync::Arc;

use salvo::{Depot, oapi::extract::JsonBody, prelude::*};

use reprice::search::{DEFAULT_MAX_SOLUTIONS, alternative_plans};

use crate::{
    extensions::*,
    plans::{
        errors::{plan_error_into_status, request_error_into_status},
        requests::{AlternativesRequest, PlanResponse},
    },
    state::State,
};

/// Alternative Plans Handler
///
/// Enumerates up to `max_solutions` structurally distinct price plans.
/// Fewer plans than requested — including none — is a normal outcome, not
/// an error.
#[endpoint(
    tags("plans"),
    summary = "Enumerate alternative price plans",
    responses(
        (status_code = StatusCode::OK, description = "Zero or more distinct plans"),
        (status_code = StatusCode::BAD_REQUEST, description = "Structurally invalid pricing rules"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Solver backend failure"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AlternativesRequest>,
    depot: &mut Depot,
) -> Result<Json<Vec<PlanResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let request = json.into_inner();
    let max_solutions = request.max_solutions.unwrap_or(DEFAULT_MAX_SOLUTIONS);
    let params = request.into_params().map_err(request_error_into_status)?;

    let plans = alternative_plans(&params, max_solutions, &state.solver)
        .map_err(plan_error_into_status)?;

    Ok(Json(plans.into_iter().map(PlanResponse::from).collect()))
}
