//! Price plan error mapping

use salvo::http::StatusError;
use tracing::error;

use reprice::search::PlanError;

use crate::plans::requests::RequestError;

/// Structural payload problems are the caller's fault.
pub(crate) fn request_error_into_status(error: RequestError) -> StatusError {
    StatusError::bad_request().brief(error.to_string())
}

/// Planning failures: structural input errors map to 400 and name the
/// offending role or value; backend failures are logged and become 500.
///
/// Solver-reported infeasibility never reaches this mapping — it is a
/// legitimate business outcome returned as an empty plan list.
pub(crate) fn plan_error_into_status(error: PlanError) -> StatusError {
    match error {
        PlanError::Bounds(source) => StatusError::bad_request().brief(source.to_string()),
        PlanError::Model(source) => StatusError::bad_request().brief(source.to_string()),
        PlanError::Solver(source) => {
            error!("solver backend failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
