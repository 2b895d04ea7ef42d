//! App Router

use salvo::Router;

use crate::{healthcheck, plans};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::with_path("solve")
                .post(plans::handlers::solve::handler)
                .push(
                    Router::with_path("alternatives").post(plans::handlers::alternatives::handler),
                ),
        )
}

#[cfg(test)]
mod tests {
    use salvo::{
        http::StatusCode,
        prelude::*,
        test::TestClient,
    };
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::plans_service;

    use super::*;

    #[tokio::test]
    async fn the_router_wires_both_solve_endpoints() -> TestResult {
        let service = plans_service(app_router());

        let solve = TestClient::post("http://example.com/solve")
            .json(&json!({
                "base_price": 100,
                "role_names": ["a"],
                "role_counts": {"a": 1},
                "popularity": ["a"]
            }))
            .send(&service)
            .await;

        let alternatives = TestClient::post("http://example.com/solve/alternatives")
            .json(&json!({
                "base_price": 100,
                "role_names": ["a"],
                "role_counts": {"a": 1},
                "popularity": ["a"]
            }))
            .send(&service)
            .await;

        assert_eq!(solve.status_code, Some(StatusCode::OK));
        assert_eq!(alternatives.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
