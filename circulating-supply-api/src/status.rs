// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::support::http::state::AppState;
use axum::extract::State;
use axum::{Json, Router};
use circulating_supply_api_requests::models::ApiHealthResponse;
use std::time::Instant;

#[derive(Clone)]
pub(crate) struct ApiStatusState {
    startup_time: Instant,
}

impl ApiStatusState {
    pub(crate) fn new() -> Self {
        ApiStatusState {
            startup_time: Instant::now(),
        }
    }
}

pub(crate) fn api_status_routes() -> Router<AppState> {
    Router::new().route("/health", axum::routing::get(health))
}

#[utoipa::path(
    tag = "api-status",
    get,
    path = "/api/health",
    responses(
        (status = 200, body = ApiHealthResponse)
    )
)]
pub(crate) async fn health(State(state): State<AppState>) -> Json<ApiHealthResponse> {
    let uptime = state.api_status().startup_time.elapsed();
    Json(ApiHealthResponse::new_healthy(uptime))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circulating_supply_api::SupplyService;
    use crate::node_client::mock::MockBalanceSource;
    use crate::support::config::Config;
    use crate::support::http::RouterBuilder;
    use axum_test::TestServer;
    use std::sync::Arc;

    #[tokio::test]
    async fn health_reports_up() {
        let source = MockBalanceSource::default();
        let service = SupplyService::from_config(&Config::default(), Arc::new(source.clone()));
        let router = RouterBuilder::with_default_routes()
            .with_state(AppState::new(service))
            .router;
        let server = TestServer::new(router).unwrap();

        let health = server.get("/api/health").await.json::<ApiHealthResponse>();
        assert!(health.status.is_up());
        // health checks never touch the chain
        assert_eq!(source.calls(), 0);
    }
}
