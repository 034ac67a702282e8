// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::circulating_supply_api::handlers::circulating_supply_routes;
use crate::status::api_status_routes;
use crate::support::http::openapi::openapi_json;
use crate::support::http::server::ApiHttpServer;
use crate::support::http::state::AppState;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub(crate) struct RouterBuilder {
    unfinished_router: Router<AppState>,
}

impl RouterBuilder {
    pub(crate) fn with_default_routes() -> Self {
        let router = Router::new()
            .route("/api-docs/openapi.json", get(openapi_json))
            .nest(
                "/api",
                Router::new()
                    .nest("/circulating-supply", circulating_supply_routes())
                    .merge(api_status_routes()),
            );

        RouterBuilder {
            unfinished_router: router,
        }
    }

    pub(crate) fn with_state(self, state: AppState) -> RouterWithState {
        RouterWithState {
            router: self
                .unfinished_router
                .layer(CorsLayer::permissive())
                .layer(TraceLayer::new_for_http())
                .with_state(state),
        }
    }
}

pub(crate) struct RouterWithState {
    pub(crate) router: Router,
}

impl RouterWithState {
    pub(crate) async fn build_server(
        self,
        bind_address: &SocketAddr,
    ) -> anyhow::Result<ApiHttpServer> {
        ApiHttpServer::build(bind_address, self.router).await
    }
}
