// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::circulating_supply_api::service::SupplySnapshot;
use crate::support::http::error::{AxumErrorResponse, AxumResult};
use crate::support::http::state::AppState;
use axum::extract::State;
use axum::{Json, Router};
use circulating_supply_api_requests::models::{CirculatingSupplyResponse, ErrorResponse};
use std::sync::Arc;
use tracing::error;

pub(crate) fn circulating_supply_routes() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::get(get_full_circulating_supply))
        .route(
            "/circulating-supply-value",
            axum::routing::get(get_circulating_supply_value),
        )
        .route(
            "/distributed-supply-value",
            axum::routing::get(get_distributed_supply_value),
        )
        .route(
            "/total-supply-value",
            axum::routing::get(get_total_supply_value),
        )
}

async fn current_snapshot(state: &AppState) -> AxumResult<Arc<SupplySnapshot>> {
    state
        .supply_service()
        .get_snapshot()
        .await
        .map_err(|err| {
            error!("failed to obtain the supply snapshot: {err}");
            AxumErrorResponse::internal()
        })
}

#[utoipa::path(
    tag = "circulating-supply",
    get,
    path = "/api/circulating-supply",
    responses(
        (status = 200, body = CirculatingSupplyResponse),
        (status = 500, body = ErrorResponse)
    )
)]
pub(crate) async fn get_full_circulating_supply(
    State(state): State<AppState>,
) -> AxumResult<Json<CirculatingSupplyResponse>> {
    let snapshot = current_snapshot(&state).await?;
    Ok(Json(snapshot.as_ref().into()))
}

#[utoipa::path(
    tag = "circulating-supply",
    get,
    path = "/api/circulating-supply/circulating-supply-value",
    responses(
        (status = 200, body = String),
        (status = 500, body = ErrorResponse)
    )
)]
pub(crate) async fn get_circulating_supply_value(
    State(state): State<AppState>,
) -> AxumResult<Json<String>> {
    let snapshot = current_snapshot(&state).await?;
    Ok(Json(snapshot.figures().circulating_supply.to_string()))
}

#[utoipa::path(
    tag = "circulating-supply",
    get,
    path = "/api/circulating-supply/distributed-supply-value",
    responses(
        (status = 200, body = String),
        (status = 500, body = ErrorResponse)
    )
)]
pub(crate) async fn get_distributed_supply_value(
    State(state): State<AppState>,
) -> AxumResult<Json<String>> {
    let snapshot = current_snapshot(&state).await?;
    Ok(Json(snapshot.figures().distributed_supply.to_string()))
}

// the total issuance is configured rather than queried, so this never touches the chain
#[utoipa::path(
    tag = "circulating-supply",
    get,
    path = "/api/circulating-supply/total-supply-value",
    responses(
        (status = 200, body = String)
    )
)]
pub(crate) async fn get_total_supply_value(State(state): State<AppState>) -> Json<String> {
    Json(state.supply_service().issuance().total().to_string())
}
