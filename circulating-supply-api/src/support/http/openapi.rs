// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::circulating_supply_api::handlers;
use crate::status;
use axum::Json;
use circulating_supply_api_requests::models::{
    ApiHealthResponse, ApiStatus, CirculatingSupplyResponse, ErrorResponse,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Circulating Supply API"),
    paths(
        handlers::get_full_circulating_supply,
        handlers::get_circulating_supply_value,
        handlers::get_distributed_supply_value,
        handlers::get_total_supply_value,
        status::health,
    ),
    components(schemas(
        CirculatingSupplyResponse,
        ErrorResponse,
        ApiHealthResponse,
        ApiStatus
    ))
)]
pub(crate) struct ApiDoc;

pub(crate) async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
