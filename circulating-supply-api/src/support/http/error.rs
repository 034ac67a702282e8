// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use circulating_supply_api_requests::models::ErrorResponse;

pub(crate) type AxumResult<T> = Result<T, AxumErrorResponse>;

// the details of internal failures are logged, never returned to the client
const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone)]
pub(crate) struct AxumErrorResponse {
    message: ErrorResponse,
    status: StatusCode,
}

impl AxumErrorResponse {
    pub(crate) fn internal() -> Self {
        AxumErrorResponse {
            message: ErrorResponse::new(INTERNAL_SERVER_ERROR_MESSAGE),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AxumErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.message)).into_response()
    }
}
