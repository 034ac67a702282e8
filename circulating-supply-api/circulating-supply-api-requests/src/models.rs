// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

/// Supply figures of the token, expressed in display units.
///
/// Amounts are serialised as fixed-point strings so that clients never have to
/// go through a lossy floating point representation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CirculatingSupplyResponse {
    /// Total issuance minus the balances of all locked accounts.
    #[schema(example = "8000000000.000000")]
    pub circulating_supply: String,

    /// Circulating supply minus the balances of accounts still distributing tokens.
    #[schema(example = "7500000000.000000")]
    pub distributed_supply: String,

    /// Share of the total issuance that has been distributed, in percent.
    #[schema(example = "75.00")]
    pub percent_distributed: String,

    pub locked_accounts: Vec<String>,

    pub distributing_accounts: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new<S: Into<String>>(error: S) -> Self {
        ErrorResponse {
            error: error.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiHealthResponse {
    pub status: ApiStatus,

    /// Uptime of the api, in seconds.
    pub uptime: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Up,
}

impl ApiHealthResponse {
    pub fn new_healthy(uptime: Duration) -> Self {
        ApiHealthResponse {
            status: ApiStatus::Up,
            uptime: uptime.as_secs(),
        }
    }
}

impl ApiStatus {
    pub fn is_up(&self) -> bool {
        matches!(self, ApiStatus::Up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circulating_supply_response_uses_camel_case_keys() {
        let response = CirculatingSupplyResponse {
            circulating_supply: "8000000000.000000".to_string(),
            distributed_supply: "7500000000.000000".to_string(),
            percent_distributed: "75.00".to_string(),
            locked_accounts: vec!["LOCKED".to_string()],
            distributing_accounts: vec![],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["circulatingSupply"], "8000000000.000000");
        assert_eq!(json["distributedSupply"], "7500000000.000000");
        assert_eq!(json["percentDistributed"], "75.00");
        assert_eq!(json["lockedAccounts"], serde_json::json!(["LOCKED"]));
        assert_eq!(json["distributingAccounts"], serde_json::json!([]));
    }

    #[test]
    fn health_status_is_lowercase() {
        let health = ApiHealthResponse::new_healthy(Duration::from_secs(42));
        let json = serde_json::to_value(&health).unwrap();
        assert_eq!(json["status"], "up");
        assert_eq!(json["uptime"], 42);
        assert!(health.status.is_up());
    }
}
