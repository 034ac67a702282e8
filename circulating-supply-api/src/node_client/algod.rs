// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::accounts::Address;
use crate::node_client::{AtomicBalance, BalanceSource, BalanceSourceError};
use crate::support::config;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::trace;
use url::Url;

const ALGOD_API_TOKEN_HEADER: &str = "X-Algo-API-Token";

// the node returns plenty more, but the amount is all we care about
#[derive(Debug, Deserialize)]
struct AccountInformation {
    amount: u64,
}

/// Minimal client of the algod REST API, able to query account balances.
#[derive(Clone)]
pub(crate) struct AlgodClient {
    http: reqwest::Client,
    base_url: Url,
    api_token: Option<String>,
}

impl AlgodClient {
    pub(crate) fn new(
        base_url: Url,
        api_token: Option<String>,
        request_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(AlgodClient {
            http,
            base_url,
            api_token,
        })
    }

    pub(crate) fn from_config(config: &config::Node) -> Result<Self, reqwest::Error> {
        Self::new(
            config.url.clone(),
            config.api_token.clone(),
            config.request_timeout,
        )
    }

    fn account_url(&self, address: &Address) -> Option<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(["v2", "accounts", address.as_str()]);
        url.set_query(Some("exclude=all"));
        Some(url)
    }
}

#[async_trait]
impl BalanceSource for AlgodClient {
    async fn fetch_balance(&self, address: &Address) -> Result<AtomicBalance, BalanceSourceError> {
        let url = self
            .account_url(address)
            .ok_or_else(|| BalanceSourceError::InvalidRequestUrl {
                address: address.clone(),
            })?;
        trace!("querying {url}");

        let mut request = self.http.get(url);
        if let Some(token) = &self.api_token {
            request = request.header(ALGOD_API_TOKEN_HEADER, token);
        }

        let response = request
            .send()
            .await
            .map_err(|source| BalanceSourceError::Request {
                address: address.clone(),
                source,
            })?;

        match response.status() {
            status if status.is_success() => (),
            StatusCode::NOT_FOUND => {
                return Err(BalanceSourceError::UnknownAccount {
                    address: address.clone(),
                })
            }
            status => {
                return Err(BalanceSourceError::UnexpectedStatus {
                    address: address.clone(),
                    status,
                })
            }
        }

        let info: AccountInformation =
            response
                .json()
                .await
                .map_err(|source| BalanceSourceError::MalformedResponse {
                    address: address.clone(),
                    source,
                })?;

        Ok(AtomicBalance::from(info.amount))
    }
}
