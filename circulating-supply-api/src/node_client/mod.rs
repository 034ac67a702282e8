// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::accounts::Address;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub(crate) use algod::AlgodClient;

mod algod;

/// Balance of an account expressed in the smallest, indivisible unit of the token.
pub(crate) type AtomicBalance = u128;

#[derive(Debug, Error)]
pub(crate) enum BalanceSourceError {
    #[error("failed to send balance request for {address}: {source}")]
    Request {
        address: Address,
        #[source]
        source: reqwest::Error,
    },

    #[error("account {address} is not known to the node")]
    UnknownAccount { address: Address },

    #[error("the node responded with unexpected status {status} for account {address}")]
    UnexpectedStatus {
        address: Address,
        status: reqwest::StatusCode,
    },

    #[error("the node returned a malformed account response for {address}: {source}")]
    MalformedResponse {
        address: Address,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not construct a valid request url for account {address}")]
    InvalidRequestUrl { address: Address },

    #[error("balance query for {address} did not complete within {}ms", timeout.as_millis())]
    Timeout { address: Address, timeout: Duration },

    #[cfg(test)]
    #[error("mocked failure for {address}")]
    Mocked { address: Address },
}

/// Anything capable of looking up the current balance of a single account.
#[async_trait]
pub(crate) trait BalanceSource: Send + Sync {
    async fn fetch_balance(&self, address: &Address) -> Result<AtomicBalance, BalanceSourceError>;
}
