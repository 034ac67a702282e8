// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::accounts::{AccountSetKind, Address, AddressSet};
use crate::node_client::{AtomicBalance, BalanceSource, BalanceSourceError};
use futures::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Decides whether a set with some (but not all) failed balance queries is still usable.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PartialFailurePolicy {
    /// Failed accounts contribute nothing to the total.
    /// Note that this understates the set's balance, and in turn overstates the circulating supply.
    #[default]
    Tolerate,

    /// Any failed account fails the whole set.
    RequireAll,
}

#[derive(Debug, Error)]
pub(crate) enum AggregationError {
    #[error("could not obtain the balance of any of the {attempted} {set} accounts")]
    AggregationFailed { set: AccountSetKind, attempted: usize },

    #[error("could not obtain the balance of {failed} out of {attempted} {set} accounts")]
    IncompleteAggregation {
        set: AccountSetKind,
        failed: usize,
        attempted: usize,
    },

    #[error("the total balance of the {set} accounts overflowed")]
    BalanceOverflow { set: AccountSetKind },
}

#[derive(Debug, Error)]
#[error("failed to fetch the balance of {address}: {source}")]
pub(crate) struct AddressFetchFailed {
    pub(crate) address: Address,

    #[source]
    pub(crate) source: BalanceSourceError,
}

/// Outcome of a single aggregation round over an account set.
#[derive(Debug)]
pub(crate) struct AggregatedBalance {
    pub(crate) total: AtomicBalance,
    pub(crate) queried: usize,
    pub(crate) failures: Vec<AddressFetchFailed>,
}

impl AggregatedBalance {
    pub(crate) fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Sums the balances of account sets, querying the accounts concurrently.
#[derive(Clone)]
pub(crate) struct BalanceAggregator {
    source: Arc<dyn BalanceSource>,
    concurrency: usize,
    fetch_timeout: Duration,
    policy: PartialFailurePolicy,
}

impl BalanceAggregator {
    pub(crate) fn new(
        source: Arc<dyn BalanceSource>,
        concurrency: usize,
        fetch_timeout: Duration,
    ) -> Self {
        BalanceAggregator {
            source,
            concurrency: concurrency.max(1),
            fetch_timeout,
            policy: PartialFailurePolicy::default(),
        }
    }

    #[must_use]
    pub(crate) fn with_policy(mut self, policy: PartialFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    async fn fetch_balance(&self, address: &Address) -> Result<AtomicBalance, AddressFetchFailed> {
        let res = tokio::time::timeout(self.fetch_timeout, self.source.fetch_balance(address))
            .await
            .unwrap_or_else(|_| {
                Err(BalanceSourceError::Timeout {
                    address: address.clone(),
                    timeout: self.fetch_timeout,
                })
            });

        res.map_err(|source| AddressFetchFailed {
            address: address.clone(),
            source,
        })
    }

    /// Queries every account of the set and sums up the obtained balances.
    ///
    /// Individual failures are absorbed according to the configured [`PartialFailurePolicy`],
    /// however, if no balance could be obtained at all the whole set is considered failed.
    pub(crate) async fn sum_balances(
        &self,
        accounts: &AddressSet,
    ) -> Result<AggregatedBalance, AggregationError> {
        let set = accounts.kind();

        let results = stream::iter(accounts.iter().cloned())
            .map(|address| async move { self.fetch_balance(&address).await })
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        let mut total: AtomicBalance = 0;
        let mut failures = Vec::new();
        for res in results {
            match res {
                Ok(balance) => {
                    total = total
                        .checked_add(balance)
                        .ok_or(AggregationError::BalanceOverflow { set })?;
                }
                Err(failure) => {
                    warn!("{failure}");
                    failures.push(failure)
                }
            }
        }

        let attempted = accounts.len();
        if attempted > 0 && failures.len() == attempted {
            return Err(AggregationError::AggregationFailed { set, attempted });
        }

        if !failures.is_empty() {
            if self.policy == PartialFailurePolicy::RequireAll {
                return Err(AggregationError::IncompleteAggregation {
                    set,
                    failed: failures.len(),
                    attempted,
                });
            }
            warn!(
                "{} out of {attempted} {set} balances are missing. treating them as 0",
                failures.len()
            );
        }

        debug!("the total balance of {attempted} {set} accounts is {total}");

        Ok(AggregatedBalance {
            total,
            queried: attempted,
            failures,
        })
    }
}
