// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::accounts::AddressSet;
use crate::circulating_supply_api::aggregator::{AggregatedBalance, BalanceAggregator};
use crate::circulating_supply_api::cache::SnapshotCache;
use crate::circulating_supply_api::calculator::{compute_snapshot, Issuance, SupplyFigures};
use crate::circulating_supply_api::error::SupplyError;
use crate::node_client::BalanceSource;
use crate::support::config::Config;
use circulating_supply_api_requests::models::CirculatingSupplyResponse;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{info, trace, warn};

/// Immutable result of a single supply computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SupplySnapshot {
    figures: SupplyFigures,
    locked_accounts: AddressSet,
    distributing_accounts: AddressSet,
    computed_at: OffsetDateTime,
}

impl SupplySnapshot {
    pub(crate) fn new(
        figures: SupplyFigures,
        locked_accounts: AddressSet,
        distributing_accounts: AddressSet,
    ) -> Self {
        SupplySnapshot {
            figures,
            locked_accounts,
            distributing_accounts,
            computed_at: OffsetDateTime::now_utc(),
        }
    }

    pub(crate) fn figures(&self) -> &SupplyFigures {
        &self.figures
    }

    pub(crate) fn computed_at(&self) -> OffsetDateTime {
        self.computed_at
    }
}

impl From<&SupplySnapshot> for CirculatingSupplyResponse {
    fn from(snapshot: &SupplySnapshot) -> Self {
        CirculatingSupplyResponse {
            circulating_supply: snapshot.figures.circulating_supply.to_string(),
            distributed_supply: snapshot.figures.distributed_supply.to_string(),
            percent_distributed: snapshot.figures.percent_distributed.to_string(),
            locked_accounts: snapshot.locked_accounts.to_strings(),
            distributing_accounts: snapshot.distributing_accounts.to_strings(),
        }
    }
}

/// Entry point for obtaining the current supply figures.
///
/// Snapshots are served from the cache for as long as they're valid. Once they expire,
/// the next request triggers a fresh aggregation of both account sets.
#[derive(Clone)]
pub(crate) struct SupplyService {
    inner: Arc<SupplyServiceInner>,
}

struct SupplyServiceInner {
    aggregator: BalanceAggregator,
    issuance: Issuance,
    locked_accounts: AddressSet,
    distributing_accounts: AddressSet,
    cache: SnapshotCache,
}

impl SupplyService {
    pub(crate) fn new(
        aggregator: BalanceAggregator,
        issuance: Issuance,
        locked_accounts: AddressSet,
        distributing_accounts: AddressSet,
        cache: SnapshotCache,
    ) -> Self {
        SupplyService {
            inner: Arc::new(SupplyServiceInner {
                aggregator,
                issuance,
                locked_accounts,
                distributing_accounts,
                cache,
            }),
        }
    }

    pub(crate) fn from_config(config: &Config, source: Arc<dyn BalanceSource>) -> Self {
        let aggregator = BalanceAggregator::new(
            source,
            config.supply.fetch_concurrency,
            config.supply.fetch_timeout,
        )
        .with_policy(config.supply.partial_failure_policy);

        SupplyService::new(
            aggregator,
            config.supply.issuance(),
            config.accounts.locked_set(),
            config.accounts.distributing_set(),
            SnapshotCache::new(config.supply.cache_ttl),
        )
    }

    pub(crate) fn issuance(&self) -> Issuance {
        self.inner.issuance
    }

    pub(crate) async fn get_snapshot(&self) -> Result<Arc<SupplySnapshot>, Arc<SupplyError>> {
        if let Some(snapshot) = self.inner.cache.get().await {
            trace!("serving cached supply snapshot");
            return Ok(snapshot);
        }

        self.inner
            .cache
            .get_or_try_compute(self.compute_snapshot())
            .await
    }

    /// Recomputes the figures right away and replaces the cached snapshot.
    pub(crate) async fn refresh(&self) -> Result<Arc<SupplySnapshot>, SupplyError> {
        let snapshot = self.compute_snapshot().await?;
        self.inner.cache.put(Arc::clone(&snapshot)).await;
        Ok(snapshot)
    }

    /// Drops the cached snapshot, forcing recomputation on the next request.
    pub(crate) async fn invalidate(&self) {
        self.inner.cache.invalidate().await
    }

    async fn compute_snapshot(&self) -> Result<Arc<SupplySnapshot>, SupplyError> {
        let inner = &self.inner;
        info!(
            "refreshing the supply snapshot (ttl: {}s)",
            inner.cache.ttl().as_secs()
        );

        // the first failed set cancels the other one
        let (locked, distributing) = tokio::try_join!(
            inner.aggregator.sum_balances(&inner.locked_accounts),
            inner.aggregator.sum_balances(&inner.distributing_accounts),
        )?;
        log_incomplete(&inner.locked_accounts, &locked);
        log_incomplete(&inner.distributing_accounts, &distributing);

        let figures = compute_snapshot(locked.total, distributing.total, inner.issuance)?;

        info!("the locked balance is now {}", locked.total);
        info!("the distributing balance is now {}", distributing.total);
        info!(
            "the circulating supply is now {}",
            figures.circulating_supply
        );
        info!("the distributed supply is now {}", figures.distributed_supply);

        let snapshot = SupplySnapshot::new(
            figures,
            inner.locked_accounts.clone(),
            inner.distributing_accounts.clone(),
        );
        trace!("supply snapshot computed at {}", snapshot.computed_at());

        Ok(Arc::new(snapshot))
    }
}

fn log_incomplete(accounts: &AddressSet, aggregated: &AggregatedBalance) {
    if !aggregated.is_complete() {
        warn!(
            "the {} balance is based on {} out of {} accounts",
            accounts.kind(),
            aggregated.queried - aggregated.failures.len(),
            aggregated.queried
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circulating_supply_api::aggregator::{AggregationError, PartialFailurePolicy};
    use crate::circulating_supply_api::calculator::CalculationError;
    use crate::node_client::mock::{MockBalanceSource, MockBehaviour};
    use std::time::Duration;

    const UNIT: u128 = 1_000_000;

    fn service_with(
        source: &MockBalanceSource,
        locked: &[&str],
        distributing: &[&str],
        ttl: Duration,
    ) -> SupplyService {
        let aggregator = BalanceAggregator::new(
            Arc::new(source.clone()),
            4,
            Duration::from_millis(100),
        );
        SupplyService::new(
            aggregator,
            Issuance::new(10_000_000_000 * UNIT, 6),
            AddressSet::locked(locked.iter().copied()),
            AddressSet::distributing(distributing.iter().copied()),
            SnapshotCache::new(ttl),
        )
    }

    fn reference_source() -> MockBalanceSource {
        MockBalanceSource::new([
            ("LOCKED1", MockBehaviour::Balance(1_500_000_000 * UNIT)),
            ("LOCKED2", MockBehaviour::Balance(500_000_000 * UNIT)),
            ("DIST1", MockBehaviour::Balance(500_000_000 * UNIT)),
        ])
    }

    #[tokio::test]
    async fn computes_the_reference_snapshot() {
        let source = reference_source();
        let service = service_with(
            &source,
            &["LOCKED1", "LOCKED2"],
            &["DIST1"],
            Duration::from_secs(60),
        );

        let snapshot = service.get_snapshot().await.unwrap();
        let response = CirculatingSupplyResponse::from(snapshot.as_ref());
        assert_eq!(response.circulating_supply, "8000000000.000000");
        assert_eq!(response.distributed_supply, "7500000000.000000");
        assert_eq!(response.percent_distributed, "75.00");
        assert_eq!(response.locked_accounts, ["LOCKED1", "LOCKED2"]);
        assert_eq!(response.distributing_accounts, ["DIST1"]);
        assert!(snapshot.computed_at() <= OffsetDateTime::now_utc());
        assert_eq!(service.issuance().total().to_string(), "10000000000.000000");
    }

    #[tokio::test]
    async fn repeated_requests_within_ttl_reuse_the_snapshot() {
        let source = reference_source();
        let service = service_with(
            &source,
            &["LOCKED1", "LOCKED2"],
            &["DIST1"],
            Duration::from_secs(60),
        );

        let first = service.get_snapshot().await.unwrap();
        assert_eq!(source.calls(), 3);

        for _ in 0..5 {
            let next = service.get_snapshot().await.unwrap();
            assert!(Arc::ptr_eq(&first, &next));
        }
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn expired_snapshot_is_recomputed_exactly_once() {
        let source = reference_source().with_delay(Duration::from_millis(30));
        let service = service_with(
            &source,
            &["LOCKED1", "LOCKED2"],
            &["DIST1"],
            Duration::from_millis(150),
        );

        let first = service.get_snapshot().await.unwrap();
        assert_eq!(source.calls(), 3);

        tokio::time::sleep(Duration::from_millis(250)).await;

        let mut handles = Vec::new();
        for _ in 0..10 {
            let service = service.clone();
            handles.push(tokio::spawn(async move { service.get_snapshot().await }));
        }
        let mut snapshots = Vec::new();
        for handle in handles {
            snapshots.push(handle.await.unwrap().unwrap());
        }

        // a single additional aggregation round over all 3 accounts
        assert_eq!(source.calls(), 6);
        assert!(snapshots.iter().all(|s| Arc::ptr_eq(s, &snapshots[0])));
        assert!(!Arc::ptr_eq(&first, &snapshots[0]));
    }

    #[tokio::test]
    async fn concurrent_callers_on_a_cold_cache_share_one_round() {
        let source = MockBalanceSource::new([
            ("LOCKED1", MockBehaviour::Balance(1_000_000_000 * UNIT)),
            ("LOCKED2", MockBehaviour::Hang),
            ("LOCKED3", MockBehaviour::Balance(1_000_000_000 * UNIT)),
            ("DIST1", MockBehaviour::Balance(500_000_000 * UNIT)),
        ]);
        let service = service_with(
            &source,
            &["LOCKED1", "LOCKED2", "LOCKED3"],
            &["DIST1"],
            Duration::from_secs(60),
        );

        let handles = (0..32)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.get_snapshot().await })
            })
            .collect::<Vec<_>>();

        let mut snapshots = Vec::new();
        for handle in handles {
            snapshots.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(source.calls(), 4);
        assert!(snapshots.iter().all(|s| Arc::ptr_eq(s, &snapshots[0])));
        let figures = snapshots[0].figures();
        assert_eq!(figures.circulating_supply.to_string(), "8000000000.000000");
        assert_eq!(figures.distributed_supply.to_string(), "7500000000.000000");
        assert_eq!(figures.percent_distributed.to_string(), "75.00");
    }

    #[tokio::test]
    async fn failed_set_stops_the_other_aggregation() {
        let source = MockBalanceSource::new([
            ("LOCKED1", MockBehaviour::Failure),
            ("DIST1", MockBehaviour::Hang),
        ]);
        let aggregator =
            BalanceAggregator::new(Arc::new(source.clone()), 4, Duration::from_secs(30));
        let service = SupplyService::new(
            aggregator,
            Issuance::new(10_000_000_000 * UNIT, 6),
            AddressSet::locked(["LOCKED1"]),
            AddressSet::distributing(["DIST1"]),
            SnapshotCache::new(Duration::from_secs(60)),
        );

        // without short-circuiting this would wait for the 30s fetch timeout
        let res = tokio::time::timeout(Duration::from_secs(2), service.get_snapshot())
            .await
            .unwrap();
        assert!(matches!(
            *res.unwrap_err(),
            SupplyError::AggregationFailed(AggregationError::AggregationFailed { .. })
        ));
    }

    #[tokio::test]
    async fn timed_out_locked_account_is_skipped() {
        let source = MockBalanceSource::new([
            ("LOCKED1", MockBehaviour::Balance(1_000_000_000 * UNIT)),
            ("LOCKED2", MockBehaviour::Hang),
            ("LOCKED3", MockBehaviour::Balance(1_000_000_000 * UNIT)),
        ]);
        let service = service_with(
            &source,
            &["LOCKED1", "LOCKED2", "LOCKED3"],
            &[],
            Duration::from_secs(60),
        );

        let snapshot = service.get_snapshot().await.unwrap();
        assert_eq!(
            snapshot.figures().circulating_supply.to_string(),
            "8000000000.000000"
        );
        // all locked accounts are still reported
        assert_eq!(
            CirculatingSupplyResponse::from(snapshot.as_ref()).locked_accounts,
            ["LOCKED1", "LOCKED2", "LOCKED3"]
        );
    }

    #[tokio::test]
    async fn failed_aggregation_publishes_nothing() {
        let source = MockBalanceSource::new([
            ("LOCKED1", MockBehaviour::Failure),
            ("DIST1", MockBehaviour::Balance(1)),
        ]);
        let service = service_with(&source, &["LOCKED1"], &["DIST1"], Duration::from_secs(60));

        let err = service.get_snapshot().await.unwrap_err();
        assert!(matches!(
            *err,
            SupplyError::AggregationFailed(AggregationError::AggregationFailed { .. })
        ));
        assert!(service.inner.cache.is_expired().await);

        // nothing got cached, so the next request queries the chain again
        let _ = service.get_snapshot().await;
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test]
    async fn strict_policy_fails_on_partial_results() {
        let source = MockBalanceSource::new([
            ("LOCKED1", MockBehaviour::Balance(1)),
            ("LOCKED2", MockBehaviour::Failure),
        ]);
        let aggregator = BalanceAggregator::new(
            Arc::new(source.clone()),
            4,
            Duration::from_millis(100),
        )
        .with_policy(PartialFailurePolicy::RequireAll);
        let service = SupplyService::new(
            aggregator,
            Issuance::new(10_000_000_000 * UNIT, 6),
            AddressSet::locked(["LOCKED1", "LOCKED2"]),
            AddressSet::distributing(Vec::<String>::new()),
            SnapshotCache::new(Duration::from_secs(60)),
        );

        let err = service.get_snapshot().await.unwrap_err();
        assert!(matches!(
            *err,
            SupplyError::AggregationFailed(AggregationError::IncompleteAggregation { .. })
        ));
    }

    #[tokio::test]
    async fn negative_distributed_supply_is_rejected() {
        let source = MockBalanceSource::new([
            ("LOCKED1", MockBehaviour::Balance(10_000_000_000 * UNIT)),
            ("DIST1", MockBehaviour::Balance(1)),
        ]);
        let service = service_with(&source, &["LOCKED1"], &["DIST1"], Duration::from_secs(60));

        let err = service.get_snapshot().await.unwrap_err();
        assert!(matches!(
            *err,
            SupplyError::ComputationFailed(CalculationError::DistributingExceedsCirculating { .. })
        ));
        assert!(service.inner.cache.is_expired().await);
    }

    #[tokio::test]
    async fn invalidation_forces_recomputation() {
        let source = reference_source();
        let service = service_with(
            &source,
            &["LOCKED1", "LOCKED2"],
            &["DIST1"],
            Duration::from_secs(60),
        );

        service.get_snapshot().await.unwrap();
        service.invalidate().await;
        service.get_snapshot().await.unwrap();
        assert_eq!(source.calls(), 6);
    }

    #[tokio::test]
    async fn refresh_replaces_the_cached_snapshot() {
        let source = reference_source();
        let service = service_with(
            &source,
            &["LOCKED1", "LOCKED2"],
            &["DIST1"],
            Duration::from_secs(60),
        );

        let first = service.get_snapshot().await.unwrap();
        let refreshed = service.refresh().await.unwrap();
        assert_eq!(source.calls(), 6);
        assert!(!Arc::ptr_eq(&first, &refreshed));

        let served = service.get_snapshot().await.unwrap();
        assert!(Arc::ptr_eq(&served, &refreshed));
        assert_eq!(source.calls(), 6);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_nothing() {
        let source = MockBalanceSource::new([("LOCKED1", MockBehaviour::Failure)]);
        let service = service_with(&source, &["LOCKED1"], &[], Duration::from_secs(60));

        assert!(service.refresh().await.is_err());
        assert!(service.inner.cache.is_expired().await);
    }

    #[tokio::test]
    async fn builds_from_config() {
        let mut config = Config::default();
        config.accounts.locked = vec!["LOCKED1".into(), "LOCKED2".into()];
        config.accounts.distributing = vec!["DIST1".into()];

        let source = reference_source();
        let service = SupplyService::from_config(&config, Arc::new(source.clone()));

        let snapshot = service.get_snapshot().await.unwrap();
        assert_eq!(snapshot.figures().percent_distributed.to_string(), "75.00");
        assert_eq!(source.calls(), 3);
    }
}
