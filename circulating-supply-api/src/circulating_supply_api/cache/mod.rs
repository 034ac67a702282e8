// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::circulating_supply_api::service::SupplySnapshot;
use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MetricKey {
    CirculatingSupply,
}

/// Holds the most recently computed supply snapshot for a fixed amount of time.
///
/// Reads never block on each other. Concurrent recomputations of the same metric are coalesced,
/// so that only a single one actually runs while all other callers wait for its result.
#[derive(Clone)]
pub(crate) struct SnapshotCache {
    inner: Cache<MetricKey, Arc<SupplySnapshot>>,
    ttl: Duration,
}

impl SnapshotCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        SnapshotCache {
            inner: Cache::builder().time_to_live(ttl).build(),
            ttl,
        }
    }

    pub(crate) fn ttl(&self) -> Duration {
        self.ttl
    }

    pub(crate) async fn get(&self) -> Option<Arc<SupplySnapshot>> {
        self.inner.get(&MetricKey::CirculatingSupply).await
    }

    /// Replaces the currently held snapshot (if any). It will expire `ttl` after this call.
    pub(crate) async fn put(&self, snapshot: Arc<SupplySnapshot>) {
        self.inner
            .insert(MetricKey::CirculatingSupply, snapshot)
            .await
    }

    /// Expiry itself is handled by moka: once `ttl` elapses, the entry is no longer returned by `get`.
    #[cfg(test)]
    pub(crate) async fn is_expired(&self) -> bool {
        self.get().await.is_none()
    }

    pub(crate) async fn invalidate(&self) {
        self.inner.invalidate(&MetricKey::CirculatingSupply).await
    }

    /// Returns the cached snapshot or, if there's none, resolves `init` and caches its result.
    ///
    /// If multiple callers miss the cache at the same time, `init` is only resolved for one of them.
    /// Failed initialisation is not cached and its error is shared with every waiting caller.
    pub(crate) async fn get_or_try_compute<F, E>(
        &self,
        init: F,
    ) -> Result<Arc<SupplySnapshot>, Arc<E>>
    where
        F: Future<Output = Result<Arc<SupplySnapshot>, E>>,
        E: Send + Sync + 'static,
    {
        trace!("retrieving the supply snapshot");
        self.inner
            .try_get_with(MetricKey::CirculatingSupply, init)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::AddressSet;
    use crate::circulating_supply_api::calculator::{compute_snapshot, Issuance};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn dummy_snapshot(locked: u128) -> Arc<SupplySnapshot> {
        let figures = compute_snapshot(locked, 0, Issuance::new(1_000_000, 6)).unwrap();
        Arc::new(SupplySnapshot::new(
            figures,
            AddressSet::locked(["LOCKED"]),
            AddressSet::distributing(Vec::<String>::new()),
        ))
    }

    #[tokio::test]
    async fn empty_cache_is_expired() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        assert!(cache.get().await.is_none());
        assert!(cache.is_expired().await);
        assert_eq!(cache.ttl(), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn put_replaces_the_snapshot() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        let first = dummy_snapshot(1);
        let second = dummy_snapshot(2);

        cache.put(first.clone()).await;
        assert!(Arc::ptr_eq(&cache.get().await.unwrap(), &first));

        cache.put(second.clone()).await;
        assert!(Arc::ptr_eq(&cache.get().await.unwrap(), &second));
        assert!(!cache.is_expired().await);

        cache.invalidate().await;
        assert!(cache.is_expired().await);
    }

    #[tokio::test]
    async fn snapshot_expires_after_ttl() {
        let cache = SnapshotCache::new(Duration::from_millis(100));
        cache.put(dummy_snapshot(1)).await;
        assert!(!cache.is_expired().await);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(cache.is_expired().await);
    }

    #[tokio::test]
    async fn concurrent_misses_compute_once() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        let computations = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let cache = cache.clone();
            let computations = Arc::clone(&computations);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_try_compute(async {
                        computations.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok::<_, std::io::Error>(dummy_snapshot(1))
                    })
                    .await
            }));
        }

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(computations.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
    }

    #[tokio::test]
    async fn failed_computation_is_not_cached() {
        let cache = SnapshotCache::new(Duration::from_secs(60));

        let res = cache
            .get_or_try_compute(async { Err::<Arc<SupplySnapshot>, _>("boom") })
            .await;
        assert_eq!(*res.unwrap_err(), "boom");
        assert!(cache.is_expired().await);

        let res = cache
            .get_or_try_compute(async { Ok::<_, &'static str>(dummy_snapshot(3)) })
            .await;
        assert!(res.is_ok());
        assert!(!cache.is_expired().await);
    }
}
