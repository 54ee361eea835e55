use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use log::{debug, info, warn};
use ratefeed_market_data::RateSource;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::query_resolver::QueryResolver;
use super::rate_cache::RateCache;
use super::rates_model::{RateSnapshot, RefreshPolicy};

/// Owns the current rate snapshot and decides when to refresh it.
///
/// Readers take an `Arc` clone of the snapshot and never wait on a refresh.
/// Refreshes are single-flight: the stale check, the fetch and the publish run
/// under one async mutex, and a caller that queued behind another caller's
/// attempt takes that attempt's outcome instead of fetching again.
pub struct RefreshScheduler {
    source: Arc<dyn RateSource>,
    cache: Arc<RateCache>,
    resolver: Arc<QueryResolver>,
    policy: RefreshPolicy,
    snapshot: RwLock<Arc<RateSnapshot>>,
    refresh_guard: Mutex<()>,
    completed_attempts: AtomicU64,
}

impl RefreshScheduler {
    /// Create a scheduler seeded from the cache.
    pub fn new(
        source: Arc<dyn RateSource>,
        cache: Arc<RateCache>,
        resolver: Arc<QueryResolver>,
        policy: RefreshPolicy,
    ) -> Self {
        let initial = match cache.load() {
            Some(table) => {
                debug!("Seeded rate table from cache with {} entries", table.len());
                RateSnapshot::seeded(table)
            }
            None => RateSnapshot::empty(),
        };

        Self {
            source,
            cache,
            resolver,
            policy,
            snapshot: RwLock::new(Arc::new(initial)),
            refresh_guard: Mutex::new(()),
            completed_attempts: AtomicU64::new(0),
        }
    }

    /// The current snapshot, without touching the network.
    pub fn snapshot(&self) -> Arc<RateSnapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Refresh if allowed and due, then return the current snapshot.
    ///
    /// With `offline` set the network is never used. Refresh failures are
    /// logged and leave the previous snapshot in place.
    pub async fn ensure_fresh(&self, offline: bool) -> Arc<RateSnapshot> {
        let current = self.snapshot();
        if offline || !self.policy.is_stale(&current, Instant::now()) {
            return current;
        }

        let observed = self.completed_attempts.load(Ordering::Acquire);
        let _guard = self.refresh_guard.lock().await;

        if self.completed_attempts.load(Ordering::Acquire) != observed {
            debug!("Rate refresh completed while waiting, reusing its outcome");
            return self.snapshot();
        }

        // Still stale under the guard: nobody else can publish until we are done.
        let current = self.snapshot();
        if self.policy.is_stale(&current, Instant::now()) {
            self.refresh().await;
        }
        self.completed_attempts.fetch_add(1, Ordering::Release);

        self.snapshot()
    }

    async fn refresh(&self) {
        let table = match self.source.fetch_rate_table().await {
            Ok(table) => table,
            Err(e) => {
                warn!("Exchange rate refresh failed, keeping previous rates: {}", e);
                return;
            }
        };

        if table.is_empty() {
            warn!("Exchange rate refresh returned no usable rates, keeping previous rates");
            return;
        }

        let snapshot = Arc::new(RateSnapshot::refreshed(table, Instant::now(), Utc::now()));
        self.publish(snapshot.clone());

        info!(
            "Published {} exchange rates",
            snapshot.table().map_or(0, |table| table.len())
        );

        let exchange_currency = self.cache.exchange_currency_code();
        match self
            .resolver
            .best_for(snapshot.table(), exchange_currency.as_deref())
        {
            Some(best) => self.cache.persist(&best).await,
            None => debug!("No rate suitable for caching"),
        }
    }

    fn publish(&self, snapshot: Arc<RateSnapshot>) {
        let mut current = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = snapshot;
    }
}
