use std::time::Duration;

use chrono::{DateTime, Utc};
use ratefeed_market_data::RateTable;
use tokio::time::Instant;

use crate::constants::{DEFAULT_EXCHANGE_CURRENCY, REFRESH_INTERVAL};

/// The rate table together with the time it was last refreshed.
///
/// Snapshots are immutable; a refresh publishes a new one. `last_refresh` is
/// `None` until the first successful refresh, even when the table was seeded
/// from the cache.
#[derive(Clone, Debug, Default)]
pub struct RateSnapshot {
    table: Option<RateTable>,
    last_refresh: Option<Instant>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl RateSnapshot {
    /// A snapshot with no table at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A snapshot seeded from the persisted cache.
    pub fn seeded(table: RateTable) -> Self {
        Self {
            table: Some(table),
            last_refresh: None,
            refreshed_at: None,
        }
    }

    pub(crate) fn refreshed(table: RateTable, at: Instant, wall_clock: DateTime<Utc>) -> Self {
        Self {
            table: Some(table),
            last_refresh: Some(at),
            refreshed_at: Some(wall_clock),
        }
    }

    pub fn table(&self) -> Option<&RateTable> {
        self.table.as_ref()
    }

    pub fn last_refresh(&self) -> Option<Instant> {
        self.last_refresh
    }

    /// Wall-clock time of the last successful refresh.
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }
}

/// Throttle for network refreshes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Minimum time between the last successful refresh and the next attempt.
    pub interval: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            interval: REFRESH_INTERVAL,
        }
    }
}

impl RefreshPolicy {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Whether a snapshot is due for a refresh at `now`.
    pub fn is_stale(&self, snapshot: &RateSnapshot, now: Instant) -> bool {
        match snapshot.last_refresh() {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }
}

/// Options for [`ExchangeRatesService`](super::ExchangeRatesService).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeRatesOptions {
    /// Last-resort currency for `best_for`.
    pub fallback_currency: String,
    pub refresh: RefreshPolicy,
}

impl Default for ExchangeRatesOptions {
    fn default() -> Self {
        Self {
            fallback_currency: DEFAULT_EXCHANGE_CURRENCY.to_string(),
            refresh: RefreshPolicy::default(),
        }
    }
}
