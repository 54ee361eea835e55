use std::sync::Arc;

use log::{debug, warn};
use ratefeed_market_data::{ExchangeRate, RateTable};

use crate::errors::{Error, Result};
use crate::settings::RateSettingsRepositoryTrait;

/// Persists the single best rate so a cold start has something to show.
pub struct RateCache {
    settings: Arc<dyn RateSettingsRepositoryTrait>,
}

impl RateCache {
    pub fn new(settings: Arc<dyn RateSettingsRepositoryTrait>) -> Self {
        Self { settings }
    }

    /// Load the cached rate as a one-entry table.
    ///
    /// A missing, unreadable or invalid record yields `None`; problems are
    /// logged, never returned.
    pub fn load(&self) -> Option<RateTable> {
        match self.try_load() {
            Ok(table) => table,
            Err(e) => {
                warn!("Ignoring cached exchange rate: {}", e);
                None
            }
        }
    }

    fn try_load(&self) -> Result<Option<RateTable>> {
        let Some(rate) = self.settings.get_cached_rate()? else {
            debug!("No cached exchange rate");
            return Ok(None);
        };

        if !rate.is_valid() {
            return Err(Error::InvalidCachedRate(format!(
                "{} has {} fiat minor units for {} coin units",
                rate.currency_code, rate.fiat_amount, rate.coin_amount
            )));
        }

        let table = RateTable::single(rate).map_err(|e| Error::InvalidCachedRate(e.to_string()))?;
        Ok(Some(table))
    }

    /// Overwrite the cached rate. Failures are logged.
    pub async fn persist(&self, rate: &ExchangeRate) {
        match self.settings.set_cached_rate(rate).await {
            Ok(()) => debug!("Cached exchange rate {}", rate),
            Err(e) => warn!("Failed to cache exchange rate {}: {}", rate, e),
        }
    }

    /// The user's preferred exchange currency, if readable.
    pub fn exchange_currency_code(&self) -> Option<String> {
        self.settings
            .get_exchange_currency_code()
            .unwrap_or_else(|e| {
                warn!("Failed to read exchange currency: {}", e);
                None
            })
    }

    pub async fn set_exchange_currency_code(&self, code: &str) -> Result<()> {
        self.settings.set_exchange_currency_code(code).await
    }
}
