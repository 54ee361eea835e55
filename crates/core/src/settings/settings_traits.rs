//! Repository traits for rate settings.

use async_trait::async_trait;
use ratefeed_market_data::ExchangeRate;

use crate::errors::Result;

/// Persistent settings used by the exchange rate service.
///
/// Holds the single cached rate that seeds the table on a cold start and the
/// user's preferred exchange currency.
#[async_trait]
pub trait RateSettingsRepositoryTrait: Send + Sync {
    /// Get the cached rate, if one was ever stored.
    fn get_cached_rate(&self) -> Result<Option<ExchangeRate>>;

    /// Replace the cached rate.
    async fn set_cached_rate(&self, rate: &ExchangeRate) -> Result<()>;

    /// Get the preferred exchange currency code, if the user picked one.
    fn get_exchange_currency_code(&self) -> Result<Option<String>>;

    /// Store the preferred exchange currency code.
    async fn set_exchange_currency_code(&self, code: &str) -> Result<()>;
}
