use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ratefeed_market_data::ExchangeRate;

use crate::errors::Result;

/// Query surface over the exchange rate table.
///
/// Reads may trigger a throttled refresh unless `offline` is set; they never
/// fail. The table itself is read-only: the write operations exist to reject
/// callers with [`Error::UnsupportedOperation`](crate::Error::UnsupportedOperation).
#[async_trait]
pub trait ExchangeRatesServiceTrait: Send + Sync {
    /// All known rates, code-sorted.
    async fn list(&self, offline: bool) -> Vec<ExchangeRate>;

    /// Rates whose code or symbol contains `text`, ignoring case.
    async fn search(&self, text: &str, offline: bool) -> Vec<ExchangeRate>;

    /// Best rate for `code`. Without a code, the stored exchange currency is used.
    async fn best_for(&self, code: Option<&str>, offline: bool) -> Option<ExchangeRate>;

    fn currency_symbol(&self, code: &str) -> Option<String>;

    /// Wall-clock time of the last successful refresh in this process.
    fn last_refreshed_at(&self) -> Option<DateTime<Utc>>;

    fn get_exchange_currency_code(&self) -> Option<String>;

    async fn set_exchange_currency_code(&self, code: &str) -> Result<()>;

    fn insert_rate(&self, rate: ExchangeRate) -> Result<()>;

    fn update_rate(&self, rate: ExchangeRate) -> Result<()>;

    fn delete_rate(&self, currency_code: &str) -> Result<()>;
}
