use std::time::Duration;

/// Minimum time between two successful refreshes.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Currency used by `best_for` when neither the requested nor the locale
/// currency has a rate.
pub const DEFAULT_EXCHANGE_CURRENCY: &str = "USD";

/// Settings keys
pub const EXCHANGE_CURRENCY_CODE_KEY: &str = "exchange_currency_code";
pub const CACHED_RATE_CURRENCY_CODE_KEY: &str = "cached_rate_currency_code";
pub const CACHED_RATE_COIN_KEY: &str = "cached_rate_coin";
pub const CACHED_RATE_FIAT_KEY: &str = "cached_rate_fiat";
pub const CACHED_RATE_SOURCE_KEY: &str = "cached_rate_source";
