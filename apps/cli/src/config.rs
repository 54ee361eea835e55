use std::time::Duration;

use ratefeed_core::constants::REFRESH_INTERVAL;
use ratefeed_core::errors::{Error, Result};
use ratefeed_market_data::{CoinMarket, DEFAULT_HTTP_TIMEOUT};

pub struct Config {
    pub data_dir: String,
    pub market: CoinMarket,
    pub http_timeout: Duration,
    pub refresh_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = CoinMarket::default();
        let data_dir = lookup("RATEFEED_DATA_DIR").unwrap_or_else(|| "./data".to_string());
        let coin_ticker = lookup("RATEFEED_COIN_TICKER").unwrap_or(defaults.coin_ticker);
        let market_currency =
            lookup("RATEFEED_MARKET_CURRENCY").unwrap_or(defaults.market_currency);

        let http_timeout = secs(&lookup, "RATEFEED_HTTP_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_HTTP_TIMEOUT);
        let refresh_interval = secs(&lookup, "RATEFEED_REFRESH_INTERVAL_SECS")?
            .unwrap_or(REFRESH_INTERVAL);

        Ok(Self {
            data_dir,
            market: CoinMarket::new(coin_ticker, market_currency),
            http_timeout,
            refresh_interval,
        })
    }
}

fn secs(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<Duration>> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(Error::InvalidConfigValue(format!("{} must be positive", key))),
        Ok(n) => Ok(Some(Duration::from_secs(n))),
        Err(e) => Err(Error::InvalidConfigValue(format!("{}='{}': {}", key, raw, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.data_dir, "./data");
        assert_eq!(config.market.coin_ticker, "DASH");
        assert_eq!(config.market.market_currency, "BTC");
        assert_eq!(config.http_timeout, DEFAULT_HTTP_TIMEOUT);
        assert_eq!(config.refresh_interval, Duration::from_secs(600));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("RATEFEED_DATA_DIR", "/tmp/rates"),
            ("RATEFEED_COIN_TICKER", "LTC"),
            ("RATEFEED_HTTP_TIMEOUT_SECS", "5"),
            ("RATEFEED_REFRESH_INTERVAL_SECS", "60"),
        ])
        .unwrap();
        assert_eq!(config.data_dir, "/tmp/rates");
        assert_eq!(config.market.coin_ticker, "LTC");
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_rejects_bad_durations() {
        assert!(matches!(
            config(&[("RATEFEED_HTTP_TIMEOUT_SECS", "soon")]),
            Err(Error::InvalidConfigValue(_))
        ));
        assert!(matches!(
            config(&[("RATEFEED_REFRESH_INTERVAL_SECS", "0")]),
            Err(Error::InvalidConfigValue(_))
        ));
    }
}
