use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use ratefeed_market_data::ExchangeRate;

use super::RateSettingsRepositoryTrait;
use crate::errors::Result;

#[derive(Default)]
struct RateSettings {
    cached_rate: Option<ExchangeRate>,
    exchange_currency_code: Option<String>,
}

/// Process-local settings store. Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryRateSettings {
    inner: RwLock<RateSettings>,
}

impl InMemoryRateSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a preferred exchange currency.
    pub fn with_exchange_currency(code: &str) -> Self {
        Self {
            inner: RwLock::new(RateSettings {
                cached_rate: None,
                exchange_currency_code: Some(code.to_string()),
            }),
        }
    }

    /// Start with a cached rate already stored.
    pub fn with_cached_rate(rate: ExchangeRate) -> Self {
        Self {
            inner: RwLock::new(RateSettings {
                cached_rate: Some(rate),
                exchange_currency_code: None,
            }),
        }
    }
}

#[async_trait]
impl RateSettingsRepositoryTrait for InMemoryRateSettings {
    fn get_cached_rate(&self) -> Result<Option<ExchangeRate>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.cached_rate.clone())
    }

    async fn set_cached_rate(&self, rate: &ExchangeRate) -> Result<()> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.cached_rate = Some(rate.clone());
        Ok(())
    }

    fn get_exchange_currency_code(&self) -> Result<Option<String>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.exchange_currency_code.clone())
    }

    async fn set_exchange_currency_code(&self, code: &str) -> Result<()> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.exchange_currency_code = Some(code.to_string());
        Ok(())
    }
}
