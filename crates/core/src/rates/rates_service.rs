use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use ratefeed_market_data::{ExchangeRate, RateSource};

use super::query_resolver::QueryResolver;
use super::rate_cache::RateCache;
use super::rates_model::ExchangeRatesOptions;
use super::rates_traits::ExchangeRatesServiceTrait;
use super::refresh_scheduler::RefreshScheduler;
use crate::currency::{CurrencySymbols, LocaleCurrency};
use crate::errors::{Error, Result};
use crate::settings::RateSettingsRepositoryTrait;

pub struct ExchangeRatesService {
    scheduler: RefreshScheduler,
    resolver: Arc<QueryResolver>,
    cache: Arc<RateCache>,
}

impl ExchangeRatesService {
    pub fn new(
        source: Arc<dyn RateSource>,
        settings: Arc<dyn RateSettingsRepositoryTrait>,
        symbols: Arc<dyn CurrencySymbols>,
        locale: Arc<dyn LocaleCurrency>,
        options: ExchangeRatesOptions,
    ) -> Self {
        let resolver = Arc::new(QueryResolver::new(
            symbols,
            locale,
            options.fallback_currency,
        ));
        let cache = Arc::new(RateCache::new(settings));
        let scheduler =
            RefreshScheduler::new(source, cache.clone(), resolver.clone(), options.refresh);

        Self {
            scheduler,
            resolver,
            cache,
        }
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    fn read_only(operation: &str) -> Error {
        Error::UnsupportedOperation(format!("{} on the exchange rate table", operation))
    }
}

#[async_trait]
impl ExchangeRatesServiceTrait for ExchangeRatesService {
    async fn list(&self, offline: bool) -> Vec<ExchangeRate> {
        let snapshot = self.scheduler.ensure_fresh(offline).await;
        self.resolver.list(snapshot.table())
    }

    async fn search(&self, text: &str, offline: bool) -> Vec<ExchangeRate> {
        let snapshot = self.scheduler.ensure_fresh(offline).await;
        self.resolver.search(snapshot.table(), text)
    }

    async fn best_for(&self, code: Option<&str>, offline: bool) -> Option<ExchangeRate> {
        let snapshot = self.scheduler.ensure_fresh(offline).await;
        let preferred = match code {
            Some(code) => Some(code.to_string()),
            None => self.cache.exchange_currency_code(),
        };
        debug!("Resolving best rate for {:?}", preferred);
        self.resolver.best_for(snapshot.table(), preferred.as_deref())
    }

    fn currency_symbol(&self, code: &str) -> Option<String> {
        self.resolver.symbol_for(code)
    }

    fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.scheduler.snapshot().refreshed_at()
    }

    fn get_exchange_currency_code(&self) -> Option<String> {
        self.cache.exchange_currency_code()
    }

    async fn set_exchange_currency_code(&self, code: &str) -> Result<()> {
        let code = code.trim().to_ascii_uppercase();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidConfigValue(format!(
                "'{}' is not a currency code",
                code
            )));
        }
        self.cache.set_exchange_currency_code(&code).await
    }

    fn insert_rate(&self, _rate: ExchangeRate) -> Result<()> {
        Err(Self::read_only("insert"))
    }

    fn update_rate(&self, _rate: ExchangeRate) -> Result<()> {
        Err(Self::read_only("update"))
    }

    fn delete_rate(&self, _currency_code: &str) -> Result<()> {
        Err(Self::read_only("delete"))
    }
}
