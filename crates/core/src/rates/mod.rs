//! Exchange rates module - snapshot model, cache, refresh policy and queries.

mod query_resolver;
mod rate_cache;
mod rates_model;
mod rates_service;
mod rates_traits;
mod refresh_scheduler;

pub use query_resolver::QueryResolver;
pub use rate_cache::RateCache;
pub use rates_model::{ExchangeRatesOptions, RateSnapshot, RefreshPolicy};
pub use rates_service::ExchangeRatesService;
pub use rates_traits::ExchangeRatesServiceTrait;
pub use refresh_scheduler::RefreshScheduler;
