//! Ratefeed Core - exchange rate cache, refresh policy and query surface.
//!
//! This crate owns the process-wide rate table. It is database-agnostic and
//! defines the settings trait implemented by the `storage-sqlite` crate; rates
//! themselves come from any [`RateSource`](ratefeed_market_data::RateSource).

pub mod constants;
pub mod currency;
pub mod errors;
pub mod rates;
pub mod settings;

pub use rates::{
    ExchangeRatesOptions, ExchangeRatesService, ExchangeRatesServiceTrait, RateSnapshot,
    RefreshPolicy,
};
pub use settings::{InMemoryRateSettings, RateSettingsRepositoryTrait};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
