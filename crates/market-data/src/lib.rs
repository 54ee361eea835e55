//! Ratefeed Market Data Crate
//!
//! This crate fetches coin-to-fiat exchange rates from public price sources.
//!
//! # Overview
//!
//! A refresh runs in two steps:
//! - An ordered chain of price oracles yields the coin's price in a reference
//!   cryptocurrency (BTC by default); the first usable answer wins
//! - A primary fiat price list (with a fallback) turns that price into a full
//!   table of rates keyed by currency code
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |  OracleClient    |  (Poloniex, BTER, ... in order)
//! +------------------+
//!          |
//!          v  CoinPrice
//! +------------------+
//! | FiatRateFetcher  |  (primary + fallback price list)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |   RateTable      |  (code -> ExchangeRate)
//! +------------------+
//! ```
//!
//! [`RatePipeline`] composes both steps behind the [`RateSource`] trait.
//!
//! # Core Types
//!
//! - [`ExchangeRate`] - Fixed-point price of one coin in one fiat currency
//! - [`RateTable`] - Code-sorted set of rates from one refresh
//! - [`CoinPrice`] - Coin price in the reference cryptocurrency
//! - [`OracleDescriptor`] - Endpoint and response shape of one oracle
//! - [`FiatSource`] - Endpoint and field priority of one fiat price list

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

pub use errors::{MarketDataError, RetryClass};

// Re-export all public types from models
pub use models::{
    CoinPrice, CurrencyCode, ExchangeRate, RateTable, SourceId, COIN_UNITS,
    FIAT_MINOR_UNIT_EXPONENT,
};

// Re-export provider types
pub use provider::{
    default_oracles, CoinMarket, FiatRateFetcher, FiatSource, HttpTransport, OracleClient,
    OracleDescriptor, OracleShape, RateSource, ReqwestTransport, SuccessFlag, TransportConfig,
    DEFAULT_HTTP_TIMEOUT,
};

// Re-export registry types
pub use registry::{PipelineBuilder, RatePipeline};
