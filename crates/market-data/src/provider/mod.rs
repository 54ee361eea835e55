//! Price source abstractions and implementations.
//!
//! This module contains:
//! - The [`HttpTransport`] and [`RateSource`] seams
//! - The descriptor-driven oracle client for the coin price
//! - The primary/fallback fiat price-list fetcher
//! - The built-in source definitions

mod traits;

pub mod defaults;
pub mod fiat;
mod json;
pub mod oracle;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use defaults::{default_oracles, CoinMarket};
pub use fiat::{FiatRateFetcher, FiatSource};
pub use oracle::{OracleClient, OracleDescriptor, OracleShape, SuccessFlag};
pub use traits::{HttpTransport, RateSource};
pub use transport::{ReqwestTransport, TransportConfig, DEFAULT_HTTP_TIMEOUT};
