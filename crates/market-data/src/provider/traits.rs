//! Provider trait definitions.
//!
//! This module defines the two seams of the rate acquisition pipeline:
//! - [`HttpTransport`]: how bytes are fetched from a price source
//! - [`RateSource`]: anything that can produce a complete [`RateTable`]

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::RateTable;

/// Transport used by oracles and fiat sources to fetch response bodies.
///
/// Implementations are expected to apply the given timeout to the whole
/// request, decode any negotiated content encoding and map non-success HTTP
/// statuses to [`MarketDataError::HttpStatus`].
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use ratefeed_market_data::provider::HttpTransport;
///
/// struct FixedTransport(String);
///
/// #[async_trait]
/// impl HttpTransport for FixedTransport {
///     async fn get_text(
///         &self,
///         _source_id: &str,
///         _url: &str,
///         _timeout: Duration,
///     ) -> Result<String, MarketDataError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Fetch `url` and return the body as text.
    ///
    /// # Arguments
    ///
    /// * `source_id` - Identifier of the source, used to attribute errors
    /// * `url` - The endpoint to request
    /// * `timeout` - Upper bound for the whole request
    async fn get_text(
        &self,
        source_id: &str,
        url: &str,
        timeout: Duration,
    ) -> Result<String, MarketDataError>;
}

/// A producer of complete rate tables.
///
/// The refresh scheduler only depends on this trait. [`RatePipeline`](crate::registry::RatePipeline)
/// is the production implementation (oracle chain followed by fiat sources).
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch a fresh table.
    ///
    /// An `Ok` table may be empty when the source answered but none of its
    /// entries were usable; callers decide whether to publish it.
    async fn fetch_rate_table(&self) -> Result<RateTable, MarketDataError>;
}
