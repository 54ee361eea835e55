//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all rate acquisition operations
//! - [`RetryClass`]: Classification for determining fallback behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while acquiring exchange rates.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method, which determines how the oracle and fiat fallback chains react to it.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The source could not be reached (connection refused, DNS, TLS, ...).
    #[error("Source unavailable: {source_id} - {message}")]
    SourceUnavailable {
        /// The source that could not be reached
        source_id: String,
        /// Transport error message
        message: String,
    },

    /// The source answered with a non-success HTTP status.
    #[error("HTTP status {status} from {source_id}")]
    HttpStatus {
        /// The source that returned the status
        source_id: String,
        /// The HTTP status code
        status: u16,
    },

    /// The request to the source timed out.
    #[error("Timeout: {source_id}")]
    Timeout {
        /// The source that timed out
        source_id: String,
    },

    /// The source answered, but the body did not have the expected shape.
    #[error("Invalid response from {source_id}: {message}")]
    InvalidResponse {
        /// The source that returned the malformed body
        source_id: String,
        /// What was wrong with it
        message: String,
    },

    /// None of a currency's preferred fields parsed as a number.
    /// The currency is omitted from the table; the fetch carries on.
    #[error("No parsable field for {currency_code} from {source_id}")]
    FieldUnparseable {
        /// The currency code being parsed
        currency_code: String,
        /// The source that supplied it
        source_id: String,
    },

    /// A trade-list aggregate divided by zero or produced a non-positive price.
    #[error("Degenerate aggregate from {source_id}: {message}")]
    DegenerateAggregate {
        /// The oracle that produced the aggregate
        source_id: String,
        /// Description of the degenerate value
        message: String,
    },

    /// A computed fiat amount was zero, negative or out of range.
    #[error("Non-positive rate for {currency_code}: {message}")]
    NonPositiveRate {
        /// The currency code of the rejected rate
        currency_code: String,
        /// Description of the rejected value
        message: String,
    },

    /// The chain has no sources to try.
    #[error("No sources configured")]
    NoSourcesConfigured,

    /// Every source in the chain was tried and all failed.
    #[error("All sources failed")]
    AllSourcesFailed,

    /// A network error that was not attributed to a specific source.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// - [`RetryClass::NextSource`]: move on to the next source in the chain
    /// - [`RetryClass::SkipEntry`]: drop a single table entry and keep parsing
    /// - [`RetryClass::Never`]: the chain itself is exhausted or misconfigured
    ///
    /// # Examples
    ///
    /// ```
    /// use ratefeed_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::Timeout { source_id: "POLONIEX".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::NextSource);
    ///
    /// let error = MarketDataError::AllSourcesFailed;
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            // Transport, status, shape and aggregate failures all fall through
            Self::SourceUnavailable { .. }
            | Self::HttpStatus { .. }
            | Self::Timeout { .. }
            | Self::InvalidResponse { .. }
            | Self::DegenerateAggregate { .. }
            | Self::Network(_) => RetryClass::NextSource,

            // Per-currency problems only cost that currency
            Self::FieldUnparseable { .. }
            | Self::NonPositiveRate { .. } => RetryClass::SkipEntry,

            Self::NoSourcesConfigured | Self::AllSourcesFailed => RetryClass::Never,
        }
    }

    /// Build an error from a reqwest failure, attributing it to `source_id`.
    pub fn from_transport(source_id: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                source_id: source_id.to_string(),
            }
        } else if let Some(status) = error.status() {
            Self::HttpStatus {
                source_id: source_id.to_string(),
                status: status.as_u16(),
            }
        } else {
            Self::SourceUnavailable {
                source_id: source_id.to_string(),
                message: error.to_string(),
            }
        }
    }
}
