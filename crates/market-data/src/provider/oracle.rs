//! Coin price oracles.
//!
//! An oracle is any endpoint that can tell us what one coin is worth in the
//! reference cryptocurrency. Sources differ only in where the numbers live in
//! the response, so each one is described by an [`OracleDescriptor`] instead of
//! bespoke fetch code:
//!
//! - [`OracleShape::TradeList`]: a list of recent trades, reduced to a
//!   volume-weighted average `sum(totals) / sum(amounts)`
//! - [`OracleShape::Average`]: a single pre-aggregated average field, optionally
//!   guarded by a success flag
//!
//! [`OracleClient`] walks the descriptors in order and returns the first
//! positive price.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde_json::Value;

use super::json::{decimal_from_value, parse_document};
use super::traits::HttpTransport;
use crate::errors::{MarketDataError, RetryClass};
use crate::models::{CoinPrice, SourceId};

/// Where the price lives in an oracle response.
///
/// Pointers are JSON pointers (RFC 6901); `""` addresses the document root.
#[derive(Clone, Debug, PartialEq)]
pub enum OracleShape {
    /// A list of trades carrying a quote-currency total and a base amount each.
    TradeList {
        trades_pointer: String,
        total_field: String,
        amount_field: String,
    },
    /// A single pre-aggregated average price.
    Average {
        average_pointer: String,
        success: Option<SuccessFlag>,
    },
}

/// A field that must hold an expected value before the response is trusted.
#[derive(Clone, Debug, PartialEq)]
pub struct SuccessFlag {
    pub pointer: String,
    pub expected: String,
}

/// One oracle endpoint and the shape of its response.
#[derive(Clone, Debug, PartialEq)]
pub struct OracleDescriptor {
    pub id: SourceId,
    pub url: String,
    pub shape: OracleShape,
}

impl OracleDescriptor {
    pub fn trade_list(
        id: impl Into<SourceId>,
        url: impl Into<String>,
        trades_pointer: &str,
        total_field: &str,
        amount_field: &str,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            shape: OracleShape::TradeList {
                trades_pointer: trades_pointer.to_string(),
                total_field: total_field.to_string(),
                amount_field: amount_field.to_string(),
            },
        }
    }

    pub fn average(
        id: impl Into<SourceId>,
        url: impl Into<String>,
        average_pointer: &str,
        success: Option<SuccessFlag>,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            shape: OracleShape::Average {
                average_pointer: average_pointer.to_string(),
                success,
            },
        }
    }

    /// Extract the coin price from a response body.
    pub fn parse_price(&self, body: &str) -> Result<CoinPrice, MarketDataError> {
        let document = parse_document(&self.id, body)?;

        let price = match &self.shape {
            OracleShape::TradeList {
                trades_pointer,
                total_field,
                amount_field,
            } => self.volume_weighted_average(&document, trades_pointer, total_field, amount_field)?,
            OracleShape::Average {
                average_pointer,
                success,
            } => {
                if let Some(flag) = success {
                    self.check_success(&document, flag)?;
                }
                document
                    .pointer(average_pointer)
                    .and_then(decimal_from_value)
                    .ok_or_else(|| self.invalid(format!("no numeric average at '{}'", average_pointer)))?
            }
        };

        CoinPrice::new(price, self.id.clone())
    }

    fn volume_weighted_average(
        &self,
        document: &Value,
        trades_pointer: &str,
        total_field: &str,
        amount_field: &str,
    ) -> Result<Decimal, MarketDataError> {
        let trades = document
            .pointer(trades_pointer)
            .and_then(Value::as_array)
            .ok_or_else(|| self.invalid(format!("no trade list at '{}'", trades_pointer)))?;

        let mut quote_total = Decimal::ZERO;
        let mut base_total = Decimal::ZERO;

        for trade in trades {
            let total = trade
                .get(total_field)
                .and_then(decimal_from_value)
                .ok_or_else(|| self.invalid(format!("trade without numeric '{}'", total_field)))?;
            let amount = trade
                .get(amount_field)
                .and_then(decimal_from_value)
                .ok_or_else(|| self.invalid(format!("trade without numeric '{}'", amount_field)))?;

            quote_total = quote_total
                .checked_add(total)
                .ok_or_else(|| self.degenerate("quote total overflow"))?;
            base_total = base_total
                .checked_add(amount)
                .ok_or_else(|| self.degenerate("base volume overflow"))?;
        }

        if base_total.is_zero() {
            return Err(self.degenerate(format!("zero base volume over {} trades", trades.len())));
        }

        quote_total
            .checked_div(base_total)
            .ok_or_else(|| self.degenerate("average out of range"))
    }

    fn check_success(&self, document: &Value, flag: &SuccessFlag) -> Result<(), MarketDataError> {
        let matches = match document.pointer(&flag.pointer) {
            Some(Value::String(text)) => *text == flag.expected,
            Some(Value::Bool(value)) => value.to_string() == flag.expected,
            _ => false,
        };

        if matches {
            Ok(())
        } else {
            Err(self.invalid(format!("'{}' is not '{}'", flag.pointer, flag.expected)))
        }
    }

    fn invalid(&self, message: String) -> MarketDataError {
        MarketDataError::InvalidResponse {
            source_id: self.id.to_string(),
            message,
        }
    }

    fn degenerate(&self, message: impl Into<String>) -> MarketDataError {
        MarketDataError::DegenerateAggregate {
            source_id: self.id.to_string(),
            message: message.into(),
        }
    }
}

/// Queries an ordered list of oracles; the first positive price wins.
pub struct OracleClient {
    transport: Arc<dyn HttpTransport>,
    oracles: Vec<OracleDescriptor>,
    timeout: Duration,
}

impl OracleClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        oracles: Vec<OracleDescriptor>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            oracles,
            timeout,
        }
    }

    pub fn oracles(&self) -> &[OracleDescriptor] {
        &self.oracles
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the coin price, falling back through the oracle list.
    ///
    /// Transport failures, malformed responses and degenerate aggregates all
    /// move on to the next oracle. The last error is returned once the list is
    /// exhausted.
    pub async fn fetch_coin_price(&self) -> Result<CoinPrice, MarketDataError> {
        if self.oracles.is_empty() {
            warn!("No price oracles configured");
            return Err(MarketDataError::NoSourcesConfigured);
        }

        let mut last_error: Option<MarketDataError> = None;

        for oracle in &self.oracles {
            debug!("Requesting coin price from oracle '{}'", oracle.id);

            let result = match self
                .transport
                .get_text(&oracle.id, &oracle.url, self.timeout)
                .await
            {
                Ok(body) => oracle.parse_price(&body),
                Err(e) => Err(e),
            };

            match result {
                Ok(price) => {
                    info!("Coin price {} from oracle '{}'", price.value(), oracle.id);
                    return Ok(price);
                }
                Err(e) => {
                    if e.retry_class() == RetryClass::Never {
                        return Err(e);
                    }
                    warn!(
                        "Oracle '{}' failed with {}, trying next oracle",
                        oracle.id, e
                    );
                    last_error = Some(e);
                }
            }
        }

        warn!("All {} price oracles failed", self.oracles.len());
        Err(last_error.unwrap_or(MarketDataError::AllSourcesFailed))
    }
}
