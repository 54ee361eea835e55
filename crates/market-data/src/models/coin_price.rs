use rust_decimal::Decimal;

use super::types::SourceId;
use crate::errors::MarketDataError;

/// Price of one coin in the reference cryptocurrency (usually BTC).
///
/// Produced by the oracle chain and consumed straight away by the fiat step.
#[derive(Clone, Debug, PartialEq)]
pub struct CoinPrice {
    value: Decimal,
    source: SourceId,
}

impl CoinPrice {
    /// Rejects zero and negative prices as a degenerate aggregate.
    pub fn new(value: Decimal, source: SourceId) -> Result<Self, MarketDataError> {
        if value <= Decimal::ZERO {
            return Err(MarketDataError::DegenerateAggregate {
                source_id: source.to_string(),
                message: format!("non-positive price {}", value),
            });
        }
        Ok(Self { value, source })
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    /// The oracle that produced this price.
    pub fn source(&self) -> &str {
        &self.source
    }
}
