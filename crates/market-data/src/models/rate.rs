use num_traits::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::types::{CurrencyCode, COIN_UNITS, FIAT_MINOR_UNIT_EXPONENT};
use crate::errors::MarketDataError;

/// Price of one whole coin in a fiat currency.
///
/// Both sides are fixed-point integers: `coin_amount` in coin base units (always
/// [`COIN_UNITS`]) and `fiat_amount` in 10^-4 fiat units, so the pair is a ratio.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub currency_code: CurrencyCode,
    pub coin_amount: i64,
    pub fiat_amount: i64,
    pub source: String,
}

impl ExchangeRate {
    /// Create a rate from a fiat amount already expressed in minor units.
    ///
    /// Rejects zero and negative amounts.
    pub fn new(
        currency_code: impl Into<CurrencyCode>,
        fiat_amount: i64,
        source: impl Into<String>,
    ) -> Result<Self, MarketDataError> {
        let currency_code = currency_code.into();
        if fiat_amount <= 0 {
            return Err(MarketDataError::NonPositiveRate {
                currency_code,
                message: format!("{} minor units", fiat_amount),
            });
        }

        Ok(Self {
            currency_code,
            coin_amount: COIN_UNITS,
            fiat_amount,
            source: source.into(),
        })
    }

    /// Create a rate from a decimal fiat price per coin.
    ///
    /// The value is rounded half-to-even to [`FIAT_MINOR_UNIT_EXPONENT`] digits.
    pub fn from_decimal(
        currency_code: impl Into<CurrencyCode>,
        fiat_value: Decimal,
        source: impl Into<String>,
    ) -> Result<Self, MarketDataError> {
        let currency_code = currency_code.into();
        let minor_units = to_minor_units(fiat_value).ok_or_else(|| {
            MarketDataError::NonPositiveRate {
                currency_code: currency_code.clone(),
                message: format!("{} does not fit in minor units", fiat_value),
            }
        })?;

        Self::new(currency_code, minor_units, source)
    }

    /// The fiat price of one coin as a decimal.
    pub fn fiat_value(&self) -> Decimal {
        Decimal::new(self.fiat_amount, FIAT_MINOR_UNIT_EXPONENT)
    }

    /// Whether the rate satisfies the table invariants.
    pub fn is_valid(&self) -> bool {
        self.fiat_amount > 0 && self.coin_amount == COIN_UNITS && !self.currency_code.is_empty()
    }
}

fn to_minor_units(value: Decimal) -> Option<i64> {
    let scale = Decimal::from(10i64.pow(FIAT_MINOR_UNIT_EXPONENT));
    value
        .checked_mul(scale)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_i64()
}

impl std::fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.fiat_value(), self.currency_code)
    }
}
