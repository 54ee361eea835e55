//! Exchange rate models
//!
//! This module contains the core data types for rate acquisition:
//! - `types` - Type aliases and fixed-point constants (SourceId, CurrencyCode, COIN_UNITS)
//! - `rate` - A single coin-to-fiat exchange rate (ExchangeRate)
//! - `table` - A code-sorted, code-unique set of rates (RateTable)
//! - `coin_price` - The coin's price in the reference cryptocurrency (CoinPrice)

mod coin_price;
mod rate;
mod table;
mod types;

pub use coin_price::CoinPrice;
pub use rate::ExchangeRate;
pub use table::RateTable;
pub use types::{CurrencyCode, SourceId, COIN_UNITS, FIAT_MINOR_UNIT_EXPONENT};
