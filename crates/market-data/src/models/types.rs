use std::borrow::Cow;

/// Source identifier - mostly static constants ("POLONIEX", "blockchain.info")
pub type SourceId = Cow<'static, str>;

/// Currency code (ISO 4217, plus whatever the fiat sources publish)
pub type CurrencyCode = String;

/// Base units in one whole coin.
pub const COIN_UNITS: i64 = 100_000_000;

/// Number of fractional digits carried by fiat amounts.
pub const FIAT_MINOR_UNIT_EXPONENT: u32 = 4;
