//! Built-in price sources.

use std::borrow::Cow;

use urlencoding::encode;

use super::fiat::FiatSource;
use super::oracle::{OracleDescriptor, SuccessFlag};

const POLONIEX_TRADES_URL: &str = "https://poloniex.com/public?command=returnTradeHistory";
const BTER_TICKER_URL: &str = "http://data.bter.com/api/1/ticker";
const CRYPTSY_MARKETS_URL: &str = "http://pubapi.cryptsy.com/api.php?method=singlemarketdata";

const BITCOIN_AVERAGE_URL: &str = "https://api.bitcoinaverage.com/custom/abw";
const BLOCKCHAIN_INFO_URL: &str = "https://blockchain.info/ticker";

/// The coin whose price is wanted and the reference currency it trades in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoinMarket {
    /// Ticker of the native coin, e.g. `DASH`.
    pub coin_ticker: String,
    /// Reference cryptocurrency the oracles quote in, e.g. `BTC`.
    pub market_currency: String,
}

impl Default for CoinMarket {
    fn default() -> Self {
        Self {
            coin_ticker: "DASH".to_string(),
            market_currency: "BTC".to_string(),
        }
    }
}

impl CoinMarket {
    pub fn new(coin_ticker: impl Into<String>, market_currency: impl Into<String>) -> Self {
        Self {
            coin_ticker: coin_ticker.into(),
            market_currency: market_currency.into(),
        }
    }

    fn upper(&self) -> (String, String) {
        (
            self.coin_ticker.to_ascii_uppercase(),
            self.market_currency.to_ascii_uppercase(),
        )
    }

    fn lower(&self) -> (String, String) {
        (
            self.coin_ticker.to_ascii_lowercase(),
            self.market_currency.to_ascii_lowercase(),
        )
    }
}

/// Poloniex trade history for `{MARKET}_{COIN}`; price is total over amount.
pub fn poloniex(market: &CoinMarket) -> OracleDescriptor {
    let (coin, quote) = market.upper();
    let pair = format!("{}_{}", quote, coin);
    OracleDescriptor::trade_list(
        Cow::Borrowed("Poloniex"),
        format!("{}&currencyPair={}", POLONIEX_TRADES_URL, encode(&pair)),
        "",
        "total",
        "amount",
    )
}

/// BTER ticker for `{coin}_{market}`; trusted only when `result` is `"true"`.
pub fn bter(market: &CoinMarket) -> OracleDescriptor {
    let (coin, quote) = market.lower();
    OracleDescriptor::average(
        Cow::Borrowed("BTER"),
        format!("{}/{}_{}", BTER_TICKER_URL, encode(&coin), encode(&quote)),
        "/avg",
        Some(SuccessFlag {
            pointer: "/result".to_string(),
            expected: "true".to_string(),
        }),
    )
}

/// Cryptsy single-market data. Not part of the default chain.
pub fn cryptsy(market: &CoinMarket, market_id: u32) -> OracleDescriptor {
    let (coin, _) = market.upper();
    OracleDescriptor::trade_list(
        Cow::Borrowed("Cryptsy"),
        format!("{}&marketid={}", CRYPTSY_MARKETS_URL, market_id),
        &format!("/return/markets/{}/recenttrades", escape_pointer(&coin)),
        "total",
        "quantity",
    )
}

/// Oracles consulted in order for the coin price.
pub fn default_oracles(market: &CoinMarket) -> Vec<OracleDescriptor> {
    vec![poloniex(market), bter(market)]
}

/// Primary fiat price list.
pub fn bitcoin_average() -> FiatSource {
    FiatSource::new(
        Cow::Borrowed("BitcoinAverage.com"),
        BITCOIN_AVERAGE_URL,
        &["24h_avg", "last"],
    )
}

/// Fallback fiat price list.
pub fn blockchain_info() -> FiatSource {
    FiatSource::new(Cow::Borrowed("blockchain.info"), BLOCKCHAIN_INFO_URL, &["15m"])
}

// RFC 6901 reference token escaping.
fn escape_pointer(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
