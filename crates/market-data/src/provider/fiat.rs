//! Fiat price-list sources.
//!
//! A fiat source publishes an object keyed by currency code, each entry holding
//! one or more numeric fields with the coin's reference-currency price in that
//! fiat currency:
//!
//! ```text
//! {
//!   "USD": { "24h_avg": "431.07", "last": "432.10" },
//!   "EUR": { "last": "383.50" },
//!   "timestamp": "Tue, 07 Oct 2014 10:35:12 -0000"
//! }
//! ```
//!
//! [`FiatRateFetcher`] multiplies the preferred field by the coin price to get
//! a full [`RateTable`], using the fallback source when the primary is down.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde_json::{Map, Value};

use super::json::{decimal_from_value, parse_document};
use super::traits::HttpTransport;
use crate::errors::{MarketDataError, RetryClass};
use crate::models::{CoinPrice, ExchangeRate, RateTable, SourceId};

/// Reserved top-level key that carries the publication time, not a currency.
const TIMESTAMP_KEY: &str = "timestamp";

/// One fiat price-list endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct FiatSource {
    /// Label stored on every rate this source produces.
    pub id: SourceId,
    pub url: String,
    /// Field names to try for each currency, most preferred first.
    pub fields: Vec<String>,
}

impl FiatSource {
    pub fn new(id: impl Into<SourceId>, url: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Turn a response body into a table of rates for one coin.
    ///
    /// Fails only when the body is not a JSON object. Individual currencies that
    /// cannot be used are logged and left out, so the table may be empty.
    pub fn parse_rates(&self, body: &str, price: &CoinPrice) -> Result<RateTable, MarketDataError> {
        let document = parse_document(&self.id, body)?;
        let entries = document
            .as_object()
            .ok_or_else(|| MarketDataError::InvalidResponse {
                source_id: self.id.to_string(),
                message: "expected an object keyed by currency code".to_string(),
            })?;

        let mut table = RateTable::new();

        for (currency_code, entry) in entries {
            if currency_code == TIMESTAMP_KEY {
                continue;
            }

            let parsed = self
                .parse_entry(currency_code, entry, price)
                .and_then(|rate| table.insert(rate));

            if let Err(e) = parsed {
                warn!(
                    "problem fetching {} exchange rate from {}: {}",
                    currency_code, self.id, e
                );
            }
        }

        Ok(table)
    }

    fn parse_entry(
        &self,
        currency_code: &str,
        entry: &Value,
        price: &CoinPrice,
    ) -> Result<ExchangeRate, MarketDataError> {
        let unparseable = || MarketDataError::FieldUnparseable {
            currency_code: currency_code.to_string(),
            source_id: self.id.to_string(),
        };

        let fields: &Map<String, Value> = entry.as_object().ok_or_else(unparseable)?;

        // First field that parses wins; lower priorities are never consulted.
        let reference_price = self
            .fields
            .iter()
            .find_map(|field| fields.get(field).and_then(decimal_from_value))
            .ok_or_else(unparseable)?;

        let fiat_value = reference_price.checked_mul(price.value()).ok_or_else(|| {
            MarketDataError::NonPositiveRate {
                currency_code: currency_code.to_string(),
                message: format!("{} x {} overflows", reference_price, price.value()),
            }
        })?;

        ExchangeRate::from_decimal(currency_code, fiat_value, self.id.to_string())
    }
}

/// Converts a coin price into a full rate table using a primary fiat source and
/// a fallback.
pub struct FiatRateFetcher {
    transport: Arc<dyn HttpTransport>,
    primary: FiatSource,
    fallback: FiatSource,
    timeout: Duration,
}

impl FiatRateFetcher {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        primary: FiatSource,
        fallback: FiatSource,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            primary,
            fallback,
            timeout,
        }
    }

    /// Fetch the table from the primary source, or from the fallback if the
    /// primary cannot be reached or answers with something unreadable.
    ///
    /// A source that answers with no usable currency still counts as a
    /// success; the returned table is then empty.
    pub async fn fetch_rates(&self, price: &CoinPrice) -> Result<RateTable, MarketDataError> {
        let mut last_error: Option<MarketDataError> = None;

        for source in [&self.primary, &self.fallback] {
            match self.fetch_from(source, price).await {
                Ok(table) => return Ok(table),
                Err(e) => {
                    if e.retry_class() == RetryClass::Never {
                        return Err(e);
                    }
                    warn!("problem fetching exchange rates from {}: {}", source.url, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(MarketDataError::AllSourcesFailed))
    }

    async fn fetch_from(
        &self,
        source: &FiatSource,
        price: &CoinPrice,
    ) -> Result<RateTable, MarketDataError> {
        let start = Instant::now();
        debug!("Requesting fiat rates from '{}'", source.id);

        let body = self
            .transport
            .get_text(&source.id, &source.url, self.timeout)
            .await?;
        let table = source.parse_rates(&body, price)?;

        info!(
            "fetched exchange rates from {}, {} chars, {} currencies, took {} ms",
            source.url,
            body.len(),
            table.len(),
            start.elapsed().as_millis()
        );

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::MockTransport;
    use rust_decimal_macros::dec;
    use std::borrow::Cow;

    const PRIMARY_URL: &str = "https://average.test/custom/abw";
    const FALLBACK_URL: &str = "https://ticker.test/ticker";

    fn primary() -> FiatSource {
        FiatSource::new(Cow::Borrowed("BitcoinAverage.com"), PRIMARY_URL, &["24h_avg", "last"])
    }

    fn fallback() -> FiatSource {
        FiatSource::new(Cow::Borrowed("blockchain.info"), FALLBACK_URL, &["15m"])
    }

    fn price(value: rust_decimal::Decimal) -> CoinPrice {
        CoinPrice::new(value, Cow::Borrowed("POLONIEX")).unwrap()
    }

    fn parse(body: &str, coin_price: rust_decimal::Decimal) -> RateTable {
        primary().parse_rates(body, &price(coin_price)).unwrap()
    }

    #[test]
    fn test_multiplies_field_by_coin_price() {
        let table = parse(r#"{"USD": {"last": "100"}}"#, dec!(5));

        let usd = table.get("USD").unwrap();
        assert_eq!(usd.fiat_value(), dec!(500));
        assert_eq!(usd.source, "BitcoinAverage.com");
    }

    #[test]
    fn test_skips_timestamp_key() {
        let table = parse(
            r#"{"timestamp": {"last": "1"}, "EUR": {"last": "2"}}"#,
            dec!(1),
        );
        assert_eq!(table.codes().collect::<Vec<_>>(), vec!["EUR"]);
    }

    #[test]
    fn test_prefers_fields_in_order() {
        let table = parse(
            r#"{"USD": {"24h_avg": "10", "last": "20"}, "EUR": {"last": "30"}}"#,
            dec!(1),
        );
        assert_eq!(table.get("USD").unwrap().fiat_value(), dec!(10));
        assert_eq!(table.get("EUR").unwrap().fiat_value(), dec!(30));
    }

    #[test]
    fn test_unparseable_field_falls_to_next_priority() {
        let table = parse(r#"{"USD": {"24h_avg": "n/a", "last": "20"}}"#, dec!(1));
        assert_eq!(table.get("USD").unwrap().fiat_value(), dec!(20));
    }

    #[test]
    fn test_first_parsed_field_is_final_even_if_not_positive() {
        let table = parse(r#"{"USD": {"24h_avg": "0", "last": "20"}}"#, dec!(1));
        assert!(table.get("USD").is_none());
    }

    #[test]
    fn test_skips_bad_currencies_and_keeps_the_rest() {
        let table = parse(
            r#"{
                "USD": {"last": "100"},
                "EUR": {"volume": "3"},
                "GBP": {"last": "-4"},
                "JPY": "not an object",
                "CHF": {"last": "0.00001"}
            }"#,
            dec!(1),
        );
        assert_eq!(table.codes().collect::<Vec<_>>(), vec!["USD"]);
        assert!(table.iter().all(|rate| rate.fiat_amount > 0));
    }

    #[test]
    fn test_accepts_any_currency_key() {
        let table = parse(
            r#"{
                "USD": {"last": "100"},
                "USD_ALT": {"last": "1"},
                "XAU-OZ": {"last": "2"},
                "LONGCODE9": {"last": "3"},
                "btc": {"last": "4"}
            }"#,
            dec!(1),
        );
        assert_eq!(
            table.codes().collect::<Vec<_>>(),
            vec!["LONGCODE9", "USD", "USD_ALT", "XAU-OZ", "btc"]
        );
        assert_eq!(table.get("XAU-OZ").unwrap().fiat_value(), dec!(2));
    }

    #[test]
    fn test_no_usable_currency_yields_empty_table() {
        let table = parse(r#"{"USD": {}, "timestamp": "now"}"#, dec!(1));
        assert!(table.is_empty());
    }

    #[test]
    fn test_non_object_body_is_invalid() {
        let err = primary().parse_rates("[1, 2]", &price(dec!(1))).unwrap_err();
        assert!(matches!(err, MarketDataError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_uses_primary_when_available() {
        let transport = Arc::new(
            MockTransport::new()
                .with_body(PRIMARY_URL, r#"{"USD": {"last": "100"}}"#)
                .with_body(FALLBACK_URL, r#"{"USD": {"15m": 1}}"#),
        );
        let fetcher = FiatRateFetcher::new(transport.clone(), primary(), fallback(), Duration::from_secs(15));

        let table = fetcher.fetch_rates(&price(dec!(5))).await.unwrap();
        assert_eq!(table.get("USD").unwrap().fiat_value(), dec!(500));
        assert_eq!(transport.calls_to(FALLBACK_URL), 0);
        assert_eq!(transport.last_timeout(), Some(Duration::from_secs(15)));
    }

    #[tokio::test]
    async fn test_falls_back_when_primary_unreachable() {
        let transport = Arc::new(
            MockTransport::new()
                .with_error(
                    PRIMARY_URL,
                    MarketDataError::HttpStatus {
                        source_id: "BitcoinAverage.com".to_string(),
                        status: 503,
                    },
                )
                .with_body(FALLBACK_URL, r#"{"USD": {"15m": 400, "last": 1}, "EUR": {"15m": "350.5"}}"#),
        );
        let fetcher = FiatRateFetcher::new(transport, primary(), fallback(), Duration::from_secs(15));

        let table = fetcher.fetch_rates(&price(dec!(0.01))).await.unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("USD").unwrap().fiat_value(), dec!(4));
        assert_eq!(table.get("EUR").unwrap().fiat_value(), dec!(3.505));
        assert!(table.iter().all(|rate| rate.source == "blockchain.info"));
    }

    #[tokio::test]
    async fn test_falls_back_when_primary_body_unreadable() {
        let transport = Arc::new(
            MockTransport::new()
                .with_body(PRIMARY_URL, "<html>maintenance</html>")
                .with_body(FALLBACK_URL, r#"{"USD": {"15m": 1}}"#),
        );
        let fetcher = FiatRateFetcher::new(transport, primary(), fallback(), Duration::from_secs(15));

        let table = fetcher.fetch_rates(&price(dec!(1))).await.unwrap();
        assert_eq!(table.get("USD").unwrap().source, "blockchain.info");
    }

    #[tokio::test]
    async fn test_both_sources_down() {
        let transport = Arc::new(MockTransport::new());
        let fetcher = FiatRateFetcher::new(transport.clone(), primary(), fallback(), Duration::from_secs(15));

        assert!(fetcher.fetch_rates(&price(dec!(1))).await.is_err());
        assert_eq!(transport.total_calls(), 2);
    }
}
