//! End-to-end refresh tests: oracle chain, fiat lists, scheduler, cache and queries.
//!
//! The network is replaced by a scripted [`HttpTransport`]; everything else is
//! the production wiring.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ratefeed_core::currency::{FixedLocaleCurrency, StaticCurrencySymbols};
use ratefeed_core::{
    Error, ExchangeRatesOptions, ExchangeRatesService, ExchangeRatesServiceTrait,
    InMemoryRateSettings, RateSettingsRepositoryTrait, RefreshPolicy,
};
use ratefeed_market_data::{
    ExchangeRate, FiatSource, HttpTransport, MarketDataError, OracleDescriptor, PipelineBuilder,
    SuccessFlag,
};
use rust_decimal_macros::dec;

const TRADES_URL: &str = "https://oracle-a.test/trades";
const TICKER_URL: &str = "https://oracle-b.test/ticker";
const PRIMARY_URL: &str = "https://fiat-a.test/abw";
const FALLBACK_URL: &str = "https://fiat-b.test/ticker";

// =============================================================================
// Scripted network
// =============================================================================

#[derive(Clone)]
enum Reply {
    Body(&'static str),
    Timeout,
    Status(u16),
}

#[derive(Default)]
struct ScriptedNetwork {
    replies: Mutex<HashMap<&'static str, Reply>>,
    call_count: AtomicUsize,
}

impl ScriptedNetwork {
    fn reply(&self, url: &'static str, reply: Reply) {
        self.replies.lock().unwrap().insert(url, reply);
    }

    fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for ScriptedNetwork {
    async fn get_text(
        &self,
        source_id: &str,
        url: &str,
        _timeout: Duration,
    ) -> Result<String, MarketDataError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let reply = self.replies.lock().unwrap().get(url).cloned();
        match reply {
            Some(Reply::Body(body)) => Ok(body.to_string()),
            Some(Reply::Timeout) => Err(MarketDataError::Timeout {
                source_id: source_id.to_string(),
            }),
            Some(Reply::Status(status)) => Err(MarketDataError::HttpStatus {
                source_id: source_id.to_string(),
                status,
            }),
            None => Err(MarketDataError::SourceUnavailable {
                source_id: source_id.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }
}

// =============================================================================
// Wiring
// =============================================================================

struct Fixture {
    network: Arc<ScriptedNetwork>,
    settings: Arc<InMemoryRateSettings>,
}

impl Fixture {
    fn new() -> Self {
        Self::with_settings(InMemoryRateSettings::new())
    }

    fn with_settings(settings: InMemoryRateSettings) -> Self {
        Self {
            network: Arc::new(ScriptedNetwork::default()),
            settings: Arc::new(settings),
        }
    }

    fn service(&self, locale: FixedLocaleCurrency, interval: Duration) -> ExchangeRatesService {
        let pipeline = PipelineBuilder::new(self.network.clone())
            .oracles(vec![
                OracleDescriptor::trade_list("TradesOracle", TRADES_URL, "", "total", "amount"),
                OracleDescriptor::average(
                    "TickerOracle",
                    TICKER_URL,
                    "/avg",
                    Some(SuccessFlag {
                        pointer: "/result".to_string(),
                        expected: "true".to_string(),
                    }),
                ),
            ])
            .fiat_sources(
                FiatSource::new("PrimaryFiat", PRIMARY_URL, &["24h_avg", "last"]),
                FiatSource::new("FallbackFiat", FALLBACK_URL, &["15m"]),
            )
            .build();

        ExchangeRatesService::new(
            Arc::new(pipeline),
            self.settings.clone(),
            Arc::new(StaticCurrencySymbols),
            Arc::new(locale),
            ExchangeRatesOptions {
                fallback_currency: "USD".to_string(),
                refresh: RefreshPolicy::new(interval),
            },
        )
    }

    fn default_service(&self) -> ExchangeRatesService {
        self.service(FixedLocaleCurrency::new("USD"), Duration::from_secs(600))
    }
}

fn codes(rates: &[ExchangeRate]) -> Vec<&str> {
    rates.iter().map(|r| r.currency_code.as_str()).collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn trade_scalar_converts_primary_fiat_price() {
    let fixture = Fixture::new();
    fixture.network.reply(TRADES_URL, Reply::Body(r#"[{"total": 10, "amount": 2}]"#));
    fixture.network.reply(PRIMARY_URL, Reply::Body(r#"{"USD": {"last": "100"}}"#));
    let service = fixture.default_service();

    let rate = service.best_for(Some("USD"), false).await.unwrap();
    assert_eq!(rate.fiat_value(), dec!(500));
    assert_eq!(rate.fiat_amount, 5_000_000);
    assert_eq!(rate.source, "PrimaryFiat");
}

#[tokio::test]
async fn oracle_timeout_falls_through_to_next_oracle() {
    let fixture = Fixture::new();
    fixture.network.reply(TRADES_URL, Reply::Timeout);
    fixture.network.reply(TICKER_URL, Reply::Body(r#"{"result": "true", "avg": 3.0}"#));
    fixture.network.reply(PRIMARY_URL, Reply::Body(r#"{"USD": {"last": "100"}}"#));
    let service = fixture.default_service();

    let rate = service.best_for(Some("USD"), false).await.unwrap();
    assert_eq!(rate.fiat_value(), dec!(300));
}

#[tokio::test]
async fn all_oracles_failing_keeps_table_and_timestamp() {
    let fixture = Fixture::new();
    fixture.network.reply(TRADES_URL, Reply::Body(r#"[{"total": 10, "amount": 2}]"#));
    fixture.network.reply(PRIMARY_URL, Reply::Body(r#"{"USD": {"last": "100"}, "EUR": {"last": "90"}}"#));
    let service = fixture.service(FixedLocaleCurrency::new("USD"), Duration::ZERO);

    let before = service.list(false).await;
    let refreshed_at = service.last_refreshed_at();
    assert_eq!(codes(&before), vec!["EUR", "USD"]);

    fixture.network.reply(TRADES_URL, Reply::Status(502));
    fixture.network.reply(TICKER_URL, Reply::Timeout);

    let after = service.list(false).await;
    assert_eq!(after, before);
    assert_eq!(service.last_refreshed_at(), refreshed_at);
}

#[tokio::test]
async fn offline_cold_start_without_cache_is_empty() {
    let fixture = Fixture::new();
    let service = fixture.default_service();

    assert!(service.list(true).await.is_empty());
    assert!(service.best_for(Some("USD"), true).await.is_none());
    assert_eq!(fixture.network.calls(), 0);
}

#[tokio::test]
async fn offline_cold_start_serves_cached_rate() {
    let cached = ExchangeRate::new("GBP", 3_210_000, "PrimaryFiat").unwrap();
    let fixture = Fixture::with_settings(InMemoryRateSettings::with_cached_rate(cached.clone()));
    let service = fixture.default_service();

    assert_eq!(service.list(true).await, vec![cached.clone()]);
    // Neither the requested, the locale nor the fallback currency is cached.
    assert!(service.best_for(Some("XYZ"), true).await.is_none());
    assert_eq!(service.best_for(Some("GBP"), true).await, Some(cached));
    assert_eq!(fixture.network.calls(), 0);
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let fixture = Fixture::new();
    fixture.network.reply(TRADES_URL, Reply::Body(r#"[{"total": 1, "amount": 1}]"#));
    fixture.network.reply(
        PRIMARY_URL,
        Reply::Body(r#"{"USD": {"last": 1}, "EUR": {"last": 2}, "GBP": {"last": 3}}"#),
    );
    let service = fixture.default_service();

    assert_eq!(codes(&service.search("eu", false).await), vec!["EUR"]);
    assert_eq!(codes(&service.search("", true).await), vec!["EUR", "GBP", "USD"]);

    fixture.network.reply(PRIMARY_URL, Reply::Body(r#"{"USD": {"last": 1}, "GBP": {"last": 3}}"#));
    let fresh = fixture.service(FixedLocaleCurrency::new("USD"), Duration::from_secs(600));
    assert!(fresh.search("eu", false).await.is_empty());
}

#[tokio::test]
async fn best_for_unknown_code_uses_locale_currency() {
    let fixture = Fixture::new();
    fixture.network.reply(TRADES_URL, Reply::Body(r#"[{"total": 1, "amount": 1}]"#));
    fixture.network.reply(PRIMARY_URL, Reply::Body(r#"{"USD": {"last": 1}, "EUR": {"last": 2}}"#));
    let service = fixture.default_service();

    let rate = service.best_for(Some("XYZ"), false).await.unwrap();
    assert_eq!(rate.currency_code, "USD");
}

// =============================================================================
// Properties
// =============================================================================

#[tokio::test]
async fn primary_failure_uses_fallback_list() {
    let fixture = Fixture::new();
    fixture.network.reply(TRADES_URL, Reply::Body(r#"[{"total": 2, "amount": 1}]"#));
    fixture.network.reply(PRIMARY_URL, Reply::Status(503));
    fixture.network.reply(FALLBACK_URL, Reply::Body(r#"{"USD": {"15m": 250}, "timestamp": 1}"#));
    let service = fixture.default_service();

    let rates = service.list(false).await;
    assert_eq!(codes(&rates), vec!["USD"]);
    assert_eq!(rates[0].fiat_value(), dec!(500));
    assert_eq!(rates[0].source, "FallbackFiat");
}

#[tokio::test]
async fn refresh_inside_interval_fetches_once() {
    let fixture = Fixture::new();
    fixture.network.reply(TRADES_URL, Reply::Body(r#"[{"total": 1, "amount": 1}]"#));
    fixture.network.reply(PRIMARY_URL, Reply::Body(r#"{"USD": {"last": 1}}"#));
    let service = fixture.default_service();

    service.list(false).await;
    let calls = fixture.network.calls();
    service.search("us", false).await;
    service.best_for(None, false).await;

    assert_eq!(calls, 2);
    assert_eq!(fixture.network.calls(), calls);
}

#[tokio::test]
async fn successful_refresh_replaces_previous_table() {
    let fixture = Fixture::new();
    fixture.network.reply(TRADES_URL, Reply::Body(r#"[{"total": 1, "amount": 1}]"#));
    fixture.network.reply(PRIMARY_URL, Reply::Body(r#"{"USD": {"last": 1}, "EUR": {"last": 2}}"#));
    let service = fixture.service(FixedLocaleCurrency::new("USD"), Duration::ZERO);
    service.list(false).await;

    fixture.network.reply(PRIMARY_URL, Reply::Body(r#"{"JPY": {"last": 3}}"#));
    assert_eq!(codes(&service.list(false).await), vec!["JPY"]);
}

#[tokio::test]
async fn cached_rate_survives_restart() {
    let fixture = Fixture::with_settings(InMemoryRateSettings::with_exchange_currency("EUR"));
    fixture.network.reply(TRADES_URL, Reply::Body(r#"[{"total": 1, "amount": 4}]"#));
    fixture.network.reply(PRIMARY_URL, Reply::Body(r#"{"USD": {"last": 400}, "EUR": {"last": "360.5"}}"#));

    let first = fixture.default_service();
    first.list(false).await;

    let cached = fixture.settings.get_cached_rate().unwrap().unwrap();
    assert_eq!(cached.currency_code, "EUR");
    assert_eq!(cached.fiat_value(), dec!(90.125));
    assert_eq!(cached.source, "PrimaryFiat");

    // New process over the same store, no network.
    let restarted = fixture.default_service();
    assert_eq!(restarted.list(true).await, vec![cached]);
}

#[tokio::test]
async fn concurrent_queries_share_one_refresh() {
    let fixture = Fixture::new();
    fixture.network.reply(TRADES_URL, Reply::Body(r#"[{"total": 1, "amount": 1}]"#));
    fixture.network.reply(PRIMARY_URL, Reply::Body(r#"{"USD": {"last": 1}}"#));
    let service = Arc::new(fixture.default_service());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.list(false).await })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap().len(), 1);
    }

    assert_eq!(fixture.network.calls(), 2);
}

#[tokio::test]
async fn table_writes_are_rejected() {
    let fixture = Fixture::new();
    let service = fixture.default_service();
    let rate = ExchangeRate::new("USD", 1, "manual").unwrap();

    assert!(matches!(
        service.insert_rate(rate),
        Err(Error::UnsupportedOperation(_))
    ));
    assert!(service.list(true).await.is_empty());
}
