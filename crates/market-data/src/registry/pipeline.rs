//! Rate pipeline: oracle chain followed by the fiat price lists.
//!
//! The pipeline is the production [`RateSource`]. One refresh computes the coin
//! price once and feeds it to the fiat step:
//!
//! ```text
//! OracleClient ──(CoinPrice)──> FiatRateFetcher ──> RateTable
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};

use crate::errors::MarketDataError;
use crate::models::RateTable;
use crate::provider::defaults::{bitcoin_average, blockchain_info, default_oracles};
use crate::provider::{
    CoinMarket, FiatRateFetcher, FiatSource, HttpTransport, OracleClient, OracleDescriptor,
    RateSource, ReqwestTransport, TransportConfig,
};

/// Oracle requests may take this many times the base timeout.
pub const ORACLE_TIMEOUT_FACTOR: u32 = 2;

/// Composes the oracle chain and the fiat fetcher into a [`RateSource`].
pub struct RatePipeline {
    oracles: OracleClient,
    fiat: FiatRateFetcher,
}

impl RatePipeline {
    pub fn new(oracles: OracleClient, fiat: FiatRateFetcher) -> Self {
        Self { oracles, fiat }
    }

    /// Build the default pipeline for a coin over a reqwest transport.
    pub fn for_market(market: &CoinMarket, config: TransportConfig) -> Self {
        let timeout = config.timeout;
        PipelineBuilder::new(Arc::new(ReqwestTransport::new(config)))
            .base_timeout(timeout)
            .oracles(default_oracles(market))
            .build()
    }

    pub fn oracle_client(&self) -> &OracleClient {
        &self.oracles
    }
}

#[async_trait]
impl RateSource for RatePipeline {
    async fn fetch_rate_table(&self) -> Result<RateTable, MarketDataError> {
        let price = self.oracles.fetch_coin_price().await?;
        debug!("Converting coin price {} from '{}'", price.value(), price.source());

        let table = self.fiat.fetch_rates(&price).await?;
        info!(
            "Rate pipeline produced {} rates (coin price {} from '{}')",
            table.len(),
            price.value(),
            price.source()
        );
        Ok(table)
    }
}

/// Builder for [`RatePipeline`] with the built-in sources as defaults.
pub struct PipelineBuilder {
    transport: Arc<dyn HttpTransport>,
    base_timeout: Duration,
    oracles: Vec<OracleDescriptor>,
    primary: FiatSource,
    fallback: FiatSource,
}

impl PipelineBuilder {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_timeout: crate::provider::DEFAULT_HTTP_TIMEOUT,
            oracles: default_oracles(&CoinMarket::default()),
            primary: bitcoin_average(),
            fallback: blockchain_info(),
        }
    }

    /// Fiat requests use this timeout; oracle requests use
    /// [`ORACLE_TIMEOUT_FACTOR`] times it.
    pub fn base_timeout(mut self, timeout: Duration) -> Self {
        self.base_timeout = timeout;
        self
    }

    pub fn oracles(mut self, oracles: Vec<OracleDescriptor>) -> Self {
        self.oracles = oracles;
        self
    }

    pub fn fiat_sources(mut self, primary: FiatSource, fallback: FiatSource) -> Self {
        self.primary = primary;
        self.fallback = fallback;
        self
    }

    pub fn build(self) -> RatePipeline {
        let oracle_timeout = self.base_timeout.saturating_mul(ORACLE_TIMEOUT_FACTOR);
        RatePipeline {
            oracles: OracleClient::new(self.transport.clone(), self.oracles, oracle_timeout),
            fiat: FiatRateFetcher::new(
                self.transport,
                self.primary,
                self.fallback,
                self.base_timeout,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::MockTransport;
    use rust_decimal_macros::dec;
    use std::borrow::Cow;

    const ORACLE_URL: &str = "https://oracle.test/trades";
    const PRIMARY_URL: &str = "https://primary.test/abw";
    const FALLBACK_URL: &str = "https://fallback.test/ticker";

    fn builder(transport: Arc<MockTransport>) -> PipelineBuilder {
        PipelineBuilder::new(transport)
            .base_timeout(Duration::from_secs(10))
            .oracles(vec![OracleDescriptor::trade_list(
                Cow::Borrowed("ORACLE"),
                ORACLE_URL,
                "",
                "total",
                "amount",
            )])
            .fiat_sources(
                FiatSource::new(Cow::Borrowed("primary"), PRIMARY_URL, &["24h_avg", "last"]),
                FiatSource::new(Cow::Borrowed("fallback"), FALLBACK_URL, &["15m"]),
            )
    }

    #[tokio::test]
    async fn test_trade_scalar_times_fiat_price() {
        let transport = Arc::new(
            MockTransport::new()
                .with_body(ORACLE_URL, r#"[{"total": 10, "amount": 2}]"#)
                .with_body(PRIMARY_URL, r#"{"USD": {"last": "100"}}"#),
        );
        let pipeline = builder(transport.clone()).build();

        let table = pipeline.fetch_rate_table().await.unwrap();
        let usd = table.get("USD").unwrap();
        assert_eq!(usd.fiat_value(), dec!(500));
        assert_eq!(usd.source, "primary");
        assert_eq!(transport.calls_to(ORACLE_URL), 1);
    }

    #[tokio::test]
    async fn test_oracle_failure_skips_fiat_step() {
        let transport = Arc::new(MockTransport::new().with_body(PRIMARY_URL, r#"{"USD": {"last": "1"}}"#));
        let pipeline = builder(transport.clone()).build();

        assert!(pipeline.fetch_rate_table().await.is_err());
        assert_eq!(transport.calls_to(PRIMARY_URL), 0);
    }

    #[tokio::test]
    async fn test_oracle_gets_double_timeout() {
        let transport = Arc::new(
            MockTransport::new().with_body(ORACLE_URL, r#"[{"total": 1, "amount": 1}]"#),
        );
        let pipeline = builder(transport.clone()).build();
        assert_eq!(pipeline.oracle_client().timeout(), Duration::from_secs(20));

        // Oracle succeeds, both fiat sources are unreachable
        assert!(pipeline.fetch_rate_table().await.is_err());
        assert_eq!(transport.total_calls(), 3);
        assert_eq!(transport.last_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_default_builder_uses_builtin_sources() {
        let pipeline = PipelineBuilder::new(Arc::new(MockTransport::new())).build();
        let ids: Vec<_> = pipeline
            .oracle_client()
            .oracles()
            .iter()
            .map(|o| o.id.to_string())
            .collect();
        assert_eq!(ids, vec!["Poloniex", "BTER"]);
    }
}
