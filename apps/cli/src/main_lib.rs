use std::sync::Arc;

use crate::config::Config;
use ratefeed_core::currency::{EnvLocaleCurrency, StaticCurrencySymbols};
use ratefeed_core::{ExchangeRatesOptions, ExchangeRatesService, RefreshPolicy};
use ratefeed_market_data::{ExchangeRate, RatePipeline, TransportConfig};
use ratefeed_storage_sqlite::{db, settings::RateSettingsRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub rates_service: Arc<ExchangeRatesService>,
}

pub fn init_tracing() {
    let log_format = std::env::var("RATEFEED_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout carries only rates
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.data_dir)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());
    let settings_repo = Arc::new(RateSettingsRepository::new(pool.clone(), writer));

    let transport = TransportConfig {
        timeout: config.http_timeout,
        ..TransportConfig::default()
    };
    let source = Arc::new(RatePipeline::for_market(&config.market, transport));

    let rates_service = Arc::new(ExchangeRatesService::new(
        source,
        settings_repo,
        Arc::new(StaticCurrencySymbols),
        Arc::new(EnvLocaleCurrency),
        ExchangeRatesOptions {
            refresh: RefreshPolicy::new(config.refresh_interval),
            ..ExchangeRatesOptions::default()
        },
    ));

    Ok(Arc::new(AppState { rates_service }))
}

/// One output line: code, symbol, fiat value and source.
pub fn format_rate(rate: &ExchangeRate, symbol: Option<&str>) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        rate.currency_code,
        symbol.unwrap_or("-"),
        rate.fiat_value(),
        rate.source
    )
}
