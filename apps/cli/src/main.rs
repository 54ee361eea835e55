mod args;
mod config;
mod main_lib;

use args::{Cli, Command};
use clap::Parser;
use config::Config;
use main_lib::{build_state, format_rate, init_tracing};
use ratefeed_core::ExchangeRatesServiceTrait;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }
    init_tracing();
    let state = build_state(&config).await?;
    let service = &state.rates_service;

    if let Some(code) = cli.set_currency.as_deref() {
        service.set_exchange_currency_code(code).await?;
        tracing::info!("Exchange currency set to {}", code.to_ascii_uppercase());
    }

    let rates = match cli.command {
        Some(Command::List) | None => service.list(cli.offline).await,
        Some(Command::Search { text }) => service.search(&text, cli.offline).await,
        Some(Command::Best { code }) => service
            .best_for(code.as_deref(), cli.offline)
            .await
            .into_iter()
            .collect(),
    };

    for rate in &rates {
        let symbol = service.currency_symbol(&rate.currency_code);
        println!("{}", format_rate(rate, symbol.as_deref()));
    }

    match service.last_refreshed_at() {
        Some(at) => tracing::debug!("Rates refreshed at {}", at),
        None if rates.is_empty() => tracing::warn!("No exchange rates available"),
        None => tracing::debug!("Rates served from cache"),
    }
    Ok(())
}
