//! reqwest-backed [`HttpTransport`].

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{header, redirect, Client};

use super::traits::HttpTransport;
use crate::errors::MarketDataError;

/// Default base timeout for price source requests.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client settings shared by every price source.
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Client identifier sent as `User-Agent`.
    pub user_agent: String,
    /// Maximum time to establish a connection.
    pub connect_timeout: Duration,
    /// Base request timeout. Oracle requests use twice this value.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("ratefeed/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout: DEFAULT_HTTP_TIMEOUT,
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

/// [`HttpTransport`] over a shared reqwest client.
///
/// Redirects are not followed and gzip bodies are decoded transparently
/// (the client advertises `Accept-Encoding: gzip`).
pub struct ReqwestTransport {
    client: Client,
    config: TransportConfig,
}

impl ReqwestTransport {
    pub fn new(config: TransportConfig) -> Self {
        let client = build_client(&config).unwrap_or_else(|e| {
            warn!(
                "Falling back to a default HTTP client without user agent, connect timeout or redirect policy: {}",
                e
            );
            Client::new()
        });

        Self { client, config }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

fn build_client(config: &TransportConfig) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(config.connect_timeout)
        .read_timeout(config.timeout)
        .redirect(redirect::Policy::none())
        .gzip(true)
        .build()
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_text(
        &self,
        source_id: &str,
        url: &str,
        timeout: Duration,
    ) -> Result<String, MarketDataError> {
        debug!("GET {} for '{}' (timeout {:?})", url, source_id, timeout);

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| MarketDataError::from_transport(source_id, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketDataError::HttpStatus {
                source_id: source_id.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| MarketDataError::from_transport(source_id, e))
    }
}
