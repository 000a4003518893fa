//! HTTPS client for the OPNsense Unbound overview API.
//!
//! One authenticated GET per call:
//! ```text
//! GET /api/unbound/overview/totals/100 HTTP/1.1
//! Authorization: Basic base64(key:secret)
//! Accept: application/json
//! ```
//!
//! Certificate verification follows `UpstreamConfig::insecure_skip_verify`.
//! Appliances usually present a self-signed certificate, so the default
//! trusts whatever answers on the configured address.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use unbound_exporter_application::ports::StatsFetcher;
use unbound_exporter_domain::config::UpstreamConfig;
use unbound_exporter_domain::{FetchError, StatsSnapshot};

const USER_AGENT: &str = concat!("unbound-exporter/", env!("CARGO_PKG_VERSION"));

pub struct OpnsenseStatsFetcher {
    client: reqwest::Client,
    url: String,
    api_key: String,
    api_secret: String,
    timeout: Duration,
}

impl OpnsenseStatsFetcher {
    /// Fails only when the HTTP client cannot be built.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .build()?;

        let url = config.stats_url();
        if config.insecure_skip_verify && config.tls {
            warn!(url = %url, "TLS certificate verification is disabled for the upstream API");
        }

        Ok(Self {
            client,
            url,
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request(&self) -> Result<StatsSnapshot, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.network_error(&e))?;

        if let Some(err) = classify_status(response.status()) {
            return Err(err);
        }

        let body = response.bytes().await.map_err(|e| self.network_error(&e))?;
        debug!(url = %self.url, body_len = body.len(), "Upstream response received");

        StatsSnapshot::from_slice(&body)
    }

    fn network_error(&self, e: &reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Network(format!(
                "request to {} timed out after {}s",
                self.url,
                self.timeout.as_secs()
            ))
        } else if e.is_connect() {
            FetchError::Network(format!("cannot connect to {}: {}", self.url, e))
        } else {
            FetchError::Network(format!("request to {} failed: {}", self.url, e))
        }
    }
}

#[async_trait]
impl StatsFetcher for OpnsenseStatsFetcher {
    async fn fetch(&self) -> Result<StatsSnapshot, FetchError> {
        let started = Instant::now();
        let result = self.request().await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(snapshot) => info!(
                total_queries = snapshot.total().unwrap_or_default(),
                elapsed_ms,
                "Fetched Unbound statistics"
            ),
            Err(FetchError::Http { status }) => error!(
                status = *status,
                url = %self.url,
                elapsed_ms,
                "Upstream returned an error status"
            ),
            Err(e) => error!(kind = e.kind(), error = %e, elapsed_ms, "Failed to fetch Unbound statistics"),
        }

        result
    }
}

fn classify_status(status: StatusCode) -> Option<FetchError> {
    if status == StatusCode::UNAUTHORIZED {
        Some(FetchError::Auth)
    } else if !status.is_success() {
        Some(FetchError::Http {
            status: status.as_u16(),
        })
    } else {
        None
    }
}
