use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection settings for the OPNsense Unbound statistics API.
#[derive(Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Absolute request path, including the top-N size segment.
    #[serde(default = "default_stats_path")]
    pub stats_path: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub api_secret: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Accept self-signed or otherwise unverifiable certificates.
    ///
    /// Firewall appliances usually ship a self-signed certificate for their
    /// management API, so verification is off unless explicitly enabled.
    /// This trusts whatever answers on `host:port`.
    #[serde(default = "default_true")]
    pub insecure_skip_verify: bool,

    /// `false` switches the URL scheme to plain `http`.
    #[serde(default = "default_true")]
    pub tls: bool,
}

impl UpstreamConfig {
    pub fn stats_url(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{}://{}:{}{}", scheme, self.host, self.port, self.stats_path)
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_secret.trim().is_empty()
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("stats_path", &self.stats_path)
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field("tls", &self.tls)
            .finish()
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            stats_path: default_stats_path(),
            api_key: String::new(),
            api_secret: String::new(),
            timeout_secs: default_timeout_secs(),
            insecure_skip_verify: true,
            tls: true,
        }
    }
}

fn default_host() -> String {
    "192.168.1.1".to_string()
}

fn default_port() -> u16 {
    443
}

fn default_stats_path() -> String {
    "/api/unbound/overview/totals/100".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}
