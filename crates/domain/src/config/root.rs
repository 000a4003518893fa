use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::{LogFormat, LoggingConfig};
use super::polling::PollingConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;

const LOCAL_CONFIG_PATH: &str = "unbound-exporter.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/unbound-exporter/config.toml";

/// Main configuration structure for the exporter
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Statistics API the exporter polls
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Exposition listener (bind address, port)
    #[serde(default)]
    pub server: ServerConfig,

    /// Poll schedule
    #[serde(default)]
    pub polling: PollingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. unbound-exporter.toml in current directory
    /// 3. /etc/unbound-exporter/config.toml
    /// 4. Default configuration
    ///
    /// Command-line and environment overrides are applied on top.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(host) = overrides.host {
            self.upstream.host = host;
        }
        if let Some(port) = overrides.port {
            self.upstream.port = port;
        }
        if let Some(path) = overrides.stats_path {
            self.upstream.stats_path = path;
        }
        if let Some(key) = overrides.api_key {
            self.upstream.api_key = key;
        }
        if let Some(secret) = overrides.api_secret {
            self.upstream.api_secret = secret;
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.upstream.timeout_secs = timeout;
        }
        if overrides.verify_tls {
            self.upstream.insecure_skip_verify = false;
        }
        if let Some(interval) = overrides.interval_secs {
            self.polling.interval_secs = interval;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(port) = overrides.web_port {
            self.server.web_port = port;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.debug {
            self.logging.level = "debug".to_string();
        }
        if let Some(file) = overrides.log_file {
            self.logging.file = Some(file);
        }
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }
    }

    /// Validate configuration
    ///
    /// Missing credentials are rejected here so the exporter never starts
    /// polling unauthenticated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.upstream.has_credentials() {
            return Err(ConfigError::Validation(
                "API key and API secret are required".to_string(),
            ));
        }

        if self.upstream.host.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Upstream host cannot be empty".to_string(),
            ));
        }

        if self.upstream.port == 0 {
            return Err(ConfigError::Validation(
                "Upstream port cannot be 0".to_string(),
            ));
        }

        if !self.upstream.stats_path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "Stats path '{}' must start with '/'",
                self.upstream.stats_path
            )));
        }

        if self.upstream.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "Request timeout cannot be 0".to_string(),
            ));
        }

        if self.polling.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "Poll interval cannot be 0".to_string(),
            ));
        }

        if self.server.web_port == 0 {
            return Err(ConfigError::Validation("Web port cannot be 0".to_string()));
        }

        self.server.listen_address()?;

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub stats_path: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub timeout_secs: Option<u64>,
    pub verify_tls: bool,
    pub interval_secs: Option<u64>,
    pub bind_address: Option<String>,
    pub web_port: Option<u16>,
    pub debug: bool,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
    pub log_format: Option<LogFormat>,
}
