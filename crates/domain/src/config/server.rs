use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

use super::errors::ConfigError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_web_port")]
    pub web_port: u16,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl ServerConfig {
    /// Socket address of the metrics listener. Accepts IPv4 and bare IPv6
    /// bind addresses.
    pub fn listen_address(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.bind_address.trim().parse().map_err(|_| {
            ConfigError::Validation(format!(
                "Bind address '{}' is not an IP address",
                self.bind_address
            ))
        })?;
        Ok(SocketAddr::new(ip, self.web_port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            web_port: default_web_port(),
            bind_address: default_bind_address(),
        }
    }
}

fn default_web_port() -> u16 {
    9798
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
