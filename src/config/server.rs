//! Listener settings for the gateway's HTTP surface

use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound for the whole-request timeout.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Where the gateway listens and how long a request may take end to end.
///
/// `PAYMENTS__SERVER__HOST` must be an IP literal; hostnames are not resolved.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,

    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    pub log_level: String,

    /// Covers checkout calls to the processor, so keep it above the
    /// processor timeout
    pub request_timeout_secs: u64,
}

/// Deployment tier; production switches logs to JSON.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: Environment::default(),
            log_level: "info,payments_gateway=debug,tower_http=info".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Address the listener binds to.
    ///
    /// # Errors
    ///
    /// `InvalidBindAddress` when `host:port` is not an IP socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|_| ValidationError::InvalidBindAddress(raw))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        self.socket_addr().map(|_| ())
    }
}
