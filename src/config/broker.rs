//! Message broker configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Message broker configuration (Redis pub/sub)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrokerConfig {
    /// Broker addresses, tried in order at startup
    #[serde(default)]
    pub servers: Vec<String>,
}

impl BrokerConfig {
    /// Validate broker configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.servers.is_empty() {
            return Err(ValidationError::MissingRequired("BROKER_SERVERS"));
        }
        for server in &self.servers {
            if !server.starts_with("redis://") && !server.starts_with("rediss://") {
                return Err(ValidationError::InvalidRedisUrl(server.clone()));
            }
        }
        Ok(())
    }
}
