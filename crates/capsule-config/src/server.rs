use std::net::SocketAddr;

use serde::Deserialize;

use crate::{health::HealthConfig, rate_limit::RateLimitConfig};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_address: Option<SocketAddr>,
    /// Deployment environment name; `development` and `staging` enable
    /// verbose error detail, everything else is terse
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: None,
            environment: default_environment(),
            health: HealthConfig::default(),
            rate_limit: None,
        }
    }
}

fn default_environment() -> String {
    "production".to_string()
}
