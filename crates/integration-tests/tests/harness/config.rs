//! Programmatic configuration for test servers

use capsule_config::{AuthConfig, Config, HealthConfig, LoggingConfig, RateLimitConfig, RequestRateLimit, ServerConfig};
use secrecy::SecretString;

pub struct ConfigBuilder {
    environment: String,
    rate_limit: Option<RateLimitConfig>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            environment: "test".to_string(),
            rate_limit: None,
        }
    }

    /// Set the deployment environment name
    pub fn environment(mut self, environment: &str) -> Self {
        self.environment = environment.to_string();
        self
    }

    /// Add a per-client-IP request limit
    pub fn with_per_ip_limit(mut self, requests: u32, window: &str) -> Self {
        let rate_limit = self.rate_limit.get_or_insert(RateLimitConfig {
            global: None,
            per_ip: None,
        });
        rate_limit.per_ip = Some(RequestRateLimit {
            requests,
            window: window.to_string(),
        });
        self
    }

    /// Add a global request limit
    pub fn with_global_limit(mut self, requests: u32, window: &str) -> Self {
        let rate_limit = self.rate_limit.get_or_insert(RateLimitConfig {
            global: None,
            per_ip: None,
        });
        rate_limit.global = Some(RequestRateLimit {
            requests,
            window: window.to_string(),
        });
        self
    }

    pub fn build(self) -> Config {
        Config {
            server: ServerConfig {
                listen_address: None,
                environment: self.environment,
                health: HealthConfig::default(),
                rate_limit: self.rate_limit,
            },
            auth: AuthConfig {
                token_secret: SecretString::from("integration-test-secret"),
                token_ttl_seconds: 3600,
            },
            logging: LoggingConfig::default(),
        }
    }
}
