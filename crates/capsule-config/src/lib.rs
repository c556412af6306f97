#![allow(clippy::must_use_candidate)]

pub mod auth;
mod env;
pub mod health;
mod loader;
pub mod logging;
pub mod rate_limit;
pub mod server;

use serde::Deserialize;

pub use auth::AuthConfig;
pub use health::HealthConfig;
pub use logging::LoggingConfig;
pub use rate_limit::{RateLimitConfig, RequestRateLimit};
pub use server::ServerConfig;

/// Top-level capsule configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Token issuance and verification
    pub auth: AuthConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}
