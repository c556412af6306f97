use serde::Deserialize;

/// Rate limiting configuration
///
/// In-memory only; limits reset on restart and apply per instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Global rate limit (all requests)
    #[serde(default)]
    pub global: Option<RequestRateLimit>,
    /// Per-client-IP rate limit
    #[serde(default)]
    pub per_ip: Option<RequestRateLimit>,
}

/// Request-based rate limit
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestRateLimit {
    /// Maximum requests per window
    pub requests: u32,
    /// Window duration (e.g. "1m", "1h")
    pub window: String,
}
