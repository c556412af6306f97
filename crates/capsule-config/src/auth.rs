use secrecy::SecretString;
use serde::Deserialize;

/// Token issuance and verification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HMAC secret for signing access tokens
    pub token_secret: SecretString,

    /// Token lifetime in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,
}

fn default_token_ttl() -> u64 {
    86_400
}
