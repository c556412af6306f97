use capsule_config::Config;
use capsule_core::Verbosity;
use uuid::Uuid;

use crate::store::Store;
use crate::tokens::TokenIssuer;

/// Shared request-handling state
///
/// Cheap to clone; the store and token key are behind `Arc`s. The
/// verbosity flag is resolved once here and copied per request, never
/// mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub tokens: TokenIssuer,
    pub verbosity: Verbosity,
}

impl AppState {
    /// Build state from validated configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            store: Store::default(),
            tokens: TokenIssuer::new(&config.auth.token_secret, config.auth.token_ttl_seconds),
            verbosity: Verbosity::from_environment(&config.server.environment),
        }
    }
}

/// Authenticated caller, inserted by the auth middleware
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: Uuid,
}
