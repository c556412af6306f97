//! HTTP layer for capsule
//!
//! Assembles the axum router, the middleware stack (tracing, rate
//! limiting, token auth, routing fallbacks), and the demo resource
//! handlers. Every response leaving this crate is a `capsule-core`
//! envelope.

#![allow(clippy::must_use_candidate)]

mod auth;
mod fallback;
mod handlers;
mod health;
mod password;
mod rate_limit;
mod reply;
mod state;
mod store;
mod tokens;
mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use capsule_config::Config;
use tower_http::trace::TraceLayer;

pub use reply::ApiReply;
pub use state::{AppState, CurrentUser};
pub use store::{Post, Store, User};

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if rate-limiter construction fails
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let state = AppState::from_config(config);

        // Routes behind token authentication
        let protected = Router::new()
            .route("/profile", get(handlers::profile::index))
            .route("/posts", get(handlers::posts::index).post(handlers::posts::create))
            .route(
                "/posts/{id}",
                put(handlers::posts::update).delete(handlers::posts::destroy),
            )
            .route_layer(axum::middleware::from_fn_with_state(state.clone(), auth::require_auth));

        let api = Router::new()
            .route("/", get(handlers::root))
            .route("/auth/register", post(handlers::auth::register))
            .route("/auth/login", post(handlers::auth::login))
            .merge(protected)
            // Wrong verb on a known path still gets a classified envelope
            .method_not_allowed_fallback(fallback::method_not_allowed);

        let mut app = Router::new().nest("/api", api);

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, get(health::health_handler));
        }

        // Unknown paths get the classified 404 envelope
        let app = app.fallback(fallback::route_not_found);

        let mut app = app.with_state(state.clone());

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // Rate limiting (outermost, rejected requests never reach handlers)
        if let Some(ref rl_config) = config.server.rate_limit {
            let limiter = Arc::new(rate_limit::RequestLimiter::new(rl_config)?);
            let verbosity = state.verbosity;
            app = app.layer(axum::middleware::from_fn(move |req, next| {
                let limiter = Arc::clone(&limiter);
                async move { rate_limit::rate_limit_middleware(limiter, verbosity, req, next).await }
            }));
        }

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
