//! Test server wrapper that starts capsule on a random port

use std::net::SocketAddr;

use capsule_config::Config;
use capsule_server::Server;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
}

impl TestServer {
    /// Start a test server with the given configuration
    ///
    /// Binds to port 0 for automatic port assignment
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        let server = Server::new(&config)?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        // Bind the listener here so we know the actual port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, server.into_router())
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        let client = reqwest::Client::new();

        Ok(Self { addr, shutdown, client })
    }

    /// Base URL of the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Get a reference to the HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Register an account and return its access token
    pub async fn register_user(&self, name: &str, email: &str, password: &str) -> anyhow::Result<String> {
        let resp = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({"name": name, "email": email, "password": password}))
            .send()
            .await?;
        anyhow::ensure!(resp.status() == 200, "registration failed: {}", resp.status());

        let body: Value = resp.json().await?;
        body["data"]["token"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| anyhow::anyhow!("no token in registration response"))
    }

    /// Create a post as the given user and return its id
    pub async fn create_post(&self, token: &str, title: &str, content: &str) -> anyhow::Result<String> {
        let resp = self
            .client
            .post(self.url("/api/posts"))
            .bearer_auth(token)
            .json(&json!({"title": title, "content": content}))
            .send()
            .await?;
        anyhow::ensure!(resp.status() == 200, "post creation failed: {}", resp.status());

        let body: Value = resp.json().await?;
        body["data"]["id"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| anyhow::anyhow!("no id in post response"))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
