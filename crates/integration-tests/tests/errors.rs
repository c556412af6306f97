mod harness;

use harness::config::ConfigBuilder;
use harness::server::TestServer;
use serde_json::{Value, json};

async fn body_of(resp: reqwest::Response) -> Value {
    resp.json().await.unwrap()
}

// -- Validation (422) --

#[tokio::test]
async fn invalid_email_reports_a_422_with_field_messages() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/api/auth/login"))
        .json(&json!({"email": "not-an-email", "password": "whatever"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 422);
    let body = body_of(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Validation failed"));
    assert_eq!(body["data"], Value::Null);
    assert_eq!(
        body["errors"]["email"],
        json!(["The email field must be a valid email address."])
    );
    assert!(body["errors"].get("password").is_none());
}

#[tokio::test]
async fn empty_body_reports_every_missing_field() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/api/auth/register"))
        .header("content-type", "application/json")
        .body("definitely not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 422);
    let body = body_of(resp).await;
    assert_eq!(body["errors"]["name"], json!(["The name field is required."]));
    assert_eq!(body["errors"]["email"], json!(["The email field is required."]));
    assert_eq!(body["errors"]["password"], json!(["The password field is required."]));
}

#[tokio::test]
async fn duplicate_email_reports_as_validation() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();
    server
        .register_user("Ada", "ada@example.com", "hunter2hunter2")
        .await
        .unwrap();

    let resp = server
        .client()
        .post(server.url("/api/auth/register"))
        .json(&json!({"name": "Imposter", "email": "ada@example.com", "password": "hunter2hunter2"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 422);
    let body = body_of(resp).await;
    assert_eq!(body["errors"]["email"], json!(["The email has already been taken."]));
}

// -- Authentication (401) --

#[tokio::test]
async fn protected_route_without_token_is_401() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server.client().get(server.url("/api/profile")).send().await.unwrap();

    assert_eq!(resp.status(), 401);
    let body = body_of(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Authentication required"));
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["errors"]["authorization"], json!("Authentication token is missing"));
}

#[tokio::test]
async fn garbage_token_is_401() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server
        .client()
        .get(server.url("/api/profile"))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body = body_of(resp).await;
    assert_eq!(body["errors"]["authorization"], json!("Invalid or expired token"));
}

#[tokio::test]
async fn bad_credentials_are_401_invalid_credentials() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();
    server
        .register_user("Ada", "ada@example.com", "hunter2hunter2")
        .await
        .unwrap();

    let resp = server
        .client()
        .post(server.url("/api/auth/login"))
        .json(&json!({"email": "ada@example.com", "password": "wrong-password"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body = body_of(resp).await;
    assert_eq!(body["message"], json!("Invalid credentials"));
    assert_eq!(body["errors"], json!({}));
}

// -- Authorization (403) --

#[tokio::test]
async fn updating_someone_elses_post_is_403() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();
    let owner = server
        .register_user("Ada", "ada@example.com", "hunter2hunter2")
        .await
        .unwrap();
    let intruder = server
        .register_user("Eve", "eve@example.com", "hunter2hunter2")
        .await
        .unwrap();
    let post_id = server.create_post(&owner, "mine", "content").await.unwrap();

    let resp = server
        .client()
        .put(server.url(&format!("/api/posts/{post_id}")))
        .bearer_auth(&intruder)
        .json(&json!({"title": "stolen", "content": "content"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 403);
    let body = body_of(resp).await;
    assert_eq!(body["message"], json!("Unauthorized"));
    assert_eq!(body["errors"]["invalid_owner"], json!("You are not the owner of this post"));
}

// -- Resource lookups (404) --

#[tokio::test]
async fn unknown_post_id_is_404_data_not_found() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();
    let token = server
        .register_user("Ada", "ada@example.com", "hunter2hunter2")
        .await
        .unwrap();

    let missing = uuid::Uuid::new_v4();
    let resp = server
        .client()
        .delete(server.url(&format!("/api/posts/{missing}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body = body_of(resp).await;
    assert_eq!(body["message"], json!("post with given id not found"));
    assert_eq!(body["errors"]["error"], json!("DATA_NOT_FOUND"));
}

// -- Routing (404 / 405) --

#[tokio::test]
async fn unknown_route_is_404_route_not_found() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server.client().get(server.url("/api/nowhere")).send().await.unwrap();

    assert_eq!(resp.status(), 404);
    let body = body_of(resp).await;
    assert_eq!(body["message"], json!("Route not found"));
    assert_eq!(body["errors"]["error"], json!("ROUTE_NOT_FOUND"));
}

#[tokio::test]
async fn wrong_verb_is_405_method_not_allowed() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server.client().delete(server.url("/api/auth/login")).send().await.unwrap();

    assert_eq!(resp.status(), 405);
    let body = body_of(resp).await;
    assert_eq!(body["message"], json!("Method not allowed"));
    assert_eq!(body["errors"]["method"], json!("Invalid HTTP method"));
}

// -- Rate limiting (429) --

#[tokio::test]
async fn exceeding_the_global_limit_is_429() {
    let config = ConfigBuilder::new().with_global_limit(3, "1m").build();
    let server = TestServer::start(config).await.unwrap();

    for _ in 0..3 {
        let resp = server.client().get(server.url("/api")).send().await.unwrap();
        assert_eq!(resp.status(), 200);
    }

    let resp = server.client().get(server.url("/api")).send().await.unwrap();
    assert_eq!(resp.status(), 429);
    assert!(resp.headers().contains_key("retry-after"));
    let body = body_of(resp).await;
    assert_eq!(body["message"], json!("Too many requests"));
    assert_eq!(body["errors"]["throttle"], json!("Account locked for some time"));
}

#[tokio::test]
async fn per_ip_limits_do_not_bleed_across_clients() {
    let config = ConfigBuilder::new().with_per_ip_limit(2, "1m").build();
    let server = TestServer::start(config).await.unwrap();

    for _ in 0..2 {
        let resp = server
            .client()
            .get(server.url("/api"))
            .header("x-forwarded-for", "10.0.0.1")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    let blocked = server
        .client()
        .get(server.url("/api"))
        .header("x-forwarded-for", "10.0.0.1")
        .send()
        .await
        .unwrap();
    assert_eq!(blocked.status(), 429);

    let other_client = server
        .client()
        .get(server.url("/api"))
        .header("x-forwarded-for", "10.0.0.2")
        .send()
        .await
        .unwrap();
    assert_eq!(other_client.status(), 200);
}

// -- Verbosity --

#[tokio::test]
async fn non_internal_failures_classify_identically_across_environments() {
    // Unknown routes under a terse deployment still disclose their own
    // category; only internal faults are masked, and that masking is
    // pinned by capsule-core unit tests. Here we pin that classification
    // output is identical under both environments for a non-internal
    // failure.
    for environment in ["production", "development"] {
        let server = TestServer::start(ConfigBuilder::new().environment(environment).build())
            .await
            .unwrap();

        let resp = server.client().get(server.url("/api/nowhere")).send().await.unwrap();
        assert_eq!(resp.status(), 404);
        let body = body_of(resp).await;
        assert_eq!(body["errors"]["error"], json!("ROUTE_NOT_FOUND"));
    }
}
