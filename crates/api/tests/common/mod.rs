//! Common test utilities for integration tests.
//!
//! Integration tests run the full router against the embedded memory store
//! and the bootstrap auth provider, so they are hermetic: no network, no
//! external services.

// Allow dead code in this module - these are helper utilities that may not
// be used by all integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use fleet_console_api::app::create_app;
use fleet_console_api::config::{
    AuthConfig, BootstrapOperator, Config, ConsoleConfig, LoggingConfig, SecurityConfig,
    ServerConfig, SessionConfig, StoreConfig,
};
use fleet_console_api::services::auth::BootstrapAuthProvider;
use realtime::{MemoryStore, RealtimeStore, StorePath};

pub const OPERATOR_EMAIL: &str = "op@example.com";
pub const OPERATOR_ACCOUNT: &str = "acct1";
pub const OWNER_EMAIL: &str = "owner@example.com";
pub const OWNER_ACCOUNT: &str = "owner";
pub const PASSWORD: &str = "secret123";

/// Config for tests: bootstrap auth with two operators (one of them the
/// fleet owner), rate limiting off, preference persistence off.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig::default(),
        store: StoreConfig::default(),
        auth: AuthConfig {
            provider: "bootstrap".to_string(),
            endpoint: String::new(),
            operators: vec![
                BootstrapOperator {
                    account_id: OPERATOR_ACCOUNT.to_string(),
                    email: OPERATOR_EMAIL.to_string(),
                    password_hash: shared::password::hash_password(PASSWORD).unwrap(),
                },
                BootstrapOperator {
                    account_id: OWNER_ACCOUNT.to_string(),
                    email: OWNER_EMAIL.to_string(),
                    password_hash: shared::password::hash_password(PASSWORD).unwrap(),
                },
            ],
        },
        session: SessionConfig {
            secret: "integration-test-secret".to_string(),
            ttl_secs: 3600,
            remember_ttl_secs: 7200,
        },
        console: ConsoleConfig {
            owner_account_id: Some(OWNER_ACCOUNT.to_string()),
            notification_tail: 100,
            preferences_path: String::new(),
        },
        logging: LoggingConfig::default(),
        security: SecurityConfig {
            cors_origins: Vec::new(),
            login_rate_limit_per_minute: 0,
        },
    }
}

/// Builds the app over the given store.
pub fn create_test_app(store: &MemoryStore) -> Router {
    let config = test_config();
    let auth = Arc::new(BootstrapAuthProvider::new(config.auth.operators.clone()));
    let store: Arc<dyn RealtimeStore> = Arc::new(store.clone());
    create_app(config, store, auth)
}

/// Sends a request and returns (status, parsed JSON body or Null).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

/// Logs in and returns the session token.
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let request = json_request(
        Method::POST,
        "/api/v1/auth/login",
        serde_json::json!({"email": email, "password": password}),
        None,
    );
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

/// Builds a JSON request, optionally with a Bearer token.
pub fn json_request(
    method: Method,
    uri: &str,
    body: Value,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Builds a bodyless request with a Bearer token.
pub fn bare_request(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Writes a device record into the store.
pub async fn seed_device(store: &MemoryStore, account: &str, device: &str, value: Value) {
    let path = StorePath::parse(&format!("users/{}/devices/{}", account, device)).unwrap();
    store.set(&path, value).await.unwrap();
}

/// Reads any store path as JSON (Null when absent).
pub async fn store_value(store: &MemoryStore, path: &str) -> Value {
    store.get(&StorePath::parse(path).unwrap()).await.unwrap()
}

/// Polls `check` until it returns true or the timeout expires. Returns the
/// final outcome, so asserting on it gives a clear failure.
pub async fn wait_until<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..200 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
