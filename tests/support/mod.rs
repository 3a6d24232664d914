//! Shared helpers for integration tests: an app wired against an in-memory
//! SQLite store, plus request/response utilities.
#![allow(dead_code)]

use authgate::api::{build_app, build_router};
use authgate::auth::TokenService;
use authgate::config::AppConfig;
use authgate::storage::{self, DbPool};
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

pub struct TestApp {
    pub pool: DbPool,
    pub router: Router,
    pub tokens: TokenService,
}

/// In-memory SQLite pool with the schema bootstrapped. A single connection
/// keeps the database alive for the whole test.
pub async fn memory_pool() -> DbPool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("create sqlite pool");
    storage::run_migrations(&pool).await.expect("run migrations for tests");
    pool
}

/// Build a test app with the default configuration (credentials forced).
pub async fn setup_test_app() -> TestApp {
    setup_app_with(|_| {}).await
}

/// Build a test app after letting the caller adjust the configuration.
pub async fn setup_app_with<F: FnOnce(&mut AppConfig)>(customize: F) -> TestApp {
    let mut config = AppConfig::default();
    config.auth.secret = "integration-test-secret".to_string();
    customize(&mut config);

    let pool = memory_pool().await;
    let (state, gateway) = build_app(&config, pool.clone());
    let router = build_router(state, gateway);
    let tokens = TokenService::new(config.auth.secret.as_bytes());

    TestApp { pool, router, tokens }
}

pub async fn send_request(
    app: &TestApp,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = if let Some(json) = body {
        let bytes = serde_json::to_vec(&json).expect("serialize body");
        builder
            .header("content-type", "application/json")
            .body(Body::from(bytes))
            .expect("build request")
    } else {
        builder.body(Body::empty()).expect("build request")
    };

    app.router.clone().oneshot(request).await.expect("request")
}

pub async fn read_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

pub async fn read_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

/// Post a GraphQL query and return the response body, asserting HTTP 200.
pub async fn graphql(app: &TestApp, path: &str, token: Option<&str>, query: &str) -> Value {
    let response =
        send_request(app, Method::POST, path, token, Some(json!({ "query": query }))).await;
    assert_eq!(response.status(), StatusCode::OK, "GraphQL transport must answer 200");
    read_json(response).await
}

/// Register an account through the public auth endpoint and return the token.
pub async fn register(app: &TestApp, name: &str, email: &str, password: &str, level: i64) -> String {
    let body = graphql(
        app,
        "/authql",
        None,
        &format!(
            r#"mutation {{ register(name: "{name}", email: "{email}", password: "{password}", level: {level}) {{ token }} }}"#
        ),
    )
    .await;
    body["data"]["register"]["token"]
        .as_str()
        .unwrap_or_else(|| panic!("register must return a token, got {body}"))
        .to_string()
}
