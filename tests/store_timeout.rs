//! Timeout guard: a store that never answers must fail every auth operation
//! with a store-timeout error inside the configured budget.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use authgate::auth::{AuthService, TokenService};
use authgate::errors::{Error, Result};
use authgate::graphql::build_auth_schema;
use authgate::storage::{NewUser, User, UserStore, UserUpdate};
use tokio::time::Instant;

/// A store whose every call stays pending forever.
struct StalledStore;

#[async_trait]
impl UserStore for StalledStore {
    async fn find_one(&self, _email: &str) -> Result<Option<User>> {
        std::future::pending().await
    }

    async fn find_one_and_update(&self, _email: &str, _update: UserUpdate) -> Result<Option<User>> {
        std::future::pending().await
    }

    async fn create(&self, _user: NewUser) -> Result<User> {
        std::future::pending().await
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        std::future::pending().await
    }
}

fn stalled_service(budget: Duration) -> AuthService {
    AuthService::new(
        Arc::new(StalledStore),
        TokenService::new(b"timeout-test-secret"),
        budget,
    )
}

#[tokio::test]
async fn login_fails_with_store_timeout_within_budget() {
    let service = stalled_service(Duration::from_millis(100));
    let started = Instant::now();

    let err = service.login("a@a.com", "p").await.unwrap_err();

    assert!(matches!(err, Error::StoreTimeout { operation: "login", duration_ms: 100 }));
    assert!(started.elapsed() < Duration::from_millis(1000), "must fail near the budget");
}

#[tokio::test]
async fn every_mutation_is_guarded() {
    let service = stalled_service(Duration::from_millis(50));

    let register = service.register("A", "a@a.com", "p", 0).await.unwrap_err();
    assert!(matches!(register, Error::StoreTimeout { operation: "register", .. }));

    let change_password = service.change_password("a@a.com", "p").await.unwrap_err();
    assert!(matches!(change_password, Error::StoreTimeout { operation: "change_password", .. }));

    let reset_password = service.reset_password("a@a.com").await.unwrap_err();
    assert!(matches!(reset_password, Error::StoreTimeout { operation: "reset_password", .. }));

    let change_email = service.change_email("a@a.com", "p", "b@b.com").await.unwrap_err();
    assert!(matches!(change_email, Error::StoreTimeout { operation: "change_email", .. }));

    let change_name = service.change_name("a@a.com", "p", "B").await.unwrap_err();
    assert!(matches!(change_name, Error::StoreTimeout { operation: "change_name", .. }));
}

#[tokio::test]
async fn store_timeout_surfaces_as_a_graphql_error() {
    let schema = build_auth_schema(Arc::new(stalled_service(Duration::from_millis(50))));

    let response = schema
        .execute(r#"query { login(email: "a@a.com", password: "p") { token } }"#)
        .await;

    assert!(!response.errors.is_empty(), "timeout must not resolve to null");
    assert!(
        response.errors[0].message.contains("Store timeout"),
        "unexpected error message: {}",
        response.errors[0].message
    );
}
