//! # Authgate
//!
//! Authgate is a small GraphQL/REST backend exposing user authentication
//! (login, registration, password/email/name changes) and two thin proxy
//! endpoints to third-party services, backed by a SQL user store.
//!
//! ## Architecture
//!
//! ```text
//! Gateway Middleware → Route Dispatch → GraphQL Resolvers ↔ User Store
//!        ↓                                    ↓
//!  Token Service                      Third-Party Proxies → External APIs
//! ```
//!
//! ## Core Components
//!
//! - **Gateway Middleware**: bearer-token checkpoint in front of every route,
//!   with a public-path allow-list and a force-credentials switch
//! - **Auth Resolvers**: timeout-guarded account operations producing tokens
//!   or updated records
//! - **User Resolvers**: read-only lookup and listing
//! - **Third-Party Proxies**: stateless relays to an image-tagging API and a
//!   photo-sharing API
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use authgate::{api, observability, storage, AppConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::from_env()?;
//!     config.validate()?;
//!     observability::init_tracing(&config.observability)?;
//!     let pool = storage::create_pool(&config.database).await?;
//!     storage::run_migrations(&pool).await?;
//!     api::start(config, pool).await
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod graphql;
pub mod observability;
pub mod proxy;
pub mod storage;

// Re-export commonly used types and traits
pub use config::AppConfig;
pub use errors::{Error, Result};
pub use observability::init_tracing;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_available() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "authgate");
    }
}
