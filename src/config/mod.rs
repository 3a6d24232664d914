//! # Configuration Management
//!
//! Configuration for the authgate backend. Every section can be populated from
//! environment variables (`AUTHGATE_*`) with sensible development defaults, and
//! the whole tree is validated once at startup before any component is built.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct AppConfig {
    /// HTTP server configuration
    #[validate(nested)]
    pub server: ServerConfig,

    /// Database configuration
    #[validate(nested)]
    pub database: DatabaseConfig,

    /// Token and gateway configuration
    #[validate(nested)]
    pub auth: AuthConfig,

    /// Third-party API configuration
    #[validate(nested)]
    pub upstream: UpstreamConfig,

    /// Observability configuration
    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            upstream: UpstreamConfig::from_env(),
            observability: ObservabilityConfig::from_env(),
        })
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;
        self.validate_custom()
    }

    /// Custom validation logic that goes beyond what the validator crate can do
    fn validate_custom(&self) -> Result<()> {
        for path in &self.auth.public_paths {
            if !path.starts_with('/') {
                return Err(Error::validation(format!(
                    "Public path '{}' must start with '/'",
                    path
                )));
            }
        }

        if !self.database.url.starts_with("sqlite:") {
            return Err(Error::validation("Database URL must start with 'sqlite:'"));
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Server bind address
    #[validate(length(min = 1, message = "Host cannot be empty"))]
    pub host: String,

    /// Server port
    #[validate(range(min = 1, message = "Port must be between 1 and 65535"))]
    pub port: u16,

    /// Budget for a single backing-store operation, in milliseconds. A store
    /// call still pending when this elapses is cancelled and the operation
    /// fails with a store-timeout error.
    #[validate(range(
        min = 10,
        max = 300_000,
        message = "Request timeout must be between 10ms and 300s"
    ))]
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 3000, request_timeout_ms: 1000 }
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            host: env_or("AUTHGATE_HOST", &defaults.host),
            port: parse_env("AUTHGATE_PORT", defaults.port)?,
            request_timeout_ms: parse_env(
                "AUTHGATE_REQUEST_TIMEOUT_MS",
                defaults.request_timeout_ms,
            )?,
        })
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the store-operation budget as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[validate(length(min = 1, message = "Database URL cannot be empty"))]
    pub url: String,

    /// Maximum number of connections in the pool
    #[validate(range(min = 1, max = 100, message = "Max connections must be between 1 and 100"))]
    pub max_connections: u32,

    /// Timeout for acquiring a connection, in seconds
    #[validate(range(min = 1, max = 60, message = "Connect timeout must be between 1 and 60s"))]
    pub connect_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://authgate.db".to_string(),
            max_connections: 10,
            connect_timeout_seconds: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            url: env_or("AUTHGATE_DATABASE_URL", &defaults.url),
            max_connections: parse_env(
                "AUTHGATE_DATABASE_MAX_CONNECTIONS",
                defaults.max_connections,
            )?,
            connect_timeout_seconds: defaults.connect_timeout_seconds,
        })
    }

    /// Get the connection acquire timeout as a Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

/// Token and gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuthConfig {
    /// Signing secret for bearer tokens
    #[validate(length(min = 16, message = "Token secret must be at least 16 characters long"))]
    pub secret: String,

    /// When true, requests on non-public paths without a valid token are
    /// rejected before reaching any handler. When false they proceed with no
    /// authenticated identity attached.
    pub force_credentials: bool,

    /// Path prefixes exempt from the token check
    #[validate(length(min = 1, message = "At least one public path is required"))]
    pub public_paths: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: "development-secret-change-me".to_string(),
            force_credentials: true,
            public_paths: vec![
                "/auth".to_string(),
                "/authql".to_string(),
                "/health".to_string(),
                "/instagram/authorize_user".to_string(),
                "/instagram/handle_auth".to_string(),
                "/instagram/user".to_string(),
                "/clarifai/tags".to_string(),
            ],
        }
    }
}

impl AuthConfig {
    fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let public_paths = match std::env::var("AUTHGATE_PUBLIC_PATHS") {
            Ok(raw) => raw
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            Err(_) => defaults.public_paths,
        };

        Ok(Self {
            secret: env_or("AUTHGATE_JWT_SECRET", &defaults.secret),
            force_credentials: parse_env(
                "AUTHGATE_FORCE_CREDENTIALS",
                defaults.force_credentials,
            )?,
            public_paths,
        })
    }
}

/// Third-party API configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpstreamConfig {
    /// Image-tagging API
    #[validate(nested)]
    pub clarifai: ClarifaiConfig,

    /// Photo-sharing API
    #[validate(nested)]
    pub instagram: InstagramConfig,
}

impl UpstreamConfig {
    pub fn from_env() -> Self {
        Self { clarifai: ClarifaiConfig::from_env(), instagram: InstagramConfig::from_env() }
    }
}

/// Image-tagging API configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClarifaiConfig {
    /// Base URL of the tagging API
    #[validate(length(min = 1, message = "Clarifai base URL cannot be empty"))]
    pub base_url: String,

    /// Fixed bearer credential sent with every tag lookup
    pub api_token: String,
}

impl Default for ClarifaiConfig {
    fn default() -> Self {
        Self { base_url: "https://api.clarifai.com".to_string(), api_token: String::new() }
    }
}

impl ClarifaiConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env_or("AUTHGATE_CLARIFAI_BASE_URL", &defaults.base_url),
            api_token: env_or("AUTHGATE_CLARIFAI_TOKEN", &defaults.api_token),
        }
    }
}

/// Photo-sharing API configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InstagramConfig {
    /// Base URL used for both the OAuth endpoints and the profile API
    #[validate(length(min = 1, message = "Instagram base URL cannot be empty"))]
    pub base_url: String,

    /// OAuth client id
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// Redirect URI registered with the upstream application
    pub redirect_uri: String,
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.instagram.com".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: "http://localhost:3000/instagram/handle_auth".to_string(),
        }
    }
}

impl InstagramConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env_or("AUTHGATE_INSTAGRAM_BASE_URL", &defaults.base_url),
            client_id: env_or("AUTHGATE_INSTAGRAM_CLIENT_ID", &defaults.client_id),
            client_secret: env_or("AUTHGATE_INSTAGRAM_CLIENT_SECRET", &defaults.client_secret),
            redirect_uri: env_or("AUTHGATE_INSTAGRAM_REDIRECT_URI", &defaults.redirect_uri),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Default tracing filter when RUST_LOG is not set
    #[validate(length(min = 1, message = "Log filter cannot be empty"))]
    pub log_filter: String,

    /// Service name attached to log output
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { log_filter: "info".to_string(), service_name: "authgate".to_string() }
    }
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_filter: env_or("AUTHGATE_LOG_FILTER", &defaults.log_filter),
            service_name: env_or("AUTHGATE_SERVICE_NAME", &defaults.service_name),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}
