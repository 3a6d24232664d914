//! # Error Types
//!
//! Error types for the authgate backend using `thiserror`. Every failure the
//! resolvers, gateway, storage layer, and proxies can produce is a tagged
//! variant so callers branch on kind rather than on message text.

/// Custom result type for authgate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the authgate backend
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database and storage errors
    #[error("Database error: {context}")]
    Database {
        #[source]
        source: sqlx::Error,
        context: String,
    },

    /// The backing store did not answer within the configured budget.
    /// The pending store call is cancelled when this fires, not leaked.
    #[error("Store timeout: {operation} did not complete within {duration_ms}ms")]
    StoreTimeout {
        operation: &'static str,
        duration_ms: u64,
    },

    /// Bearer token failed signature, format, or required-claim checks
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// No valid credential on a path that requires one
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A third-party API call failed or returned an error status
    #[error("Upstream error: {context}")]
    Upstream {
        status: Option<u16>,
        context: String,
    },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new invalid-token error
    pub fn invalid_token<S: Into<String>>(message: S) -> Self {
        Self::InvalidToken(message.into())
    }

    /// Create a new unauthorized error
    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(status: Option<u16>, context: S) -> Self {
        Self::Upstream { status, context: context.into() }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Wrap a sqlx error with context describing the failed operation
    pub fn database<S: Into<String>>(source: sqlx::Error, context: S) -> Self {
        Self::Database { source, context: context.into() }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_timeout_display_names_operation_and_budget() {
        let err = Error::StoreTimeout { operation: "login", duration_ms: 1000 };
        assert_eq!(err.to_string(), "Store timeout: login did not complete within 1000ms");
    }

    #[test]
    fn helper_constructors_produce_matching_variants() {
        assert!(matches!(Error::config("x"), Error::Config(_)));
        assert!(matches!(Error::invalid_token("x"), Error::InvalidToken(_)));
        assert!(matches!(Error::unauthorized("x"), Error::Unauthorized(_)));
        assert!(matches!(
            Error::upstream(Some(502), "x"),
            Error::Upstream { status: Some(502), .. }
        ));
    }
}
