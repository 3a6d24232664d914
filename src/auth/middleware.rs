//! Axum middleware gating every inbound request on a bearer token.
//!
//! Paths on the public allow-list pass through untouched. Everywhere else the
//! `Authorization` header is parsed and verified; any failure (missing header,
//! malformed header, bad signature, missing `level` claim) is logged and
//! downgraded to "no token". Whether an unauthenticated request is then
//! rejected or waved through is decided solely by the `force_credentials`
//! flag; handlers behind the gateway perform no further authorization checks.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Method, Request},
    middleware::Next,
    response::Response,
};
use tracing::{field, info_span, warn};

use crate::api::error::ApiError;
use crate::auth::token::{Claims, TokenService};
use crate::errors::{Error, Result};

pub type GatewayState = Arc<Gateway>;

/// Request-scoped identity derived from a verified token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: Claims,
}

/// Token checkpoint in front of every route.
pub struct Gateway {
    tokens: TokenService,
    force_credentials: bool,
    public_paths: Vec<String>,
}

impl Gateway {
    pub fn new(tokens: TokenService, force_credentials: bool, public_paths: Vec<String>) -> Self {
        Self { tokens, force_credentials, public_paths }
    }

    /// Whether the path is exempt from the token check. Allow-list entries
    /// match exactly or as a path-segment prefix.
    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|public| {
            path == public
                || (path.starts_with(public.as_str())
                    && path.as_bytes().get(public.len()) == Some(&b'/'))
        })
    }

    /// Extract and verify the bearer token from an `Authorization` header
    /// value, requiring the `level` claim.
    fn establish_identity(&self, header: Option<&str>) -> Result<AuthContext> {
        let header = header.ok_or_else(|| Error::unauthorized("Authorization header missing"))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| Error::unauthorized("Authorization header is not a bearer credential"))?;
        let claims = self.tokens.verify(token)?;
        Ok(AuthContext { claims })
    }
}

/// Middleware entry point that authorizes requests against the configured [`Gateway`].
pub async fn authorize_request(
    State(gateway): State<GatewayState>,
    mut request: Request<Body>,
    next: Next,
) -> std::result::Result<Response, ApiError> {
    // CORS preflights never carry credentials.
    if request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let path = request.uri().path().to_string();
    if gateway.is_public(&path) {
        return Ok(next.run(request).await);
    }

    let method = request.method().clone();
    let correlation_id = uuid::Uuid::new_v4();
    let span = info_span!(
        "gateway.authorize_request",
        http.method = %method,
        http.path = %path,
        auth.email = field::Empty,
        correlation_id = %correlation_id
    );
    let _guard = span.enter();

    let header =
        request.headers().get(AUTHORIZATION).and_then(|value| value.to_str().ok());

    match gateway.establish_identity(header) {
        Ok(context) => {
            tracing::Span::current().record("auth.email", field::display(&context.claims.email));
            request.extensions_mut().insert(context);
            Ok(next.run(request).await)
        }
        Err(err) => {
            // Verification failure is terminal for this request; the token is
            // treated as absent and force_credentials decides the outcome.
            warn!(%correlation_id, error = %err, "request carried no usable credentials");
            if gateway.force_credentials {
                Err(ApiError::unauthorized("Unauthorized"))
            } else {
                Ok(next.run(request).await)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(force: bool) -> Gateway {
        Gateway::new(
            TokenService::new(b"unit-test-secret"),
            force,
            vec!["/auth".into(), "/authql".into(), "/clarifai/tags".into()],
        )
    }

    #[test]
    fn allow_list_matches_exact_and_segment_prefix() {
        let gw = gateway(true);
        assert!(gw.is_public("/auth"));
        assert!(gw.is_public("/auth/graphiql"));
        assert!(gw.is_public("/clarifai/tags"));
        assert!(!gw.is_public("/authx"));
        assert!(!gw.is_public("/user"));
    }

    #[test]
    fn missing_header_yields_unauthorized() {
        let err = gateway(true).establish_identity(None).unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[test]
    fn non_bearer_header_yields_unauthorized() {
        let err = gateway(true).establish_identity(Some("Basic dXNlcjpwdw==")).unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[test]
    fn valid_bearer_token_establishes_identity() {
        let gw = gateway(true);
        let claims = Claims {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "$argon2id$stub".into(),
            level: 1,
            iat: 0,
        };
        let token = TokenService::new(b"unit-test-secret").issue(&claims).unwrap();
        let header = format!("Bearer {}", token);
        let context = gw.establish_identity(Some(&header)).unwrap();
        assert_eq!(context.claims.email, "ada@example.com");
        assert_eq!(context.claims.level, 1);
    }

    #[test]
    fn wrongly_signed_token_is_rejected() {
        let gw = gateway(true);
        let claims = Claims {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "$argon2id$stub".into(),
            level: 1,
            iat: 0,
        };
        let token = TokenService::new(b"some-other-secret").issue(&claims).unwrap();
        let header = format!("Bearer {}", token);
        assert!(matches!(gw.establish_identity(Some(&header)), Err(Error::InvalidToken(_))));
    }
}
