//! Photo-sharing proxy: OAuth authorize redirect, code-for-token exchange,
//! and authenticated profile fetch against the upstream API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use url::Url;

use crate::api::error::ApiError;
use crate::api::routes::ApiState;
use crate::config::InstagramConfig;
use crate::errors::{Error, Result};

const AUTHORIZE_SCOPES: [&str; 6] =
    ["basic", "likes", "public_content", "follower_list", "comments", "relationships"];

/// Outcome of exchanging an auth code upstream.
#[derive(Debug)]
pub enum CodeExchange {
    /// Upstream granted an access token
    Token(String),
    /// Upstream rejected the code; body is relayed to the caller as-is
    Rejected { status: u16, body: String },
}

/// Client for the upstream photo-sharing API.
#[derive(Debug, Clone)]
pub struct InstagramClient {
    http: reqwest::Client,
    config: InstagramConfig,
}

impl InstagramClient {
    pub fn new(http: reqwest::Client, config: InstagramConfig) -> Self {
        Self { http, config }
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Build the upstream authorization URL the caller is redirected to.
    pub fn authorize_url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/oauth/authorize", self.base()))
            .map_err(|e| Error::config(format!("Invalid Instagram base URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &AUTHORIZE_SCOPES.join(" "))
            .append_pair("state", "state");
        Ok(url)
    }

    /// Exchange an auth code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<CodeExchange> {
        let endpoint = format!("{}/oauth/access_token", self.base());
        let response = self
            .http
            .post(&endpoint)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("code", code),
            ])
            .send()
            .await
            .map_err(|err| Error::upstream(None, format!("Token exchange unreachable: {}", err)))?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            Error::upstream(
                Some(status.as_u16()),
                format!("Token exchange returned an unreadable body: {}", err),
            )
        })?;

        if !status.is_success() {
            return Ok(CodeExchange::Rejected { status: status.as_u16(), body });
        }

        let parsed: serde_json::Value = serde_json::from_str(&body).map_err(|err| {
            Error::upstream(Some(status.as_u16()), format!("Token exchange body is not JSON: {}", err))
        })?;
        let access_token = parsed
            .get("access_token")
            .and_then(|t| t.as_str())
            .ok_or_else(|| {
                Error::upstream(Some(status.as_u16()), "Token exchange response missing access_token")
            })?;

        Ok(CodeExchange::Token(access_token.to_string()))
    }

    /// Fetch the profile behind an access token; returns upstream status and body.
    pub async fn user_self(&self, access_token: &str) -> Result<(u16, serde_json::Value)> {
        let endpoint = format!("{}/v1/users/self/", self.base());
        let response = self
            .http
            .get(&endpoint)
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(|err| Error::upstream(None, format!("Profile API unreachable: {}", err)))?;

        let status = response.status().as_u16();
        let body = response.json::<serde_json::Value>().await.map_err(|err| {
            Error::upstream(Some(status), format!("Profile API returned an unreadable body: {}", err))
        })?;

        Ok((status, body))
    }
}

/// `GET /instagram/authorize_user`: redirect the caller to the upstream
/// authorization page.
pub async fn authorize_user(
    State(state): State<ApiState>,
) -> std::result::Result<Redirect, ApiError> {
    let url = state.instagram.authorize_url()?;
    Ok(Redirect::temporary(url.as_str()))
}

#[derive(Debug, Deserialize)]
pub struct HandleAuthParams {
    pub code: String,
}

/// `GET /instagram/handle_auth?code=<code>`: exchange the code and return the
/// access token as plain text, or relay the upstream error body.
pub async fn handle_auth(
    State(state): State<ApiState>,
    Query(params): Query<HandleAuthParams>,
) -> std::result::Result<Response, ApiError> {
    match state.instagram.exchange_code(&params.code).await? {
        CodeExchange::Token(token) => Ok(token.into_response()),
        CodeExchange::Rejected { status, body } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            Ok((status, body).into_response())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserSelfParams {
    pub access_token: String,
}

/// `GET /instagram/user?access_token=<token>`: relay the authenticated
/// profile verbatim.
pub async fn user_self(
    State(state): State<ApiState>,
    Query(params): Query<UserSelfParams>,
) -> std::result::Result<Response, ApiError> {
    let (status, body) = state.instagram.user_self(&params.access_token).await?;
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(body)).into_response())
}
