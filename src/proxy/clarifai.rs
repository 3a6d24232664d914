//! Image-tagging proxy: forwards a tag lookup for an image URL to the
//! upstream API with a fixed bearer credential and relays the JSON response.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::routes::ApiState;
use crate::config::ClarifaiConfig;
use crate::errors::{Error, Result};

/// Client for the upstream tagging API.
#[derive(Debug, Clone)]
pub struct ClarifaiClient {
    http: reqwest::Client,
    config: ClarifaiConfig,
}

impl ClarifaiClient {
    pub fn new(http: reqwest::Client, config: ClarifaiConfig) -> Self {
        Self { http, config }
    }

    /// Fetch tags for an image URL; returns the upstream status and body.
    pub async fn tags_by_url(&self, image_url: &str) -> Result<(u16, serde_json::Value)> {
        let endpoint = format!("{}/v1/tag", self.config.base_url.trim_end_matches('/'));
        let response = self
            .http
            .get(&endpoint)
            .query(&[("url", image_url)])
            .bearer_auth(&self.config.api_token)
            .send()
            .await
            .map_err(|err| Error::upstream(None, format!("Tagging API unreachable: {}", err)))?;

        let status = response.status().as_u16();
        let body = response.json::<serde_json::Value>().await.map_err(|err| {
            Error::upstream(Some(status), format!("Tagging API returned an unreadable body: {}", err))
        })?;

        Ok((status, body))
    }
}

#[derive(Debug, Deserialize)]
pub struct TagParams {
    pub url: String,
}

/// `GET /clarifai/tags?url=<imageUrl>`: relay the upstream tag response verbatim.
pub async fn tags_by_url(
    State(state): State<ApiState>,
    Query(params): Query<TagParams>,
) -> std::result::Result<Response, ApiError> {
    let (status, body) = state.clarifai.tags_by_url(&params.url).await?;
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(body)).into_response())
}
