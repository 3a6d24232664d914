//! Proxy routes: verbatim relay of stubbed upstream responses, and structured
//! upstream errors when the third-party API is unreachable.

mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use support::*;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn clarifai_tags_relays_the_upstream_body() {
    let upstream = MockServer::start().await;
    let tags = json!({
        "status_code": "OK",
        "results": [{ "result": { "tag": { "classes": ["cat", "animal"] } } }]
    });
    Mock::given(method("GET"))
        .and(path("/v1/tag"))
        .and(query_param("url", "https://example.com/cat.jpg"))
        .and(header("authorization", "Bearer clarifai-test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tags.clone()))
        .mount(&upstream)
        .await;

    let app = setup_app_with(|config| {
        config.upstream.clarifai.base_url = upstream.uri();
        config.upstream.clarifai.api_token = "clarifai-test-token".to_string();
    })
    .await;

    let response = send_request(
        &app,
        Method::GET,
        "/clarifai/tags?url=https%3A%2F%2Fexample.com%2Fcat.jpg",
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, tags);
}

#[tokio::test]
async fn clarifai_transport_failure_surfaces_as_bad_gateway() {
    // Nothing listens on the discard port; the outbound call fails outright.
    let app = setup_app_with(|config| {
        config.upstream.clarifai.base_url = "http://127.0.0.1:9".to_string();
    })
    .await;

    let response = send_request(
        &app,
        Method::GET,
        "/clarifai/tags?url=https%3A%2F%2Fexample.com%2Fcat.jpg",
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = read_json(response).await;
    assert_eq!(body["error"], "upstream_error");
}

#[tokio::test]
async fn instagram_authorize_redirects_to_the_upstream_url() {
    let app = setup_app_with(|config| {
        config.upstream.instagram.client_id = "client-123".to_string();
        config.upstream.instagram.redirect_uri =
            "http://localhost:3000/instagram/handle_auth".to_string();
    })
    .await;

    let response = send_request(&app, Method::GET, "/instagram/authorize_user", None, None).await;
    assert!(response.status().is_redirection());

    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("redirect location");
    assert!(location.contains("/oauth/authorize"));
    assert!(location.contains("client_id=client-123"));
    assert!(location.contains("response_type=code"));
    assert!(location.contains("state=state"));
}

#[tokio::test]
async fn instagram_handle_auth_returns_the_access_token_as_text() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "insta-token-1",
            "user": { "username": "ada" }
        })))
        .mount(&upstream)
        .await;

    let app = setup_app_with(|config| {
        config.upstream.instagram.base_url = upstream.uri();
    })
    .await;

    let response =
        send_request(&app, Method::GET, "/instagram/handle_auth?code=abc123", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_text(response).await, "insta-token-1");
}

#[tokio::test]
async fn instagram_handle_auth_relays_an_upstream_rejection() {
    let upstream = MockServer::start().await;
    let rejection = json!({ "error_type": "OAuthException", "error_message": "bad code" });
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(rejection))
        .mount(&upstream)
        .await;

    let app = setup_app_with(|config| {
        config.upstream.instagram.base_url = upstream.uri();
    })
    .await;

    let response =
        send_request(&app, Method::GET, "/instagram/handle_auth?code=bad", None, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_text(response).await.contains("OAuthException"));
}

#[tokio::test]
async fn instagram_user_relays_the_profile_verbatim() {
    let upstream = MockServer::start().await;
    let profile = json!({ "data": { "username": "ada", "full_name": "Ada L" } });
    Mock::given(method("GET"))
        .and(path("/v1/users/self/"))
        .and(query_param("access_token", "insta-token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile.clone()))
        .mount(&upstream)
        .await;

    let app = setup_app_with(|config| {
        config.upstream.instagram.base_url = upstream.uri();
    })
    .await;

    let response = send_request(
        &app,
        Method::GET,
        "/instagram/user?access_token=insta-token-1",
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, profile);
}
