//! Server composition: wires the store, services, schemas, gateway, and proxy
//! clients onto a listening socket.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::auth::{AuthService, Gateway, GatewayState, TokenService};
use crate::config::AppConfig;
use crate::errors::Error;
use crate::graphql::{build_auth_schema, build_user_schema};
use crate::proxy::{ClarifaiClient, InstagramClient};
use crate::storage::{DbPool, SqlxUserStore, UserStore};

use super::routes::{build_router, ApiState};

/// Build the application state and gateway from configuration and a pool.
pub fn build_app(config: &AppConfig, pool: DbPool) -> (ApiState, GatewayState) {
    let store: Arc<dyn UserStore> = Arc::new(SqlxUserStore::new(pool));
    let tokens = TokenService::new(config.auth.secret.as_bytes());
    let auth_service = Arc::new(AuthService::new(
        store.clone(),
        tokens.clone(),
        config.server.request_timeout(),
    ));

    let http = reqwest::Client::new();
    let state = ApiState {
        auth_schema: build_auth_schema(auth_service),
        user_schema: build_user_schema(store),
        clarifai: ClarifaiClient::new(http.clone(), config.upstream.clarifai.clone()),
        instagram: InstagramClient::new(http, config.upstream.instagram.clone()),
    };

    let gateway: GatewayState = Arc::new(Gateway::new(
        tokens,
        config.auth.force_credentials,
        config.auth.public_paths.clone(),
    ));

    (state, gateway)
}

/// Bind and serve until ctrl-c.
pub async fn start(config: AppConfig, pool: DbPool) -> crate::Result<()> {
    let (state, gateway) = build_app(&config, pool);
    let router = build_router(state, gateway);

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await.map_err(|e| Error::Io {
        source: e,
        context: format!("Failed to bind API server on {}", addr),
    })?;

    info!(address = %addr, force_credentials = config.auth.force_credentials, "Starting HTTP API server");
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "API server shutdown listener failed");
            }
        })
        .await
        .map_err(|e| Error::Io { source: e, context: "API server error".to_string() })?;

    info!("API server shutdown completed");
    Ok(())
}
