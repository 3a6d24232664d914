//! Router assembly: the two GraphQL endpoints, the proxy routes, and the
//! gateway middleware layered in front of everything.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    middleware,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{authorize_request, GatewayState};
use crate::graphql::{AuthSchema, UserSchema};
use crate::proxy::{clarifai, instagram, ClarifaiClient, InstagramClient};
use crate::{APP_NAME, VERSION};

/// Shared state for all routes.
#[derive(Clone)]
pub struct ApiState {
    pub auth_schema: AuthSchema,
    pub user_schema: UserSchema,
    pub clarifai: ClarifaiClient,
    pub instagram: InstagramClient,
}

/// Assemble the full application router.
pub fn build_router(state: ApiState, gateway: GatewayState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth", get(auth_playground).post(auth_graphql))
        .route("/authql", post(auth_graphql))
        .route("/user", post(user_graphql))
        .route("/clarifai/tags", get(clarifai::tags_by_url))
        .route("/instagram/authorize_user", get(instagram::authorize_user))
        .route("/instagram/handle_auth", get(instagram::handle_auth))
        .route("/instagram/user", get(instagram::user_self))
        .layer(middleware::from_fn_with_state(gateway, authorize_request))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "service": APP_NAME, "version": VERSION }))
}

/// GraphiQL UI for the auth schema, pointed at `/authql`.
async fn auth_playground() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/authql").finish())
}

async fn auth_graphql(State(state): State<ApiState>, req: GraphQLRequest) -> GraphQLResponse {
    state.auth_schema.execute(req.into_inner()).await.into()
}

async fn user_graphql(State(state): State<ApiState>, req: GraphQLRequest) -> GraphQLResponse {
    state.user_schema.execute(req.into_inner()).await.into()
}
