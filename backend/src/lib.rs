//! Fleetbridge backend library.
//!
//! This module exposes the application builder for use in tests and
//! the server binary.

use axum::extract::State;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;

pub mod api;
pub mod auth;
pub mod config;
pub mod fleet;
pub mod mcp;
pub mod openapi;
pub mod state;

use fleetbridge_types::api::HealthResponse;
use state::AppState;

/// Create the Axum application router with auth taken from the
/// environment.
pub fn create_app_with_state(state: AppState) -> Router {
    create_app_with_config(state, auth::AuthConfig::from_env())
}

/// Create the Axum application router with a given state and auth
/// configuration.
pub fn create_app_with_config(state: AppState, auth_config: auth::AuthConfig) -> Router {
    let auth_config = Arc::new(auth_config);

    if auth_config.enabled {
        tracing::info!("Connector authentication enabled");
    } else {
        tracing::warn!("Connector authentication disabled - MCP endpoints are public!");
    }

    Router::new()
        .route("/health", get(health))
        .route("/sse", get(api::mcp::open_session))
        .route("/messages", post(api::mcp::post_message))
        .route("/api/version", get(api::version::get_version))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(openapi::ApiDoc::openapi()) }),
        )
        .layer(Extension(auth_config))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
                .allow_origin(Any),
        )
        .with_state(state)
}

/// Health check endpoint.
///
/// Unauthenticated liveness probe reporting whether the required
/// configuration is present.
async fn health(
    State(state): State<AppState>,
    Extension(auth_config): Extension<Arc<auth::AuthConfig>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        upstream_configured: state.fleet().is_configured(),
        auth_enabled: auth_config.enabled,
    })
}
