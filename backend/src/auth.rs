//! Connector authentication.
//!
//! A single shared-secret bearer gate guarding both MCP entry points.

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use fleetbridge_types::api::ErrorResponse;
use tracing::warn;

/// Connector-facing authentication configuration.
///
/// When no connector token is configured the gate is open: this is a
/// fixed policy, evaluated identically for every request, and startup
/// logs a warning about it.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// Shared secret expected from connecting agents.
    pub connector_token: Option<String>,
    /// Whether authentication is enabled.
    pub enabled: bool,
}

impl AuthConfig {
    pub fn new(connector_token: Option<String>) -> Self {
        let enabled = connector_token.is_some();
        Self {
            connector_token,
            enabled,
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var("FLEETBRIDGE_AUTH_TOKEN").ok())
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Check an Authorization header value against the configured
    /// secret. Exact equality with `Bearer <token>`: case-sensitive, no
    /// trimming.
    pub fn verify_header(&self, header_value: &str) -> bool {
        match &self.connector_token {
            Some(token) => header_value == format!("Bearer {token}"),
            None => true,
        }
    }
}

/// Validate the connector bearer gate for an inbound request.
///
/// Runs on every MCP entry point before the request reaches the session
/// registry. Returns a ready 401 response when the credential is
/// missing or wrong; rejection has no side effect beyond the response.
#[allow(clippy::result_large_err)]
pub fn require_connector_auth(config: &AuthConfig, headers: &HeaderMap) -> Result<(), Response> {
    if !config.enabled {
        return Ok(());
    }

    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if config.verify_header(provided) {
        return Ok(());
    }

    warn!("Rejected request with missing or invalid connector credential");
    Err((
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new("Unauthorized")),
    )
        .into_response())
}
