//! API request and response types.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

// ============================================================================
// HTTP API Types
// ============================================================================

/// Error body returned by the HTTP entry points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Response for the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct HealthResponse {
    pub status: String,
    /// Whether the upstream fleet API host and token are configured.
    pub upstream_configured: bool,
    /// Whether the connector bearer gate is enabled.
    pub auth_enabled: bool,
}

/// Response for the version endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct VersionResponse {
    pub name: String,
    pub version: String,
}

// ============================================================================
// Tool Input Types
// ============================================================================

/// Input for the `last_location` tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LastLocationParams {
    /// Device identifier.
    #[serde(rename = "deviceId")]
    pub device_id: String,
}

/// Input for the `events` tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsParams {
    /// Window start, ISO-8601 date-time.
    pub start: String,
    /// Window end, ISO-8601 date-time.
    pub end: String,
    /// Optional device filter.
    #[serde(rename = "deviceId", default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}
