//! OpenAPI documentation configuration.

use crate::mcp::handler::JsonRpcRequest;
use fleetbridge_types::api::{ErrorResponse, HealthResponse, VersionResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::mcp::open_session,
        crate::api::mcp::post_message,
        crate::api::version::get_version,
    ),
    components(
        schemas(
            JsonRpcRequest,
            ErrorResponse,
            HealthResponse,
            VersionResponse,
        )
    ),
    tags(
        (name = "MCP", description = "MCP HTTP+SSE transport"),
        (name = "System", description = "Health and version information")
    ),
    info(
        title = "Fleetbridge API",
        description = "MCP bridge exposing fleet-tracking queries over HTTP+SSE"
    )
)]
pub struct ApiDoc;
