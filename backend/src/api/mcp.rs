//! MCP HTTP+SSE endpoint handlers.
//!
//! ## Endpoints
//!
//! - `GET /sse` - Open a streaming session
//! - `POST /messages?sessionId=<id>` - Post a JSON-RPC request into an
//!   open session

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Extension, Json,
};
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::auth::{require_connector_auth, AuthConfig};
use crate::mcp::{
    handler::{JsonRpcRequest, JsonRpcResponse, McpHandler},
    session::{McpEvent, OpenSession},
};
use crate::state::AppState;
use fleetbridge_types::api::ErrorResponse;

/// Path clients post messages to; embedded in the handshake frame.
pub const MESSAGES_PATH: &str = "/messages";

/// Query parameters for `POST /messages`.
#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// GET /sse - Open a streaming session.
///
/// Upgrades to a long-lived SSE stream. The first frame is the
/// `endpoint` event carrying the messages URL with the generated
/// session id; the stream then carries protocol messages until either
/// side closes the connection. Dropping the stream removes the session
/// from the registry.
#[utoipa::path(
    get,
    path = "/sse",
    tag = "MCP",
    responses(
        (status = 200, description = "SSE stream opened; first frame is the endpoint handshake"),
        (status = 401, description = "Missing or invalid connector credential", body = ErrorResponse)
    )
)]
pub async fn open_session(
    State(state): State<AppState>,
    Extension(auth_config): Extension<Arc<AuthConfig>>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_connector_auth(&auth_config, &headers) {
        return response;
    }

    let session = state.sessions().open(MESSAGES_PATH);
    info!("SSE stream opened for session {}", session.id());

    Sse::new(sse_frames(session))
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
        .into_response()
}

/// Convert a session's frames into SSE events.
fn sse_frames(session: OpenSession) -> impl Stream<Item = Result<Event, Infallible>> {
    session.map(|event| {
        Ok(match event {
            McpEvent::Endpoint(url) => Event::default().event("endpoint").data(url),
            McpEvent::JsonRpc(message) => Event::default().event("message").data(message),
        })
    })
}

/// POST /messages - Post one JSON-RPC request into an open session.
///
/// The request is correlated to its session via the `sessionId` query
/// parameter. A request producing a response gets it written up the
/// session's open stream and returned synchronously as the POST body;
/// a notification yields 202 Accepted.
#[utoipa::path(
    post,
    path = "/messages",
    tag = "MCP",
    params(
        ("sessionId" = String, Query, description = "Session id from the endpoint handshake frame")
    ),
    request_body = JsonRpcRequest,
    responses(
        (status = 200, description = "JSON-RPC response for the posted request"),
        (status = 202, description = "Notification accepted, no response"),
        (status = 400, description = "Unknown or missing session id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid connector credential", body = ErrorResponse)
    )
)]
pub async fn post_message(
    State(state): State<AppState>,
    Extension(auth_config): Extension<Arc<AuthConfig>>,
    Query(query): Query<MessagesQuery>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Response {
    if let Err(response) = require_connector_auth(&auth_config, &headers) {
        return response;
    }

    let Some(session_id) = query.session_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("sessionId query parameter required")),
        )
            .into_response();
    };

    // The client is likely replaying a stale id or racing a teardown;
    // a client error, not a server fault.
    let Some(session) = state.sessions().lookup(&session_id) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("No session for the given sessionId")),
        )
            .into_response();
    };

    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            let response = JsonRpcResponse::error(None, -32700, format!("Parse error: {e}"));
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };

    debug!(
        "Message for session {}: method={}",
        session.id(),
        request.method
    );

    match McpHandler::handle_request(&state, request).await {
        Some(response) => {
            // Mirror the response up the open stream; if the stream is
            // already gone the frame is dropped and the synchronous
            // body still answers.
            if let Ok(frame) = serde_json::to_string(&response) {
                session.send(McpEvent::JsonRpc(frame));
            }
            (StatusCode::OK, Json(response)).into_response()
        }
        None => StatusCode::ACCEPTED.into_response(),
    }
}
