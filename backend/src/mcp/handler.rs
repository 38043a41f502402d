//! MCP JSON-RPC request handler.
//!
//! Dispatches protocol methods and tool calls against the application
//! state. Every failure is converted into a JSON-RPC error response
//! here; nothing below this layer reaches the transport.

use crate::state::AppState;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::tools;

/// MCP protocol version we support (HTTP+SSE transport).
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC 2.0 Request.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 Response.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// JSON-RPC 2.0 Error.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

/// MCP request handler with direct AppState access.
pub struct McpHandler;

impl McpHandler {
    /// Handle an MCP JSON-RPC request.
    ///
    /// Returns `None` for notifications, which produce no response.
    pub async fn handle_request(
        state: &AppState,
        request: JsonRpcRequest,
    ) -> Option<JsonRpcResponse> {
        let id = request.id.clone();
        debug!("Handling method: {}", request.method);

        match request.method.as_str() {
            "initialize" => Some(Self::handle_initialize(id)),
            "notifications/initialized" | "initialized" => None,
            "ping" => Some(JsonRpcResponse::success(id, json!({}))),
            "tools/list" => Some(JsonRpcResponse::success(
                id,
                json!({ "tools": tools::tool_definitions() }),
            )),
            "tools/call" => {
                let params = request.params.unwrap_or_else(|| json!({}));
                match tools::call_tool(state, params).await {
                    Ok(value) => Some(JsonRpcResponse::success(id, value)),
                    Err(e) => Some(JsonRpcResponse::error(
                        id,
                        e.code(),
                        format!("Tool call failed: {e}"),
                    )),
                }
            }
            "notifications/cancelled" => None,
            _ => Some(JsonRpcResponse::error(
                id,
                -32601,
                format!("Method not found: {}", request.method),
            )),
        }
    }

    /// Handle the initialize request.
    fn handle_initialize(id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "fleetbridge",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }
}
