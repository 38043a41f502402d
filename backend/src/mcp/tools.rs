//! Fleet query tools.
//!
//! Each tool validates its input against its declared shape, builds a
//! fleet query and proxies it to the upstream API. Results come back as
//! a single text content block containing the upstream JSON verbatim.
//! No retries: a downstream failure surfaces as a tool-execution error
//! and the session stays open.

use crate::fleet::FleetError;
use crate::state::AppState;
use fleetbridge_types::api::{EventsParams, LastLocationParams};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

/// Errors from tool dispatch and execution.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid tool input: {0}")]
    InvalidParams(String),
    #[error(transparent)]
    Fleet(#[from] FleetError),
}

impl ToolError {
    /// JSON-RPC error code for this failure.
    pub fn code(&self) -> i32 {
        match self {
            ToolError::UnknownTool(_) | ToolError::InvalidParams(_) => -32602,
            ToolError::Fleet(_) => -32603,
        }
    }
}

/// Tool call parameters from MCP.
#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

/// Handle a tools/call request.
pub async fn call_tool(state: &AppState, params: Value) -> Result<Value, ToolError> {
    let call: ToolCallParams =
        serde_json::from_value(params).map_err(|e| ToolError::InvalidParams(e.to_string()))?;
    let args = call.arguments.unwrap_or_else(|| json!({}));

    let data = match call.name.as_str() {
        "list_vehicles" => {
            info!("Listing vehicles");
            state.fleet().fetch_json("/api/vehicles", &[]).await?
        }

        "last_location" => {
            let input: LastLocationParams = parse_args(args)?;
            info!("Fetching last location for device {}", input.device_id);
            state
                .fleet()
                .fetch_json(
                    &format!("/api/vehicles/{}/last-location", input.device_id),
                    &[],
                )
                .await?
        }

        "events" => {
            let input: EventsParams = parse_args(args)?;
            require_rfc3339("start", &input.start)?;
            require_rfc3339("end", &input.end)?;
            info!("Fetching events from {} to {}", input.start, input.end);
            state
                .fleet()
                .fetch_json(
                    "/api/events",
                    &[
                        ("start", Some(input.start.clone())),
                        ("end", Some(input.end.clone())),
                        ("deviceId", input.device_id.clone()),
                    ],
                )
                .await?
        }

        other => return Err(ToolError::UnknownTool(other.to_string())),
    };

    // Wrap the upstream JSON in MCP content format.
    Ok(json!({
        "content": [{
            "type": "text",
            "text": data.to_string()
        }]
    }))
}

/// The declared tool set, as returned by tools/list.
pub fn tool_definitions() -> Value {
    json!([
        {
            "name": "list_vehicles",
            "title": "List vehicles",
            "description": "Return vehicles in the account",
            "inputSchema": {
                "type": "object",
                "properties": {},
                "required": []
            }
        },
        {
            "name": "last_location",
            "title": "Last known location",
            "description": "Get the last GPS point for a device",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "deviceId": {
                        "type": "string",
                        "description": "Device identifier"
                    }
                },
                "required": ["deviceId"]
            }
        },
        {
            "name": "events",
            "title": "Events by time window",
            "description": "Ignition, speeding, idling and other events in a time window",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "start": {
                        "type": "string",
                        "format": "date-time",
                        "description": "Window start, ISO-8601"
                    },
                    "end": {
                        "type": "string",
                        "format": "date-time",
                        "description": "Window end, ISO-8601"
                    },
                    "deviceId": {
                        "type": "string",
                        "description": "Optional device filter"
                    }
                },
                "required": ["start", "end"]
            }
        }
    ])
}

fn parse_args<T: serde::de::DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidParams(e.to_string()))
}

fn require_rfc3339(field: &str, value: &str) -> Result<(), ToolError> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|_| ())
        .map_err(|e| ToolError::InvalidParams(format!("{field} must be an ISO-8601 date-time: {e}")))
}
