//! MCP (Model Context Protocol) HTTP+SSE support.
//!
//! Implements the MCP HTTP+SSE transport, allowing AI agents to query
//! the fleet-tracking bridge over a long-lived event stream.
//!
//! ## Endpoints
//!
//! - `GET /sse` - Open a streaming session
//! - `POST /messages?sessionId=<id>` - Post a JSON-RPC request into an
//!   open session
//!
//! ## Session Management
//!
//! Sessions are identified by the `sessionId` embedded in the
//! `endpoint` handshake frame, generated when the stream is opened and
//! required for every subsequent message.

pub mod handler;
pub mod session;
pub mod tools;

pub use handler::McpHandler;
pub use session::{McpEvent, OpenSession, SessionRegistry};
