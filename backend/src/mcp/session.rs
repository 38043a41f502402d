//! MCP session management.
//!
//! Owns the set of currently open streaming sessions. A session is one
//! open SSE connection to one client, identified by a generated id the
//! client learns from the `endpoint` handshake frame. Inbound
//! `POST /messages` requests are correlated to the matching session via
//! that id; a session is removed when its stream closes.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

/// Frames that can be written to a session's output sink.
#[derive(Clone, Debug)]
pub enum McpEvent {
    /// The handshake frame telling the client where to post messages.
    Endpoint(String),
    /// A serialized JSON-RPC message.
    JsonRpc(String),
}

/// Sending half of one session, kept in the registry.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    id: String,
    event_tx: mpsc::UnboundedSender<McpEvent>,
}

impl SessionHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Write a framed message to the session's open stream.
    ///
    /// Returns false when the receiving side is already gone; the frame
    /// is dropped silently in that case.
    pub fn send(&self, event: McpEvent) -> bool {
        self.event_tx.send(event).is_ok()
    }
}

/// Registry of open streaming sessions.
///
/// The only mutable shared state in the process. Mutated by
/// session-open (insert) and stream-close (remove), read by
/// message-post (lookup); all three are single map operations under the
/// lock, so each is atomic with respect to the others. The lock is
/// never held across an await point.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new session.
    ///
    /// Generates a fresh unique id, inserts the sending half into the
    /// registry and returns the receiving half, to be bound to the
    /// connection's event stream. The id is never returned to the HTTP
    /// caller directly; clients learn it from the handshake frame,
    /// which is queued before the handle is published so it is always
    /// the first thing on the stream.
    pub fn open(&self, messages_path: &str) -> OpenSession {
        let id = Uuid::new_v4().to_string();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let handle = SessionHandle {
            id: id.clone(),
            event_tx,
        };
        handle.send(McpEvent::Endpoint(format!("{messages_path}?sessionId={id}")));
        self.sessions.write().insert(id.clone(), handle);
        info!("Opened session {id}");
        OpenSession {
            id,
            event_rx,
            registry: self.clone(),
        }
    }

    /// Look up the session for an inbound message.
    pub fn lookup(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.read().get(id).cloned()
    }

    /// Check if a session is currently open.
    pub fn contains(&self, id: &str) -> bool {
        self.sessions.read().contains_key(id)
    }

    /// Number of currently open sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    fn remove(&self, id: &str) {
        if self.sessions.write().remove(id).is_some() {
            info!("Closed session {id}");
        }
    }
}

/// Receiving half of one open session, held by the SSE response.
///
/// Yields the frames written to the session's sink. Dropping it
/// (graceful close, client disconnect or transport error alike) removes
/// the session from the registry. Teardown is bound to `Drop`, so it
/// fires exactly once however the connection ends.
pub struct OpenSession {
    id: String,
    event_rx: mpsc::UnboundedReceiver<McpEvent>,
    registry: SessionRegistry,
}

impl OpenSession {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl futures::Stream for OpenSession {
    type Item = McpEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<McpEvent>> {
        self.get_mut().event_rx.poll_recv(cx)
    }
}

impl Drop for OpenSession {
    fn drop(&mut self) {
        self.registry.remove(&self.id);
    }
}
