//! Application state management.

use crate::fleet::FleetClient;
use crate::mcp::SessionRegistry;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Client for the upstream fleet-tracking API
    fleet: FleetClient,
    /// Open streaming sessions, keyed by session id
    sessions: SessionRegistry,
}

impl AppState {
    pub fn new(fleet: FleetClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                fleet,
                sessions: SessionRegistry::new(),
            }),
        }
    }

    pub fn fleet(&self) -> &FleetClient {
        &self.inner.fleet
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.inner.sessions
    }
}
