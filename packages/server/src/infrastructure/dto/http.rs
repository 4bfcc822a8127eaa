//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Response body for the service status endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusDto {
    /// Number of currently connected sessions
    pub connected_sessions: usize,
    /// Whether the durable message store is reachable
    pub store_connected: bool,
}
