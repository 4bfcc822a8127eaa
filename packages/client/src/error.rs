//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The connect attempt did not complete within the setup timeout
    #[error("Connection timed out after {0} seconds")]
    ConnectTimeout(u64),

    /// Transport-level connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// All automatic reconnect attempts are exhausted
    #[error("Failed to reconnect after {0} attempts")]
    ReconnectExhausted(u32),
}
