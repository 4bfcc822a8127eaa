//! Client execution logic with reconnection support.

use crate::domain::{MAX_RECONNECT_ATTEMPTS, ReconnectState};
use crate::error::ClientError;
use crate::session::{SessionEnd, run_client_session};

/// Run the WebSocket client with bounded-backoff reconnection
///
/// A clean, user-initiated exit ends the loop without reconnecting. An
/// unclean close or connect failure schedules exactly one reconnect delay;
/// after the attempts are exhausted the failure is terminal and the caller
/// must trigger a new run explicitly.
pub async fn run_client(url: String, username: String) -> Result<(), ClientError> {
    let mut state = ReconnectState::new();

    loop {
        state.on_connecting();
        tracing::info!("Connecting to {} as '{}'", url, username);

        match run_client_session(&url, &username).await {
            Ok(SessionEnd::UserExit) => {
                state.on_clean_close();
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Ok(SessionEnd::ConnectionLost) => {
                // The connection did open, so the reconnect budget starts over
                state.on_open();
                tracing::warn!("Connection lost");
            }
            Err(e) => {
                tracing::warn!("Connection failed: {}", e);
            }
        }

        match state.on_unclean_close() {
            Some(delay) => {
                tracing::info!(
                    "Reconnecting in {:?} (attempt {}/{})",
                    delay,
                    state.attempts(),
                    MAX_RECONNECT_ATTEMPTS
                );
                tokio::time::sleep(delay).await;
            }
            None => {
                tracing::error!(
                    "Failed to reconnect after {} attempts. Giving up.",
                    MAX_RECONNECT_ATTEMPTS
                );
                return Err(ClientError::ReconnectExhausted(MAX_RECONNECT_ATTEMPTS));
            }
        }
    }
}
