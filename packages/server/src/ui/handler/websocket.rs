//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::domain::Timestamp;
use crate::infrastructure::dto::websocket::{ClientFrame, ServerEvent};
use crate::infrastructure::registry::ConnectionId;
use crate::ui::state::AppState;
use crate::usecase::JoinError;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
///
/// This function handles the outbound message flow: events queued for this
/// connection (via the registry's sender channel) are written to the socket
/// in the order they were queued.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Register the connection as an Anonymous session
    let (tx, rx) = mpsc::unbounded_channel();
    let connected_at = Timestamp::new(state.clock.now_millis());
    let id = state.registry.register(tx, connected_at).await;
    tracing::info!("Connection '{}' accepted and registered", id);

    // Greet the new connection before any other event can be queued for it
    state
        .broadcaster
        .send_to(
            id,
            &ServerEvent::Connection {
                message: "Connected to chat server".to_string(),
            },
        )
        .await;

    let mut send_task = pusher_loop(rx, sender);

    // Spawn a task to receive frames from this client
    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_frame(&recv_state, id, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Deregister and announce the departure to the remaining connections
    if let Some(username) = state.disconnect_participant_usecase.execute(id).await {
        tracing::info!("Connection '{}' ({}) disconnected", id, username);
    }
}

/// Interpret one inbound frame for a connection.
///
/// Protocol and validation failures are reported to the originating
/// connection only; the connection stays open and no state changes.
async fn handle_frame(state: &Arc<AppState>, id: ConnectionId, text: &str) {
    let frame = match ClientFrame::parse(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!("Rejected frame from '{}': {}", id, e);
            state
                .broadcaster
                .send_to(id, &ServerEvent::error(e.to_string()))
                .await;
            return;
        }
    };

    match frame {
        ClientFrame::Join { username } => {
            match state.join_chat_usecase.execute(id, &username).await {
                Ok(name) => {
                    tracing::info!("Connection '{}' joined as '{}'", id, name);
                }
                Err(JoinError::InvalidUsername(e)) => {
                    state
                        .broadcaster
                        .send_to(id, &ServerEvent::error(e.to_string()))
                        .await;
                }
                Err(JoinError::SessionNotFound) => {
                    tracing::debug!("Join for unknown connection '{}', ignoring", id);
                }
            }
        }
        ClientFrame::Message { username, message } => {
            match state
                .send_message_usecase
                .execute(id, &username, &message)
                .await
            {
                Ok(sent) => {
                    tracing::info!(
                        "Broadcasting message from '{}': {}",
                        sent.username,
                        sent.body
                    );
                }
                Err(e) => {
                    state
                        .broadcaster
                        .send_to(id, &ServerEvent::error(e.to_string()))
                        .await;
                }
            }
        }
    }
}
