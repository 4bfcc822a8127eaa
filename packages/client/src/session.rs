//! WebSocket client session management.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use hiroba_server::infrastructure::dto::websocket::{ChatMessageDto, ClientFrame, ServerEvent};

use crate::domain::ChatLog;
use crate::error::ClientError;

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

/// Bounded setup timeout for a connect attempt
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// How a client session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// User-initiated exit (Ctrl+C / Ctrl+D); never reconnect
    UserExit,
    /// The transport closed or failed after the connection was open
    ConnectionLost,
}

/// Run one WebSocket client session
///
/// Connects with a bounded setup timeout, announces the display name, then
/// pumps inbound events and stdin lines until either side terminates.
pub async fn run_client_session(url: &str, username: &str) -> Result<SessionEnd, ClientError> {
    let connect = connect_async(url);
    let (ws_stream, _response) =
        match tokio::time::timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS), connect).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => return Err(ClientError::ConnectionError(e.to_string())),
            Err(_) => return Err(ClientError::ConnectTimeout(CONNECT_TIMEOUT_SECS)),
        };

    tracing::info!("Connected to chat server");

    let (mut write, mut read) = ws_stream.split();

    // Announce the display name as soon as the connection is open
    let join = ClientFrame::Join {
        username: username.to_string(),
    };
    let join_json =
        serde_json::to_string(&join).map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    if let Err(e) = write.send(Message::Text(join_json.into())).await {
        return Err(ClientError::ConnectionError(e.to_string()));
    }

    println!(
        "\nYou are '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        username
    );

    // Spawn a task to handle incoming events
    let username_for_read = username.to_string();
    let mut read_task = tokio::spawn(async move {
        let mut chat_log = ChatLog::new();

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    handle_server_event(&text, &mut chat_log, &username_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let username_for_prompt = username.to_string();
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", username_for_prompt);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to send stdin lines as message frames
    let username_for_write = username.to_string();
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            let frame = ClientFrame::Message {
                username: username_for_write.clone(),
                message: line,
            };

            let json = match serde_json::to_string(&frame) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                write_error = true;
                break;
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut read_task => {
            write_task.abort();
            // The read side only terminates when the transport is gone
            Ok(SessionEnd::ConnectionLost)
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(true);
            if write_error {
                Ok(SessionEnd::ConnectionLost)
            } else {
                // Input channel drained because the user left the readline
                Ok(SessionEnd::UserExit)
            }
        }
    }
}

/// Apply one inbound server event to the local log and display it
fn handle_server_event(text: &str, chat_log: &mut ChatLog, username: &str) {
    let event = match serde_json::from_str::<ServerEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!("Unrecognized server frame: {}", e);
            print!("{}", MessageFormatter::format_raw_message(text));
            redisplay_prompt(username);
            return;
        }
    };

    match event {
        ServerEvent::Connection { message } => {
            print!("{}", MessageFormatter::format_connected(&message));
        }
        ServerEvent::History { messages } => {
            chat_log.replace_history(messages);
            print!("{}", MessageFormatter::format_history(chat_log.messages()));
        }
        ServerEvent::Message {
            username: from,
            message,
            timestamp,
        } => {
            let dto = ChatMessageDto {
                username: from,
                message,
                timestamp,
            };
            // The broadcast echoes our own sends; drop exact duplicates
            if chat_log.append(dto.clone()) {
                print!(
                    "{}",
                    MessageFormatter::format_chat_message(&dto.username, &dto.message, dto.timestamp)
                );
            }
        }
        ServerEvent::System { message, timestamp } => {
            print!("{}", MessageFormatter::format_system(&message, timestamp));
        }
        ServerEvent::Error { message } => {
            print!("{}", MessageFormatter::format_error(&message));
        }
    }

    redisplay_prompt(username);
}
