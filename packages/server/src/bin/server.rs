//! WebSocket chat broadcast server.
//!
//! Accepts persistent WebSocket connections, lets clients announce a display
//! name, replays recent message history on join, and fans out chat messages
//! to all connected clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use hiroba_server::{
    domain::MessageStore,
    infrastructure::{
        broadcast::Broadcaster, history::MessageLog, registry::SessionRegistry,
        store::InMemoryMessageStore,
    },
    ui::{AppState, Server},
    usecase::{DisconnectParticipantUseCase, JoinChatUseCase, SendMessageUseCase},
};
use hiroba_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "WebSocket chat broadcast server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Clock / Store
    // 2. Registry / Broadcaster / MessageLog
    // 3. UseCases
    // 4. AppState / Server

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store: Arc<dyn MessageStore> = Arc::new(InMemoryMessageStore::new());

    let registry = Arc::new(SessionRegistry::new());
    let broadcaster = Arc::new(Broadcaster::new(registry.clone(), clock.clone()));
    let history = Arc::new(MessageLog::new());

    let join_chat_usecase = Arc::new(JoinChatUseCase::new(
        registry.clone(),
        broadcaster.clone(),
        store.clone(),
        history.clone(),
        clock.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        registry.clone(),
        broadcaster.clone(),
        store.clone(),
        history.clone(),
        clock.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        registry.clone(),
        broadcaster.clone(),
        clock.clone(),
    ));

    let server = Server::new(AppState {
        join_chat_usecase,
        send_message_usecase,
        disconnect_participant_usecase,
        registry,
        broadcaster,
        store,
        clock,
    });

    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
