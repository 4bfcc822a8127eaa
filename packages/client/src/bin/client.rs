//! WebSocket chat client with display name and reconnection support.
//!
//! Connects to a chat server, announces a display name, shows recent message
//! history, and sends messages from stdin. Automatically reconnects on
//! disconnection (max 5 attempts with exponential backoff, capped at 10
//! seconds). A Ctrl+C / Ctrl+D exit never reconnects.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-client -- --username Alice
//! cargo run --bin hiroba-client -- -n Bob
//! ```

use clap::Parser;

use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "WebSocket chat client with broadcast support", long_about = None)]
struct Args {
    /// Display name announced to the chat
    #[arg(short = 'n', long)]
    username: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = hiroba_client::run_client(args.url, args.username).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
