//! WebSocket/HTTP surface of the chat server.

mod handler;
mod server;
mod signal;
mod state;

pub use server::Server;
pub use state::AppState;
