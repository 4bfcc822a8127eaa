//! Request handlers for the WebSocket and HTTP endpoints.

mod http;
mod websocket;

pub use http::{health_check, service_status};
pub use websocket::websocket_handler;
