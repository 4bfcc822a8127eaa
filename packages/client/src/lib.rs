//! WebSocket chat client implementation.
//!
//! Owns a single connection's lifecycle: connect, join, receive
//! history/events, detect closure, and reconnect with bounded exponential
//! backoff.

pub mod domain;
pub mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
