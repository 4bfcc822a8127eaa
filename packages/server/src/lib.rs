//! WebSocket chat broadcast server library.
//!
//! Clients connect over a persistent WebSocket, announce a display name,
//! receive recent message history, and exchange messages that are fanned out
//! to all currently connected clients.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
