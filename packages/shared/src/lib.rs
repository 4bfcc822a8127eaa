//! Shared utilities for the hiroba chat workspace.
//!
//! Time handling and logging setup used by both the server and the client.

pub mod logger;
pub mod time;
