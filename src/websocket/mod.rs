//! WebSocket transport module
//!
//! Connection lifecycle, reconnection policy, and message dispatch into the
//! capture pipeline.

mod client;
mod manager;

pub use client::{Received, WebSocketClient};
pub use manager::ConnectionManager;
