//! HTTP and WebSocket API surface.

pub mod health;
pub mod intent;
pub mod solve;
pub mod ws;
