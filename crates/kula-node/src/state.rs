//! Application state.

use std::sync::Arc;

use kula_exchange::Exchange;

/// Shared application state.
///
/// Every endpoint goes through the exchange facade; the node itself keeps
/// no state of its own.
#[derive(Clone)]
pub struct AppState {
    /// The exchange behind the API.
    pub exchange: Arc<Exchange>,
}

impl AppState {
    /// Create state with a default exchange.
    pub fn new() -> Self {
        Self::with_exchange(Exchange::new())
    }

    /// Create state around a configured exchange.
    pub fn with_exchange(exchange: Exchange) -> Self {
        Self {
            exchange: Arc::new(exchange),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
