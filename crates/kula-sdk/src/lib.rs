//! # Kula SDK
//!
//! Client library for Kula exchange nodes. [`KulaClient`] wraps the REST API
//! for submitting intents, triggering solver passes, and reading pool and
//! match state; [`EventStream`] subscribes to the node's live event feed.

pub mod client;
pub mod stream;

pub use client::{KulaClient, SolveReceipt, SolverStatus, SubmitReceipt};
pub use stream::EventStream;

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::client::KulaClient;
    pub use crate::stream::EventStream;
    pub use kula_core::prelude::*;
}
