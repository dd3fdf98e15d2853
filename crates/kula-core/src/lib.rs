//! # Kula Core
//!
//! Core primitives and types for the Kula barter exchange.
//!
//! This crate provides the fundamental building blocks:
//! - [`Intent`] - Declaration of a wanted/offered item pair
//! - [`Match`] - Settlement record of a closed exchange cycle
//! - [`ExchangeEvent`] - Observer notifications from the exchange
//! - [`ExchangeError`] - Exchange error types

pub mod error;
pub mod intent;
pub mod settlement;
pub mod types;

// Re-exports for convenience
pub use error::{ExchangeError, Result};
pub use intent::{Intent, IntentDraft};
pub use settlement::{Match, MatchKind, SolveReport};
pub use types::{EventKind, ExchangeEvent, SolverState};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{ExchangeError, Result};
    pub use crate::intent::{Intent, IntentDraft};
    pub use crate::settlement::{Match, MatchKind, SolveReport};
    pub use crate::types::{EventKind, ExchangeEvent, SolverState};
}
