//! Error types for the Kula exchange.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for exchange operations.
#[derive(Error, Debug, Clone)]
pub enum ExchangeError {
    /// Intent wants and offers the same item.
    #[error("Self-trade rejected: {participant} both wants and offers \"{item}\"")]
    SelfTrade { participant: String, item: String },

    /// A required intent field is empty.
    #[error("Intent rejected: field '{field}' must not be empty")]
    EmptyField { field: String },

    /// A solver pass is already in flight.
    #[error("A solver pass is already running")]
    AlreadyRunning,

    /// The pool has nothing to solve over.
    #[error("Intent pool is empty")]
    EmptyPool,

    /// An intent id appears in more than one match of a single commit.
    #[error("Intent {intent_id} appears in more than one match")]
    DuplicateParticipant { intent_id: Uuid },

    /// Resource not found.
    #[error("Resource not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Connection error (client transport).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Internal error (should not happen).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExchangeError {
    /// Returns true if this error is a submission-time rejection the caller
    /// can fix by amending the intent.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ExchangeError::SelfTrade { .. } | ExchangeError::EmptyField { .. }
        )
    }

    /// Returns true if the caller may simply retry later.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ExchangeError::SelfTrade { .. } => true,
            ExchangeError::EmptyField { .. } => true,
            ExchangeError::AlreadyRunning => true,
            ExchangeError::EmptyPool => true,
            ExchangeError::Connection(_) => true,
            _ => false,
        }
    }
}

/// Convenience Result type for exchange operations.
pub type Result<T> = std::result::Result<T, ExchangeError>;

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::Serialization(err.to_string())
    }
}
