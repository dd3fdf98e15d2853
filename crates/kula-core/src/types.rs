//! Common types used across the Kula exchange.

use serde::{Deserialize, Serialize};

use crate::intent::Intent;
use crate::settlement::SolveReport;

/// State of the solver run controller.
///
/// At most one pass is in flight at any time; a trigger while `Running`
/// is rejected, never queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverState {
    /// No pass in flight; a trigger will start one.
    Idle,
    /// A pass is executing against its snapshot.
    Running,
}

impl SolverState {
    /// Returns true if a pass is currently in flight.
    pub fn is_running(&self) -> bool {
        matches!(self, SolverState::Running)
    }
}

/// Events broadcast to observers of the exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExchangeEvent {
    /// An intent entered the pool.
    IntentSubmitted { intent: Intent },

    /// A solver pass began against a snapshot.
    SolveStarted { run_id: u64, snapshot_len: usize },

    /// A solver pass committed; the report carries its matches.
    SolveCompleted { report: SolveReport },

    /// A solver pass aborted; the pool and history are unchanged.
    SolveFailed { run_id: u64, message: String },
}

/// Discriminant of an [`ExchangeEvent`], used for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    IntentSubmitted,
    SolveStarted,
    SolveCompleted,
    SolveFailed,
}

impl EventKind {
    /// Parse the wire label of an event kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "intent_submitted" => Some(EventKind::IntentSubmitted),
            "solve_started" => Some(EventKind::SolveStarted),
            "solve_completed" => Some(EventKind::SolveCompleted),
            "solve_failed" => Some(EventKind::SolveFailed),
            _ => None,
        }
    }

    /// The wire label of this event kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::IntentSubmitted => "intent_submitted",
            EventKind::SolveStarted => "solve_started",
            EventKind::SolveCompleted => "solve_completed",
            EventKind::SolveFailed => "solve_failed",
        }
    }
}

impl ExchangeEvent {
    /// The kind discriminant of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            ExchangeEvent::IntentSubmitted { .. } => EventKind::IntentSubmitted,
            ExchangeEvent::SolveStarted { .. } => EventKind::SolveStarted,
            ExchangeEvent::SolveCompleted { .. } => EventKind::SolveCompleted,
            ExchangeEvent::SolveFailed { .. } => EventKind::SolveFailed,
        }
    }
}
