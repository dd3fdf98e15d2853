//! Single-flight solver run control.

use kula_core::{ExchangeError, Result, SolveReport, SolverState};
use tokio::sync::{watch, RwLock};
use tracing::debug;

/// Gate and state machine for solver passes.
///
/// Enforces the single-flight rule: at most one pass in flight, and a
/// trigger while one is running is rejected with `AlreadyRunning`, never
/// queued. State lives in a watch channel so callers can await transitions
/// instead of polling.
pub struct RunController {
    state: watch::Sender<SolverState>,
    run_seq: RwLock<u64>,
    last_report: RwLock<Option<SolveReport>>,
}

impl RunController {
    /// Create a controller in the `Idle` state.
    pub fn new() -> Self {
        let (state, _) = watch::channel(SolverState::Idle);
        Self {
            state,
            run_seq: RwLock::new(0),
            last_report: RwLock::new(None),
        }
    }

    /// Try to begin a pass.
    ///
    /// Returns the run id for the pass, or `AlreadyRunning` if one is
    /// already in flight. The Idle-to-Running flip is a compare-and-swap
    /// on the watch channel, so two concurrent triggers produce exactly
    /// one winner.
    pub async fn try_begin(&self) -> Result<u64> {
        let acquired = self.state.send_if_modified(|state| {
            if state.is_running() {
                false
            } else {
                *state = SolverState::Running;
                true
            }
        });

        if !acquired {
            return Err(ExchangeError::AlreadyRunning);
        }

        let mut seq = self.run_seq.write().await;
        *seq += 1;
        debug!("solver run {} acquired the gate", *seq);
        Ok(*seq)
    }

    /// Abandon a begun pass that never ran, e.g. because the snapshot
    /// turned out to be empty.
    pub fn release(&self) {
        self.state.send_replace(SolverState::Idle);
    }

    /// Record the outcome of a pass and return to `Idle`.
    ///
    /// The report is stored before the state flips, so an observer woken
    /// by the transition always finds it.
    pub async fn finish(&self, report: SolveReport) {
        *self.last_report.write().await = Some(report);
        self.state.send_replace(SolverState::Idle);
    }

    /// Current controller state.
    pub fn state(&self) -> SolverState {
        *self.state.borrow()
    }

    /// Check if a pass is in flight.
    pub fn is_running(&self) -> bool {
        self.state.borrow().is_running()
    }

    /// Watch state transitions.
    pub fn watch_state(&self) -> watch::Receiver<SolverState> {
        self.state.subscribe()
    }

    /// Report of the most recently finished pass, if any.
    pub async fn last_report(&self) -> Option<SolveReport> {
        self.last_report.read().await.clone()
    }
}

impl Default for RunController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn report(run_id: u64) -> SolveReport {
        SolveReport {
            run_id,
            snapshot_id: Uuid::new_v4(),
            snapshot_len: 0,
            started_at: Utc::now(),
            finished_at: Utc::now(),
            matches: Vec::new(),
            removed: 0,
            error: None,
        }
    }

    #[tokio::test]
    async fn test_single_flight_gate() {
        let controller = RunController::new();

        let run_id = controller.try_begin().await.unwrap();
        assert_eq!(run_id, 1);
        assert!(controller.is_running());

        let err = controller.try_begin().await.unwrap_err();
        assert!(matches!(err, ExchangeError::AlreadyRunning));

        controller.finish(report(run_id)).await;
        assert!(!controller.is_running());
        assert_eq!(controller.try_begin().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_triggers_have_one_winner() {
        let controller = RunController::new();

        let (a, b) = tokio::join!(controller.try_begin(), controller.try_begin());

        assert!(a.is_ok() != b.is_ok());
        assert!(controller.is_running());
    }

    #[tokio::test]
    async fn test_release_discards_the_pass() {
        let controller = RunController::new();

        controller.try_begin().await.unwrap();
        controller.release();

        assert_eq!(controller.state(), SolverState::Idle);
        assert!(controller.last_report().await.is_none());
        // The abandoned run id is not reused.
        assert_eq!(controller.try_begin().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_finish_stores_the_report() {
        let controller = RunController::new();
        let run_id = controller.try_begin().await.unwrap();

        controller.finish(report(run_id)).await;

        let last = controller.last_report().await.unwrap();
        assert_eq!(last.run_id, run_id);
        assert!(last.succeeded());
    }

    #[tokio::test]
    async fn test_watch_observes_transitions() {
        let controller = RunController::new();
        let mut rx = controller.watch_state();

        controller.try_begin().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_running());

        controller.finish(report(1)).await;
        rx.changed().await.unwrap();
        assert!(!rx.borrow_and_update().is_running());
    }
}
