//! The exchange facade.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use kula_core::{
    ExchangeError, ExchangeEvent, Intent, IntentDraft, Match, Result, SolveReport, SolverState,
};
use kula_pool::{EventBus, InMemoryPool, IntentPool, MatchRegistry, PoolSnapshot};
use kula_solver::{GreedySolver, Solver, SolverConfig};
use tokio::sync::broadcast;
use tracing::{error, info};

use crate::controller::RunController;

/// Configuration for an exchange.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    /// Artificial delay before the solve step of a pass. Zero by default;
    /// raise it to watch a pass unfold through the event stream.
    pub solve_delay: Duration,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            solve_delay: Duration::ZERO,
        }
    }
}

/// Pool, solver, registry and run controller wired together.
///
/// This is the whole public surface of the exchange: submit intents,
/// trigger solver passes, observe the outcome. A pass runs in a spawned
/// task against the snapshot taken at trigger time; everything submitted
/// afterwards waits for the next pass.
pub struct Exchange {
    pool: InMemoryPool,
    registry: MatchRegistry,
    solver: Box<dyn Solver>,
    controller: RunController,
    events: EventBus,
    config: ExchangeConfig,
}

impl Exchange {
    /// Create an exchange with the default greedy solver and configuration.
    pub fn new() -> Self {
        Self::with_config(ExchangeConfig::default())
    }

    /// Create an exchange with custom configuration.
    pub fn with_config(config: ExchangeConfig) -> Self {
        Self {
            pool: InMemoryPool::new(),
            registry: MatchRegistry::new(),
            solver: Box::new(GreedySolver::new()),
            controller: RunController::new(),
            events: EventBus::new(),
            config,
        }
    }

    /// Replace the default solver.
    pub fn with_solver(mut self, solver: Box<dyn Solver>) -> Self {
        self.solver = solver;
        self
    }

    /// Validate and admit a draft intent into the pool.
    pub async fn submit_intent(&self, draft: IntentDraft) -> Result<Intent> {
        let intent = self.pool.submit(draft).await?;

        self.events.publish(ExchangeEvent::IntentSubmitted {
            intent: intent.clone(),
        });

        Ok(intent)
    }

    /// Trigger a solver pass and return its run id without waiting for it.
    ///
    /// Checks run in a fixed order: the single-flight gate first
    /// (`AlreadyRunning`), then pool emptiness (`EmptyPool`). On success
    /// the pass runs in a spawned task against the snapshot taken here.
    pub async fn request_solve(self: &Arc<Self>) -> Result<u64> {
        let run_id = self.controller.try_begin().await?;

        let snapshot = self.pool.snapshot().await;
        if snapshot.is_empty() {
            self.controller.release();
            return Err(ExchangeError::EmptyPool);
        }

        info!(
            "solver run {} started over {} intents",
            run_id,
            snapshot.len()
        );
        self.events.publish(ExchangeEvent::SolveStarted {
            run_id,
            snapshot_len: snapshot.len(),
        });

        let exchange = Arc::clone(self);
        tokio::spawn(async move {
            exchange.run_pass(run_id, snapshot).await;
        });

        Ok(run_id)
    }

    /// Execute one pass to completion. Runs in its own task; a started
    /// pass is never cancelled.
    async fn run_pass(self: Arc<Self>, run_id: u64, snapshot: PoolSnapshot) {
        let started_at = Utc::now();

        if !self.config.solve_delay.is_zero() {
            tokio::time::sleep(self.config.solve_delay).await;
        }

        match self.solve_and_commit(&snapshot).await {
            Ok((matches, removed)) => {
                let report = SolveReport {
                    run_id,
                    snapshot_id: snapshot.id,
                    snapshot_len: snapshot.len(),
                    started_at,
                    finished_at: Utc::now(),
                    matches,
                    removed,
                    error: None,
                };
                info!(
                    "solver run {} settled {} matches, removed {} intents",
                    run_id,
                    report.matches.len(),
                    removed
                );
                self.controller.finish(report.clone()).await;
                self.events.publish(ExchangeEvent::SolveCompleted { report });
            }
            Err(e) => {
                let message = e.to_string();
                error!("solver run {} failed: {}", run_id, message);
                let report = SolveReport {
                    run_id,
                    snapshot_id: snapshot.id,
                    snapshot_len: snapshot.len(),
                    started_at,
                    finished_at: Utc::now(),
                    matches: Vec::new(),
                    removed: 0,
                    error: Some(message.clone()),
                };
                self.controller.finish(report).await;
                self.events
                    .publish(ExchangeEvent::SolveFailed { run_id, message });
            }
        }
    }

    /// Solve against the snapshot and commit the batch. On any error the
    /// pool and history are left exactly as they were.
    async fn solve_and_commit(&self, snapshot: &PoolSnapshot) -> Result<(Vec<Match>, usize)> {
        let matches = self.solver.solve(&snapshot.intents).await?;
        let receipt = self.registry.commit(&self.pool, matches.clone()).await?;
        Ok((matches, receipt.removed))
    }

    /// Open intents in submission order.
    pub async fn pool_view(&self) -> Vec<Intent> {
        self.pool.snapshot().await.intents
    }

    /// Number of open intents.
    pub async fn pool_len(&self) -> usize {
        self.pool.len().await
    }

    /// Settled matches, oldest first.
    pub async fn match_history(&self) -> Vec<Match> {
        self.registry.history().await
    }

    /// Current solver state.
    pub fn solver_state(&self) -> SolverState {
        self.controller.state()
    }

    /// Check if a pass is in flight.
    pub fn is_solver_running(&self) -> bool {
        self.controller.is_running()
    }

    /// Report of the most recently finished pass, if any.
    pub async fn last_report(&self) -> Option<SolveReport> {
        self.controller.last_report().await
    }

    /// Subscribe to exchange events.
    pub fn subscribe(&self) -> broadcast::Receiver<ExchangeEvent> {
        self.events.subscribe()
    }

    /// Wait until no pass is in flight.
    pub async fn wait_until_idle(&self) {
        let mut rx = self.controller.watch_state();
        let _ = rx.wait_for(|state| !state.is_running()).await;
    }

    /// Name of the installed solver.
    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Configuration of the installed solver.
    pub fn solver_config(&self) -> &SolverConfig {
        self.solver.config()
    }

    /// The exchange configuration.
    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }
}

impl Default for Exchange {
    fn default() -> Self {
        Self::new()
    }
}
