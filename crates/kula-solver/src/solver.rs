//! Solver trait and configuration.

use async_trait::async_trait;
use kula_core::{Intent, Match, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Maximum cycle length the search will close. The minimum meaningful
    /// value is 2 (direct swaps); each additional length multiplies the
    /// worst-case search cost by the pool size.
    pub max_cycle_len: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { max_cycle_len: 3 }
    }
}

/// Trait for cycle-matching engines.
///
/// A solver receives one immutable snapshot slice per pass and returns
/// vertex-disjoint matches over it. Implementations must be deterministic:
/// the same snapshot, in the same order, yields the identical match set on
/// every invocation.
#[async_trait]
pub trait Solver: Send + Sync {
    /// Discover a disjoint set of settleable cycles over the snapshot.
    async fn solve(&self, intents: &[Intent]) -> Result<Vec<Match>>;

    /// Short name of the solver implementation.
    fn name(&self) -> &str;

    /// Get the solver configuration.
    fn config(&self) -> &SolverConfig;
}
