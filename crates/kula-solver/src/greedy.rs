//! Greedy first-found cycle solver.

use async_trait::async_trait;
use kula_core::{Intent, Match, Result};
use tracing::{debug, info};

use crate::graph::CompatGraph;
use crate::solver::{Solver, SolverConfig};

/// Greedy cycle solver.
///
/// Works the snapshot in two stages, shortest cycles first: direct swaps
/// (length 2), then closed cycles of increasing length up to the configured
/// bound. Anchors are scanned in snapshot order and the first cycle found
/// for an anchor wins - no attempt is made to find an alternative assignment
/// that might settle more intents overall. An intent claimed by an earlier
/// stage is invisible to later ones, which is what makes the result
/// vertex-disjoint by construction.
///
/// The search never yields: one pass computes atomically against the
/// snapshot it was given.
pub struct GreedySolver {
    config: SolverConfig,
}

impl GreedySolver {
    /// Create a new greedy solver with default configuration.
    pub fn new() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Create a new greedy solver with custom configuration. A cycle-length
    /// bound below 2 is raised to 2, the shortest settleable cycle.
    pub fn with_config(mut config: SolverConfig) -> Self {
        config.max_cycle_len = config.max_cycle_len.max(2);
        Self { config }
    }

    fn find_cycles(&self, intents: &[Intent]) -> Result<Vec<Match>> {
        let mut matches = Vec::new();
        if intents.len() < 2 {
            return Ok(matches);
        }

        let graph = CompatGraph::build(intents);
        debug!(
            "compatibility graph: {} vertices, {} edges",
            graph.len(),
            graph.edge_count()
        );

        // The used set lives and dies with this pass.
        let mut used = vec![false; intents.len()];

        // Stage 1: direct swaps. Partners are only sought after the anchor;
        // an earlier partner would already have claimed the pair.
        for i in 0..intents.len() {
            if used[i] {
                continue;
            }
            for j in (i + 1)..intents.len() {
                if used[j] {
                    continue;
                }
                if graph.has_edge(i, j) && graph.has_edge(j, i) {
                    used[i] = true;
                    used[j] = true;
                    matches.push(Match::settle(vec![
                        intents[i].clone(),
                        intents[j].clone(),
                    ])?);
                    break;
                }
            }
        }

        // Stage 2: longer cycles, shortest length first. Unlike stage 1 the
        // extension candidates range over the whole snapshot, because cycle
        // membership is not symmetric in index order.
        for target_len in 3..=self.config.max_cycle_len {
            for anchor in 0..intents.len() {
                if used[anchor] {
                    continue;
                }
                let mut path = vec![anchor];
                if extend_cycle(&graph, &used, &mut path, target_len) {
                    for &idx in &path {
                        used[idx] = true;
                    }
                    matches.push(Match::settle(
                        path.iter().map(|&idx| intents[idx].clone()).collect(),
                    )?);
                }
            }
        }

        Ok(matches)
    }
}

/// Depth-first extension of `path` to a closed cycle of exactly
/// `target_len` vertices. Candidates are tried in ascending snapshot order,
/// so the first cycle reported is the deterministic first-found one.
/// Returns true with `path` holding the cycle, or false with `path`
/// restored to its entry state.
fn extend_cycle(
    graph: &CompatGraph,
    used: &[bool],
    path: &mut Vec<usize>,
    target_len: usize,
) -> bool {
    let last = path[path.len() - 1];

    if path.len() == target_len {
        return graph.has_edge(last, path[0]);
    }

    for &next in graph.neighbors(last) {
        if used[next] || path.contains(&next) {
            continue;
        }
        path.push(next);
        if extend_cycle(graph, used, path, target_len) {
            return true;
        }
        path.pop();
    }

    false
}

impl Default for GreedySolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Solver for GreedySolver {
    async fn solve(&self, intents: &[Intent]) -> Result<Vec<Match>> {
        let matches = self.find_cycles(intents)?;
        info!(
            "greedy pass over {} intents settled {} matches ({} intents)",
            intents.len(),
            matches.len(),
            matches.iter().map(Match::len).sum::<usize>()
        );
        Ok(matches)
    }

    fn name(&self) -> &str {
        "greedy-cycle"
    }

    fn config(&self) -> &SolverConfig {
        &self.config
    }
}
