//! Compatibility graph over a pool snapshot.

use kula_core::Intent;

/// Directed compatibility graph over the intents of one snapshot, addressed
/// by snapshot index. An edge i → j means intent i's wanted item is what
/// intent j offers, so j can give to i.
///
/// The graph is derived fresh for each solver pass and discarded afterwards;
/// it is never persisted.
#[derive(Debug, Clone)]
pub struct CompatGraph {
    adj: Vec<Vec<usize>>,
}

impl CompatGraph {
    /// Build the adjacency from a snapshot slice.
    ///
    /// Each adjacency list is in ascending snapshot order - the same relative
    /// order as the input - so downstream scans inherit the snapshot's
    /// deterministic ordering rather than any hash-map iteration order.
    /// Self-edges are excluded by construction.
    pub fn build(intents: &[Intent]) -> Self {
        let mut adj = vec![Vec::new(); intents.len()];

        for (i, intent) in intents.iter().enumerate() {
            for (j, other) in intents.iter().enumerate() {
                if i != j && intent.wants_offer_of(other) {
                    adj[i].push(j);
                }
            }
        }

        Self { adj }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.adj.len()
    }

    /// Check if the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.adj.is_empty()
    }

    /// Total number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adj.iter().map(Vec::len).sum()
    }

    /// Vertices that can give to `i`, in ascending snapshot order.
    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.adj[i]
    }

    /// Check for the directed edge a → b.
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        // Adjacency lists are ascending by construction.
        self.adj[a].binary_search(&b).is_ok()
    }
}
