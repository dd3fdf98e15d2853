//! Point-in-time pool snapshots.

use chrono::{DateTime, Utc};
use kula_core::Intent;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An immutable value copy of the pool's open intents.
///
/// A snapshot is the only view of the pool a solver pass ever sees: intents
/// submitted after it was taken are invisible to that pass. Intents are
/// carried in ascending `seq` order, which is what makes solver output
/// reproducible for a given snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// Unique ID for this snapshot.
    pub id: Uuid,

    /// Pool version at snapshot time.
    pub version: u64,

    /// Timestamp when the snapshot was taken.
    pub taken_at: DateTime<Utc>,

    /// Open intents at snapshot time, ascending seq.
    pub intents: Vec<Intent>,
}

impl PoolSnapshot {
    /// Look up an intent by id.
    pub fn find(&self, id: Uuid) -> Option<&Intent> {
        self.intents.iter().find(|intent| intent.id == id)
    }

    /// Ids of all intents in the snapshot, in snapshot order.
    pub fn ids(&self) -> Vec<Uuid> {
        self.intents.iter().map(|intent| intent.id).collect()
    }

    /// Number of intents captured.
    pub fn len(&self) -> usize {
        self.intents.len()
    }

    /// Check if the snapshot captured an empty pool.
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}
