//! Intent pool implementations.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use kula_core::{Intent, IntentDraft, Result};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::snapshot::PoolSnapshot;

/// Trait for intent pools.
#[async_trait]
pub trait IntentPool: Send + Sync {
    /// Validate and admit a draft, minting id, sequence number and
    /// creation timestamp.
    async fn submit(&self, draft: IntentDraft) -> Result<Intent>;

    /// Take an immutable value copy of the open intents, ascending seq.
    async fn snapshot(&self) -> PoolSnapshot;

    /// Remove every open intent whose id is in the set, as one bulk
    /// operation. Unknown ids are ignored. Returns the removed count.
    async fn remove_all(&self, ids: &HashSet<Uuid>) -> usize;

    /// Number of open intents.
    async fn len(&self) -> usize;

    /// Check if the pool has no open intents.
    async fn is_empty(&self) -> bool;
}

/// Mutable pool state behind the lock.
///
/// The registry locks this directly during a commit, so that removal of
/// settled intents and the history append share one critical section.
pub(crate) struct PoolInner {
    /// Open intents in insertion order, which is ascending seq.
    intents: Vec<Intent>,

    /// Next sequence number to mint.
    next_seq: u64,

    /// Mutation counter, carried into snapshots.
    version: u64,
}

impl PoolInner {
    fn new() -> Self {
        Self {
            intents: Vec::new(),
            next_seq: 1,
            version: 0,
        }
    }

    fn admit(&mut self, draft: IntentDraft) -> Intent {
        let intent = Intent {
            id: Uuid::new_v4(),
            seq: self.next_seq,
            participant: draft.participant,
            wanted: draft.wanted,
            offered: draft.offered,
            created_at: Utc::now(),
        };

        self.next_seq += 1;
        self.version += 1;
        self.intents.push(intent.clone());
        intent
    }

    pub(crate) fn remove_all(&mut self, ids: &HashSet<Uuid>) -> usize {
        let before = self.intents.len();
        self.intents.retain(|intent| !ids.contains(&intent.id));

        let removed = before - self.intents.len();
        if removed > 0 {
            self.version += 1;
        }
        removed
    }

    pub(crate) fn capture(&self) -> PoolSnapshot {
        PoolSnapshot {
            id: Uuid::new_v4(),
            version: self.version,
            taken_at: Utc::now(),
            intents: self.intents.clone(),
        }
    }
}

/// In-memory implementation of [`IntentPool`].
pub struct InMemoryPool {
    inner: Arc<RwLock<PoolInner>>,
}

impl InMemoryPool {
    /// Create a new empty pool.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(PoolInner::new())),
        }
    }

    pub(crate) fn inner(&self) -> &Arc<RwLock<PoolInner>> {
        &self.inner
    }
}

impl Default for InMemoryPool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentPool for InMemoryPool {
    async fn submit(&self, draft: IntentDraft) -> Result<Intent> {
        let draft = draft.normalized()?;

        let mut inner = self.inner.write().await;
        let intent = inner.admit(draft);

        debug!(
            "admitted intent {} from {} (seq {})",
            intent.id, intent.participant, intent.seq
        );

        Ok(intent)
    }

    async fn snapshot(&self) -> PoolSnapshot {
        self.inner.read().await.capture()
    }

    async fn remove_all(&self, ids: &HashSet<Uuid>) -> usize {
        self.inner.write().await.remove_all(ids)
    }

    async fn len(&self) -> usize {
        self.inner.read().await.intents.len()
    }

    async fn is_empty(&self) -> bool {
        self.inner.read().await.intents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kula_core::ExchangeError;

    #[tokio::test]
    async fn test_submit_mints_identity() {
        let pool = InMemoryPool::new();

        let first = pool
            .submit(IntentDraft::new("Alice", "1984", "The Great Gatsby"))
            .await
            .unwrap();
        let second = pool
            .submit(IntentDraft::new("  Bob ", " Dune", "Neuromancer "))
            .await
            .unwrap();

        assert_eq!(first.seq, 1);
        assert_eq!(second.seq, 2);
        assert_ne!(first.id, second.id);
        // Fields are stored trimmed.
        assert_eq!(second.participant, "Bob");
        assert_eq!(second.wanted, "Dune");
        assert_eq!(second.offered, "Neuromancer");
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_drafts() {
        let pool = InMemoryPool::new();

        let err = pool
            .submit(IntentDraft::new("Alice", "1984", "1984"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::SelfTrade { .. }));

        let err = pool
            .submit(IntentDraft::new("Alice", "   ", "1984"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::EmptyField { .. }));

        assert!(pool.is_empty().await);
    }

    #[tokio::test]
    async fn test_snapshot_is_a_value_copy() {
        let pool = InMemoryPool::new();
        pool.submit(IntentDraft::new("Alice", "1984", "The Great Gatsby"))
            .await
            .unwrap();

        let early = pool.snapshot().await;

        pool.submit(IntentDraft::new("Bob", "The Great Gatsby", "1984"))
            .await
            .unwrap();
        let late = pool.snapshot().await;

        // The earlier snapshot does not see the later submission.
        assert_eq!(early.len(), 1);
        assert_eq!(late.len(), 2);
        assert!(late.version > early.version);
        assert_ne!(early.id, late.id);
    }

    #[tokio::test]
    async fn test_snapshot_preserves_insertion_order() {
        let pool = InMemoryPool::new();
        for name in ["Alice", "Bob", "Charlie"] {
            pool.submit(IntentDraft::new(name, format!("w-{name}"), format!("o-{name}")))
                .await
                .unwrap();
        }

        let snapshot = pool.snapshot().await;
        let names: Vec<&str> = snapshot
            .intents
            .iter()
            .map(|intent| intent.participant.as_str())
            .collect();
        let seqs: Vec<u64> = snapshot.intents.iter().map(|intent| intent.seq).collect();

        assert_eq!(names, vec!["Alice", "Bob", "Charlie"]);
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_remove_all_ignores_unknown_ids() {
        let pool = InMemoryPool::new();
        let keep = pool
            .submit(IntentDraft::new("Alice", "1984", "The Great Gatsby"))
            .await
            .unwrap();
        let gone = pool
            .submit(IntentDraft::new("Bob", "The Great Gatsby", "1984"))
            .await
            .unwrap();

        let mut ids = HashSet::new();
        ids.insert(gone.id);
        ids.insert(Uuid::new_v4());

        let removed = pool.remove_all(&ids).await;

        assert_eq!(removed, 1);
        assert_eq!(pool.len().await, 1);
        assert_eq!(pool.snapshot().await.intents[0].id, keep.id);
    }
}
