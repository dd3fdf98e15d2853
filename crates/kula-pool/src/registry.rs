//! Match registry and atomic settlement.

use std::collections::HashSet;
use std::sync::Arc;

use kula_core::{ExchangeError, Match, Result};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::pool::InMemoryPool;

/// Receipt for one committed match batch.
#[derive(Debug, Clone)]
pub struct CommitReceipt {
    /// Ids of the intents the batch settles.
    pub removal: HashSet<Uuid>,

    /// How many of those were actually present in the pool.
    pub removed: usize,
}

/// Owner of the append-only match history.
///
/// The registry is the single writer of settlement effects: a batch of
/// matches leaves the pool and enters the history in one step, so observers
/// never see a match whose intents are still open, or the reverse.
pub struct MatchRegistry {
    history: Arc<RwLock<Vec<Match>>>,
}

impl MatchRegistry {
    /// Create a new registry with an empty history.
    pub fn new() -> Self {
        Self {
            history: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Compute the union of participant ids across a batch.
    ///
    /// Fails with `DuplicateParticipant` if any intent id appears in more
    /// than one place, independently of how the batch was produced.
    pub fn removal_set(matches: &[Match]) -> Result<HashSet<Uuid>> {
        let mut removal = HashSet::new();

        for m in matches {
            for id in m.participant_ids() {
                if !removal.insert(id) {
                    return Err(ExchangeError::DuplicateParticipant { intent_id: id });
                }
            }
        }

        Ok(removal)
    }

    /// Commit a batch: remove its intents from the pool and append the
    /// matches to the history.
    ///
    /// Validation happens before any lock is taken; on error neither the
    /// pool nor the history is touched.
    pub async fn commit(&self, pool: &InMemoryPool, matches: Vec<Match>) -> Result<CommitReceipt> {
        if matches.is_empty() {
            return Ok(CommitReceipt {
                removal: HashSet::new(),
                removed: 0,
            });
        }

        let removal = Self::removal_set(&matches)?;
        let batch_len = matches.len();

        // Lock order is history then pool; both guards drop together, so no
        // reader observes the append without the removal.
        let mut history = self.history.write().await;
        let mut inner = pool.inner().write().await;
        let removed = inner.remove_all(&removal);
        history.extend(matches);
        drop(inner);
        drop(history);

        debug!(
            "committed {} matches, removed {} of {} settled intents",
            batch_len,
            removed,
            removal.len()
        );

        Ok(CommitReceipt { removal, removed })
    }

    /// Point-in-time copy of the history, oldest batch first.
    pub async fn history(&self) -> Vec<Match> {
        self.history.read().await.clone()
    }

    /// Number of matches settled so far.
    pub async fn len(&self) -> usize {
        self.history.read().await.len()
    }

    /// Check if nothing has been settled yet.
    pub async fn is_empty(&self) -> bool {
        self.history.read().await.is_empty()
    }
}

impl Default for MatchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::IntentPool;
    use kula_core::{Intent, IntentDraft};

    async fn seeded_pool() -> (InMemoryPool, Vec<Intent>) {
        let pool = InMemoryPool::new();
        let drafts = [
            ("Alice", "1984", "The Great Gatsby"),
            ("Bob", "The Great Gatsby", "1984"),
            ("Charlie", "Dune", "Neuromancer"),
        ];

        let mut intents = Vec::new();
        for (participant, wanted, offered) in drafts {
            intents.push(
                pool.submit(IntentDraft::new(participant, wanted, offered))
                    .await
                    .unwrap(),
            );
        }
        (pool, intents)
    }

    #[tokio::test]
    async fn test_commit_removes_and_appends_atomically() {
        let (pool, intents) = seeded_pool().await;
        let registry = MatchRegistry::new();

        let m = Match::settle(vec![intents[0].clone(), intents[1].clone()]).unwrap();
        let before = pool.len().await;

        let receipt = registry.commit(&pool, vec![m]).await.unwrap();

        assert_eq!(receipt.removed, 2);
        assert_eq!(pool.len().await, before - receipt.removed);
        assert_eq!(registry.len().await, 1);
        // Charlie's unmatched intent survives.
        assert_eq!(pool.snapshot().await.intents[0].participant, "Charlie");
    }

    #[tokio::test]
    async fn test_history_is_append_only_oldest_first() {
        let pool = InMemoryPool::new();
        let registry = MatchRegistry::new();

        let first = {
            let a = pool
                .submit(IntentDraft::new("Alice", "1984", "The Great Gatsby"))
                .await
                .unwrap();
            let b = pool
                .submit(IntentDraft::new("Bob", "The Great Gatsby", "1984"))
                .await
                .unwrap();
            Match::settle(vec![a, b]).unwrap()
        };
        let second = {
            let c = pool
                .submit(IntentDraft::new("Carol", "Dune", "Neuromancer"))
                .await
                .unwrap();
            let d = pool
                .submit(IntentDraft::new("Dan", "Neuromancer", "Dune"))
                .await
                .unwrap();
            Match::settle(vec![c, d]).unwrap()
        };

        registry.commit(&pool, vec![first.clone()]).await.unwrap();
        registry.commit(&pool, vec![second.clone()]).await.unwrap();

        let history = registry.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, first.id);
        assert_eq!(history[1].id, second.id);
        assert!(pool.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_participant_aborts_commit() {
        let (pool, intents) = seeded_pool().await;
        let registry = MatchRegistry::new();

        let m1 = Match::settle(vec![intents[0].clone(), intents[1].clone()]).unwrap();
        // A second match reusing Alice's intent.
        let m2 = Match::settle(vec![intents[0].clone(), intents[1].clone()]).unwrap();

        let err = registry.commit(&pool, vec![m1, m2]).await.unwrap_err();

        assert!(matches!(err, ExchangeError::DuplicateParticipant { .. }));
        // Nothing was mutated.
        assert_eq!(pool.len().await, 3);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_noop() {
        let (pool, _) = seeded_pool().await;
        let registry = MatchRegistry::new();

        let receipt = registry.commit(&pool, Vec::new()).await.unwrap();

        assert_eq!(receipt.removed, 0);
        assert!(receipt.removal.is_empty());
        assert_eq!(pool.len().await, 3);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_commit_tolerates_already_removed_intents() {
        let (pool, intents) = seeded_pool().await;
        let registry = MatchRegistry::new();

        // The matched intents vanished between snapshot and commit.
        let mut ids = HashSet::new();
        ids.insert(intents[0].id);
        ids.insert(intents[1].id);
        pool.remove_all(&ids).await;

        let m = Match::settle(vec![intents[0].clone(), intents[1].clone()]).unwrap();
        let receipt = registry.commit(&pool, vec![m]).await.unwrap();

        assert_eq!(receipt.removal.len(), 2);
        assert_eq!(receipt.removed, 0);
        assert_eq!(registry.len().await, 1);
    }
}
