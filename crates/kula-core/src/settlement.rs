//! Settlement record types for the Kula exchange.
//!
//! A Match is the record produced when a solver pass closes an exchange
//! cycle over a set of intents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{ExchangeError, Result};
use crate::intent::Intent;

/// Shape of a settled cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Two-party swap: each side wants exactly what the other offers.
    Direct,
    /// Cycle of three or more parties, each receiving from the next.
    Cycle,
}

/// A settled exchange cycle. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    /// Unique identifier for this match.
    pub id: Uuid,

    /// Shape of the cycle.
    pub kind: MatchKind,

    /// The participating intents, in cycle order: each entry receives the
    /// offered item of the entry after it (wrapping at the end).
    pub participants: Vec<Intent>,

    /// Human-readable description of the settlement path.
    pub summary: String,

    /// SHA-256 digest over the ordered participant chain.
    pub digest: String,

    /// Timestamp when the match was settled.
    pub settled_at: DateTime<Utc>,
}

impl Match {
    /// Settle a closed cycle of intents into a match.
    ///
    /// The participants must be given in cycle order; construction verifies
    /// that `participants[i].wanted == participants[(i + 1) % k].offered`
    /// holds for every position, so an invalid cycle can never become a
    /// Match value.
    pub fn settle(participants: Vec<Intent>) -> Result<Self> {
        let k = participants.len();
        if k < 2 {
            return Err(ExchangeError::Internal(format!(
                "a match needs at least two participants, got {}",
                k
            )));
        }

        for i in 0..k {
            let giver = &participants[(i + 1) % k];
            if participants[i].wanted != giver.offered {
                return Err(ExchangeError::Internal(format!(
                    "cycle does not close: {} wants \"{}\" but {} offers \"{}\"",
                    participants[i].participant,
                    participants[i].wanted,
                    giver.participant,
                    giver.offered
                )));
            }
        }

        let kind = if k == 2 {
            MatchKind::Direct
        } else {
            MatchKind::Cycle
        };

        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            summary: Self::summarize(kind, &participants),
            digest: Self::chain_digest(&participants),
            participants,
            settled_at: Utc::now(),
        })
    }

    /// Number of intents settled by this match.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// A match always has participants; this only exists for symmetry.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Ids of all participating intents, in cycle order.
    pub fn participant_ids(&self) -> Vec<Uuid> {
        self.participants.iter().map(|p| p.id).collect()
    }

    /// True if the given participant label appears in this match.
    pub fn involves(&self, participant: &str) -> bool {
        self.participants.iter().any(|p| p.participant == participant)
    }

    /// Recompute the digest and compare with the stored one.
    pub fn verify_digest(&self) -> bool {
        self.digest == Self::chain_digest(&self.participants)
    }

    fn summarize(kind: MatchKind, participants: &[Intent]) -> String {
        match kind {
            MatchKind::Direct => {
                let (a, b) = (&participants[0], &participants[1]);
                format!(
                    "{} gets \"{}\" from {}, {} gets \"{}\" from {}",
                    a.participant, a.wanted, b.participant, b.participant, b.wanted, a.participant
                )
            }
            MatchKind::Cycle => {
                let mut path = participants
                    .iter()
                    .map(|p| p.participant.as_str())
                    .collect::<Vec<_>>()
                    .join(" → ");
                path.push_str(" → ");
                path.push_str(&participants[0].participant);
                format!("{}-way cycle: {}", participants.len(), path)
            }
        }
    }

    /// Hash of the ordered participant chain, binding each intent's identity
    /// to its position in the cycle.
    fn chain_digest(participants: &[Intent]) -> String {
        let content = serde_json::json!(participants
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id,
                    "wanted": p.wanted,
                    "offered": p.offered,
                })
            })
            .collect::<Vec<_>>());

        let mut hasher = Sha256::new();
        hasher.update(content.to_string().as_bytes());
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}

/// The observable outcome of one solver pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReport {
    /// Monotonic id of the run, minted by the run controller.
    pub run_id: u64,

    /// Id of the pool snapshot the pass solved over.
    pub snapshot_id: Uuid,

    /// Number of intents in that snapshot.
    pub snapshot_len: usize,

    /// When the pass began.
    pub started_at: DateTime<Utc>,

    /// When the pass finished.
    pub finished_at: DateTime<Utc>,

    /// Matches produced by the pass, in discovery order.
    pub matches: Vec<Match>,

    /// Number of intents removed from the pool on commit.
    pub removed: usize,

    /// Error message if the pass failed; on failure the pool and the
    /// match history are left untouched.
    pub error: Option<String>,
}

impl SolveReport {
    /// True if the pass committed cleanly.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// Total number of intents settled across all matches.
    pub fn matched_intents(&self) -> usize {
        self.matches.iter().map(Match::len).sum()
    }
}
