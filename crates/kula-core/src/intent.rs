//! Intent types for the Kula exchange.
//!
//! An Intent is the core primitive - a participant's declaration of one item
//! wanted and one item offered in return.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ExchangeError, Result};

/// What a caller submits to the pool: a want/offer pair that has not yet
/// been assigned an identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntentDraft {
    /// Label of the declaring participant.
    pub participant: String,

    /// The item the participant wants to receive.
    pub wanted: String,

    /// The item the participant offers in return.
    pub offered: String,
}

impl IntentDraft {
    /// Create a new draft from raw field values.
    pub fn new(
        participant: impl Into<String>,
        wanted: impl Into<String>,
        offered: impl Into<String>,
    ) -> Self {
        Self {
            participant: participant.into(),
            wanted: wanted.into(),
            offered: offered.into(),
        }
    }

    /// Trim all fields and validate the draft, returning the normalized form.
    ///
    /// Fails with [`ExchangeError::EmptyField`] if any field is blank after
    /// trimming, and with [`ExchangeError::SelfTrade`] if the wanted and
    /// offered items are the same - such an intent could only ever be
    /// satisfied by itself.
    pub fn normalized(self) -> Result<Self> {
        let participant = self.participant.trim().to_string();
        let wanted = self.wanted.trim().to_string();
        let offered = self.offered.trim().to_string();

        for (field, value) in [
            ("participant", &participant),
            ("wanted", &wanted),
            ("offered", &offered),
        ] {
            if value.is_empty() {
                return Err(ExchangeError::EmptyField {
                    field: field.to_string(),
                });
            }
        }

        if wanted == offered {
            return Err(ExchangeError::SelfTrade {
                participant,
                item: wanted,
            });
        }

        Ok(Self {
            participant,
            wanted,
            offered,
        })
    }
}

/// An Intent is a declared want/offer pair resident in the pool.
/// It is immutable once minted; matched intents are removed wholesale,
/// never edited in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    /// Unique identifier, minted by the pool.
    pub id: Uuid,

    /// Pool-owned monotonic insertion sequence number. Defines the
    /// deterministic snapshot order the solver scans in.
    pub seq: u64,

    /// Label of the declaring participant.
    pub participant: String,

    /// The item this intent wants to receive.
    pub wanted: String,

    /// The item this intent offers in return.
    pub offered: String,

    /// Timestamp when the intent entered the pool.
    pub created_at: DateTime<Utc>,
}

impl Intent {
    /// Compatibility predicate: true if this intent's wanted item is what
    /// `other` offers. This is the directed edge of the compatibility graph;
    /// an intent never satisfies itself.
    pub fn wants_offer_of(&self, other: &Intent) -> bool {
        self.id != other.id && self.wanted == other.offered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(seq: u64, participant: &str, wanted: &str, offered: &str) -> Intent {
        Intent {
            id: Uuid::new_v4(),
            seq,
            participant: participant.to_string(),
            wanted: wanted.to_string(),
            offered: offered.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_draft_normalization_trims_fields() {
        let draft = IntentDraft::new("  Alice ", " 1984 ", "  The Great Gatsby")
            .normalized()
            .unwrap();

        assert_eq!(draft.participant, "Alice");
        assert_eq!(draft.wanted, "1984");
        assert_eq!(draft.offered, "The Great Gatsby");
    }

    #[test]
    fn test_empty_field_rejected() {
        let result = IntentDraft::new("Alice", "   ", "Gatsby").normalized();
        assert!(matches!(
            result,
            Err(ExchangeError::EmptyField { ref field }) if field == "wanted"
        ));

        let result = IntentDraft::new("", "1984", "Gatsby").normalized();
        assert!(matches!(
            result,
            Err(ExchangeError::EmptyField { ref field }) if field == "participant"
        ));
    }

    #[test]
    fn test_self_trade_rejected() {
        let result = IntentDraft::new("Alice", "1984", " 1984 ").normalized();
        assert!(matches!(result, Err(ExchangeError::SelfTrade { .. })));
        assert!(result.unwrap_err().is_rejection());
    }

    #[test]
    fn test_wants_offer_of() {
        let a = intent(1, "Alice", "1984", "The Great Gatsby");
        let b = intent(2, "Dana", "The Great Gatsby", "1984");

        assert!(a.wants_offer_of(&b));
        assert!(b.wants_offer_of(&a));
        // An intent never satisfies itself, even on matching items.
        assert!(!a.wants_offer_of(&a));
    }

    #[test]
    fn test_no_edge_without_item_match() {
        let a = intent(1, "Alice", "1984", "The Great Gatsby");
        let b = intent(2, "Bob", "The Great Gatsby", "To Kill a Mockingbird");

        assert!(b.wants_offer_of(&a));
        assert!(!a.wants_offer_of(&b));
    }
}
