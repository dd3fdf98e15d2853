//! Exchange event fan-out.

use kula_core::{EventKind, ExchangeEvent};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Filter for event subscriptions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFilter {
    /// Event kinds to keep (None = all kinds).
    pub kinds: Option<Vec<EventKind>>,
}

impl EventFilter {
    /// Filter down to a single event kind.
    pub fn kind(kind: EventKind) -> Self {
        Self {
            kinds: Some(vec![kind]),
        }
    }

    /// Check if an event passes this filter.
    pub fn matches(&self, event: &ExchangeEvent) -> bool {
        if let Some(ref kinds) = self.kinds {
            if !kinds.contains(&event.kind()) {
                return false;
            }
        }

        true
    }
}

/// Broadcast bus for exchange events.
///
/// Delivery is best-effort: a subscriber that falls further behind than the
/// channel capacity loses the oldest events, and publishing with no
/// subscribers is not an error.
pub struct EventBus {
    sender: broadcast::Sender<ExchangeEvent>,
}

impl EventBus {
    /// Create a new event bus.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1000);
        Self { sender }
    }

    /// Subscribe to all events published from this point on.
    pub fn subscribe(&self) -> broadcast::Receiver<ExchangeEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: ExchangeEvent) {
        let _ = self.sender.send(event);
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(run_id: u64) -> ExchangeEvent {
        ExchangeEvent::SolveStarted {
            run_id,
            snapshot_len: 3,
        }
    }

    #[tokio::test]
    async fn test_publish_and_receive_in_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(started(1));
        bus.publish(ExchangeEvent::SolveFailed {
            run_id: 1,
            message: "boom".to_string(),
        });

        assert_eq!(rx.recv().await.unwrap().kind(), EventKind::SolveStarted);
        assert_eq!(rx.recv().await.unwrap().kind(), EventKind::SolveFailed);
    }

    #[test]
    fn test_publish_without_subscribers_is_fine() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(started(1));
    }

    #[test]
    fn test_filter_by_kind() {
        let all = EventFilter::default();
        let only_started = EventFilter::kind(EventKind::SolveStarted);

        let event = started(1);
        assert!(all.matches(&event));
        assert!(only_started.matches(&event));

        let other = ExchangeEvent::SolveFailed {
            run_id: 1,
            message: "boom".to_string(),
        };
        assert!(all.matches(&other));
        assert!(!only_started.matches(&other));
    }
}
