//! Event bus for leetboard using tokio::broadcast
//!
//! The store publishes here; the CLI watch mode and tests subscribe.

use crate::models::{ProblemId, UserId};
use tokio::sync::broadcast;

/// Events emitted by the state layer
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// A problem was added to the store
    ProblemAdded(ProblemId),
    /// An existing problem was updated
    ProblemUpdated(ProblemId),
    /// A problem was deleted
    ProblemDeleted(ProblemId),
    /// The full problem list was replaced (sign-in, refresh, external change)
    ProblemsReloaded,
    /// Derived statistics were recomputed
    StatsUpdated,
    /// The signed-in user changed (None on sign-out)
    UserChanged(Option<UserId>),
    /// Background sync encountered an error
    SyncError(String),
}

/// Multi-consumer event bus for store updates
///
/// The CLI watch mode subscribes for change lines; any other front-end
/// can do the same.
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// Bus backed by a broadcast channel of the given capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Bus with the standard 256-event buffer
    pub fn default_capacity() -> Self {
        Self::new(256)
    }

    /// Fan an event out to every live subscriber
    pub fn publish(&self, event: StoreEvent) {
        // A send error only means nobody is listening right now
        let _ = self.sender.send(event);
    }

    /// New receiver positioned at the current head of the stream
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Number of receivers currently attached
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::default_capacity()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = EventBus::default_capacity();
        let mut rx = bus.subscribe();

        bus.publish(StoreEvent::StatsUpdated);
        bus.publish(StoreEvent::ProblemAdded(ProblemId::from("p-1")));

        let event1 = rx.recv().await.unwrap();
        assert!(matches!(event1, StoreEvent::StatsUpdated));

        let event2 = rx.recv().await.unwrap();
        assert!(matches!(event2, StoreEvent::ProblemAdded(id) if id == "p-1"));
    }

    #[tokio::test]
    async fn test_every_subscriber_sees_event() {
        let bus = EventBus::default_capacity();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(StoreEvent::ProblemsReloaded);

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();

        assert!(matches!(e1, StoreEvent::ProblemsReloaded));
        assert!(matches!(e2, StoreEvent::ProblemsReloaded));
    }

    #[test]
    fn test_publish_without_subscribers_is_quiet() {
        let bus = EventBus::default_capacity();
        bus.publish(StoreEvent::StatsUpdated);
    }
}
