//! Topic-based broadcast fabric.
//!
//! Every cross-actor signal in the room/game layer — lobby listings, room
//! seating changes, game state updates — travels over a `Topic<T>`. A topic
//! is a thin wrapper around `tokio::sync::broadcast`: many subscribers, one
//! publisher side per topic instance, FIFO per subscriber.
//!
//! This is the generalisation of the per-player `mpsc` fan-out a single
//! room actor might otherwise keep (`dispatch`/`send_to`): instead of the
//! owning actor tracking one channel per recipient by hand, any number of
//! interested parties — a player's connection handler, a dev monitor, a
//! bot — subscribe to the topic they care about and the fabric handles
//! fan-out uniformly.
//!
//! Delivery is at-least-once to each subscriber that keeps up; a subscriber
//! that falls behind the channel capacity gets `RecvError::Lagged` and must
//! reconcile via a fresh snapshot (`get_state`, `get_room`) rather than
//! replaying history — this mirrors the "lost state_update recovered on
//! resubscribe" failure mode or room/game event streams.

use tokio::sync::broadcast;

/// Default buffer depth for a topic's internal ring buffer. Generous
/// enough that a momentarily-slow subscriber (a dev monitor doing I/O)
/// doesn't lag out under normal publish rates.
pub const DEFAULT_CAPACITY: usize = 256;

/// A published topic. Clone is cheap — it's a handle, not the buffer.
#[derive(Clone)]
pub struct Topic<T: Clone> {
    name: String,
    sender: broadcast::Sender<T>,
}

/// Why a publish was dropped on the floor. Per the error design, PubSub
/// publish failures are a transient infrastructure fault: log and ignore,
/// subscribers reconcile via a snapshot call.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("topic {0} has no subscribers")]
    NoSubscribers(String),
}

impl<T: Clone + Send + 'static> Topic<T> {
    /// Creates a new topic with the default buffer depth.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { name: name.into(), sender }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Publishes an event to every current subscriber. A topic with zero
    /// subscribers is not an error at the fabric level (nobody is
    /// listening yet, or everyone already left) — the caller decides
    /// whether that's worth logging.
    pub fn publish(&self, event: T) -> Result<usize, PublishError> {
        match self.sender.send(event) {
            Ok(n) => Ok(n),
            Err(_) => Err(PublishError::NoSubscribers(self.name.clone())),
        }
    }

    /// Subscribes to this topic. Any actor may subscribe; the fabric
    /// doesn't authorize, it only delivers.
    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Ev(u32);

    #[tokio::test]
    async fn subscribers_receive_in_publish_order() {
        let topic: Topic<Ev> = Topic::new("game:ABCD");
        let mut sub = topic.subscribe();
        topic.publish(Ev(1)).unwrap();
        topic.publish(Ev(2)).unwrap();
        topic.publish(Ev(3)).unwrap();

        assert_eq!(sub.recv().await.unwrap(), Ev(1));
        assert_eq!(sub.recv().await.unwrap(), Ev(2));
        assert_eq!(sub.recv().await.unwrap(), Ev(3));
    }

    #[tokio::test]
    async fn publish_with_no_subscribers_is_reported_not_panicked() {
        let topic: Topic<Ev> = Topic::new("lobby:updates");
        let err = topic.publish(Ev(1)).unwrap_err();
        assert!(matches!(err, PublishError::NoSubscribers(_)));
    }

    #[tokio::test]
    async fn two_subscribers_each_get_every_event() {
        let topic: Topic<Ev> = Topic::new("room:ABCD");
        let mut a = topic.subscribe();
        let mut b = topic.subscribe();
        topic.publish(Ev(9)).unwrap();

        assert_eq!(a.recv().await.unwrap(), Ev(9));
        assert_eq!(b.recv().await.unwrap(), Ev(9));
    }

    #[tokio::test]
    async fn late_subscriber_does_not_see_earlier_events() {
        let topic: Topic<Ev> = Topic::new("room:ABCD");
        topic.publish(Ev(1)).ok();
        let mut sub = topic.subscribe();
        topic.publish(Ev(2)).unwrap();
        assert_eq!(sub.recv().await.unwrap(), Ev(2));
    }
}
