use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

pub type SubscriptionId = u64;

/// One subscriber callback with its id.
///
/// # Safety
/// Thread-safe. Inner callback stored in Arc and lives as long as any
/// clone of it is held by the channel or an in-flight emission.
#[derive(Clone)]
struct Subscriber<P: Send + Sync> {
    callback: Arc<dyn Fn(&P) + Send + Sync>,
}

/// Multi-subscriber notification channel for one payload type.
///
/// Subscribe and unsubscribe are safe concurrently with emission. Delivery
/// within a single emission follows subscription order. The channel does not
/// shield itself from a panicking subscriber; that failure belongs to the
/// subscriber, not the channel.
pub struct Channel<P: Send + Sync> {
    next_id: AtomicU64,
    subscribers: DashMap<SubscriptionId, Subscriber<P>>,
}

impl<P: Send + Sync> Default for Channel<P> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            subscribers: DashMap::new(),
        }
    }
}

impl<P: Send + Sync> Channel<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber, returning the id needed to remove it later.
    pub fn subscribe<F: Fn(&P) + Send + Sync + 'static>(&self, callback: F) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.subscribers.insert(
            id,
            Subscriber {
                callback: Arc::new(callback),
            },
        );

        id
    }

    /// Remove a subscriber. Returns false if the id was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver one payload to every current subscriber, in subscription order.
    pub fn emit(&self, payload: &P) {
        if self.subscribers.is_empty() {
            return;
        }

        // Snapshot ids first so iteration order is stable and so a subscriber
        // may unsubscribe itself (or others) from inside its own callback
        // without deadlocking against the map.
        let mut ids: Vec<SubscriptionId> = self.subscribers.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();

        for id in ids {
            let callback = match self.subscribers.get(&id) {
                Some(subscriber) => Arc::clone(&subscriber.callback),
                None => continue,
            };

            (callback)(payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_subscribe_and_emit() {
        let channel: Channel<u32> = Channel::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        channel.subscribe(move |value| seen_clone.lock().push(*value));

        channel.emit(&1);
        channel.emit(&2);

        assert_eq!(*seen.lock(), vec![1, 2]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let channel: Channel<u32> = Channel::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        let id = channel.subscribe(move |value| seen_clone.lock().push(*value));

        channel.emit(&1);
        assert!(channel.unsubscribe(id));
        channel.emit(&2);

        assert_eq!(*seen.lock(), vec![1]);
        assert!(!channel.unsubscribe(id));
    }

    #[test]
    fn test_emit_without_subscribers_is_noop() {
        let channel: Channel<u32> = Channel::new();
        channel.emit(&42);
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn test_delivery_in_subscription_order() {
        let channel: Channel<()> = Channel::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in 0..4 {
            let order_clone = Arc::clone(&order);
            channel.subscribe(move |_| order_clone.lock().push(tag));
        }

        channel.emit(&());
        assert_eq!(*order.lock(), vec![0, 1, 2, 3]);
    }
}
