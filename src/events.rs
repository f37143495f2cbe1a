//! Entry lifecycle notifications.
//!
//! Replication and invalidation collaborators learn about entry churn through
//! a broadcast channel. Publishing is fire-and-forget: the core never waits
//! for a receiver, and a missing or lagging subscriber is not an error.
//! Subscribers that fall behind see a `Lagged` marker from the channel and
//! simply miss the overwritten events.

use bytes::Bytes;
use tokio::sync::broadcast;

/// Buffered events per subscriber before the channel starts overwriting.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// A change to one entry in one cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// A key that was absent now holds a value.
    Created {
        /// The affected key.
        key: Bytes,
    },
    /// An existing entry's value or metadata was overwritten.
    Modified {
        /// The affected key.
        key: Bytes,
    },
    /// An entry was removed by an explicit operation.
    Removed {
        /// The affected key.
        key: Bytes,
    },
    /// An entry was evicted because its lifespan or idle bound passed.
    Expired {
        /// The affected key.
        key: Bytes,
    },
}

impl CacheEvent {
    /// The key this event refers to.
    pub fn key(&self) -> &Bytes {
        match self {
            CacheEvent::Created { key }
            | CacheEvent::Modified { key }
            | CacheEvent::Removed { key }
            | CacheEvent::Expired { key } => key,
        }
    }
}

/// Publishes lifecycle events to any number of subscribers.
#[derive(Debug)]
pub struct Notifier {
    tx: broadcast::Sender<CacheEvent>,
}

impl Notifier {
    /// Creates a notifier with the default per-subscriber buffer.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Opens a new subscription. Events published before this call are not
    /// delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.tx.subscribe()
    }

    /// Publishes an event, ignoring the no-subscriber case.
    pub fn publish(&self, event: CacheEvent) {
        let _ = self.tx.send(event);
    }

    /// Publishes a `Created` event for `key`.
    pub fn created(&self, key: Bytes) {
        self.publish(CacheEvent::Created { key });
    }

    /// Publishes a `Modified` event for `key`.
    pub fn modified(&self, key: Bytes) {
        self.publish(CacheEvent::Modified { key });
    }

    /// Publishes a `Removed` event for `key`.
    pub fn removed(&self, key: Bytes) {
        self.publish(CacheEvent::Removed { key });
    }

    /// Publishes an `Expired` event for `key`.
    pub fn expired(&self, key: Bytes) {
        self.publish(CacheEvent::Expired { key });
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
