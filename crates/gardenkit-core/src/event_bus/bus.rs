//! Event Bus implementation.
//!
//! An explicit, injectable bus: each editor session owns one and hands
//! `Arc<EventBus>` clones to whoever needs to listen. There is no global
//! instance.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{EditorEvent, EventCategory};

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Filter to receive only specific event types
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    /// Check if an event matches this filter
    pub fn matches(&self, event: &EditorEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type EventHandler = Box<dyn Fn(&EditorEvent) + Send + Sync>;

/// Error types for event bus operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum EventBusError {
    /// No subscribers are listening
    #[error("No active subscribers")]
    NoSubscribers,
}

/// Publish/subscribe hub for editor events
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
    handlers: Arc<RwLock<HashMap<SubscriptionId, (EventFilter, EventHandler)>>>,
}

impl EventBus {
    /// Default broadcast channel capacity.
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a new event bus
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a new event bus with a custom broadcast capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Publish an event to all subscribers
    ///
    /// Synchronous handlers run on the publishing thread before the event is
    /// forwarded to async receivers. Returns the number of handlers and
    /// receivers reached.
    pub fn publish(&self, event: EditorEvent) -> Result<usize, EventBusError> {
        let handlers = self.handlers.read();
        let mut reached = 0;
        for (filter, handler) in handlers.values() {
            if filter.matches(&event) {
                handler(&event);
                reached += 1;
            }
        }

        match self.sender.send(event) {
            Ok(count) => Ok(reached + count),
            Err(_) if handlers.is_empty() => Err(EventBusError::NoSubscribers),
            Err(_) => Ok(reached),
        }
    }

    /// Publish and ignore the "nobody is listening" case
    pub fn notify(&self, event: EditorEvent) {
        tracing::trace!("Event: {}", event.description());
        let _ = self.publish(event);
    }

    /// Subscribe to events with a synchronous handler
    ///
    /// The handler is called on the publishing thread, so it should return
    /// quickly and must not publish on the same bus.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&EditorEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.write().insert(id, (filter, Box::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Get a receiver for polling events from an async task
    pub fn receiver(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }

    /// Unsubscribe from events
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.handlers.write().remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Drop every synchronous handler (session teardown)
    pub fn clear(&self) {
        self.handlers.write().clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
