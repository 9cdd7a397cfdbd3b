//! Handler registry — keyed dispatch of decoded messages.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::message::types::{MessageKind, SyncMessage};

/// Callback invoked for each delivered message.
pub type Handler = Arc<dyn Fn(&SyncMessage) + Send + Sync>;

/// Identifies one handler registration.
pub type HandlerId = Uuid;

/// What a handler listens to: one message kind, or every kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Deliver every message regardless of kind.
    All,
    /// Deliver only messages of this kind.
    Kind(MessageKind),
}

impl From<MessageKind> for Topic {
    fn from(kind: MessageKind) -> Self {
        Topic::Kind(kind)
    }
}

#[derive(Clone)]
struct HandlerEntry {
    id: HandlerId,
    handler: Handler,
}

/// Registry of all handlers on one bus instance.
///
/// Registering the same callback twice yields two independent entries,
/// each with its own id; both fire per delivery.
#[derive(Default)]
pub struct HandlerRegistry {
    /// Topic → registered handlers, in registration order.
    handlers: DashMap<Topic, Vec<HandlerEntry>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    /// Registers a handler under a topic and returns its id.
    pub fn add(&self, topic: Topic, handler: Handler) -> HandlerId {
        let id = Uuid::new_v4();
        self.handlers
            .entry(topic)
            .or_default()
            .push(HandlerEntry { id, handler });
        id
    }

    /// Removes one registration. Removing an id twice is a no-op.
    pub fn remove(&self, topic: Topic, id: HandlerId) {
        if let Some(mut entries) = self.handlers.get_mut(&topic) {
            entries.retain(|e| e.id != id);
        }
    }

    /// Drops every registration.
    pub fn clear(&self) {
        self.handlers.clear();
    }

    /// Delivers a message to the kind-keyed handlers, then the wildcard
    /// handlers.
    pub fn dispatch(&self, msg: &SyncMessage) {
        self.invoke(Topic::Kind(msg.kind()), msg);
        self.invoke(Topic::All, msg);
    }

    /// Number of handlers registered under a topic.
    pub fn count(&self, topic: Topic) -> usize {
        self.handlers.get(&topic).map(|e| e.len()).unwrap_or(0)
    }

    fn invoke(&self, topic: Topic, msg: &SyncMessage) {
        // Snapshot the handlers before invoking so a callback may register
        // or remove handlers without holding the shard lock.
        let snapshot: Vec<Handler> = match self.handlers.get(&topic) {
            Some(entries) => entries.iter().map(|e| Arc::clone(&e.handler)).collect(),
            None => return,
        };
        for handler in snapshot {
            handler(msg);
        }
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("topics", &self.handlers.len())
            .finish()
    }
}
