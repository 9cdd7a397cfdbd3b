//! Subscription handles returned by [`SyncBus::on`](super::bus::SyncBus::on).

use std::sync::Weak;

use super::registry::{HandlerId, HandlerRegistry, Topic};

/// Undoes one handler registration.
///
/// Calling [`unsubscribe`](Self::unsubscribe) more than once, or after the
/// owning bus has been closed or dropped, is a safe no-op.
#[derive(Debug)]
pub struct SubscriptionHandle {
    registry: Weak<HandlerRegistry>,
    topic: Topic,
    id: HandlerId,
}

impl SubscriptionHandle {
    pub(crate) fn new(registry: Weak<HandlerRegistry>, topic: Topic, id: HandlerId) -> Self {
        Self {
            registry,
            topic,
            id,
        }
    }

    /// Handle that was never backed by a registration (closed bus).
    pub(crate) fn inert(topic: Topic) -> Self {
        Self {
            registry: Weak::new(),
            topic,
            id: HandlerId::nil(),
        }
    }

    /// The topic this handle was registered under.
    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Removes the registration. Idempotent.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.topic, self.id);
        }
    }
}
