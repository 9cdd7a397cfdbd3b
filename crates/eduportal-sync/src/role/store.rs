//! Persisted current-role store with cross-context sync.
//!
//! The lighter sibling of the notification store: one value instead of a
//! collection, persisted as a bare string, synchronized through
//! `role_changed` messages in both directions.

use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use eduportal_core::traits::state::StateStore;

use crate::bus::bus::SyncBus;
use crate::bus::subscription::SubscriptionHandle;
use crate::keys;
use crate::message::types::{MessageKind, SyncMessage};

use super::model::Role;

/// The active role of one execution context.
#[derive(Debug)]
pub struct RoleStore {
    inner: Arc<RoleInner>,
    subscription: SubscriptionHandle,
}

#[derive(Debug)]
struct RoleInner {
    current: RwLock<Role>,
    state: Arc<dyn StateStore>,
    bus: SyncBus,
}

impl RoleStore {
    /// Creates a store bound to a bus and the role state slot.
    ///
    /// Hydrates from [`keys::ROLE`]; absent or unparseable state falls
    /// back to [`Role::Student`]. Applies remote `role_changed` messages
    /// without re-posting them.
    pub fn new(bus: SyncBus, state: Arc<dyn StateStore>) -> Self {
        let current = hydrate(state.as_ref());
        let inner = Arc::new(RoleInner {
            current: RwLock::new(current),
            state,
            bus,
        });

        let target = Arc::clone(&inner);
        let subscription = inner.bus.on(MessageKind::RoleChanged, move |msg| {
            if let SyncMessage::RoleChanged(role) = msg {
                target.apply(*role);
            }
        });

        Self {
            inner,
            subscription,
        }
    }

    /// The currently active role.
    pub fn current(&self) -> Role {
        *self
            .inner
            .current
            .read()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Switches role, persists, and announces the change to siblings.
    ///
    /// Setting the role it already holds does nothing (and posts nothing).
    pub fn set(&self, role: Role) {
        if self.inner.apply(role) {
            self.inner.bus.post(&SyncMessage::RoleChanged(role));
        }
    }
}

impl Drop for RoleStore {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

impl RoleInner {
    /// Stores and persists a role. Returns whether the value changed.
    fn apply(&self, role: Role) -> bool {
        {
            let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
            if *current == role {
                return false;
            }
            *current = role;
        }
        debug!(role = %role, "role changed");
        if let Err(e) = self.state.save(keys::ROLE, role.as_str()) {
            warn!(error = %e, "failed to persist role");
        }
        true
    }
}

fn hydrate(state: &dyn StateStore) -> Role {
    match state.load(keys::ROLE) {
        Ok(Some(raw)) => match raw.trim().parse() {
            Ok(role) => role,
            Err(e) => {
                warn!(error = %e, "unrecognized persisted role; falling back");
                Role::default()
            }
        },
        Ok(None) => Role::default(),
        Err(e) => {
            warn!(error = %e, "failed to read persisted role; falling back");
            Role::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::memory::MemoryStateStore;

    fn make_state() -> Arc<MemoryStateStore> {
        Arc::new(MemoryStateStore::default())
    }

    #[test]
    fn test_defaults_to_student() {
        let store = RoleStore::new(SyncBus::disconnected(), make_state());
        assert_eq!(store.current(), Role::Student);
    }

    #[test]
    fn test_set_persists_plain_string() {
        let state = make_state();
        let store = RoleStore::new(
            SyncBus::disconnected(),
            Arc::clone(&state) as Arc<dyn StateStore>,
        );

        store.set(Role::Teacher);
        assert_eq!(store.current(), Role::Teacher);
        assert_eq!(
            state.load(keys::ROLE).expect("load").as_deref(),
            Some("teacher")
        );
    }

    #[test]
    fn test_reload_sees_persisted_role() {
        let state = make_state();
        RoleStore::new(
            SyncBus::disconnected(),
            Arc::clone(&state) as Arc<dyn StateStore>,
        )
        .set(Role::Admin);

        let reloaded = RoleStore::new(SyncBus::disconnected(), state);
        assert_eq!(reloaded.current(), Role::Admin);
    }

    #[test]
    fn test_unrecognized_persisted_role_falls_back() {
        let state = make_state();
        state.save(keys::ROLE, "headmaster").expect("save");

        let store = RoleStore::new(SyncBus::disconnected(), state);
        assert_eq!(store.current(), Role::Student);
    }

    #[test]
    fn test_whitespace_around_persisted_role_is_tolerated() {
        let state = make_state();
        state.save(keys::ROLE, "  admin\n").expect("save");

        let store = RoleStore::new(SyncBus::disconnected(), state);
        assert_eq!(store.current(), Role::Admin);
    }
}
