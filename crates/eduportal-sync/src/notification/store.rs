//! Observable notification collection with persistence and cross-context
//! sync.
//!
//! One store instance lives in each execution context. Local mutations
//! update memory, persist the whole collection to its state slot, and post
//! a message so sibling contexts converge; remote messages apply the same
//! mutation without re-posting. Apply paths are idempotent (keyed by
//! notification id), so a context that both receives the message and later
//! re-hydrates from the slot ends up with the same collection.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::{debug, trace, warn};

use eduportal_core::traits::state::StateStore;
use eduportal_core::types::id::NotificationId;

use crate::bus::bus::SyncBus;
use crate::bus::subscription::SubscriptionHandle;
use crate::keys;
use crate::message::types::{MessageKind, SyncMessage};

use super::model::{NewNotification, Notification};
use super::{codec, seed};

/// The notification collection of one execution context, newest first.
#[derive(Debug)]
pub struct NotificationStore {
    inner: Arc<StoreInner>,
    subscriptions: Vec<SubscriptionHandle>,
}

#[derive(Debug)]
struct StoreInner {
    entries: RwLock<Vec<Notification>>,
    state: Arc<dyn StateStore>,
    bus: SyncBus,
}

impl NotificationStore {
    /// Creates a store bound to a bus and a state slot.
    ///
    /// Hydrates from [`keys::NOTIFICATIONS`] when prior state exists;
    /// absent or unreadable state starts from the built-in defaults.
    /// Subscribes to the five notification message kinds so remote
    /// mutations converge this instance.
    pub fn new(bus: SyncBus, state: Arc<dyn StateStore>) -> Self {
        let entries = hydrate(state.as_ref());
        let inner = Arc::new(StoreInner {
            entries: RwLock::new(entries),
            state,
            bus,
        });
        let subscriptions = register_remote_handlers(&inner);
        Self {
            inner,
            subscriptions,
        }
    }

    /// Snapshot of the collection, newest first.
    pub fn list(&self) -> Vec<Notification> {
        self.inner.read().clone()
    }

    /// Number of unread notifications (drives the badge in the header).
    pub fn unread_count(&self) -> usize {
        self.inner.read().iter().filter(|n| n.is_unread()).count()
    }

    /// Creates a notification, persists, and announces it to siblings.
    ///
    /// Returns the full record (id and timestamp are assigned here).
    pub fn add(&self, draft: NewNotification) -> Notification {
        let notification = Notification {
            id: NotificationId::new(),
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            created_at: Utc::now(),
            read: false,
            action_target: draft.action_target,
        };
        debug!(id = %notification.id, kind = %notification.kind, "notification added");
        self.inner.apply_add(notification.clone());
        self.inner
            .bus
            .post(&SyncMessage::NotificationAdded(notification.clone()));
        notification
    }

    /// Marks one notification read. Unknown ids are a complete no-op.
    pub fn mark_read(&self, id: NotificationId) {
        if self.inner.apply_read(id) {
            self.inner.bus.post(&SyncMessage::NotificationRead(id));
        }
    }

    /// Marks every notification read.
    pub fn mark_all_read(&self) {
        self.inner.apply_read_all();
        self.inner.bus.post(&SyncMessage::NotificationsReadAll);
    }

    /// Removes one notification. Unknown ids are a complete no-op.
    pub fn remove(&self, id: NotificationId) {
        if self.inner.apply_remove(id) {
            self.inner.bus.post(&SyncMessage::NotificationRemoved(id));
        }
    }

    /// Empties the collection.
    pub fn clear_all(&self) {
        self.inner.apply_clear();
        self.inner.bus.post(&SyncMessage::NotificationsCleared);
    }
}

impl Drop for NotificationStore {
    fn drop(&mut self) {
        for sub in &self.subscriptions {
            sub.unsubscribe();
        }
    }
}

impl StoreInner {
    /// Prepends unless the id is already present. Returns whether the
    /// collection changed.
    fn apply_add(&self, notification: Notification) -> bool {
        let snapshot = {
            let mut entries = self.write();
            if entries.iter().any(|n| n.id == notification.id) {
                trace!(id = %notification.id, "duplicate notification ignored");
                return false;
            }
            entries.insert(0, notification);
            entries.clone()
        };
        self.persist(&snapshot);
        true
    }

    fn apply_read(&self, id: NotificationId) -> bool {
        let snapshot = {
            let mut entries = self.write();
            match entries.iter_mut().find(|n| n.id == id) {
                Some(n) => n.read = true,
                None => {
                    trace!(%id, "mark_read for unknown notification ignored");
                    return false;
                }
            }
            entries.clone()
        };
        self.persist(&snapshot);
        true
    }

    fn apply_read_all(&self) {
        let snapshot = {
            let mut entries = self.write();
            for n in entries.iter_mut() {
                n.read = true;
            }
            entries.clone()
        };
        self.persist(&snapshot);
    }

    fn apply_remove(&self, id: NotificationId) -> bool {
        let snapshot = {
            let mut entries = self.write();
            let before = entries.len();
            entries.retain(|n| n.id != id);
            if entries.len() == before {
                trace!(%id, "remove for unknown notification ignored");
                return false;
            }
            entries.clone()
        };
        self.persist(&snapshot);
        true
    }

    fn apply_clear(&self) {
        {
            self.write().clear();
        }
        self.persist(&[]);
    }

    /// Writes a snapshot to the state slot. Failures are logged, not
    /// surfaced: the in-memory collection stays authoritative and the next
    /// successful persist heals the slot.
    fn persist(&self, entries: &[Notification]) {
        match codec::encode_notifications(entries) {
            Ok(raw) => {
                if let Err(e) = self.state.save(keys::NOTIFICATIONS, &raw) {
                    warn!(error = %e, "failed to persist notifications");
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to encode notifications");
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Notification>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Notification>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn hydrate(state: &dyn StateStore) -> Vec<Notification> {
    match state.load(keys::NOTIFICATIONS) {
        Ok(Some(raw)) => match codec::decode_notifications(&raw) {
            Ok(entries) => {
                debug!(count = entries.len(), "hydrated notifications");
                entries
            }
            Err(e) => {
                warn!(error = %e, "corrupt notification state; starting from defaults");
                seed::default_notifications()
            }
        },
        Ok(None) => {
            debug!("no persisted notifications; starting from defaults");
            seed::default_notifications()
        }
        Err(e) => {
            warn!(error = %e, "failed to read notification state; starting from defaults");
            seed::default_notifications()
        }
    }
}

fn register_remote_handlers(inner: &Arc<StoreInner>) -> Vec<SubscriptionHandle> {
    let bus = inner.bus.clone();
    let mut subs = Vec::with_capacity(5);

    let target = Arc::clone(inner);
    subs.push(bus.on(MessageKind::NotificationAdded, move |msg| {
        if let SyncMessage::NotificationAdded(notification) = msg {
            target.apply_add(notification.clone());
        }
    }));

    let target = Arc::clone(inner);
    subs.push(bus.on(MessageKind::NotificationRead, move |msg| {
        if let SyncMessage::NotificationRead(id) = msg {
            target.apply_read(*id);
        }
    }));

    let target = Arc::clone(inner);
    subs.push(bus.on(MessageKind::NotificationsReadAll, move |msg| {
        if matches!(msg, SyncMessage::NotificationsReadAll) {
            target.apply_read_all();
        }
    }));

    let target = Arc::clone(inner);
    subs.push(bus.on(MessageKind::NotificationRemoved, move |msg| {
        if let SyncMessage::NotificationRemoved(id) = msg {
            target.apply_remove(*id);
        }
    }));

    let target = Arc::clone(inner);
    subs.push(bus.on(MessageKind::NotificationsCleared, move |msg| {
        if matches!(msg, SyncMessage::NotificationsCleared) {
            target.apply_clear();
        }
    }));

    subs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::model::NotificationKind;
    use crate::persist::memory::MemoryStateStore;

    fn make_state() -> Arc<MemoryStateStore> {
        Arc::new(MemoryStateStore::default())
    }

    /// Store over an empty (not missing) slot, so tests start from zero
    /// entries instead of the seeds.
    fn make_empty_store(state: &Arc<MemoryStateStore>) -> NotificationStore {
        state
            .save(keys::NOTIFICATIONS, "[]")
            .expect("seed empty slot");
        NotificationStore::new(SyncBus::disconnected(), Arc::clone(state) as Arc<dyn StateStore>)
    }

    fn draft(title: &str) -> NewNotification {
        NewNotification::new(NotificationKind::Info, title, format!("{title} body"))
    }

    #[test]
    fn test_missing_slot_starts_with_defaults() {
        let store = NotificationStore::new(SyncBus::disconnected(), make_state());
        let entries = store.list();
        assert_eq!(entries.len(), seed::default_notifications().len());
        assert_eq!(store.unread_count(), entries.len());
    }

    #[test]
    fn test_corrupt_slot_starts_with_defaults() {
        let state = make_state();
        state
            .save(keys::NOTIFICATIONS, "this was never json")
            .expect("save garbage");
        let store = NotificationStore::new(
            SyncBus::disconnected(),
            Arc::clone(&state) as Arc<dyn StateStore>,
        );
        assert_eq!(store.list().len(), seed::default_notifications().len());

        // The store stays fully usable and the next mutation heals the slot.
        store.add(draft("after corruption"));
        let raw = state
            .load(keys::NOTIFICATIONS)
            .expect("load")
            .expect("persisted");
        assert!(codec::decode_notifications(&raw).is_ok());
    }

    #[test]
    fn test_add_prepends_and_persists() {
        let state = make_state();
        let store = make_empty_store(&state);

        store.add(draft("first"));
        let second = store.add(draft("second"));

        let entries = store.list();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, second.id, "newest first");
        assert_eq!(store.unread_count(), 2);

        let raw = state
            .load(keys::NOTIFICATIONS)
            .expect("load")
            .expect("persisted");
        let persisted = codec::decode_notifications(&raw).expect("decode");
        assert_eq!(persisted, entries);
    }

    #[test]
    fn test_mark_read_is_monotonic_and_unknown_id_is_noop() {
        let state = make_state();
        let store = make_empty_store(&state);
        let n = store.add(draft("one"));

        store.mark_read(n.id);
        assert_eq!(store.unread_count(), 0);

        // Idempotent.
        store.mark_read(n.id);
        assert_eq!(store.unread_count(), 0);
        assert!(store.list()[0].read);

        // Unknown id changes nothing.
        store.mark_read(NotificationId::new());
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_mark_all_read() {
        let state = make_state();
        let store = make_empty_store(&state);
        store.add(draft("a"));
        store.add(draft("b"));
        store.add(draft("c"));

        store.mark_all_read();
        assert_eq!(store.unread_count(), 0);
        assert!(store.list().iter().all(|n| n.read));
    }

    #[test]
    fn test_remove_and_clear() {
        let state = make_state();
        let store = make_empty_store(&state);
        let keep = store.add(draft("keep"));
        let gone = store.add(draft("gone"));

        store.remove(gone.id);
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].id, keep.id);

        store.remove(NotificationId::new()); // unknown id, no-op
        assert_eq!(store.list().len(), 1);

        store.clear_all();
        assert!(store.list().is_empty());
        assert_eq!(store.unread_count(), 0);

        let raw = state
            .load(keys::NOTIFICATIONS)
            .expect("load")
            .expect("persisted");
        assert_eq!(raw, "[]");
    }

    #[test]
    fn test_duplicate_apply_is_ignored() {
        let state = make_state();
        let store = make_empty_store(&state);
        let n = store.add(draft("once"));

        // The same record arriving again (e.g. replayed frame) must not
        // produce a second entry.
        assert!(!store.inner.apply_add(n.clone()));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_reload_sees_persisted_state() {
        let state = make_state();
        let first = make_empty_store(&state);
        let a = first.add(draft("a"));
        first.add(draft("b"));
        first.mark_read(a.id);
        let before = first.list();
        drop(first);

        let second = NotificationStore::new(
            SyncBus::disconnected(),
            Arc::clone(&state) as Arc<dyn StateStore>,
        );
        assert_eq!(second.list(), before);
        assert_eq!(second.unread_count(), 1);
    }
}
