//! # eduportal-sync
//!
//! Cross-context state synchronization for EduPortal. Provides:
//!
//! - Typed message taxonomy over one shared broadcast channel
//! - Sync bus with kind-keyed and wildcard subscriptions
//! - Persisted notification store with idempotent cross-context merge
//! - Persisted current-role store
//! - State-slot providers (file-backed and in-memory)
//!
//! Every open portal window ("execution context") connects a
//! [`SyncBus`] to the same transport and keeps its stores converged by
//! exchanging [`SyncMessage`]s. When no transport is available the bus
//! degrades gracefully: the full API keeps working with local-only
//! effect.

pub mod bus;
pub mod keys;
pub mod message;
pub mod notification;
pub mod persist;
pub mod role;

pub use bus::bus::SyncBus;
pub use bus::registry::Topic;
pub use bus::subscription::SubscriptionHandle;
pub use bus::transport::{MemoryTransport, NoopTransport, Transport, WireFrame};
pub use message::codec::{decode_message, encode_message};
pub use message::types::{MessageKind, SyncMessage};
pub use notification::model::{NewNotification, Notification, NotificationKind};
pub use notification::store::NotificationStore;
pub use persist::json_file::JsonFileStore;
pub use persist::memory::MemoryStateStore;
pub use role::model::Role;
pub use role::store::RoleStore;
