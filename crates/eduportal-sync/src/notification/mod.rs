//! Notification model, persistence codec, seeds, and the observable store.

pub mod codec;
pub mod model;
pub mod seed;
pub mod store;

pub use model::{NewNotification, Notification, NotificationKind};
pub use store::NotificationStore;
