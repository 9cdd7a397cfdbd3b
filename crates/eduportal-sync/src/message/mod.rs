//! Message taxonomy and wire codec for the sync channel.

pub mod codec;
pub mod types;

pub use types::{MessageKind, SyncMessage};
