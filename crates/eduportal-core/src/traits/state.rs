//! Persisted-state trait for pluggable key/value slot backends.

use crate::result::AppResult;

/// Trait for the per-profile state slots shared by every execution context.
///
/// Each slot holds one string value (typically JSON) under a fixed key.
/// The trait is synchronous on purpose: store mutations persist from inside
/// bus callbacks, and the backing primitive is a plain per-key read/write
/// with no meaningful latency to hide.
pub trait StateStore: Send + Sync + std::fmt::Debug {
    /// Read a slot. Returns `None` if the slot has never been written.
    fn load(&self, key: &str) -> AppResult<Option<String>>;

    /// Write a slot, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> AppResult<()>;

    /// Delete a slot. Deleting an absent slot is not an error.
    fn clear(&self, key: &str) -> AppResult<()>;
}
