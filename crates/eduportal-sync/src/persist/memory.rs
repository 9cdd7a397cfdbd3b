//! In-memory state slots.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use eduportal_core::result::AppResult;
use eduportal_core::traits::state::StateStore;

/// State store over a shared in-memory map.
///
/// Clones share the same slots, so several stores handed clones of one
/// `MemoryStateStore` behave like sibling contexts of one profile. Used
/// for ephemeral sessions (nothing survives the process) and throughout
/// the test suites.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, key: &str) -> AppResult<Option<String>> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Ok(slots.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> AppResult<()> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> AppResult<()> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.remove(key);
        Ok(())
    }
}
