//! Persisted-state configuration.

use serde::{Deserialize, Serialize};

/// Settings for the on-disk state slots shared by all contexts of a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Directory holding one file per state slot.
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
        }
    }
}

fn default_state_dir() -> String {
    "data/state".to_string()
}
