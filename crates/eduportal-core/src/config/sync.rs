//! Cross-context sync channel configuration.

use serde::{Deserialize, Serialize};

/// Sync bus settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Name of the shared broadcast channel.
    #[serde(default = "default_channel_name")]
    pub channel_name: String,
    /// Buffer capacity of the broadcast channel. Contexts that fall more
    /// than this many frames behind lose the oldest ones.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            channel_name: default_channel_name(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_channel_name() -> String {
    "eduportal.sync".to_string()
}

fn default_channel_capacity() -> usize {
    256
}
