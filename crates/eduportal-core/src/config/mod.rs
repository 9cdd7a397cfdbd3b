//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field carries a serde default so the portal runs with
//! no configuration file at all.

pub mod logging;
pub mod persistence;
pub mod sync;

use serde::{Deserialize, Serialize};

use self::logging::LoggingConfig;
use self::persistence::PersistenceConfig;
use self::sync::SyncConfig;

use crate::error::AppError;

/// Root portal configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration file and `EDUPORTAL__*` environment overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Cross-context sync channel settings.
    pub sync: SyncConfig,
    /// Persisted-state settings.
    pub persistence: PersistenceConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl PortalConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// The file is optional; environment variables prefixed with
    /// `EDUPORTAL` (separator `__`, e.g. `EDUPORTAL__SYNC__CHANNEL_CAPACITY`)
    /// override file values.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("EDUPORTAL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = PortalConfig::load("does/not/exist").expect("should load defaults");
        assert_eq!(config.sync.channel_capacity, 256);
        assert_eq!(config.persistence.state_dir, "data/state");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("portal.toml");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(file, "[sync]\nchannel_capacity = 32\n").expect("write");
        writeln!(file, "[persistence]\nstate_dir = \"/tmp/portal-state\"\n").expect("write");

        let config =
            PortalConfig::load(path.to_str().expect("utf-8 path")).expect("should load file");
        assert_eq!(config.sync.channel_capacity, 32);
        assert_eq!(config.persistence.state_dir, "/tmp/portal-state");
        // Untouched sections keep their defaults.
        assert_eq!(config.logging.level, "info");
    }
}
