//! File-backed state slots.

use std::path::PathBuf;

use tracing::debug;

use eduportal_core::error::{AppError, ErrorKind};
use eduportal_core::result::AppResult;
use eduportal_core::traits::state::StateStore;

/// State store keeping one file per slot under a root directory.
///
/// Slot `eduportal.notifications` lands in
/// `<root>/eduportal.notifications.json`. All contexts of a profile point
/// at the same root.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    /// Root directory for all slot files.
    root: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at the given directory, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create state directory: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl StateStore for JsonFileStore {
    fn load(&self, key: &str) -> AppResult<Option<String>> {
        match std::fs::read_to_string(self.slot_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read state slot '{key}'"),
                e,
            )),
        }
    }

    fn save(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.slot_path(key);
        std::fs::write(&path, value).map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write state slot '{key}'"),
                e,
            )
        })?;
        debug!(slot = key, bytes = value.len(), "state slot written");
        Ok(())
    }

    fn clear(&self, key: &str) -> AppResult<()> {
        match std::fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to clear state slot '{key}'"),
                e,
            )),
        }
    }
}
