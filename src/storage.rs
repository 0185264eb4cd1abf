//! Local persistence: a small key-value store on the local device.
//!
//! Each key is one file under the storage root:
//!
//! ```text
//! <root>/
//!   buildings         # JSON array of buildings
//!   weeklyPlans       # JSON array of weekly plans
//!   isAuthenticated   # "true" while logged in, absent otherwise
//! ```
//!
//! There is no schema versioning. Absent keys read as `None`.

mod list;
#[cfg(test)]
pub mod memory;

use std::{fs, io, path::PathBuf};

use tracing::debug;

pub use list::{JsonList, ListStorage};

/// Key holding the building list.
pub const BUILDINGS_KEY: &str = "buildings";

/// Key holding the weekly plan list.
pub const PLANS_KEY: &str = "weeklyPlans";

/// Key holding the login flag.
pub const AUTH_KEY: &str = "isAuthenticated";

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// File-backed key-value storage.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the default storage root: `~/.obra/data/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".obra").join("data"))
    }

    /// Reads the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Stores `value` under `key`, replacing what was there.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        fs::write(&path, value)?;
        debug!(key, bytes = value.len(), "wrote storage key");
        Ok(())
    }

    /// Removes `key`.
    ///
    /// Idempotent: does nothing if the key is absent.
    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(key, "removed storage key");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// A JSON list persisted under `key`.
    pub fn list<T>(&self, key: &'static str) -> JsonList<T> {
        JsonList::new(self.clone(), key)
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}
