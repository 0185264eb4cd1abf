//! Obra configuration.
//!
//! Loaded from `~/.obra/config.toml`. Every key is optional; a missing file
//! means defaults. `OBRA_DATA_DIR` overrides `data-dir`.

use std::{env, fs, io, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::image::DEFAULT_MAX_IMAGE_BYTES;
use crate::storage::Storage;

/// Obra configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Where buildings, plans and the login flag are stored.
    /// Defaults to `~/.obra/data/`.
    pub data_dir: Option<PathBuf>,

    /// Largest image file accepted as an attachment, in bytes.
    pub max_image_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl Config {
    /// Load config from `~/.obra/config.toml`, then apply `OBRA_DATA_DIR`.
    pub fn load() -> Result<Self, String> {
        let mut config = match Self::path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };

        if let Ok(dir) = env::var("OBRA_DATA_DIR")
            && !dir.is_empty()
        {
            config.data_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }

    /// Load config from a specific file. A missing file yields defaults.
    pub fn load_from(path: &std::path::Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.obra/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".obra").join("config.toml"))
    }

    /// The storage root this config points at.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(Storage::default_root)
    }
}
