//! In-memory list storage for store tests.

use std::io;

use serde::{Serialize, de::DeserializeOwned};

use super::{ListStorage, Result, StorageError};

/// Keeps the persisted JSON in memory and counts writes.
#[derive(Debug, Default)]
pub struct MemoryList {
    pub json: Option<String>,
    pub writes: usize,

    /// Fail the next `save` with an I/O error, leaving `json` as it was.
    pub fail_next: bool,
}

impl MemoryList {
    pub fn with_json(json: &str) -> Self {
        Self {
            json: Some(json.to_string()),
            ..Self::default()
        }
    }

    /// Decodes the last write.
    pub fn decoded<T: DeserializeOwned>(&self) -> Vec<T> {
        self.json
            .as_deref()
            .map(|json| serde_json::from_str(json).unwrap())
            .unwrap_or_default()
    }
}

impl<T: Serialize + DeserializeOwned> ListStorage<T> for MemoryList {
    fn load(&self) -> Result<Vec<T>> {
        match &self.json {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, items: &[T]) -> Result<()> {
        if std::mem::take(&mut self.fail_next) {
            return Err(StorageError::Io(io::Error::other("disk full")));
        }
        self.json = Some(serde_json::to_string(items)?);
        self.writes += 1;
        Ok(())
    }
}
