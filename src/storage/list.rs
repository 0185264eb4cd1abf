//! List persistence: the collaborator stores load from and save to.
//!
//! Stores never touch files directly. They are handed a [`ListStorage`] and
//! call `load` once on open and `save` after every accepted mutation.

use std::marker::PhantomData;

use serde::{Serialize, de::DeserializeOwned};

use super::{Result, Storage};

/// Durable home for a whole list of records.
pub trait ListStorage<T> {
    /// Reads the persisted list. An absent list reads as empty.
    fn load(&self) -> Result<Vec<T>>;

    /// Replaces the persisted list with `items`.
    fn save(&mut self, items: &[T]) -> Result<()>;
}

/// A list stored as one JSON array under a storage key.
#[derive(Debug, Clone)]
pub struct JsonList<T> {
    storage: Storage,
    key: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonList<T> {
    pub fn new(storage: Storage, key: &'static str) -> Self {
        Self {
            storage,
            key,
            _record: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> ListStorage<T> for JsonList<T> {
    fn load(&self) -> Result<Vec<T>> {
        match self.storage.get(self.key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.storage.set(self.key, &json)
    }
}
