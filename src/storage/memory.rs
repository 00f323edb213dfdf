use std::collections::HashMap;

use super::{PreferenceStore, StorageError};

/// An in-process key/value store.
///
/// [`MemoryStore::unavailable`] builds a store that rejects every call,
/// which is how a locked-down browsing context behaves.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    available: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            available: true,
        }
    }

    /// A store whose every operation fails with [`StorageError::Unavailable`].
    pub fn unavailable() -> Self {
        Self {
            values: HashMap::new(),
            available: false,
        }
    }

    /// Seeds a value, returning the store for chaining.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.available {
            Ok(())
        } else {
            Err(StorageError::Unavailable("memory store disabled".to_string()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.values.remove(key);
        Ok(())
    }
}
