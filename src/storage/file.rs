use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{PreferenceStore, StorageError};

/// A store backed by a JSON object on disk.
///
/// The file holds `{"key": "value", ...}`. A missing file reads as empty;
/// every write rewrites the whole object.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|source| StorageError::Format {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(values).map_err(|source| StorageError::Format {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, content).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut values = self.load()?;
        if values.remove(key).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}
