//! Per-profile storage for the persisted theme flag.
//!
//! [`PreferenceStore`] is the seam between the reconciler and whatever
//! actually keeps the flag: [`MemoryStore`] for tests and sessions without
//! storage, [`FileStore`] for native tools, and `web::LocalStorage` in the
//! browser.

mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// A string key/value store that survives page loads.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Whether a storage change notification concerns the theme flag.
///
/// `changed_key` is `None` when the whole storage area was cleared.
pub fn affects_key(changed_key: Option<&str>, storage_key: &str) -> bool {
    changed_key.map_or(true, |key| key == storage_key)
}
