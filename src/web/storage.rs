use wasm_bindgen::JsValue;
use web_sys::{MediaQueryList, Storage};

use crate::storage::{PreferenceStore, StorageError};
use crate::theme::{ColorMode, SchemeSource};

/// The media query that reports a dark OS preference.
pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

fn js_error(err: JsValue) -> StorageError {
    StorageError::Unavailable(format!("{:?}", err))
}

/// `window.localStorage`, when the browsing context allows it.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage is not accessible".to_string()))
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage()?.remove_item(key).map_err(js_error)
    }
}

/// The browser's `prefers-color-scheme` media query.
#[derive(Debug, Clone)]
pub struct MediaQueryScheme {
    list: Option<MediaQueryList>,
}

impl MediaQueryScheme {
    pub fn new() -> Self {
        let list = web_sys::window().and_then(|w| w.match_media(DARK_SCHEME_QUERY).ok().flatten());
        Self { list }
    }

    pub fn list(&self) -> Option<&MediaQueryList> {
        self.list.as_ref()
    }
}

impl Default for MediaQueryScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemeSource for MediaQueryScheme {
    fn color_mode(&self) -> ColorMode {
        ColorMode::from_dark(self.list.as_ref().map(|l| l.matches()).unwrap_or(false))
    }
}
