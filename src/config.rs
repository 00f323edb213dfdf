//! Site-level configuration.
//!
//! Everything has a default matching the portfolio markup, so an empty
//! YAML document is a valid configuration:
//!
//! ```yaml
//! storage_key: theme
//! persist_system_default: false
//! bindings:
//!   theme_classes:
//!     - { target: body, class: dark-mode }
//!   checkbox: "#checkbox"
//! sweep:
//!   sanctioned: .theme-switch-wrapper
//!   delays_ms: [500, 1500]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bindings::UiBindings;
use crate::dom::Selector;
use crate::error::ConfigError;
use crate::sweep::SweepConfig;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "theme";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Key of the persisted flag in per-origin storage.
    pub storage_key: String,
    /// Persist the system-derived theme on first load. Off by default so an
    /// unset preference keeps following the OS.
    pub persist_system_default: bool,
    pub bindings: UiBindings,
    /// Extra buttons that flip the theme on click, e.g. `.dark-mode-toggle`.
    pub toggle_buttons: Option<Selector>,
    pub sweep: SweepConfig,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            persist_system_default: false,
            bindings: UiBindings::default(),
            toggle_buttons: None,
            sweep: SweepConfig::default(),
        }
    }
}

impl ThemeConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Selectors of the controls this configuration drives. The sweep
    /// never removes them.
    pub fn controls(&self) -> Vec<Selector> {
        let mut controls = self.bindings.targets();
        controls.extend(self.toggle_buttons.clone());
        controls
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }
}
