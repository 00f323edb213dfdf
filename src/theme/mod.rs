//! Theme model: color modes, persisted preferences and system sources.
//!
//! This module provides:
//!
//! - [`ColorMode`]: the effective light or dark theme
//! - [`ThemePreference`]: the persisted user choice, including `Unset`
//! - [`ThemeState`]: preference plus system mode as one value
//! - [`SchemeSource`]: live system color-scheme preference
//!
//! The precedence rule lives in [`compute_effective_theme`]; everything else
//! in the crate goes through it.

mod mode;
mod state;
mod system;

pub use mode::{compute_effective_theme, ColorMode, ThemePreference};
pub use state::ThemeState;
pub use system::{
    reset_scheme_detector, set_scheme_detector, FixedScheme, OsScheme, SchemeSource,
};
