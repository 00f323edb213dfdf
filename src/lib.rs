//! Dark/light theme reconciliation for static sites.
//!
//! Nocturne keeps three things in agreement on every page load and every
//! theme event: the user's persisted choice, the operating system's color
//! scheme, and the page elements that show the theme (body class, toggle
//! checkbox, label, icon, `data-theme`, `<meta name="theme-color">`).
//! It also sweeps away stray theme toggles that older deployments injected
//! outside the sanctioned switch container.
//!
//! # Precedence
//!
//! An explicit user choice always wins. Without one, the page follows the
//! OS scheme and keeps following it as it changes:
//!
//! ```rust
//! use nocturne::{compute_effective_theme, ColorMode, ThemePreference};
//!
//! assert_eq!(compute_effective_theme(ThemePreference::Light, ColorMode::Dark), ColorMode::Light);
//! assert_eq!(compute_effective_theme(ThemePreference::Unset, ColorMode::Dark), ColorMode::Dark);
//! ```
//!
//! # Backends
//!
//! All document access goes through the [`Dom`] trait. The in-memory
//! [`Document`] backs tests and static rendering; with the `web` feature on
//! `wasm32`, the `web` module drives the live browser document.
//!
//! # Modules
//!
//! - [`theme`]: color modes, preferences and OS scheme sources
//! - [`storage`]: where the preference flag is persisted
//! - [`bindings`]: which page elements reflect the theme and how
//! - [`reconciler`]: the event entry points
//! - [`sweep`]: stray toggle detection and removal
//! - [`markup`]: rendering the sanctioned toggle

pub mod bindings;
pub mod config;
pub mod dom;
pub mod error;
pub mod markup;
pub mod reconciler;
pub mod storage;
pub mod sweep;
pub mod theme;
pub mod util;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use bindings::{
    apply_theme, plan_theme, ApplyReport, AttributeBinding, BindingKind, BindingUpdate, ClassBinding,
    IconBinding, LabelBinding, MetaBinding, Mutation, UiBindings,
};
pub use config::{ThemeConfig, DEFAULT_STORAGE_KEY};
pub use dom::{
    Document, DocumentSpec, Dom, Element, ElementSpec, NodeId, RootSpec, Selector, SelectorError,
};
pub use error::{ConfigError, Error};
pub use markup::render_toggle;
pub use reconciler::Reconciler;
pub use storage::{affects_key, FileStore, MemoryStore, PreferenceStore, StorageError};
pub use sweep::{
    MutationWatch, Removal, StrayFinding, StrayReason, StrayToggleDetector, SweepConfig, SweepReport,
    SweepSchedule,
};
pub use theme::{
    compute_effective_theme, reset_scheme_detector, set_scheme_detector, ColorMode, FixedScheme,
    OsScheme, SchemeSource, ThemePreference, ThemeState,
};
pub use util::truncate_to_width;
