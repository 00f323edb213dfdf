//! The reconciler's state as a plain value.

use super::mode::{compute_effective_theme, ColorMode, ThemePreference};

/// Everything the effective theme depends on.
///
/// The reconciler holds one of these and replaces it only from its event
/// entry points; everything else reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeState {
    pub preference: ThemePreference,
    pub system: ColorMode,
}

impl ThemeState {
    pub fn new(preference: ThemePreference, system: ColorMode) -> Self {
        Self { preference, system }
    }

    /// The theme that should be rendered.
    pub fn effective(&self) -> ColorMode {
        compute_effective_theme(self.preference, self.system)
    }

    /// True once the user has made an explicit choice.
    pub fn is_pinned(&self) -> bool {
        self.preference.is_set()
    }

    pub fn with_preference(self, preference: ThemePreference) -> Self {
        Self { preference, ..self }
    }

    pub fn with_system(self, system: ColorMode) -> Self {
        Self { system, ..self }
    }
}
