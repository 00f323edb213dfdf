//! Color modes, persisted preferences and the precedence rule between them.

use serde::{Deserialize, Serialize};

/// The theme actually rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Light,
    Dark,
}

impl ColorMode {
    /// Builds a mode from a "prefers dark" boolean.
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            ColorMode::Dark
        } else {
            ColorMode::Light
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, ColorMode::Dark)
    }

    /// Returns the opposite mode.
    pub fn flipped(self) -> Self {
        match self {
            ColorMode::Light => ColorMode::Dark,
            ColorMode::Dark => ColorMode::Light,
        }
    }

    /// The lowercase name used for flags and `data-theme` values.
    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An explicit user choice, or the lack of one.
///
/// `Unset` means the effective theme follows the system preference. It is
/// never written to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemePreference {
    Dark,
    Light,
    #[default]
    Unset,
}

impl ThemePreference {
    /// Parses a stored flag.
    ///
    /// Absent and empty flags are `Unset`. `"dark"` is `Dark`. Any other
    /// non-empty value counts as a present, non-dark choice and pins the
    /// theme to `Light`.
    ///
    /// ```rust
    /// use nocturne::ThemePreference;
    ///
    /// assert_eq!(ThemePreference::from_flag(None), ThemePreference::Unset);
    /// assert_eq!(ThemePreference::from_flag(Some("dark")), ThemePreference::Dark);
    /// assert_eq!(ThemePreference::from_flag(Some("light")), ThemePreference::Light);
    /// ```
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            None | Some("") => ThemePreference::Unset,
            Some("dark") => ThemePreference::Dark,
            Some(_) => ThemePreference::Light,
        }
    }

    /// The value to persist, or `None` for `Unset`.
    pub fn as_flag(self) -> Option<&'static str> {
        match self {
            ThemePreference::Dark => Some("dark"),
            ThemePreference::Light => Some("light"),
            ThemePreference::Unset => None,
        }
    }

    /// The explicit mode, if one was chosen.
    pub fn mode(self) -> Option<ColorMode> {
        match self {
            ThemePreference::Dark => Some(ColorMode::Dark),
            ThemePreference::Light => Some(ColorMode::Light),
            ThemePreference::Unset => None,
        }
    }

    pub fn is_set(self) -> bool {
        !matches!(self, ThemePreference::Unset)
    }
}

impl From<ColorMode> for ThemePreference {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Dark => ThemePreference::Dark,
            ColorMode::Light => ThemePreference::Light,
        }
    }
}

/// Resolves the effective theme: an explicit preference wins, otherwise
/// the system preference applies.
///
/// ```rust
/// use nocturne::{compute_effective_theme, ColorMode, ThemePreference};
///
/// let mode = compute_effective_theme(ThemePreference::Light, ColorMode::Dark);
/// assert_eq!(mode, ColorMode::Light);
///
/// let mode = compute_effective_theme(ThemePreference::Unset, ColorMode::Dark);
/// assert_eq!(mode, ColorMode::Dark);
/// ```
pub fn compute_effective_theme(preference: ThemePreference, system: ColorMode) -> ColorMode {
    preference.mode().unwrap_or(system)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flag_empty_is_unset() {
        assert_eq!(ThemePreference::from_flag(Some("")), ThemePreference::Unset);
    }

    #[test]
    fn test_from_flag_unknown_value_pins_light() {
        assert_eq!(ThemePreference::from_flag(Some("Dark")), ThemePreference::Light);
        assert_eq!(ThemePreference::from_flag(Some("auto")), ThemePreference::Light);
    }

    #[test]
    fn test_unset_has_no_flag() {
        assert_eq!(ThemePreference::Unset.as_flag(), None);
        assert_eq!(ThemePreference::Dark.as_flag(), Some("dark"));
        assert_eq!(ThemePreference::Light.as_flag(), Some("light"));
    }

    #[test]
    fn test_precedence_table() {
        use ColorMode::*;
        let cases = [
            (ThemePreference::Dark, Dark, Dark),
            (ThemePreference::Dark, Light, Dark),
            (ThemePreference::Light, Dark, Light),
            (ThemePreference::Light, Light, Light),
            (ThemePreference::Unset, Dark, Dark),
            (ThemePreference::Unset, Light, Light),
        ];
        for (preference, system, expected) in cases {
            assert_eq!(
                compute_effective_theme(preference, system),
                expected,
                "preference={preference:?} system={system:?}"
            );
        }
    }

    #[test]
    fn test_flipped() {
        assert_eq!(ColorMode::Dark.flipped(), ColorMode::Light);
        assert_eq!(ColorMode::Light.flipped(), ColorMode::Dark);
    }

    #[test]
    fn test_color_mode_serde_names() {
        let json = serde_json::to_string(&ColorMode::Dark).unwrap();
        assert_eq!(json, "\"dark\"");
        let mode: ColorMode = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(mode, ColorMode::Light);
    }
}
