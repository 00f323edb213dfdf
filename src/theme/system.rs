//! Live sources for the system color-scheme preference.

use once_cell::sync::Lazy;
use std::sync::Mutex;

use super::mode::ColorMode;

/// Something that can report the current system color-scheme preference.
///
/// The value can change while the page is open; callers read it on demand
/// rather than caching it.
pub trait SchemeSource {
    fn color_mode(&self) -> ColorMode;

    fn prefers_dark(&self) -> bool {
        self.color_mode().is_dark()
    }
}

impl<T: SchemeSource + ?Sized> SchemeSource for &T {
    fn color_mode(&self) -> ColorMode {
        (**self).color_mode()
    }
}

/// A source that always reports the same mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedScheme(pub ColorMode);

impl SchemeSource for FixedScheme {
    fn color_mode(&self) -> ColorMode {
        self.0
    }
}

type SchemeDetector = fn() -> ColorMode;

static SCHEME_DETECTOR: Lazy<Mutex<SchemeDetector>> = Lazy::new(|| Mutex::new(os_scheme_detector));

/// Overrides the detector used by [`OsScheme`].
///
/// This is useful for testing or when you want to force a specific color mode.
pub fn set_scheme_detector(detector: SchemeDetector) {
    let mut guard = SCHEME_DETECTOR.lock().unwrap_or_else(|e| e.into_inner());
    *guard = detector;
}

/// Restores the operating system detector.
pub fn reset_scheme_detector() {
    set_scheme_detector(os_scheme_detector);
}

pub(crate) fn detect_color_mode() -> ColorMode {
    let detector = SCHEME_DETECTOR.lock().unwrap_or_else(|e| e.into_inner());
    (*detector)()
}

/// The operating system's color-scheme setting, read through the
/// process-wide detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsScheme;

impl SchemeSource for OsScheme {
    fn color_mode(&self) -> ColorMode {
        detect_color_mode()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn os_scheme_detector() -> ColorMode {
    use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};

    match detect_os_theme() {
        OsThemeMode::Dark => ColorMode::Dark,
        _ => ColorMode::Light,
    }
}

// Browsers expose the preference through a media query instead, see
// `web::MediaQueryScheme`.
#[cfg(target_arch = "wasm32")]
fn os_scheme_detector() -> ColorMode {
    ColorMode::Light
}
