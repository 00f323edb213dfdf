//! The theme preference reconciler.
//!
//! [`Reconciler`] owns the persisted flag, the system preference source and
//! the UI bindings, and keeps them in agreement. State changes only happen
//! in its event entry points:
//!
//! - [`Reconciler::initialize`] once per page load
//! - [`Reconciler::on_user_toggle`] / [`Reconciler::toggle`] for explicit choices
//! - [`Reconciler::on_system_preference_change`] when the OS scheme changes
//! - [`Reconciler::clear_preference`] to go back to following the OS
//! - [`Reconciler::sync_from_storage`] after the flag changed elsewhere
//!
//! Each of them finishes by rendering the effective theme through
//! [`apply_theme`], so between events the document, the bindings and the
//! stored flag never disagree.
//!
//! # Example
//!
//! ```rust
//! use nocturne::{ColorMode, Document, Dom, FixedScheme, MemoryStore, Reconciler};
//!
//! let mut doc = Document::new();
//! let mut reconciler = Reconciler::new(MemoryStore::new(), FixedScheme(ColorMode::Dark));
//!
//! assert_eq!(reconciler.initialize(&mut doc), ColorMode::Dark);
//! assert!(doc.has_class(&doc.body_id(), "dark-mode"));
//!
//! reconciler.on_user_toggle(false, &mut doc);
//! assert_eq!(reconciler.on_system_preference_change(true, &mut doc), None);
//! assert_eq!(reconciler.effective(), ColorMode::Light);
//! ```

use tracing::{trace, warn};

use crate::bindings::{apply_theme, UiBindings};
use crate::config::{ThemeConfig, DEFAULT_STORAGE_KEY};
use crate::dom::Dom;
use crate::storage::{PreferenceStore, StorageError};
use crate::theme::{ColorMode, SchemeSource, ThemePreference, ThemeState};

/// Keeps the effective theme, the persisted flag and the UI in sync.
#[derive(Debug)]
pub struct Reconciler<S, Q> {
    store: S,
    scheme: Q,
    bindings: UiBindings,
    storage_key: String,
    persist_system_default: bool,
    state: ThemeState,
    session_only: bool,
}

impl<S: PreferenceStore, Q: SchemeSource> Reconciler<S, Q> {
    /// Creates a reconciler with the default bindings and storage key.
    pub fn new(store: S, scheme: Q) -> Self {
        Self {
            store,
            scheme,
            bindings: UiBindings::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            persist_system_default: false,
            state: ThemeState::new(ThemePreference::Unset, ColorMode::Light),
            session_only: false,
        }
    }

    /// Creates a reconciler from a site configuration.
    pub fn from_config(config: &ThemeConfig, store: S, scheme: Q) -> Self {
        Self::new(store, scheme)
            .with_bindings(config.bindings.clone())
            .with_storage_key(&config.storage_key)
            .with_persist_system_default(config.persist_system_default)
    }

    pub fn with_bindings(mut self, bindings: UiBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn with_storage_key(mut self, key: &str) -> Self {
        self.storage_key = key.to_string();
        self
    }

    /// Whether [`Reconciler::initialize`] persists the system-derived theme
    /// when no flag is stored.
    pub fn with_persist_system_default(mut self, persist: bool) -> Self {
        self.persist_system_default = persist;
        self
    }

    pub fn state(&self) -> ThemeState {
        self.state
    }

    pub fn effective(&self) -> ColorMode {
        self.state.effective()
    }

    /// True once storage failed and the flag only lives in memory.
    pub fn is_session_only(&self) -> bool {
        self.session_only
    }

    pub fn bindings(&self) -> &UiBindings {
        &self.bindings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Reads the flag and the system preference and renders the result.
    ///
    /// Safe to call again: with no state change in between, the second
    /// call leaves the document exactly as the first did.
    pub fn initialize<D: Dom + ?Sized>(&mut self, dom: &mut D) -> ColorMode {
        let preference = self.read_preference();
        let system = self.scheme.color_mode();
        self.state = ThemeState::new(preference, system);

        if !preference.is_set() && self.persist_system_default {
            self.write_preference(system.into());
        }

        trace!(?preference, %system, "theme initialized");
        self.render(dom)
    }

    /// Records an explicit user choice and renders it.
    ///
    /// From here on system changes are ignored until the flag is cleared.
    pub fn on_user_toggle<D: Dom + ?Sized>(&mut self, dark: bool, dom: &mut D) -> ColorMode {
        self.write_preference(ColorMode::from_dark(dark).into());
        self.render(dom)
    }

    /// Flips the current effective theme as an explicit user choice.
    pub fn toggle<D: Dom + ?Sized>(&mut self, dom: &mut D) -> ColorMode {
        let next = self.effective().flipped();
        self.on_user_toggle(next.is_dark(), dom)
    }

    /// Follows an OS scheme change unless the user pinned a theme.
    ///
    /// Returns the newly rendered mode, or `None` when pinned. Never writes
    /// the flag. A flag written elsewhere since the last event is adopted
    /// either way, and rendered if it changes the effective theme.
    pub fn on_system_preference_change<D: Dom + ?Sized>(
        &mut self,
        now_dark: bool,
        dom: &mut D,
    ) -> Option<ColorMode> {
        let system = ColorMode::from_dark(now_dark);
        let preference = self.read_preference();
        if preference.is_set() {
            let before = self.effective();
            self.state = self.state.with_preference(preference).with_system(system);
            trace!(%system, ?preference, "theme pinned, ignoring system change");
            if self.effective() != before {
                self.render(dom);
            }
            return None;
        }

        self.state = ThemeState::new(ThemePreference::Unset, system);
        Some(self.render(dom))
    }

    /// Forgets the user's choice and goes back to following the OS.
    pub fn clear_preference<D: Dom + ?Sized>(&mut self, dom: &mut D) -> ColorMode {
        self.write_preference(ThemePreference::Unset);
        self.state = self.state.with_system(self.scheme.color_mode());
        self.render(dom)
    }

    /// Re-reads the flag after it was changed outside this reconciler,
    /// e.g. by another tab.
    pub fn sync_from_storage<D: Dom + ?Sized>(&mut self, dom: &mut D) -> ColorMode {
        let preference = self.read_preference();
        self.state = self.state.with_preference(preference);
        self.render(dom)
    }

    fn render<D: Dom + ?Sized>(&self, dom: &mut D) -> ColorMode {
        let report = apply_theme(self.state.effective(), &self.bindings, dom);
        trace!(mode = %report.mode, applied = report.applied.len(), skipped = report.skipped.len(), "theme applied");
        report.mode
    }

    fn read_preference(&mut self) -> ThemePreference {
        if self.session_only {
            return self.state.preference;
        }
        match self.store.get(&self.storage_key) {
            Ok(flag) => ThemePreference::from_flag(flag.as_deref()),
            Err(err) => {
                self.degrade(&err);
                self.state.preference
            }
        }
    }

    fn write_preference(&mut self, preference: ThemePreference) {
        self.state = self.state.with_preference(preference);
        if self.session_only {
            return;
        }
        let result = match preference.as_flag() {
            Some(flag) => self.store.set(&self.storage_key, flag),
            None => self.store.remove(&self.storage_key),
        };
        if let Err(err) = result {
            self.degrade(&err);
        }
    }

    fn degrade(&mut self, err: &StorageError) {
        warn!(error = %err, key = %self.storage_key, "theme storage failed, keeping preference in memory for this session");
        self.session_only = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, Element, NodeId};
    use crate::storage::MemoryStore;
    use crate::theme::FixedScheme;

    struct Page {
        doc: Document,
        checkbox: NodeId,
        label: NodeId,
    }

    fn page() -> Page {
        let mut doc = Document::new();
        doc.append(
            doc.head_id(),
            Element::new("meta").attr("name", "theme-color").attr("content", "#ffffff"),
        );
        let wrapper = doc.append(doc.body_id(), Element::new("div").class("theme-switch-wrapper"));
        let checkbox = doc.append(wrapper, Element::new("input").id("checkbox"));
        let label = doc.append(wrapper, Element::new("span").class("theme-label"));
        Page {
            doc,
            checkbox,
            label,
        }
    }

    fn store_with(flag: Option<&str>) -> MemoryStore {
        match flag {
            Some(flag) => MemoryStore::new().with("theme", flag),
            None => MemoryStore::new(),
        }
    }

    fn stored(reconciler: &Reconciler<MemoryStore, FixedScheme>) -> Option<String> {
        reconciler.store().get("theme").unwrap()
    }

    #[test]
    fn test_initialize_precedence_table() {
        let cases = [
            (Some("dark"), ColorMode::Dark, ColorMode::Dark),
            (Some("dark"), ColorMode::Light, ColorMode::Dark),
            (Some("light"), ColorMode::Dark, ColorMode::Light),
            (Some("light"), ColorMode::Light, ColorMode::Light),
            (None, ColorMode::Dark, ColorMode::Dark),
            (None, ColorMode::Light, ColorMode::Light),
        ];
        for (flag, system, expected) in cases {
            let mut page = page();
            let mut reconciler = Reconciler::new(store_with(flag), FixedScheme(system));
            let mode = reconciler.initialize(&mut page.doc);

            assert_eq!(mode, expected, "flag={flag:?} system={system:?}");
            let doc = &page.doc;
            assert_eq!(doc.has_class(&doc.body_id(), "dark-mode"), expected.is_dark());
            assert_eq!(doc.is_checked(&page.checkbox), expected.is_dark());
            assert_eq!(
                doc.attribute(&doc.html_id(), "data-theme").as_deref(),
                Some(expected.as_str())
            );
        }
    }

    #[test]
    fn test_system_dark_without_flag_scenario() {
        let mut page = page();
        let mut reconciler = Reconciler::new(MemoryStore::new(), FixedScheme(ColorMode::Dark));
        reconciler.initialize(&mut page.doc);

        let doc = &page.doc;
        assert!(doc.has_class(&doc.body_id(), "dark-mode"));
        assert!(doc.is_checked(&page.checkbox));
        assert_eq!(doc.text_content(&page.label), "Light Mode");
        // Not persisted: the preference stays unset.
        assert_eq!(stored(&reconciler), None);
        assert!(!reconciler.state().is_pinned());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut page = page();
        let mut reconciler = Reconciler::new(store_with(Some("dark")), FixedScheme(ColorMode::Light));
        reconciler.initialize(&mut page.doc);
        let after_first = page.doc.clone();

        reconciler.initialize(&mut page.doc);
        assert_eq!(page.doc, after_first);
    }

    #[test]
    fn test_user_toggle_pins_against_system_changes() {
        let mut page = page();
        let mut reconciler = Reconciler::new(MemoryStore::new(), FixedScheme(ColorMode::Light));
        reconciler.initialize(&mut page.doc);

        assert_eq!(reconciler.on_user_toggle(true, &mut page.doc), ColorMode::Dark);
        assert_eq!(stored(&reconciler).as_deref(), Some("dark"));

        assert_eq!(reconciler.on_system_preference_change(false, &mut page.doc), None);
        assert_eq!(reconciler.effective(), ColorMode::Dark);
        assert!(page.doc.has_class(&page.doc.body_id(), "dark-mode"));
    }

    #[test]
    fn test_system_changes_tracked_while_unset() {
        let mut page = page();
        let mut reconciler = Reconciler::new(MemoryStore::new(), FixedScheme(ColorMode::Light));
        reconciler.initialize(&mut page.doc);

        assert_eq!(
            reconciler.on_system_preference_change(true, &mut page.doc),
            Some(ColorMode::Dark)
        );
        assert!(page.doc.is_checked(&page.checkbox));

        assert_eq!(
            reconciler.on_system_preference_change(false, &mut page.doc),
            Some(ColorMode::Light)
        );
        assert!(!page.doc.is_checked(&page.checkbox));
        assert_eq!(stored(&reconciler), None);
    }

    #[test]
    fn test_toggle_flips_effective_theme() {
        let mut page = page();
        let mut reconciler = Reconciler::new(MemoryStore::new(), FixedScheme(ColorMode::Dark));
        reconciler.initialize(&mut page.doc);

        assert_eq!(reconciler.toggle(&mut page.doc), ColorMode::Light);
        assert_eq!(stored(&reconciler).as_deref(), Some("light"));
        assert_eq!(reconciler.toggle(&mut page.doc), ColorMode::Dark);
        assert_eq!(stored(&reconciler).as_deref(), Some("dark"));
    }

    #[test]
    fn test_clear_preference_resumes_tracking() {
        let mut page = page();
        let mut reconciler = Reconciler::new(store_with(Some("light")), FixedScheme(ColorMode::Dark));
        assert_eq!(reconciler.initialize(&mut page.doc), ColorMode::Light);

        assert_eq!(reconciler.clear_preference(&mut page.doc), ColorMode::Dark);
        assert_eq!(stored(&reconciler), None);
        assert_eq!(
            reconciler.on_system_preference_change(false, &mut page.doc),
            Some(ColorMode::Light)
        );
    }

    #[test]
    fn test_pinned_system_change_is_remembered_for_clear() {
        let mut page = page();
        let mut reconciler = Reconciler::new(store_with(Some("light")), FixedScheme(ColorMode::Light));
        reconciler.initialize(&mut page.doc);

        assert_eq!(reconciler.on_system_preference_change(true, &mut page.doc), None);
        assert_eq!(reconciler.state().system, ColorMode::Dark);
    }

    #[test]
    fn test_persist_system_default_writes_flag() {
        let mut page = page();
        let mut reconciler = Reconciler::new(MemoryStore::new(), FixedScheme(ColorMode::Dark))
            .with_persist_system_default(true);
        reconciler.initialize(&mut page.doc);

        assert_eq!(stored(&reconciler).as_deref(), Some("dark"));
        assert!(reconciler.state().is_pinned());
        assert_eq!(reconciler.on_system_preference_change(false, &mut page.doc), None);
    }

    #[test]
    fn test_unavailable_storage_degrades_to_session() {
        let mut page = page();
        let mut reconciler =
            Reconciler::new(MemoryStore::unavailable(), FixedScheme(ColorMode::Dark));

        assert_eq!(reconciler.initialize(&mut page.doc), ColorMode::Dark);
        assert!(reconciler.is_session_only());

        assert_eq!(reconciler.on_user_toggle(false, &mut page.doc), ColorMode::Light);
        assert!(!page.doc.has_class(&page.doc.body_id(), "dark-mode"));
        // The in-memory choice still pins the theme for the session.
        assert_eq!(reconciler.on_system_preference_change(true, &mut page.doc), None);
        assert_eq!(reconciler.effective(), ColorMode::Light);
    }

    #[test]
    fn test_sync_from_storage_picks_up_external_change() {
        let mut page = page();
        let mut reconciler = Reconciler::new(MemoryStore::new(), FixedScheme(ColorMode::Light));
        reconciler.initialize(&mut page.doc);

        reconciler.store.set("theme", "dark").unwrap();
        assert_eq!(reconciler.sync_from_storage(&mut page.doc), ColorMode::Dark);
        assert!(reconciler.state().is_pinned());
        assert!(page.doc.is_checked(&page.checkbox));
    }

    #[test]
    fn test_system_change_adopts_flag_written_elsewhere() {
        let mut page = page();
        let mut reconciler = Reconciler::new(MemoryStore::new(), FixedScheme(ColorMode::Light));
        assert_eq!(reconciler.initialize(&mut page.doc), ColorMode::Light);

        // Another tab pins dark without a storage event reaching us.
        reconciler.store.set("theme", "dark").unwrap();
        assert_eq!(reconciler.on_system_preference_change(false, &mut page.doc), None);

        assert_eq!(reconciler.state().preference, ThemePreference::Dark);
        assert_eq!(reconciler.effective(), ColorMode::Dark);
        assert!(page.doc.has_class(&page.doc.body_id(), "dark-mode"));
        assert!(page.doc.is_checked(&page.checkbox));
        assert_eq!(page.doc.text_content(&page.label), "Light Mode");
    }

    #[test]
    fn test_custom_storage_key_from_config() {
        let config = ThemeConfig {
            storage_key: "site-theme".to_string(),
            ..ThemeConfig::default()
        };
        let mut page = page();
        let mut reconciler = Reconciler::from_config(
            &config,
            MemoryStore::new().with("site-theme", "dark"),
            FixedScheme(ColorMode::Light),
        );
        assert_eq!(reconciler.initialize(&mut page.doc), ColorMode::Dark);

        reconciler.on_user_toggle(false, &mut page.doc);
        assert_eq!(
            reconciler.store().get("site-theme").unwrap().as_deref(),
            Some("light")
        );
        assert_eq!(reconciler.store().get("theme").unwrap(), None);
    }
}
