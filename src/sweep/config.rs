use serde::{Deserialize, Serialize};

use crate::dom::Selector;

/// What the stray toggle sweep looks for and what it must leave alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// The legitimate toggle container. Nothing inside it, and nothing
    /// containing it, is ever removed.
    pub sanctioned: Selector,
    /// The page's main content wrapper; never removed as a whole.
    pub page_root: Option<Selector>,
    /// Top-level tags that are never candidates.
    pub ignored_tags: Vec<String>,
    /// Visible wording of old toggles. Only checked on top-level elements.
    pub text_markers: Vec<String>,
    /// Icon classes of old toggles.
    pub icon_classes: Vec<String>,
    /// Substrings of class names or ids used by old toggles.
    pub name_markers: Vec<String>,
    /// Remove top-level elements whose top edge is within this many pixels
    /// of the viewport bottom. Disabled when `None`.
    pub bottom_margin: Option<f64>,
    /// Also sweep nested elements by icon class and naming marker.
    pub deep: bool,
    /// Extra passes after load, in milliseconds.
    pub delays_ms: Vec<u64>,
    /// Re-run when nodes are inserted into the document.
    pub observe_mutations: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            sanctioned: Selector::parse(".theme-switch-wrapper").expect("built-in selectors are valid"),
            page_root: Some(Selector::parse(".wrapper").expect("built-in selectors are valid")),
            ignored_tags: ["script", "style", "link", "meta", "noscript"]
                .into_iter()
                .map(String::from)
                .collect(),
            text_markers: vec!["Dark Mode".to_string(), "Light Mode".to_string()],
            icon_classes: vec!["fa-moon".to_string(), "fa-sun".to_string()],
            name_markers: vec!["dark-mode".to_string(), "darkMode".to_string()],
            bottom_margin: None,
            deep: true,
            delays_ms: vec![500, 1500],
            observe_mutations: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SweepConfig::default();
        assert_eq!(config.sanctioned.source(), ".theme-switch-wrapper");
        assert_eq!(config.page_root.as_ref().unwrap().source(), ".wrapper");
        assert!(config.ignored_tags.contains(&"script".to_string()));
        assert_eq!(config.bottom_margin, None);
        assert_eq!(config.delays_ms, vec![500, 1500]);
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r##"
sanctioned: "#theme-switch"
page_root: null
text_markers: ["Night Mode"]
bottom_margin: 100
"##;
        let config: SweepConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.sanctioned.source(), "#theme-switch");
        assert!(config.page_root.is_none());
        assert_eq!(config.text_markers, vec!["Night Mode".to_string()]);
        assert_eq!(config.bottom_margin, Some(100.0));
        assert_eq!(config.icon_classes.len(), 2);
    }
}
