//! UI affordances that mirror the effective theme.
//!
//! A page may carry any subset of these; [`UiBindings`] names where each
//! one lives and what it shows in each mode. Absent fields (or targets
//! missing from the page) are simply skipped when applying.
//!
//! The defaults describe the portfolio markup:
//!
//! | binding | target | dark | light |
//! |---|---|---|---|
//! | theme class | `body` | `dark-mode` added | removed |
//! | checkbox | `#checkbox` | checked | unchecked |
//! | label | `.theme-label` | "Light Mode" | "Dark Mode" |
//! | icon | `.theme-icon` | `fa-sun` | `fa-moon` |
//! | data attribute | `html` `data-theme` | `dark` | `light` |
//! | meta theme-color | `meta[name=theme-color]` | `#121212` | `#ffffff` |
//!
//! The label and icon advertise the mode a click would switch *to*.

mod apply;

pub use apply::{apply_theme, plan_theme, ApplyReport, BindingKind, BindingUpdate, Mutation};

use serde::{Deserialize, Serialize};

use crate::dom::Selector;

fn builtin(selector: &'static str) -> Selector {
    Selector::parse(selector).expect("built-in selectors are valid")
}

/// A class toggled on while the dark theme is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassBinding {
    pub target: Selector,
    pub class: String,
}

impl Default for ClassBinding {
    fn default() -> Self {
        Self {
            target: builtin("body"),
            class: "dark-mode".to_string(),
        }
    }
}

/// A text label showing the "switch to" wording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelBinding {
    pub target: Selector,
    /// Shown while dark is active.
    pub dark_text: String,
    /// Shown while light is active.
    pub light_text: String,
}

impl Default for LabelBinding {
    fn default() -> Self {
        Self {
            target: builtin(".theme-label"),
            dark_text: "Light Mode".to_string(),
            light_text: "Dark Mode".to_string(),
        }
    }
}

/// An icon whose class swaps between two glyphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconBinding {
    pub target: Selector,
    pub dark_class: String,
    pub light_class: String,
}

impl Default for IconBinding {
    fn default() -> Self {
        Self {
            target: builtin(".theme-icon"),
            dark_class: "fa-sun".to_string(),
            light_class: "fa-moon".to_string(),
        }
    }
}

/// An attribute set to `dark` or `light`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeBinding {
    pub target: Selector,
    pub name: String,
}

impl Default for AttributeBinding {
    fn default() -> Self {
        Self {
            target: builtin("html"),
            name: "data-theme".to_string(),
        }
    }
}

/// The browser chrome color advertised through `<meta name="theme-color">`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaBinding {
    pub target: Selector,
    pub dark_color: String,
    pub light_color: String,
}

impl Default for MetaBinding {
    fn default() -> Self {
        Self {
            target: builtin("meta[name=theme-color]"),
            dark_color: "#121212".to_string(),
            light_color: "#ffffff".to_string(),
        }
    }
}

/// Every affordance the reconciler keeps in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiBindings {
    pub theme_classes: Vec<ClassBinding>,
    pub checkbox: Option<Selector>,
    pub label: Option<LabelBinding>,
    pub icon: Option<IconBinding>,
    pub data_attribute: Option<AttributeBinding>,
    pub meta_theme_color: Option<MetaBinding>,
}

impl UiBindings {
    /// No bindings at all.
    pub fn none() -> Self {
        Self {
            theme_classes: Vec::new(),
            checkbox: None,
            label: None,
            icon: None,
            data_attribute: None,
            meta_theme_color: None,
        }
    }

    /// Adds a theme class binding, returning the bindings for chaining.
    pub fn with_theme_class(mut self, target: Selector, class: &str) -> Self {
        self.theme_classes.push(ClassBinding {
            target,
            class: class.to_string(),
        });
        self
    }

    pub fn with_checkbox(mut self, target: Selector) -> Self {
        self.checkbox = Some(target);
        self
    }

    pub fn with_label(mut self, label: LabelBinding) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_icon(mut self, icon: IconBinding) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_data_attribute(mut self, attribute: AttributeBinding) -> Self {
        self.data_attribute = Some(attribute);
        self
    }

    pub fn with_meta_theme_color(mut self, meta: MetaBinding) -> Self {
        self.meta_theme_color = Some(meta);
        self
    }

    /// Every selector a binding writes to, in plan order.
    pub fn targets(&self) -> Vec<Selector> {
        let mut targets: Vec<Selector> = self.theme_classes.iter().map(|b| b.target.clone()).collect();
        targets.extend(self.checkbox.clone());
        targets.extend(self.label.as_ref().map(|b| b.target.clone()));
        targets.extend(self.icon.as_ref().map(|b| b.target.clone()));
        targets.extend(self.data_attribute.as_ref().map(|b| b.target.clone()));
        targets.extend(self.meta_theme_color.as_ref().map(|b| b.target.clone()));
        targets
    }
}

impl Default for UiBindings {
    fn default() -> Self {
        Self {
            theme_classes: vec![ClassBinding::default()],
            checkbox: Some(builtin("#checkbox")),
            label: Some(LabelBinding::default()),
            icon: Some(IconBinding::default()),
            data_attribute: Some(AttributeBinding::default()),
            meta_theme_color: Some(MetaBinding::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets() {
        let bindings = UiBindings::default();
        assert_eq!(bindings.theme_classes[0].target.source(), "body");
        assert_eq!(bindings.theme_classes[0].class, "dark-mode");
        assert_eq!(bindings.checkbox.as_ref().unwrap().source(), "#checkbox");
        assert_eq!(bindings.label.as_ref().unwrap().dark_text, "Light Mode");
    }

    #[test]
    fn test_targets_follow_present_bindings() {
        let sources: Vec<String> = UiBindings::default()
            .targets()
            .iter()
            .map(|t| t.source().to_string())
            .collect();
        assert_eq!(
            sources,
            ["body", "#checkbox", ".theme-label", ".theme-icon", "html", "meta[name=theme-color]"]
        );
        assert!(UiBindings::none().targets().is_empty());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r##"
theme_classes:
  - target: html
    class: dark-theme
label:
  target: "#theme-text"
icon: null
"##;
        let bindings: UiBindings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(bindings.theme_classes.len(), 1);
        assert_eq!(bindings.theme_classes[0].class, "dark-theme");

        let label = bindings.label.unwrap();
        assert_eq!(label.target.source(), "#theme-text");
        assert_eq!(label.light_text, "Dark Mode");

        assert!(bindings.icon.is_none());
        assert!(bindings.checkbox.is_some());
    }

    #[test]
    fn test_invalid_selector_in_yaml_is_rejected() {
        let yaml = "checkbox: \".wrapper input\"\n";
        assert!(serde_yaml::from_str::<UiBindings>(yaml).is_err());
    }

    #[test]
    fn test_builder_from_none() {
        let bindings = UiBindings::none()
            .with_theme_class(Selector::parse("body").unwrap(), "dark-theme")
            .with_checkbox(Selector::parse("#theme-toggle").unwrap());
        assert_eq!(bindings.theme_classes.len(), 1);
        assert!(bindings.label.is_none());
        assert!(bindings.meta_theme_color.is_none());
    }
}
