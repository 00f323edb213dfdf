//! Turning a color mode into binding updates and applying them.

use tracing::{debug, trace};

use super::UiBindings;
use crate::dom::{Dom, Selector};
use crate::theme::ColorMode;

/// Which affordance an update belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    ThemeClass,
    Checkbox,
    Label,
    Icon,
    DataAttribute,
    MetaThemeColor,
}

/// A single DOM change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Class { class: String, present: bool },
    Checked(bool),
    Text(String),
    Attribute { name: String, value: String },
}

/// A change to every element matching `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingUpdate {
    pub kind: BindingKind,
    pub target: Selector,
    pub mutation: Mutation,
}

impl BindingUpdate {
    fn new(kind: BindingKind, target: &Selector, mutation: Mutation) -> Self {
        Self {
            kind,
            target: target.clone(),
            mutation,
        }
    }
}

/// Outcome of [`apply_theme`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub mode: ColorMode,
    /// Bindings that found at least one element.
    pub applied: Vec<BindingKind>,
    /// Bindings whose target is not on this page.
    pub skipped: Vec<BindingKind>,
}

/// Lists the updates that render `mode` through `bindings`.
///
/// Pure: the same inputs always give the same plan.
pub fn plan_theme(mode: ColorMode, bindings: &UiBindings) -> Vec<BindingUpdate> {
    let dark = mode.is_dark();
    let mut updates = Vec::new();

    for binding in &bindings.theme_classes {
        updates.push(BindingUpdate::new(
            BindingKind::ThemeClass,
            &binding.target,
            Mutation::Class {
                class: binding.class.clone(),
                present: dark,
            },
        ));
    }

    if let Some(target) = &bindings.checkbox {
        updates.push(BindingUpdate::new(
            BindingKind::Checkbox,
            target,
            Mutation::Checked(dark),
        ));
    }

    if let Some(label) = &bindings.label {
        let text = if dark { &label.dark_text } else { &label.light_text };
        updates.push(BindingUpdate::new(
            BindingKind::Label,
            &label.target,
            Mutation::Text(text.clone()),
        ));
    }

    if let Some(icon) = &bindings.icon {
        let (shown, hidden) = if dark {
            (&icon.dark_class, &icon.light_class)
        } else {
            (&icon.light_class, &icon.dark_class)
        };
        updates.push(BindingUpdate::new(
            BindingKind::Icon,
            &icon.target,
            Mutation::Class {
                class: hidden.clone(),
                present: false,
            },
        ));
        updates.push(BindingUpdate::new(
            BindingKind::Icon,
            &icon.target,
            Mutation::Class {
                class: shown.clone(),
                present: true,
            },
        ));
    }

    if let Some(attribute) = &bindings.data_attribute {
        updates.push(BindingUpdate::new(
            BindingKind::DataAttribute,
            &attribute.target,
            Mutation::Attribute {
                name: attribute.name.clone(),
                value: mode.as_str().to_string(),
            },
        ));
    }

    if let Some(meta) = &bindings.meta_theme_color {
        let color = if dark { &meta.dark_color } else { &meta.light_color };
        updates.push(BindingUpdate::new(
            BindingKind::MetaThemeColor,
            &meta.target,
            Mutation::Attribute {
                name: "content".to_string(),
                value: color.clone(),
            },
        ));
    }

    updates
}

/// Renders `mode` onto every present binding element.
///
/// Each binding is independent: a target missing from the page is
/// recorded as skipped and the rest are still applied.
pub fn apply_theme<D: Dom + ?Sized>(mode: ColorMode, bindings: &UiBindings, dom: &mut D) -> ApplyReport {
    let mut report = ApplyReport {
        mode,
        applied: Vec::new(),
        skipped: Vec::new(),
    };

    for update in plan_theme(mode, bindings) {
        let targets = dom.query_all(&update.target);
        if targets.is_empty() {
            if !report.skipped.contains(&update.kind) {
                debug!(kind = ?update.kind, target = %update.target, "binding target absent, skipping");
                report.skipped.push(update.kind);
            }
            continue;
        }

        for node in &targets {
            match &update.mutation {
                Mutation::Class { class, present } => dom.set_class(node, class, *present),
                Mutation::Checked(checked) => dom.set_checked(node, *checked),
                Mutation::Text(text) => dom.set_text(node, text),
                Mutation::Attribute { name, value } => dom.set_attribute(node, name, value),
            }
        }
        trace!(kind = ?update.kind, count = targets.len(), "binding applied");
        if !report.applied.contains(&update.kind) {
            report.applied.push(update.kind);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::{AttributeBinding, IconBinding, LabelBinding, MetaBinding};
    use crate::dom::{Document, Element, NodeId};

    struct Page {
        doc: Document,
        checkbox: NodeId,
        label: NodeId,
        icon: NodeId,
        meta: NodeId,
    }

    fn full_page() -> Page {
        let mut doc = Document::new();
        let meta = doc.append(
            doc.head_id(),
            Element::new("meta").attr("name", "theme-color").attr("content", "#ffffff"),
        );
        let wrapper = doc.append(doc.body_id(), Element::new("div").class("theme-switch-wrapper"));
        let checkbox = doc.append(wrapper, Element::new("input").id("checkbox"));
        let label = doc.append(wrapper, Element::new("span").class("theme-label"));
        let icon = doc.append(wrapper, Element::new("i").class("fas theme-icon"));
        Page {
            doc,
            checkbox,
            label,
            icon,
            meta,
        }
    }

    #[test]
    fn test_apply_dark_sets_every_binding() {
        let mut page = full_page();
        let report = apply_theme(ColorMode::Dark, &UiBindings::default(), &mut page.doc);

        let doc = &page.doc;
        assert!(doc.has_class(&doc.body_id(), "dark-mode"));
        assert!(doc.is_checked(&page.checkbox));
        assert_eq!(doc.text_content(&page.label), "Light Mode");
        assert!(doc.has_class(&page.icon, "fa-sun"));
        assert!(!doc.has_class(&page.icon, "fa-moon"));
        assert_eq!(doc.attribute(&doc.html_id(), "data-theme").as_deref(), Some("dark"));
        assert_eq!(doc.attribute(&page.meta, "content").as_deref(), Some("#121212"));
        assert!(report.skipped.is_empty());
        assert_eq!(report.applied.len(), 6);
    }

    #[test]
    fn test_apply_light_reverts_every_binding() {
        let mut page = full_page();
        apply_theme(ColorMode::Dark, &UiBindings::default(), &mut page.doc);
        apply_theme(ColorMode::Light, &UiBindings::default(), &mut page.doc);

        let doc = &page.doc;
        assert!(!doc.has_class(&doc.body_id(), "dark-mode"));
        assert!(!doc.is_checked(&page.checkbox));
        assert_eq!(doc.text_content(&page.label), "Dark Mode");
        assert!(doc.has_class(&page.icon, "fa-moon"));
        assert!(!doc.has_class(&page.icon, "fa-sun"));
        assert!(doc.has_class(&page.icon, "theme-icon"));
        assert_eq!(doc.attribute(&doc.html_id(), "data-theme").as_deref(), Some("light"));
        assert_eq!(doc.attribute(&page.meta, "content").as_deref(), Some("#ffffff"));
    }

    #[test]
    fn test_missing_targets_are_skipped_not_fatal() {
        let mut doc = Document::new();
        let report = apply_theme(ColorMode::Dark, &UiBindings::default(), &mut doc);

        assert!(doc.has_class(&doc.body_id(), "dark-mode"));
        assert_eq!(
            report.applied,
            vec![BindingKind::ThemeClass, BindingKind::DataAttribute]
        );
        assert_eq!(
            report.skipped,
            vec![
                BindingKind::Checkbox,
                BindingKind::Label,
                BindingKind::Icon,
                BindingKind::MetaThemeColor
            ]
        );
    }

    #[test]
    fn test_applies_to_all_matches() {
        let mut doc = Document::new();
        let first = doc.append(doc.body_id(), Element::new("span").class("theme-label"));
        let second = doc.append(doc.body_id(), Element::new("span").class("theme-label"));
        let bindings = UiBindings::none().with_label(LabelBinding::default());

        apply_theme(ColorMode::Dark, &bindings, &mut doc);
        assert_eq!(doc.text_content(&first), "Light Mode");
        assert_eq!(doc.text_content(&second), "Light Mode");
    }

    #[test]
    fn test_plan_is_pure_and_ordered() {
        let bindings = UiBindings::none()
            .with_icon(IconBinding::default())
            .with_data_attribute(AttributeBinding::default())
            .with_meta_theme_color(MetaBinding::default());
        let plan = plan_theme(ColorMode::Light, &bindings);

        assert_eq!(plan, plan_theme(ColorMode::Light, &bindings));
        let kinds: Vec<_> = plan.iter().map(|u| u.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BindingKind::Icon,
                BindingKind::Icon,
                BindingKind::DataAttribute,
                BindingKind::MetaThemeColor
            ]
        );
        assert_eq!(
            plan[1].mutation,
            Mutation::Class {
                class: "fa-moon".to_string(),
                present: true
            }
        );
    }

    #[test]
    fn test_empty_bindings_do_nothing() {
        let mut doc = Document::new();
        let report = apply_theme(ColorMode::Dark, &UiBindings::none(), &mut doc);
        assert!(report.applied.is_empty());
        assert!(report.skipped.is_empty());
        assert!(doc.element(doc.body_id()).classes().is_empty());
    }
}
