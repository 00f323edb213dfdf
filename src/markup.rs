//! Rendering the sanctioned toggle markup.
//!
//! Static pages emit the toggle from the same configuration the reconciler
//! and the sweep read, so the rendered container is exactly what the sweep
//! treats as sanctioned and the controls are exactly what the bindings
//! target.

use minijinja::{context, Environment};

use crate::bindings::UiBindings;
use crate::dom::Selector;
use crate::error::Error;
use crate::sweep::SweepConfig;
use crate::theme::ColorMode;

const TOGGLE_TEMPLATE: &str = r#"<div class="{{ container }}">
{%- if checkbox_id %}
  <label class="theme-switch" for="{{ checkbox_id }}">
    <input type="checkbox" id="{{ checkbox_id }}"{% if dark %} checked{% endif %}>
    <div class="slider round"></div>
  </label>
{%- endif %}
{%- if label_class %}
  <span class="{{ label_class }}">{{ label_text }}</span>
{%- endif %}
{%- if icon_class %}
  <i class="fas {{ icon_glyph }} {{ icon_class }}"></i>
{%- endif %}
</div>"#;

fn single_class<'a>(selector: &'a Selector, what: &str) -> Result<&'a str, Error> {
    selector
        .single()
        .and_then(|compound| compound.as_single_class())
        .ok_or_else(|| {
            Error::Markup(format!(
                "{} selector '{}' must be a single .class",
                what, selector
            ))
        })
}

fn single_id<'a>(selector: &'a Selector, what: &str) -> Result<&'a str, Error> {
    selector
        .single()
        .and_then(|compound| compound.as_single_id())
        .ok_or_else(|| Error::Markup(format!("{} selector '{}' must be a single #id", what, selector)))
}

/// Renders the theme switch in its initial `mode`.
///
/// # Errors
///
/// Returns [`Error::Markup`] when a configured target cannot be expressed as
/// plain markup (the container, label and icon need a single `.class`, the
/// checkbox a single `#id`).
///
/// # Example
///
/// ```rust
/// use nocturne::{render_toggle, ColorMode, SweepConfig, UiBindings};
///
/// let html = render_toggle(&UiBindings::default(), &SweepConfig::default(), ColorMode::Dark).unwrap();
/// assert!(html.starts_with(r#"<div class="theme-switch-wrapper">"#));
/// assert!(html.contains(r#"id="checkbox" checked"#));
/// assert!(html.contains("Light Mode"));
/// ```
pub fn render_toggle(bindings: &UiBindings, sweep: &SweepConfig, mode: ColorMode) -> Result<String, Error> {
    let dark = mode.is_dark();
    let container = single_class(&sweep.sanctioned, "sanctioned container")?;
    let checkbox_id = bindings
        .checkbox
        .as_ref()
        .map(|selector| single_id(selector, "checkbox"))
        .transpose()?;
    let (label_class, label_text) = match &bindings.label {
        Some(label) => {
            let text = if dark { &label.dark_text } else { &label.light_text };
            (Some(single_class(&label.target, "label")?), Some(text.as_str()))
        }
        None => (None, None),
    };
    let (icon_class, icon_glyph) = match &bindings.icon {
        Some(icon) => {
            let glyph = if dark { &icon.dark_class } else { &icon.light_class };
            (Some(single_class(&icon.target, "icon")?), Some(glyph.as_str()))
        }
        None => (None, None),
    };

    let mut env = Environment::new();
    env.add_template("toggle.html", TOGGLE_TEMPLATE)?;
    let template = env.get_template("toggle.html")?;
    let html = template.render(context! {
        container,
        checkbox_id,
        dark,
        label_class,
        label_text,
        icon_class,
        icon_glyph,
    })?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::LabelBinding;

    #[test]
    fn test_render_light_defaults() {
        let html = render_toggle(&UiBindings::default(), &SweepConfig::default(), ColorMode::Light).unwrap();
        assert!(html.contains(r#"<input type="checkbox" id="checkbox">"#));
        assert!(html.contains(r#"<span class="theme-label">Dark Mode</span>"#));
        assert!(html.contains(r#"<i class="fas fa-moon theme-icon"></i>"#));
        assert!(html.ends_with("</div>"));
    }

    #[test]
    fn test_render_without_optional_parts() {
        let html = render_toggle(&UiBindings::none(), &SweepConfig::default(), ColorMode::Dark).unwrap();
        assert!(!html.contains("<input"));
        assert!(!html.contains("<span"));
        assert!(!html.contains("<i "));
    }

    #[test]
    fn test_label_text_is_escaped() {
        let bindings = UiBindings::none().with_label(LabelBinding {
            light_text: "Dark & <Light>".to_string(),
            ..LabelBinding::default()
        });
        let html = render_toggle(&bindings, &SweepConfig::default(), ColorMode::Light).unwrap();
        assert!(html.contains("Dark &amp; &lt;Light&gt;"));
    }

    #[test]
    fn test_complex_container_is_rejected() {
        let sweep = SweepConfig {
            sanctioned: Selector::parse("div.theme-switch-wrapper").unwrap(),
            ..SweepConfig::default()
        };
        let err = render_toggle(&UiBindings::default(), &sweep, ColorMode::Light).unwrap_err();
        assert!(matches!(err, Error::Markup(_)));
    }

    #[test]
    fn test_class_checkbox_is_rejected() {
        let bindings = UiBindings::none().with_checkbox(Selector::parse(".toggle").unwrap());
        let err = render_toggle(&bindings, &SweepConfig::default(), ColorMode::Light).unwrap_err();
        assert!(err.to_string().contains("#id"));
    }
}
