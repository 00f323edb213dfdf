//! Serde descriptions of documents.
//!
//! Fixtures describe the markup of a page variant in YAML or JSON and
//! build a [`Document`] from it:
//!
//! ```yaml
//! viewport_height: 800
//! html: { attrs: { lang: en } }
//! head:
//!   - tag: meta
//!     attrs: { name: theme-color, content: "#ffffff" }
//! body:
//!   - tag: div
//!     class: wrapper
//!     children:
//!       - tag: input
//!         id: checkbox
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::document::{Document, Element, NodeId};
use crate::error::ConfigError;

/// One element and its subtree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementSpec {
    pub tag: String,
    pub id: Option<String>,
    /// Whitespace-separated class list.
    pub class: Option<String>,
    pub attrs: BTreeMap<String, String>,
    pub text: Option<String>,
    pub checked: bool,
    /// Distance from the viewport top, for bottom-of-page checks.
    pub top: Option<f64>,
    pub children: Vec<ElementSpec>,
}

/// Attributes for the fixed `<html>`/`<body>` elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootSpec {
    pub class: Option<String>,
    pub attrs: BTreeMap<String, String>,
}

/// A whole page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSpec {
    pub viewport_height: Option<f64>,
    pub html: RootSpec,
    pub body_attrs: RootSpec,
    pub head: Vec<ElementSpec>,
    pub body: Vec<ElementSpec>,
}

impl ElementSpec {
    fn to_element(&self) -> Element {
        let tag = if self.tag.is_empty() { "div" } else { self.tag.as_str() };
        let mut element = Element::new(tag).checked(self.checked);
        if let Some(id) = &self.id {
            element = element.id(id);
        }
        if let Some(class) = &self.class {
            element = element.class(class);
        }
        for (name, value) in &self.attrs {
            element = element.attr(name, value);
        }
        if let Some(text) = &self.text {
            element = element.text(text);
        }
        if let Some(top) = self.top {
            element = element.top(top);
        }
        element
    }

    fn build(&self, doc: &mut Document, parent: NodeId) {
        let node = doc.append(parent, self.to_element());
        for child in &self.children {
            child.build(doc, node);
        }
    }
}

impl RootSpec {
    fn apply(&self, doc: &mut Document, node: NodeId) {
        use super::Dom;

        if let Some(class) = &self.class {
            for token in class.split_whitespace() {
                doc.set_class(&node, token, true);
            }
        }
        for (name, value) in &self.attrs {
            doc.set_attribute(&node, name, value);
        }
    }
}

impl DocumentSpec {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Builds a fresh document from this description.
    pub fn build(&self) -> Document {
        let mut doc = Document::new();
        if let Some(height) = self.viewport_height {
            doc = doc.with_viewport_height(height);
        }
        let (html, head, body) = (doc.html_id(), doc.head_id(), doc.body_id());
        self.html.apply(&mut doc, html);
        self.body_attrs.apply(&mut doc, body);
        for element in &self.head {
            element.build(&mut doc, head);
        }
        for element in &self.body {
            element.build(&mut doc, body);
        }
        doc
    }
}
