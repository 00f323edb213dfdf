//! An arena-backed in-memory document.

use std::collections::BTreeMap;

use super::Dom;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Element data for building and inspecting a [`Document`].
///
/// # Example
///
/// ```rust
/// use nocturne::{Document, Element};
///
/// let mut doc = Document::new();
/// let body = doc.body_id();
/// let banner = doc.append(body, Element::new("div").class("promo").text("Hello"));
/// assert_eq!(doc.element(banner).text_content(), "Hello");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    checked: bool,
    top: Option<f64>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Adds one or more whitespace-separated class tokens.
    pub fn class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            if !self.classes.iter().any(|c| c == class) {
                self.classes.push(class.to_string());
            }
        }
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Layout position: distance from the viewport top.
    pub fn top(mut self, top: f64) -> Self {
        self.top = Some(top);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn element_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// The element's own text, without descendants.
    pub fn text_content(&self) -> &str {
        &self.text
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.clone(),
            "class" => {
                if self.classes.is_empty() {
                    None
                } else {
                    Some(self.classes.join(" "))
                }
            }
            _ => self.attributes.get(name).cloned(),
        }
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        match name {
            "id" => self.id = Some(value.to_string()),
            "class" => {
                self.classes = value.split_whitespace().map(str::to_string).collect();
            }
            _ => {
                self.attributes.insert(name.to_string(), value.to_string());
            }
        }
    }

    fn set_class(&mut self, class: &str, present: bool) {
        let position = self.classes.iter().position(|c| c == class);
        match (present, position) {
            (true, None) => self.classes.push(class.to_string()),
            (false, Some(index)) => {
                self.classes.remove(index);
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct NodeData {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An in-memory document with `<html>`, `<head>` and `<body>`.
///
/// Removed nodes stay in the arena so their handles remain usable; they
/// are simply no longer reachable from the root.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    nodes: Vec<NodeData>,
    html: NodeId,
    head: NodeId,
    body: NodeId,
    viewport_height: Option<f64>,
    generation: u64,
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            html: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            viewport_height: None,
            generation: 0,
        };
        doc.html = doc.insert(None, Element::new("html"));
        doc.head = doc.append(doc.html, Element::new("head"));
        doc.body = doc.append(doc.html, Element::new("body"));
        doc
    }

    pub fn with_viewport_height(mut self, height: f64) -> Self {
        self.viewport_height = Some(height);
        self
    }

    pub fn html_id(&self) -> NodeId {
        self.html
    }

    pub fn head_id(&self) -> NodeId {
        self.head
    }

    pub fn body_id(&self) -> NodeId {
        self.body
    }

    /// Appends `element` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        self.insert(Some(parent), element)
    }

    pub fn element(&self, id: NodeId) -> &Element {
        &self.nodes[id.0].element
    }

    /// Mutable access for fixture tweaks; does not count as an insertion.
    pub fn element_mut(&mut self, id: NodeId) -> &mut Element {
        &mut self.nodes[id.0].element
    }

    /// Finds the first connected element with the given `id` attribute.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        std::iter::once(self.html)
            .chain(self.descendants(&self.html))
            .find(|node| self.element(*node).element_id() == Some(id))
    }

    fn insert(&mut self, parent: Option<NodeId>, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            element,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        self.generation += 1;
        id
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for Document {
    type Node = NodeId;

    fn document_element(&self) -> Option<NodeId> {
        Some(self.html)
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn head(&self) -> Option<NodeId> {
        Some(self.head)
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes[node.0].children.clone()
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.element(*node).tag.clone()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.element(*node).get_attribute(name)
    }

    fn text_content(&self, node: &NodeId) -> String {
        let mut text = self.element(*node).text.clone();
        for child in &self.nodes[node.0].children {
            text.push_str(&self.text_content(child));
        }
        text
    }

    fn is_checked(&self, node: &NodeId) -> bool {
        self.element(*node).checked
    }

    fn top_offset(&self, node: &NodeId) -> Option<f64> {
        self.element(*node).top
    }

    fn viewport_height(&self) -> Option<f64> {
        self.viewport_height
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        let mut current = *node;
        loop {
            if current == self.html {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn set_class(&mut self, node: &NodeId, class: &str, present: bool) {
        self.element_mut(*node).set_class(class, present);
    }

    fn set_checked(&mut self, node: &NodeId, checked: bool) {
        self.element_mut(*node).checked = checked;
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        for child in std::mem::take(&mut self.nodes[node.0].children) {
            self.nodes[child.0].parent = None;
        }
        self.element_mut(*node).text = text.to_string();
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        self.element_mut(*node).set_attribute(name, value);
    }

    fn remove(&mut self, node: &NodeId) {
        let Some(parent) = self.nodes[node.0].parent.take() else {
            return;
        };
        self.nodes[parent.0].children.retain(|child| child != node);
    }

    fn body_children(&self) -> Vec<NodeId> {
        self.nodes[self.body.0].children.clone()
    }
}
