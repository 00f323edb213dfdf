//! Document access for bindings and the stray toggle sweep.
//!
//! This module provides:
//!
//! - [`Dom`]: the backend seam, implemented by the in-memory [`Document`]
//!   and by the browser backend
//! - [`Selector`]: the selector subset used to name binding targets and
//!   sweep exemptions
//! - [`DocumentSpec`]: serde fixtures that build a [`Document`]
//!
//! Reconciliation and sweeping are written once against [`Dom`]; each
//! backend only answers structural questions and performs the four
//! mutations bindings need plus removal.

mod document;
mod fixture;
mod selector;

pub use document::{Document, Element, NodeId};
pub use fixture::{DocumentSpec, ElementSpec, RootSpec};
pub use selector::{AttrOp, AttrTest, Compound, Selector, SelectorError};

use crate::util::truncate_to_width;

/// Width of element descriptions in log lines.
const DESCRIBE_WIDTH: usize = 60;

/// A mutable view of a rendered document.
///
/// Node handles stay valid after removal; [`Dom::is_connected`] tells
/// whether a node is still part of the document.
pub trait Dom {
    type Node: Clone + PartialEq + std::fmt::Debug;

    /// The `<html>` element.
    fn document_element(&self) -> Option<Self::Node>;

    fn body(&self) -> Option<Self::Node>;

    fn head(&self) -> Option<Self::Node>;

    /// Direct element children in document order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Lowercase tag name.
    fn tag_name(&self, node: &Self::Node) -> String;

    /// Attribute value; `class` and `id` are attributes too.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Concatenated text of the node and its descendants.
    fn text_content(&self, node: &Self::Node) -> String;

    fn is_checked(&self, node: &Self::Node) -> bool;

    /// Distance from the viewport top to the node's top edge, when laid out.
    fn top_offset(&self, node: &Self::Node) -> Option<f64>;

    fn viewport_height(&self) -> Option<f64>;

    fn is_connected(&self, node: &Self::Node) -> bool;

    /// A counter that changes at least whenever nodes are inserted.
    fn generation(&self) -> u64;

    /// Adds or removes one class token.
    fn set_class(&mut self, node: &Self::Node, class: &str, present: bool);

    fn set_checked(&mut self, node: &Self::Node, checked: bool);

    /// Replaces the node's children with `text`, like `textContent`.
    fn set_text(&mut self, node: &Self::Node, text: &str);

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Detaches the node (and its subtree) from the document.
    fn remove(&mut self, node: &Self::Node);

    /// All element descendants in document order, excluding `node`.
    fn descendants(&self, node: &Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        let mut stack: Vec<Self::Node> = self.children(node).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            stack.extend(self.children(&next).into_iter().rev());
            out.push(next);
        }
        out
    }

    fn body_children(&self) -> Vec<Self::Node> {
        self.body()
            .map(|body| self.children(&body))
            .unwrap_or_default()
    }

    fn id(&self, node: &Self::Node) -> Option<String> {
        self.attribute(node, "id").filter(|id| !id.is_empty())
    }

    fn class_names(&self, node: &Self::Node) -> Vec<String> {
        self.attribute(node, "class")
            .map(|classes| classes.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn has_class(&self, node: &Self::Node, class: &str) -> bool {
        self.class_names(node).iter().any(|c| c == class)
    }

    fn matches(&self, node: &Self::Node, selector: &Selector) -> bool {
        let tag = self.tag_name(node);
        selector.matches(&tag, &|name: &str| self.attribute(node, name))
    }

    /// Every connected element matching `selector`, in document order.
    fn query_all(&self, selector: &Selector) -> Vec<Self::Node> {
        let Some(root) = self.document_element() else {
            return Vec::new();
        };
        let mut found = Vec::new();
        if self.matches(&root, selector) {
            found.push(root.clone());
        }
        found.extend(
            self.descendants(&root)
                .into_iter()
                .filter(|node| self.matches(node, selector)),
        );
        found
    }

    /// The node itself or its nearest ancestor matching `selector`.
    fn closest(&self, node: &Self::Node, selector: &Selector) -> Option<Self::Node> {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if self.matches(&candidate, selector) {
                return Some(candidate);
            }
            current = self.parent(&candidate);
        }
        None
    }

    /// True when `node` is `ancestor` or lies inside it.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if &candidate == ancestor {
                return true;
            }
            current = self.parent(&candidate);
        }
        false
    }

    /// A short `tag#id.class "text"` description for log lines.
    fn describe(&self, node: &Self::Node) -> String {
        let mut out = self.tag_name(node);
        if let Some(id) = self.id(node) {
            out.push('#');
            out.push_str(&id);
        }
        for class in self.class_names(node) {
            out.push('.');
            out.push_str(&class);
        }
        let text = self.text_content(node);
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() {
            out.push_str(" \"");
            out.push_str(&text);
            out.push('"');
        }
        truncate_to_width(&out, DESCRIBE_WIDTH)
    }
}
