//! Allow-list/deny-list matching of stray theme toggles.

use tracing::debug;

use super::SweepConfig;
use crate::config::ThemeConfig;
use crate::dom::{Dom, Selector};

/// Why an element was judged a stray toggle.
#[derive(Debug, Clone, PartialEq)]
pub enum StrayReason {
    /// Its text contains toggle wording.
    ToggleText(String),
    /// It is, or holds, a moon/sun icon.
    IconClass(String),
    /// Its class or id contains a toggle naming marker.
    NamingMarker(String),
    /// It sits at the bottom of the viewport.
    NearViewportBottom { top: f64, limit: f64 },
}

impl std::fmt::Display for StrayReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrayReason::ToggleText(marker) => write!(f, "text contains '{}'", marker),
            StrayReason::IconClass(class) => write!(f, "icon class '{}'", class),
            StrayReason::NamingMarker(marker) => write!(f, "class or id contains '{}'", marker),
            StrayReason::NearViewportBottom { top, limit } => {
                write!(f, "top edge at {} is below {}", top, limit)
            }
        }
    }
}

/// An element the sweep would remove.
#[derive(Debug, Clone, PartialEq)]
pub struct StrayFinding<N> {
    pub node: N,
    pub reason: StrayReason,
}

/// One removal performed by [`StrayToggleDetector::sweep`].
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    pub description: String,
    pub reason: StrayReason,
}

/// Outcome of a sweep pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    pub removed: Vec<Removal>,
}

impl SweepReport {
    pub fn len(&self) -> usize {
        self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}

/// Finds and removes leftover theme toggles.
///
/// An element is stray when it matches the deny-list and is not related to
/// an allowed element: neither inside one nor an ancestor of one. Allowed
/// elements are the sanctioned container plus any controls registered with
/// [`StrayToggleDetector::with_controls`]. The page root and the `html`,
/// `head` and `body` elements are never stray.
///
/// Two passes make up a scan:
///
/// 1. **Top level**: each child of `<body>` (minus ignored tags and the page
///    root) is tested against every deny predicate: toggle wording in its
///    text, an icon class anywhere in its subtree, a naming marker on its own
///    class or id, and (when configured) its position near the viewport
///    bottom.
/// 2. **Deep** (optional): nested elements are tested against the naming
///    markers and icon classes only. Text is not considered, so prose that
///    mentions dark mode survives. An icon takes its parent control with it
///    unless that parent is protected.
///
/// # Example
///
/// ```rust
/// use nocturne::{Document, Dom, Element, StrayToggleDetector, SweepConfig};
///
/// let mut doc = Document::new();
/// let body = doc.body_id();
/// let wrapper = doc.append(body, Element::new("div").class("wrapper"));
/// let switch = doc.append(wrapper, Element::new("div").class("theme-switch-wrapper"));
/// doc.append(switch, Element::new("span").class("theme-label").text("Dark Mode"));
/// let stray = doc.append(body, Element::new("div").class("dark-mode-banner-v2").text("Dark Mode"));
///
/// let detector = StrayToggleDetector::new(SweepConfig::default());
/// assert_eq!(detector.sweep(&mut doc).len(), 1);
/// assert!(!doc.is_connected(&stray));
/// assert!(doc.is_connected(&switch));
/// assert!(detector.sweep(&mut doc).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct StrayToggleDetector {
    config: SweepConfig,
    controls: Vec<Selector>,
}

impl StrayToggleDetector {
    pub fn new(config: SweepConfig) -> Self {
        Self {
            config,
            controls: Vec::new(),
        }
    }

    /// A detector that also spares every control the site configuration
    /// drives: binding targets and extra toggle buttons.
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self::new(config.sweep.clone()).with_controls(config.controls())
    }

    /// Adds selectors whose elements are allowed like the sanctioned
    /// container. Matches on `html`, `head` or `body` only protect the
    /// element itself.
    pub fn with_controls(mut self, controls: impl IntoIterator<Item = Selector>) -> Self {
        self.controls.extend(controls);
        self
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn controls(&self) -> &[Selector] {
        &self.controls
    }

    /// Tests one element against the full deny-list and the allow-list.
    pub fn is_stray<D: Dom + ?Sized>(&self, dom: &D, node: &D::Node) -> Option<StrayReason> {
        let allowed = self.allowed_nodes(dom);
        if self.is_protected(dom, node, &allowed) {
            return None;
        }
        self.matches_denylist(dom, node)
    }

    /// Deny-list predicates only; the allow-list is not consulted.
    pub fn matches_denylist<D: Dom + ?Sized>(&self, dom: &D, node: &D::Node) -> Option<StrayReason> {
        self.match_text(dom, node)
            .or_else(|| self.match_icon_in_subtree(dom, node))
            .or_else(|| self.match_name(dom, node))
            .or_else(|| self.match_bottom(dom, node))
    }

    /// Lists stray elements without touching the document.
    pub fn scan<D: Dom + ?Sized>(&self, dom: &D) -> Vec<StrayFinding<D::Node>> {
        let allowed = self.allowed_nodes(dom);
        let mut findings: Vec<StrayFinding<D::Node>> = Vec::new();

        for node in dom.body_children() {
            if self.is_ignored_tag(dom, &node) || self.is_protected(dom, &node, &allowed) {
                continue;
            }
            if let Some(reason) = self.matches_denylist(dom, &node) {
                findings.push(StrayFinding { node, reason });
            }
        }

        if self.config.deep {
            if let Some(body) = dom.body() {
                for node in dom.descendants(&body) {
                    let covered = findings.iter().any(|f| dom.contains(&f.node, &node));
                    if covered || self.is_protected(dom, &node, &allowed) {
                        continue;
                    }
                    if let Some(finding) = self.match_nested(dom, &node, &allowed) {
                        if !findings.iter().any(|f| f.node == finding.node) {
                            findings.push(finding);
                        }
                    }
                }
            }
        }

        findings
    }

    /// Removes every stray element and reports what went.
    ///
    /// Running it again on the cleaned document removes nothing.
    pub fn sweep<D: Dom + ?Sized>(&self, dom: &mut D) -> SweepReport {
        let mut report = SweepReport::default();
        for finding in self.scan(dom) {
            if !dom.is_connected(&finding.node) {
                continue;
            }
            let description = dom.describe(&finding.node);
            debug!(element = %description, reason = %finding.reason, "removing stray theme toggle");
            dom.remove(&finding.node);
            report.removed.push(Removal {
                description,
                reason: finding.reason,
            });
        }
        report
    }

    fn match_nested<D: Dom + ?Sized>(
        &self,
        dom: &D,
        node: &D::Node,
        allowed: &[D::Node],
    ) -> Option<StrayFinding<D::Node>> {
        if let Some(reason) = self.match_name(dom, node) {
            return Some(StrayFinding {
                node: node.clone(),
                reason,
            });
        }

        let class = self.own_icon_class(dom, node)?;
        let target = match dom.parent(node) {
            Some(parent) if !self.is_protected(dom, &parent, allowed) => parent,
            _ => node.clone(),
        };
        Some(StrayFinding {
            node: target,
            reason: StrayReason::IconClass(class),
        })
    }

    fn match_text<D: Dom + ?Sized>(&self, dom: &D, node: &D::Node) -> Option<StrayReason> {
        let text = dom.text_content(node);
        self.config
            .text_markers
            .iter()
            .find(|marker| !marker.is_empty() && text.contains(marker.as_str()))
            .map(|marker| StrayReason::ToggleText(marker.clone()))
    }

    fn match_icon_in_subtree<D: Dom + ?Sized>(&self, dom: &D, node: &D::Node) -> Option<StrayReason> {
        std::iter::once(node.clone())
            .chain(dom.descendants(node))
            .find_map(|n| self.own_icon_class(dom, &n))
            .map(StrayReason::IconClass)
    }

    fn own_icon_class<D: Dom + ?Sized>(&self, dom: &D, node: &D::Node) -> Option<String> {
        let classes = dom.class_names(node);
        self.config
            .icon_classes
            .iter()
            .find(|icon| classes.iter().any(|c| c == *icon))
            .cloned()
    }

    fn match_name<D: Dom + ?Sized>(&self, dom: &D, node: &D::Node) -> Option<StrayReason> {
        let mut names = dom.class_names(node);
        names.extend(dom.id(node));
        self.config
            .name_markers
            .iter()
            .find(|marker| !marker.is_empty() && names.iter().any(|n| n.contains(marker.as_str())))
            .map(|marker| StrayReason::NamingMarker(marker.clone()))
    }

    fn match_bottom<D: Dom + ?Sized>(&self, dom: &D, node: &D::Node) -> Option<StrayReason> {
        let margin = self.config.bottom_margin?;
        let limit = dom.viewport_height()? - margin;
        let top = dom.top_offset(node)?;
        (top > limit).then_some(StrayReason::NearViewportBottom { top, limit })
    }

    fn is_ignored_tag<D: Dom + ?Sized>(&self, dom: &D, node: &D::Node) -> bool {
        let tag = dom.tag_name(node);
        self.config
            .ignored_tags
            .iter()
            .any(|ignored| ignored.eq_ignore_ascii_case(&tag))
    }

    fn is_document_root<D: Dom + ?Sized>(&self, dom: &D, node: &D::Node) -> bool {
        [dom.document_element(), dom.head(), dom.body()]
            .iter()
            .flatten()
            .any(|root| root == node)
    }

    /// The sanctioned containers and registered controls present in `dom`.
    fn allowed_nodes<D: Dom + ?Sized>(&self, dom: &D) -> Vec<D::Node> {
        let mut allowed = dom.query_all(&self.config.sanctioned);
        for selector in &self.controls {
            for node in dom.query_all(selector) {
                if !self.is_document_root(dom, &node) && !allowed.contains(&node) {
                    allowed.push(node);
                }
            }
        }
        allowed
    }

    /// Never removable: document roots, the page root, and anything inside
    /// or around an allowed element.
    fn is_protected<D: Dom + ?Sized>(&self, dom: &D, node: &D::Node, allowed: &[D::Node]) -> bool {
        if self.is_document_root(dom, node) {
            return true;
        }
        if let Some(page_root) = &self.config.page_root {
            if dom.matches(node, page_root) {
                return true;
            }
        }
        allowed
            .iter()
            .any(|a| dom.contains(a, node) || dom.contains(node, a))
    }
}
