use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, Window};

use crate::dom::{Dom, Selector};

/// The live browser document.
///
/// The generation counter is shared with the mutation observer installed
/// by [`install`](super::install), which bumps it on every child list change.
#[derive(Debug, Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
    generation: Rc<Cell<u64>>,
}

impl WebDom {
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            window,
            document,
            generation: Rc::new(Cell::new(0)),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub(crate) fn generation_handle(&self) -> Rc<Cell<u64>> {
        Rc::clone(&self.generation)
    }
}

fn collect_elements(list: &web_sys::NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

impl Dom for WebDom {
    type Node = Element;

    fn document_element(&self) -> Option<Element> {
        self.document.document_element()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn head(&self) -> Option<Element> {
        self.document.head().map(Element::from)
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        let children = node.children();
        (0..children.length()).filter_map(|i| children.item(i)).collect()
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_ascii_lowercase()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn is_checked(&self, node: &Element) -> bool {
        node.dyn_ref::<HtmlInputElement>()
            .map(|input| input.checked())
            .unwrap_or(false)
    }

    fn top_offset(&self, node: &Element) -> Option<f64> {
        Some(node.get_bounding_client_rect().top())
    }

    fn viewport_height(&self) -> Option<f64> {
        self.window.inner_height().ok().and_then(|h| h.as_f64())
    }

    fn is_connected(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn generation(&self) -> u64 {
        self.generation.get()
    }

    fn set_class(&mut self, node: &Element, class: &str, present: bool) {
        let list = node.class_list();
        let _ = if present {
            list.add_1(class)
        } else {
            list.remove_1(class)
        };
    }

    fn set_checked(&mut self, node: &Element, checked: bool) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_checked(checked);
        }
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }

    fn remove(&mut self, node: &Element) {
        node.remove();
    }

    fn descendants(&self, node: &Element) -> Vec<Element> {
        node.query_selector_all("*")
            .map(|list| collect_elements(&list))
            .unwrap_or_default()
    }

    fn query_all(&self, selector: &Selector) -> Vec<Element> {
        self.document
            .query_selector_all(selector.source())
            .map(|list| collect_elements(&list))
            .unwrap_or_default()
    }
}
