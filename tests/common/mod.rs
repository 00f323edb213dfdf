//! Shared loading of the page variants under `tests/fixtures/variants`.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use nocturne::{Document, DocumentSpec, Dom, NodeId, Selector, ThemeConfig};
use serde::Deserialize;

/// One historical markup variant of the site, with the configuration it
/// was deployed with.
#[derive(Debug, Deserialize)]
pub struct Variant {
    pub name: String,
    #[serde(default)]
    pub config: ThemeConfig,
    pub page: DocumentSpec,
}

impl Variant {
    pub fn document(&self) -> Document {
        self.page.build()
    }
}

pub fn variants_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/variants")
}

pub fn load(name: &str) -> Variant {
    let path = variants_dir().join(format!("{}.yaml", name));
    let content = std::fs::read_to_string(&path).unwrap();
    serde_yaml::from_str(&content).unwrap()
}

pub fn all_variants() -> Vec<Variant> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(variants_dir())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "yaml"))
        .collect();
    paths.sort();
    paths
        .iter()
        .map(|path| serde_yaml::from_str(&std::fs::read_to_string(path).unwrap()).unwrap())
        .collect()
}

pub fn select(doc: &Document, selector: &str) -> Vec<NodeId> {
    doc.query_all(&Selector::parse(selector).unwrap())
}

pub fn first(doc: &Document, selector: &str) -> NodeId {
    select(doc, selector)
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("no element matches {}", selector))
}

/// Asserts that every binding element shows `mode`.
pub fn assert_rendered(doc: &Document, bindings: &nocturne::UiBindings, mode: nocturne::ColorMode) {
    use nocturne::Mutation;

    for update in nocturne::plan_theme(mode, bindings) {
        for node in doc.query_all(&update.target) {
            let what = format!("{:?} on {}", update.kind, doc.describe(&node));
            match &update.mutation {
                Mutation::Class { class, present } => {
                    assert_eq!(doc.has_class(&node, class), *present, "class {} for {}", class, what)
                }
                Mutation::Checked(checked) => assert_eq!(doc.is_checked(&node), *checked, "{}", what),
                Mutation::Text(text) => assert_eq!(&doc.text_content(&node), text, "{}", what),
                Mutation::Attribute { name, value } => {
                    assert_eq!(doc.attribute(&node, name).as_deref(), Some(value.as_str()), "{}", what)
                }
            }
        }
    }
}
