//! Writes store changes into the elements bound to them.

use crate::attrs::{GETZ, LETZ, display_path, two_way_name};
use crate::store::{ChangeSink, Store};
use html::{Document, NodeId};
use log::debug;
use std::collections::HashMap;

/// Elements bound to each variable, collected once after the initial scan.
/// Lists keep document order so updates land in the same order as a
/// full re-query would produce.
#[derive(Clone, Debug, Default)]
pub struct BindingIndex {
    /// `getz` elements keyed by their whole (trimmed) attribute value.
    exact: HashMap<String, Vec<NodeId>>,
    /// `getz` dotted paths keyed by every proper prefix of the path.
    nested: HashMap<String, Vec<(NodeId, String)>>,
    /// `letz` elements keyed by variable name.
    two_way: HashMap<String, Vec<NodeId>>,
}

impl BindingIndex {
    pub fn build(document: &Document) -> Self {
        let mut index = Self::default();
        for node in document.elements_with_attr(GETZ) {
            let Some(path) = document.attr(node, GETZ).map(display_path) else {
                continue;
            };
            index.exact.entry(path.to_owned()).or_default().push(node);
            for (at, _) in path.match_indices('.') {
                index
                    .nested
                    .entry(path[..at].to_owned())
                    .or_default()
                    .push((node, path.to_owned()));
            }
        }
        for node in document.elements_with_attr(LETZ) {
            if let Some(text) = document.attr(node, LETZ) {
                index
                    .two_way
                    .entry(two_way_name(text).to_owned())
                    .or_default()
                    .push(node);
            }
        }
        debug!(
            "binding index: {} display keys, {} nested prefixes, {} two-way keys",
            index.exact.len(),
            index.nested.len(),
            index.two_way.len()
        );
        index
    }

    fn exact(&self, key: &str) -> Vec<NodeId> {
        self.exact.get(key).cloned().unwrap_or_default()
    }

    fn nested(&self, key: &str) -> Vec<(NodeId, String)> {
        self.nested.get(key).cloned().unwrap_or_default()
    }

    fn two_way(&self, key: &str) -> Vec<NodeId> {
        self.two_way.get(key).cloned().unwrap_or_default()
    }
}

/// The change sink that patches the document after every store write.
pub struct ViewUpdater<'doc> {
    document: &'doc mut Document,
    index: Option<&'doc BindingIndex>,
}

impl<'doc> ViewUpdater<'doc> {
    /// Re-query the document on every notification, or use `index` if given.
    pub fn new(document: &'doc mut Document, index: Option<&'doc BindingIndex>) -> Self {
        Self { document, index }
    }

    fn display_exact(&self, key: &str) -> Vec<NodeId> {
        match self.index {
            Some(index) => index.exact(key),
            None => self
                .document
                .elements_with_attr(GETZ)
                .into_iter()
                .filter(|node| self.document.attr(*node, GETZ).map(display_path) == Some(key))
                .collect(),
        }
    }

    fn display_nested(&self, key: &str) -> Vec<(NodeId, String)> {
        if let Some(index) = self.index {
            return index.nested(key);
        }
        let prefix = format!("{key}.");
        self.document
            .elements_with_attr(GETZ)
            .into_iter()
            .filter_map(|node| {
                let path = display_path(self.document.attr(node, GETZ)?);
                path.starts_with(&prefix).then(|| (node, path.to_owned()))
            })
            .collect()
    }

    fn two_way(&self, key: &str) -> Vec<NodeId> {
        match self.index {
            Some(index) => index.two_way(key),
            None => self
                .document
                .elements_with_attr(LETZ)
                .into_iter()
                .filter(|node| {
                    self.document
                        .attr(*node, LETZ)
                        .is_some_and(|text| two_way_name(text) == key)
                })
                .collect(),
        }
    }
}

impl ChangeSink for ViewUpdater<'_> {
    fn notify(&mut self, key: &str, store: &Store) {
        let text = store.get(key).map(|value| value.display_text()).unwrap_or_default();

        for node in self.display_exact(key) {
            self.document.set_text_content(node, &text);
        }
        for (node, path) in self.display_nested(key) {
            let nested = store.resolve_path(&path).display_text();
            self.document.set_text_content(node, &nested);
        }
        for node in self.two_way(key) {
            if !self.document.set_value(node, &text) {
                self.document.set_text_content(node, &text);
            }
        }
    }
}

/// Render one `getz` path from the current store.
pub fn render_display(document: &mut Document, node: NodeId, path: &str, store: &Store) {
    let text = store.resolve_path(path).display_text();
    document.set_text_content(node, &text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use serde_json::json;

    const PAGE: &str = r#"<body>
        <span id="a" getz="user"></span>
        <span id="b" getz="user.name"></span>
        <span id="c" getz="user.address.city"></span>
        <input id="d" letz="user:object">
        <div id="e" letz="user"></div>
        <span id="f" getz="other"></span>
    </body>"#;

    fn text_of(doc: &Document, selector: &str) -> String {
        doc.query_selector(selector)
            .map(|node| doc.value(node).map_or_else(|| doc.text_content(node), str::to_owned))
            .unwrap_or_default()
    }

    fn run(with_index: bool) -> Document {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut doc = Document::parse(PAGE).unwrap_or_default();
        let index = BindingIndex::build(&doc);
        let mut store = Store::new();
        let mut view = ViewUpdater::new(&mut doc, with_index.then_some(&index));
        store.set(
            "user",
            Value::from_json(json!({"name": "Ada", "address": {"city": "London"}})),
            &mut view,
        );
        doc
    }

    #[test]
    fn updates_exact_nested_and_two_way_bindings() {
        let doc = run(false);
        let pretty = "{\n  \"name\": \"Ada\",\n  \"address\": {\n    \"city\": \"London\"\n  }\n}";
        assert_eq!(text_of(&doc, "#a"), pretty);
        assert_eq!(text_of(&doc, "#b"), "Ada");
        assert_eq!(text_of(&doc, "#c"), "London");
        assert_eq!(text_of(&doc, "#d"), pretty);
        assert_eq!(text_of(&doc, "#e"), pretty);
        assert_eq!(text_of(&doc, "#f"), "");
    }

    #[test]
    fn index_matches_requery() {
        let requery = run(false);
        let indexed = run(true);
        assert_eq!(requery.to_html(html::FormState::Live), indexed.to_html(html::FormState::Live));
    }
}
