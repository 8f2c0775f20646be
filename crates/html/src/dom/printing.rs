use core::fmt;

use super::{DOMNode, Document, NodeKind};
use indextree::NodeId;

use serde_json::{Map, Value, json};

const VOID_TAGS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_TAGS: [&str; 2] = ["script", "style"];

/// How form controls are serialized by [`Document::to_html`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FormState {
    /// Attributes exactly as they appear in the tree.
    #[default]
    Markup,
    /// Current `value`/`checked` properties written back into the markup.
    Live,
}

// -----------------------
// Module-scope helpers
// -----------------------

fn flush_text(children: &mut Vec<Value>, text_buf: &mut String) {
    if !text_buf.trim().is_empty() {
        children.push(json!({ "type": "text", "text": text_buf.clone() }));
    }
    text_buf.clear();
}

fn coalesce_children(doc: &Document, id: NodeId) -> Vec<Value> {
    let mut children: Vec<Value> = Vec::new();
    let mut text_buf = String::new();
    for child in id.children(doc.arena()) {
        let Some(node) = doc.node(child) else {
            continue;
        };
        if let NodeKind::Text { text } = &node.kind {
            text_buf.push_str(text);
            continue;
        }
        flush_text(&mut children, &mut text_buf);
        let value = node_to_json(doc, child);
        if !value.is_null() {
            children.push(value);
        }
    }
    flush_text(&mut children, &mut text_buf);
    children
}

fn node_to_json(doc: &Document, id: NodeId) -> Value {
    let Some(DOMNode { kind, attrs, control }) = doc.node(id) else {
        return Value::Null;
    };
    match kind {
        NodeKind::Document => json!({ "type": "document", "children": coalesce_children(doc, id) }),
        NodeKind::Element { tag } => {
            let mut pairs: Vec<(String, String)> = attrs.iter().cloned().collect();
            pairs.sort_by(|left, right| left.0.cmp(&right.0));
            let mut attrs_obj = Map::new();
            for (key, value) in pairs {
                attrs_obj.insert(key, Value::String(value));
            }
            let mut out = json!({
                "type": "element",
                "tag": tag,
                "attrs": Value::Object(attrs_obj),
                "children": coalesce_children(doc, id),
            });
            if let (Some(value), Some(object)) = (&control.value, out.as_object_mut()) {
                object.insert(String::from("value"), Value::String(value.clone()));
                object.insert(String::from("checked"), Value::Bool(control.checked));
            }
            out
        }
        NodeKind::Text { text } => {
            if text.trim().is_empty() {
                Value::Null
            } else {
                json!({ "type": "text", "text": text })
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

fn write_html(doc: &Document, id: NodeId, state: FormState, out: &mut String) {
    let Some(node) = doc.node(id) else {
        return;
    };
    match &node.kind {
        NodeKind::Document => {
            for child in id.children(doc.arena()) {
                write_html(doc, child, state, out);
            }
        }
        NodeKind::Text { text } => {
            let raw = doc
                .parent(id)
                .and_then(|parent| doc.tag_name(parent))
                .is_some_and(|tag| RAW_TEXT_TAGS.contains(&tag));
            if raw {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        NodeKind::Element { tag } => {
            let live = state == FormState::Live && tag == "input";
            out.push('<');
            out.push_str(tag);
            for (name, value) in &node.attrs {
                if live && (name == "value" || name == "checked") {
                    continue;
                }
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            if live {
                if let Some(value) = &node.control.value {
                    out.push_str(" value=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                if node.control.checked {
                    out.push_str(" checked=\"\"");
                }
            }
            out.push('>');
            if VOID_TAGS.contains(&tag.as_str()) {
                return;
            }
            match (&node.control.value, state, tag.as_str()) {
                (Some(value), FormState::Live, "textarea") => out.push_str(&escape_text(value)),
                _ => {
                    for child in id.children(doc.arena()) {
                        write_html(doc, child, state, out);
                    }
                }
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
            for _ in 0..depth {
                f.write_str("  ")?;
            }
            Ok(())
        }

        fn fmt_node(
            doc: &Document,
            id: NodeId,
            f: &mut fmt::Formatter<'_>,
            depth: usize,
        ) -> fmt::Result {
            let Some(DOMNode { kind, attrs, .. }) = doc.node(id) else {
                return Ok(());
            };
            match kind {
                NodeKind::Document => {
                    write_indent(f, depth)?;
                    writeln!(f, "#document")?;
                }
                NodeKind::Element { tag } => {
                    write_indent(f, depth)?;
                    write!(f, "<{tag}")?;
                    let mut pairs: Vec<&(String, String)> = attrs.iter().collect();
                    pairs.sort_by(|left, right| left.0.cmp(&right.0));
                    for (key, value) in pairs {
                        write!(f, " {key}={value:?}")?;
                    }
                    writeln!(f, ">")?;
                }
                NodeKind::Text { text } => {
                    // Skip pure-whitespace text nodes in the printer for cleaner output
                    if text.chars().all(char::is_whitespace) {
                        return Ok(());
                    }
                    write_indent(f, depth)?;
                    writeln!(f, "{text:?}")?;
                }
            }
            for child in id.children(doc.arena()) {
                fmt_node(doc, child, f, depth + 1)?;
            }
            Ok(())
        }

        fmt_node(self, self.root, f, 0)
    }
}

impl Document {
    /// Build a deterministic JSON representation of the document.
    /// Schema:
    /// - Document: { "type":"document", "children":[ ... ] }
    /// - Element: { "type":"element", "tag": "div", "attrs": {..}, "children":[ ... ] }
    ///   plus "value"/"checked" for form controls
    /// - Text: { "type":"text", "text":"..." }
    pub fn to_json_value(&self) -> Value {
        node_to_json(self, self.root)
    }

    /// Pretty JSON string for snapshots and test comparisons.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(&self.to_json_value()).unwrap_or_else(|_| String::from("{}"))
    }

    /// Serialize the whole document as HTML.
    pub fn to_html(&self, state: FormState) -> String {
        self.outer_html(self.root, state)
    }

    /// Serialize one node and its subtree as HTML.
    pub fn outer_html(&self, node: NodeId, state: FormState) -> String {
        let mut out = String::new();
        write_html(self, node, state, &mut out);
        out
    }
}
