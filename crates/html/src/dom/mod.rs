//! In-memory document tree.
//!
//! Nodes live in an `indextree` arena rooted at a document node. Elements carry
//! their markup attributes plus the live state of form controls (the `value`
//! and `checked` properties), which a browser tracks separately from the
//! attributes they were initialized from.

mod printing;
mod style;
mod updating;

pub use printing::FormState;
pub use updating::{DOMSubscriber, DOMUpdate};

use indextree::{Arena, NodeId};
use log::error;
use smallvec::SmallVec;

/// Elements that expose a `value` property.
const VALUE_TAGS: [&str; 6] = ["input", "textarea", "select", "option", "button", "data"];

#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    #[default]
    Document,
    Element { tag: String },
    Text { text: String },
}

/// Live form-control state. `value` is `None` for elements without a value property.
#[derive(Debug, Clone, Default)]
pub struct ControlState {
    pub value: Option<String>,
    pub checked: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DOMNode {
    pub kind: NodeKind,
    pub attrs: SmallVec<(String, String), 4>,
    pub control: ControlState,
}

impl DOMNode {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag.as_str()),
            NodeKind::Document | NodeKind::Text { .. } => None,
        }
    }
}

/// A parsed HTML document plus the subscribers mirroring its mutations.
pub struct Document {
    dom: Arena<DOMNode>,
    root: NodeId,
    subscribers: Vec<Box<dyn DOMSubscriber>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the root node.
    pub fn new() -> Self {
        let mut dom = Arena::new();
        Self {
            root: dom.new_node(DOMNode::default()),
            dom,
            subscribers: Vec::new(),
        }
    }

    /// The document node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn arena(&self) -> &Arena<DOMNode> {
        &self.dom
    }

    fn node(&self, id: NodeId) -> Option<&DOMNode> {
        self.dom
            .get(id)
            .filter(|node| !node.is_removed())
            .map(indextree::Node::get)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut DOMNode> {
        self.dom
            .get_mut(id)
            .filter(|node| !node.is_removed())
            .map(indextree::Node::get_mut)
    }

    // -----------------------
    // Construction
    // -----------------------

    /// Append a new element under `parent`. Form controls get their initial
    /// value and checked state from the attributes.
    pub fn create_element<I>(&mut self, parent: NodeId, tag: &str, attrs: I) -> NodeId
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let tag = tag.to_ascii_lowercase();
        let attrs: SmallVec<(String, String), 4> = attrs.into_iter().collect();
        let mut node = DOMNode {
            kind: NodeKind::Element { tag },
            attrs,
            control: ControlState::default(),
        };
        node.control = default_control_state(&node);
        let id = self.dom.new_node(node);
        parent.append(id, &mut self.dom);
        id
    }

    /// Append a new text node under `parent`.
    pub fn create_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.dom.new_node(DOMNode {
            kind: NodeKind::Text {
                text: text.to_owned(),
            },
            ..DOMNode::default()
        });
        parent.append(id, &mut self.dom);
        id
    }

    /// Finalize controls whose default value depends on their children
    /// (`textarea`, `option`, `select`). Called once the subtree is complete.
    pub fn finish_element(&mut self, node: NodeId) {
        let value = match self.tag_name(node) {
            Some("textarea") => Some(self.text_content(node)),
            Some("option") => Some(self.option_value(node)),
            Some("select") => Some(self.default_select_value(node)),
            _ => None,
        };
        if let Some(value) = value
            && let Some(data) = self.node_mut(node)
        {
            data.control.value = Some(value);
        }
    }

    // -----------------------
    // Tree queries
    // -----------------------

    pub fn is_element(&self, node: NodeId) -> bool {
        self.node(node).and_then(DOMNode::tag).is_some()
    }

    /// Lowercase tag name, or `None` for non-element nodes.
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(DOMNode::tag)
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node).and_then(|data| data.attr(name))
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    pub fn element_id(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "id")
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.dom.get(node).and_then(indextree::Node::parent)
    }

    /// Parent, but only when it is an element.
    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|parent| self.is_element(*parent))
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        node.children(&self.dom).collect()
    }

    pub fn previous_sibling_element(&self, node: NodeId) -> Option<NodeId> {
        node.preceding_siblings(&self.dom)
            .skip(1)
            .find(|sibling| self.is_element(*sibling))
    }

    /// Every element in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.root
            .descendants(&self.dom)
            .filter(|node| self.is_element(*node))
            .collect()
    }

    /// Every element carrying the attribute `name`, in document order.
    pub fn elements_with_attr(&self, name: &str) -> Vec<NodeId> {
        self.root
            .descendants(&self.dom)
            .filter(|node| self.has_attr(*node, name))
            .collect()
    }

    /// The `<body>` element, if the document has one.
    pub fn body(&self) -> Option<NodeId> {
        self.root
            .descendants(&self.dom)
            .find(|node| self.tag_name(*node) == Some("body"))
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        for descendant in node.descendants(&self.dom) {
            if let Some(DOMNode {
                kind: NodeKind::Text { text },
                ..
            }) = self.node(descendant)
            {
                out.push_str(text);
            }
        }
        out
    }

    // -----------------------
    // Form controls
    // -----------------------

    /// True if the element exposes a `value` property.
    pub fn is_form_control(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|data| data.control.value.is_some())
    }

    /// Current `value` property, `None` if the element has none.
    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(|data| data.control.value.as_deref())
    }

    pub fn checked(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|data| data.control.checked)
    }

    /// The lowercase `type` of an `<input>` (defaults to `text`).
    pub fn input_type(&self, node: NodeId) -> Option<String> {
        if self.tag_name(node) != Some("input") {
            return None;
        }
        Some(
            self.attr(node, "type")
                .map_or_else(|| String::from("text"), str::to_ascii_lowercase),
        )
    }

    pub fn is_checkbox(&self, node: NodeId) -> bool {
        self.input_type(node).as_deref() == Some("checkbox")
    }

    fn option_value(&self, node: NodeId) -> String {
        self.attr(node, "value").map_or_else(
            || collapse_whitespace(&self.text_content(node)),
            str::to_owned,
        )
    }

    fn default_select_value(&self, node: NodeId) -> String {
        let options: Vec<NodeId> = node
            .descendants(&self.dom)
            .filter(|child| self.tag_name(*child) == Some("option"))
            .collect();
        options
            .iter()
            .find(|option| self.has_attr(**option, "selected"))
            .or_else(|| options.first())
            .map(|option| self.option_value(*option))
            .unwrap_or_default()
    }

    // -----------------------
    // Classes and inline style
    // -----------------------

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|token| token == class))
    }

    /// Value of a declaration in the element's inline `style` attribute.
    pub fn style_property(&self, node: NodeId, name: &str) -> Option<String> {
        let style = self.attr(node, "style")?;
        style::declarations(style)
            .into_iter()
            .find(|(property, _)| property.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    // -----------------------
    // Mutations
    // -----------------------

    /// Replace all children with a single text node (none for empty text).
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        if !self.is_element(node) {
            return;
        }
        for child in self.children(node) {
            child.remove_subtree(&mut self.dom);
        }
        if !text.is_empty() {
            self.create_text(node, text);
        }
        self.publish(DOMUpdate::SetText {
            node,
            text: text.to_owned(),
        });
    }

    /// Write the `value` property. Returns false when the element has none.
    pub fn set_value(&mut self, node: NodeId, value: &str) -> bool {
        let Some(data) = self.node_mut(node) else {
            return false;
        };
        let Some(current) = data.control.value.as_mut() else {
            return false;
        };
        value.clone_into(current);
        self.publish(DOMUpdate::SetValue {
            node,
            value: value.to_owned(),
        });
        true
    }

    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        let Some(data) = self.node_mut(node) else {
            return;
        };
        data.control.checked = checked;
        self.publish(DOMUpdate::SetChecked { node, checked });
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(data) = self.node_mut(node) else {
            return;
        };
        if data.tag().is_none() {
            return;
        }
        if let Some(slot) = data.attrs.iter_mut().find(|(key, _)| key == name) {
            value.clone_into(&mut slot.1);
        } else {
            data.attrs.push((name.to_owned(), value.to_owned()));
        }
        self.publish(DOMUpdate::SetAttr {
            node,
            name: name.to_owned(),
            value: value.to_owned(),
        });
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        let Some(data) = self.node_mut(node) else {
            return;
        };
        let before = data.attrs.len();
        data.attrs.retain(|(key, _)| key != name);
        if data.attrs.len() != before {
            self.publish(DOMUpdate::RemoveAttr {
                node,
                name: name.to_owned(),
            });
        }
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if class.is_empty() || self.has_class(node, class) || !self.is_element(node) {
            return;
        }
        let mut tokens = self.class_tokens(node);
        tokens.push(class.to_owned());
        self.set_attr(node, "class", &tokens.join(" "));
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            return;
        }
        let tokens: Vec<String> = self
            .class_tokens(node)
            .into_iter()
            .filter(|token| token != class)
            .collect();
        self.set_attr(node, "class", &tokens.join(" "));
    }

    /// Toggle a class and return whether it is now present.
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            self.has_class(node, class)
        }
    }

    fn class_tokens(&self, node: NodeId) -> Vec<String> {
        self.attr(node, "class")
            .map(|list| list.split_ascii_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    /// Set an inline style declaration; an empty value removes it.
    pub fn set_style_property(&mut self, node: NodeId, name: &str, value: &str) {
        if !self.is_element(node) {
            return;
        }
        let current = self.attr(node, "style").unwrap_or_default();
        let updated = style::with_declaration(current, name, value);
        if updated.is_empty() {
            self.remove_attr(node, "style");
        } else {
            self.set_attr(node, "style", &updated);
        }
    }

    /// Restore every control inside `form` to its default state.
    pub fn reset_form(&mut self, form: NodeId) {
        let controls: Vec<NodeId> = form
            .descendants(&self.dom)
            .filter(|node| self.is_form_control(*node))
            .collect();
        for control in controls {
            let defaults = self
                .node(control)
                .map(default_control_state)
                .unwrap_or_default();
            let value = match self.tag_name(control) {
                Some("textarea") => Some(self.text_content(control)),
                Some("select") => Some(self.default_select_value(control)),
                _ => defaults.value,
            };
            if let Some(data) = self.node_mut(control) {
                data.control.value = value;
                data.control.checked = defaults.checked;
            }
        }
        self.publish(DOMUpdate::ResetForm { node: form });
    }

    // -----------------------
    // Subscribers
    // -----------------------

    /// Register a subscriber that receives every subsequent mutation.
    pub fn subscribe(&mut self, subscriber: Box<dyn DOMSubscriber>) {
        self.subscribers.push(subscriber);
    }

    fn publish(&mut self, update: DOMUpdate) {
        for subscriber in &mut self.subscribers {
            if let Err(err) = subscriber.apply_update(&update) {
                error!("DOM subscriber failed on {update:?}: {err}");
            }
        }
    }
}

/// Initial control state derived from markup alone.
fn default_control_state(node: &DOMNode) -> ControlState {
    let Some(tag) = node.tag() else {
        return ControlState::default();
    };
    if !VALUE_TAGS.contains(&tag) {
        return ControlState::default();
    }
    let value = node.attr("value").map_or_else(
        || {
            let kind = node.attr("type").map(str::to_ascii_lowercase);
            if tag == "input" && matches!(kind.as_deref(), Some("checkbox" | "radio")) {
                String::from("on")
            } else {
                String::new()
            }
        },
        str::to_owned,
    );
    ControlState {
        value: Some(value),
        checked: tag == "input" && node.attr("checked").is_some(),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}
