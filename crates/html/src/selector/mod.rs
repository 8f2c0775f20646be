//! Selectors Level 3 subset used for `querySelector`-style lookups.
//! Reference: <https://www.w3.org/TR/selectors-3/>
//!
//! Supported:
//! - Type, universal, class, id and attribute selectors
//!   (`[attr]`, `[attr=value]`, `[attr^=value]`)
//! - Combinators: descendant, child, adjacent sibling, general sibling
//! - Comma-separated selector lists

mod matcher;
mod parser;

pub use matcher::{matches_complex, matches_compound, matches_selector_list};
pub use parser::{parse_complex_selector, parse_selector_list};

use crate::dom::Document;
use indextree::NodeId;

/// An adapter that abstracts DOM access for selector matching.
pub trait ElementAdapter {
    type Handle: Copy + Eq;

    /// Parent element if any (never the document node).
    fn parent(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Previous sibling element, skipping text nodes.
    fn previous_sibling_element(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Tag name in ASCII lowercase.
    fn tag_name(&self, element: Self::Handle) -> &str;

    /// Returns the attribute value if present.
    fn attr(&self, element: Self::Handle, name: &str) -> Option<&str>;

    /// True if the element has the given class token.
    fn has_class(&self, element: Self::Handle, class: &str) -> bool;
}

/// Simple selectors (subset).
/// Selectors Level 3, Section 5, 6, 7, 8
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SimpleSelector {
    /// Selectors Level 3, Section 5: Type selectors
    Type(String),
    /// Selectors Level 3, Section 6: Class selectors
    Class(String),
    /// Selectors Level 3, Section 7: ID selectors
    IdSelector(String),
    /// `[attr]`
    AttrExists(String),
    /// `[attr=value]`
    AttrEquals { name: String, value: String },
    /// `[attr^=value]`
    AttrPrefix { name: String, value: String },
    /// Universal selector '*'.
    Universal,
}

/// A sequence of simple selectors with no combinators.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

/// Selectors Level 3, Section 11: Combinators
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

/// One or more compounds separated by combinators, read left to right.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ComplexSelector {
    pub first: CompoundSelector,
    pub rest: Vec<(Combinator, CompoundSelector)>,
}

/// Selectors Level 3, Section 4: Groups of selectors
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

#[expect(
    clippy::same_name_method,
    reason = "Adapter methods forward to the inherent accessors of the same name"
)]
impl ElementAdapter for Document {
    type Handle = NodeId;

    fn parent(&self, element: NodeId) -> Option<NodeId> {
        self.parent_element(element)
    }

    fn previous_sibling_element(&self, element: NodeId) -> Option<NodeId> {
        Self::previous_sibling_element(self, element)
    }

    fn tag_name(&self, element: NodeId) -> &str {
        Self::tag_name(self, element).unwrap_or_default()
    }

    fn attr(&self, element: NodeId, name: &str) -> Option<&str> {
        Self::attr(self, element, name)
    }

    fn has_class(&self, element: NodeId, class: &str) -> bool {
        Self::has_class(self, element, class)
    }
}

impl Document {
    /// First element in document order matching `selector`.
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let list = parse_selector_list(selector);
        if list.selectors.is_empty() {
            return None;
        }
        self.elements()
            .into_iter()
            .find(|node| matches_selector_list(self, *node, &list))
    }

    /// Every element in document order matching `selector`.
    pub fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        let list = parse_selector_list(selector);
        if list.selectors.is_empty() {
            return Vec::new();
        }
        self.elements()
            .into_iter()
            .filter(|node| matches_selector_list(self, *node, &list))
            .collect()
    }
}
