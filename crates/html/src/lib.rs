#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

//! An in-memory HTML document: parsing, traversal, selector queries,
//! mutation with update mirroring, and serialization.

pub mod dom;
pub mod parser;
pub mod selector;

pub use dom::{DOMSubscriber, DOMUpdate, Document, FormState, NodeKind};
pub use indextree::NodeId;
pub use parser::parse_html;
