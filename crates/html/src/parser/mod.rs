//! HTML parsing into a [`Document`].
//!
//! html5ever builds an `RcDom` which is then converted into the arena-backed
//! document. Comments, doctypes and processing instructions are dropped and
//! `<template>` contents are not part of the tree.

use crate::dom::Document;
use anyhow::Result;
use html5ever::tendril::TendrilSink as _;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{ParseOpts, parse_document};
use indextree::NodeId;
use log::debug;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

fn convert_node(handle: &Handle, parent: NodeId, doc: &mut Document) {
    match &handle.data {
        NodeData::Document => {
            for child in handle.children.borrow().iter() {
                convert_node(child, parent, doc);
            }
        }
        NodeData::Element { name, attrs, .. } => {
            let attrs: Vec<(String, String)> = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            let node = doc.create_element(parent, &name.local, attrs);
            for child in handle.children.borrow().iter() {
                convert_node(child, node, doc);
            }
            doc.finish_element(node);
        }
        NodeData::Text { contents } => {
            doc.create_text(parent, &contents.borrow());
        }
        NodeData::Doctype { .. }
        | NodeData::Comment { .. }
        | NodeData::ProcessingInstruction { .. } => {}
    }
}

/// Parse a complete HTML document.
///
/// # Errors
/// Returns an error if the input cannot be read by the parser.
pub fn parse_html(html: &str) -> Result<Document> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            exact_errors: false,
            scripting_enabled: false,
            ..TreeBuilderOpts::default()
        },
        ..ParseOpts::default()
    };

    let rc_dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut html.as_bytes())?;

    let mut doc = Document::new();
    let root = doc.root();
    convert_node(&rc_dom.document, root, &mut doc);
    debug!("parsed document with {} elements", doc.elements().len());
    Ok(doc)
}

impl Document {
    /// Parse a complete HTML document. See [`parse_html`].
    ///
    /// # Errors
    /// Returns an error if the input cannot be read by the parser.
    pub fn parse(html: &str) -> Result<Self> {
        parse_html(html)
    }
}
