use anyhow::Error;
use indextree::NodeId;

/// A mutation applied to the document, mirrored to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DOMUpdate {
    SetText { node: NodeId, text: String },
    SetValue { node: NodeId, value: String },
    SetChecked { node: NodeId, checked: bool },
    SetAttr { node: NodeId, name: String, value: String },
    RemoveAttr { node: NodeId, name: String },
    ResetForm { node: NodeId },
}

impl DOMUpdate {
    /// The node the mutation touched.
    pub fn node(&self) -> NodeId {
        match self {
            Self::SetText { node, .. }
            | Self::SetValue { node, .. }
            | Self::SetChecked { node, .. }
            | Self::SetAttr { node, .. }
            | Self::RemoveAttr { node, .. }
            | Self::ResetForm { node } => *node,
        }
    }
}

/// Receives `DOMUpdate` values as the document changes.
pub trait DOMSubscriber {
    /// Apply a single update to the subscriber state.
    ///
    /// # Errors
    /// Failures are logged by the document and never interrupt the mutation.
    fn apply_update(&mut self, update: &DOMUpdate) -> Result<(), Error>;
}
