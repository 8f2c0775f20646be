//! Event dispatch and the interaction entry points.

use crate::Genz;
use crate::handler::{EventType, Handler};
use crate::host::Host;
use html::NodeId;
use log::{debug, trace};

impl<H: Host> Genz<H> {
    /// Fire `event` at `target`. Bubbling events then visit each ancestor
    /// element; every element runs its listeners for the event in
    /// registration order.
    pub fn dispatch(&mut self, target: NodeId, event: EventType) {
        let mut path = vec![target];
        if event.bubbles() {
            let mut cursor = self.document.parent_element(target);
            while let Some(parent) = cursor {
                path.push(parent);
                cursor = self.document.parent_element(parent);
            }
        }
        trace!("dispatch {} through {} elements", event.as_str(), path.len());
        for node in path {
            let handlers: Vec<Handler> = self
                .listeners(node)
                .iter()
                .filter(|(kind, _)| *kind == event)
                .map(|(_, handler)| handler.clone())
                .collect();
            for handler in &handlers {
                self.run_handler(node, handler);
            }
        }
    }

    /// Click an element. Checkboxes flip their checked state first and
    /// report the change with an `input` event after the click.
    pub fn click(&mut self, node: NodeId) {
        let checkbox = self.document.is_checkbox(node);
        if checkbox {
            let checked = !self.document.checked(node);
            self.document.set_checked(node, checked);
        }
        self.dispatch(node, EventType::Click);
        if checkbox {
            self.dispatch(node, EventType::Input);
        }
    }

    /// Type `text` into an element: replaces its value property (or text
    /// content when it has none) and fires `input`.
    pub fn input(&mut self, node: NodeId, text: &str) {
        if !self.document.set_value(node, text) {
            self.document.set_text_content(node, text);
        }
        self.dispatch(node, EventType::Input);
    }

    /// Set a checkbox state and fire `input`.
    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        self.document.set_checked(node, checked);
        self.dispatch(node, EventType::Input);
    }

    pub fn pointer_enter(&mut self, node: NodeId) {
        self.dispatch(node, EventType::MouseEnter);
    }

    pub fn pointer_leave(&mut self, node: NodeId) {
        self.dispatch(node, EventType::MouseLeave);
    }

    /// First element matching `selector`.
    pub fn query(&self, selector: &str) -> Option<NodeId> {
        self.document.query_selector(selector)
    }

    /// Click the first element matching `selector`. Returns false on a miss.
    pub fn click_selector(&mut self, selector: &str) -> bool {
        self.query(selector).is_some_and(|node| {
            self.click(node);
            true
        })
    }

    /// Type into the first element matching `selector`. Returns false on a miss.
    pub fn input_selector(&mut self, selector: &str, text: &str) -> bool {
        let Some(node) = self.query(selector) else {
            debug!("input: no element matches {selector:?}");
            return false;
        };
        self.input(node, text);
        true
    }
}
