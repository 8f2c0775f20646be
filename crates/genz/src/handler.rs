//! One handler variant per attribute family, and what each one does.

use crate::Genz;
use crate::coerce::{RawInput, TypeTag, coerce};
use crate::expr::evaluate;
use crate::host::{ActionContext, Host};
use html::NodeId;
use log::{debug, warn};

/// DOM events the binder listens for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    Input,
    MouseEnter,
    MouseLeave,
}

impl EventType {
    /// `click` and `input` propagate to ancestors; pointer enter/leave do not.
    pub const fn bubbles(self) -> bool {
        matches!(self, Self::Click | Self::Input)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Input => "input",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
        }
    }
}

/// Where a `setz` result goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssignTarget {
    /// A store variable.
    Variable(String),
    /// The first element matching a `#id` / `.class` reference.
    Element(String),
}

/// A registered listener body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Handler {
    /// `alertz`
    Alert { message: String },
    /// `clickz`
    RunAction { name: String },
    /// `alertz-text`
    AlertText { selector: String },
    /// `letz`: re-read the element and write the store.
    TwoWay { name: String, tag: TypeTag },
    /// Legacy `getz="#source"`: copy the source's value into `display`.
    Mirror { display: NodeId },
    /// `setz`
    Assign {
        target: AssignTarget,
        expression: String,
    },
    /// `togglez`
    ToggleDisplay { selector: String },
    /// `togglez-class`
    ToggleClass { selector: String, class: String },
    /// `showz`
    Show { selector: String },
    /// `hidez`
    Hide { selector: String },
    /// `clearz`
    Clear { selector: String },
    /// `submitz`
    Submit { selector: String },
    /// `hoverz` on pointer enter.
    AddClass { class: String },
    /// `hoverz` on pointer leave.
    RemoveClass { class: String },
}

impl<H: Host> Genz<H> {
    /// First element matching `selector`; a miss is expected and only traced.
    fn target(&self, selector: &str) -> Option<NodeId> {
        let found = self.document.query_selector(selector);
        if found.is_none() {
            debug!("no element matches {selector:?}");
        }
        found
    }

    /// Current input of a two-way element: checked state for checkboxes,
    /// else its value property, else its text content.
    pub(crate) fn read_input(&self, node: NodeId) -> RawInput {
        if self.document.is_checkbox(node) {
            return RawInput::Checked(self.document.checked(node));
        }
        match self.document.value(node) {
            Some(value) => RawInput::Text(value.to_owned()),
            None => RawInput::Text(self.document.text_content(node)),
        }
    }

    /// Run one handler registered on `owner`.
    pub(crate) fn run_handler(&mut self, owner: NodeId, handler: &Handler) {
        match handler {
            Handler::Alert { message } => self.host.alert(message),
            Handler::RunAction { name } => {
                let Some(action) = self.actions.get(name) else {
                    warn!("clickz: no action registered as {name:?}");
                    return;
                };
                let mut ctx = ActionContext::new(
                    owner,
                    &mut self.document,
                    &mut self.store,
                    self.index.as_ref(),
                );
                action(&mut ctx);
            }
            Handler::AlertText { selector } => {
                if let Some(target) = self.target(selector) {
                    let text = self.document.text_content(target);
                    self.host.alert(&text);
                }
            }
            Handler::TwoWay { name, tag } => {
                let value = coerce(&self.read_input(owner), *tag);
                self.set(name, value);
            }
            Handler::Mirror { display } => {
                let text = self.document.value(owner).unwrap_or_default().to_owned();
                self.document.set_text_content(*display, &text);
            }
            Handler::Assign { target, expression } => {
                let value = evaluate(expression, &self.store);
                match target {
                    AssignTarget::Variable(name) => self.set(name, value),
                    AssignTarget::Element(selector) => {
                        if let Some(node) = self.target(selector) {
                            let text = value.display_text();
                            if !self.document.set_value(node, &text) {
                                self.document.set_text_content(node, &text);
                            }
                        }
                    }
                }
            }
            Handler::ToggleDisplay { selector } => {
                if let Some(node) = self.target(selector) {
                    let hidden = self.document.style_property(node, "display").as_deref()
                        == Some("none");
                    let display = if hidden { "" } else { "none" };
                    self.document.set_style_property(node, "display", display);
                }
            }
            Handler::ToggleClass { selector, class } => {
                if let Some(node) = self.target(selector) {
                    self.document.toggle_class(node, class);
                }
            }
            Handler::Show { selector } => {
                if let Some(node) = self.target(selector) {
                    self.document.set_style_property(node, "display", "");
                }
            }
            Handler::Hide { selector } => {
                if let Some(node) = self.target(selector) {
                    self.document.set_style_property(node, "display", "none");
                }
            }
            Handler::Clear { selector } => {
                let Some(node) = self.target(selector) else {
                    return;
                };
                if self.document.tag_name(node) == Some("form") {
                    self.document.reset_form(node);
                } else if !self.document.set_value(node, "") {
                    self.document.set_text_content(node, "");
                }
            }
            Handler::Submit { selector } => {
                let Some(node) = self.target(selector) else {
                    return;
                };
                if self.document.tag_name(node) == Some("form") {
                    self.host.submit(node, &self.document);
                } else {
                    debug!("submitz: {selector:?} is not a form");
                }
            }
            Handler::AddClass { class } => self.document.add_class(owner, class),
            Handler::RemoveClass { class } => self.document.remove_class(owner, class),
        }
    }
}
