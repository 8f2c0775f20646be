//! The binder instance and its one-time attribute scan.

use crate::attrs::{
    ALERTZ, ALERTZ_TEXT, CLEARZ, CLICKZ, GETZ, HIDEZ, HOVERZ, LETZ, SETZ, SHOWZ, SUBMITZ,
    TOGGLEZ, TOGGLEZ_CLASS, display_path, is_selector_reference, parse_class_toggle,
    parse_two_way, parse_write,
};
use crate::coerce::{RawInput, coerce};
use crate::config::GenzConfig;
use crate::handler::{AssignTarget, EventType, Handler};
use crate::host::{Actions, ConsoleHost, Host};
use crate::store::Store;
use crate::value::Value;
use crate::view::{BindingIndex, ViewUpdater, render_display};
use anyhow::Result;
use html::{Document, NodeId};
use log::{debug, info, warn};
use std::collections::HashMap;

/// An attribute binder over one document.
///
/// Owns the document, the store, every registered listener and the host.
/// Nothing is shared between instances.
pub struct Genz<H: Host = ConsoleHost> {
    pub(crate) document: Document,
    pub(crate) store: Store,
    pub(crate) listeners: HashMap<NodeId, Vec<(EventType, Handler)>>,
    pub(crate) index: Option<BindingIndex>,
    pub(crate) config: GenzConfig,
    pub(crate) host: H,
    pub(crate) actions: Actions,
    initialized: bool,
}

impl Genz<ConsoleHost> {
    /// A binder that reports host hooks through the log.
    pub fn new(document: Document, config: GenzConfig) -> Self {
        Self::with_host(document, config, ConsoleHost)
    }

    /// Parse `html` and wrap it in an uninitialized binder.
    ///
    /// # Errors
    /// Returns an error if the document cannot be parsed.
    pub fn from_html(html: &str, config: GenzConfig) -> Result<Self> {
        Ok(Self::new(Document::parse(html)?, config))
    }
}

impl<H: Host> Genz<H> {
    pub fn with_host(document: Document, config: GenzConfig, host: H) -> Self {
        Self {
            document,
            store: Store::new(),
            listeners: HashMap::new(),
            index: None,
            config,
            host,
            actions: Actions::new(),
            initialized: false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> GenzConfig {
        self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Actions reachable from `clickz`. Register before or after `initialize`.
    pub fn actions_mut(&mut self) -> &mut Actions {
        &mut self.actions
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Listeners registered on `node`, in registration order.
    pub fn listeners(&self, node: NodeId) -> &[(EventType, Handler)] {
        self.listeners
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.store.get(key)
    }

    /// Write a variable and update every element bound to it.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let mut view = ViewUpdater::new(&mut self.document, self.index.as_ref());
        self.store.set(key, value.into(), &mut view);
    }

    fn listen(&mut self, node: NodeId, event: EventType, handler: Handler) {
        debug!("listen {} on {node:?}: {handler:?}", event.as_str());
        self.listeners.entry(node).or_default().push((event, handler));
    }

    /// Scan the document once and wire every recognized attribute.
    /// Calling it again does nothing.
    pub fn initialize(&mut self) {
        if self.initialized {
            warn!("Gen-Z binder is already initialized");
            return;
        }
        self.initialized = true;
        if self.config.binding_index {
            self.index = Some(BindingIndex::build(&self.document));
        }

        self.bind_click_events();
        self.bind_two_way();
        self.bind_displays();
        self.bind_writes();
        self.bind_visibility();
        self.bind_forms();
        self.bind_hover();

        info!(
            "Gen-Z initialized: {} listeners on {} elements, {} variables",
            self.listeners.values().map(Vec::len).sum::<usize>(),
            self.listeners.len(),
            self.store.len()
        );
    }

    /// Elements carrying `name` with their raw attribute text.
    fn declarations(&self, name: &str) -> Vec<(NodeId, String)> {
        self.document
            .elements_with_attr(name)
            .into_iter()
            .filter_map(|node| {
                let text = self.document.attr(node, name)?;
                Some((node, text.to_owned()))
            })
            .collect()
    }

    /// Declarations whose value is a non-empty selector.
    fn selector_declarations(&self, name: &str) -> Vec<(NodeId, String)> {
        self.declarations(name)
            .into_iter()
            .filter_map(|(node, text)| {
                let selector = text.trim();
                if selector.is_empty() {
                    warn!("{name}: empty selector on {node:?}, skipped");
                    return None;
                }
                Some((node, selector.to_owned()))
            })
            .collect()
    }

    fn bind_click_events(&mut self) {
        for (node, message) in self.declarations(ALERTZ) {
            self.listen(node, EventType::Click, Handler::Alert { message });
        }
        for (node, text) in self.declarations(CLICKZ) {
            let name = text.trim();
            if name.is_empty() {
                warn!("clickz: empty action name on {node:?}, skipped");
                continue;
            }
            if !self.actions.contains(name) {
                debug!("clickz: action {name:?} is not registered yet");
            }
            let handler = Handler::RunAction {
                name: name.to_owned(),
            };
            self.listen(node, EventType::Click, handler);
        }
        for (node, selector) in self.selector_declarations(ALERTZ_TEXT) {
            self.listen(node, EventType::Click, Handler::AlertText { selector });
        }
    }

    fn bind_two_way(&mut self) {
        for (node, text) in self.declarations(LETZ) {
            let Some(decl) = parse_two_way(&text) else {
                warn!("letz: malformed declaration {text:?} on {node:?}, skipped");
                continue;
            };
            let initial = match self.read_input(node) {
                RawInput::Text(value) if value.is_empty() => {
                    RawInput::Text(self.document.text_content(node))
                }
                raw => raw,
            };
            let value = coerce(&initial, decl.tag);
            self.set(&decl.name, value);
            if self.document.has_attr(node, HIDEZ) {
                self.document.set_style_property(node, "display", "none");
            }
            let handler = Handler::TwoWay {
                name: decl.name,
                tag: decl.tag,
            };
            self.listen(node, EventType::Input, handler);
        }
    }

    fn bind_displays(&mut self) {
        for (node, text) in self.declarations(GETZ) {
            let source = display_path(&text);
            if source.is_empty() {
                warn!("getz: empty variable name on {node:?}, skipped");
                continue;
            }
            if self.config.legacy_selectors && is_selector_reference(source) {
                let Some(source_node) = self.document.query_selector(source) else {
                    debug!("getz: no element matches {source:?}");
                    continue;
                };
                let value = self.document.value(source_node).unwrap_or_default().to_owned();
                self.document.set_text_content(node, &value);
                self.listen(source_node, EventType::Input, Handler::Mirror { display: node });
            } else {
                render_display(&mut self.document, node, source, &self.store);
            }
        }
    }

    fn bind_writes(&mut self) {
        for (node, text) in self.declarations(SETZ) {
            let Some(decl) = parse_write(&text) else {
                warn!("setz: expected `target:expression`, found {text:?} on {node:?}, skipped");
                continue;
            };
            let target = if self.config.legacy_selectors && is_selector_reference(&decl.target) {
                AssignTarget::Element(decl.target)
            } else {
                AssignTarget::Variable(decl.target)
            };
            let handler = Handler::Assign {
                target,
                expression: decl.expression,
            };
            self.listen(node, EventType::Click, handler);
        }
    }

    fn bind_visibility(&mut self) {
        for (node, selector) in self.selector_declarations(TOGGLEZ) {
            self.listen(node, EventType::Click, Handler::ToggleDisplay { selector });
        }
        for (node, text) in self.declarations(TOGGLEZ_CLASS) {
            let Some(decl) = parse_class_toggle(&text) else {
                warn!("togglez-class: expected `selector:class`, found {text:?} on {node:?}, skipped");
                continue;
            };
            let handler = Handler::ToggleClass {
                selector: decl.selector,
                class: decl.class,
            };
            self.listen(node, EventType::Click, handler);
        }
        for (node, selector) in self.selector_declarations(SHOWZ) {
            self.listen(node, EventType::Click, Handler::Show { selector });
        }
        for (node, text) in self.declarations(HIDEZ) {
            let selector = text.trim();
            if selector.is_empty() {
                // A bare `hidez` on a two-way element only hides it at startup.
                if !self.document.has_attr(node, LETZ) {
                    warn!("hidez: empty selector on {node:?}, skipped");
                }
                continue;
            }
            let handler = Handler::Hide {
                selector: selector.to_owned(),
            };
            self.listen(node, EventType::Click, handler);
        }
    }

    fn bind_forms(&mut self) {
        for (node, selector) in self.selector_declarations(CLEARZ) {
            self.listen(node, EventType::Click, Handler::Clear { selector });
        }
        for (node, selector) in self.selector_declarations(SUBMITZ) {
            self.listen(node, EventType::Click, Handler::Submit { selector });
        }
    }

    fn bind_hover(&mut self) {
        for (node, text) in self.declarations(HOVERZ) {
            let class = text.trim();
            if class.is_empty() || class.contains(char::is_whitespace) {
                warn!("hoverz: expected one class name, found {text:?} on {node:?}, skipped");
                continue;
            }
            self.listen(
                node,
                EventType::MouseEnter,
                Handler::AddClass {
                    class: class.to_owned(),
                },
            );
            self.listen(
                node,
                EventType::MouseLeave,
                Handler::RemoveClass {
                    class: class.to_owned(),
                },
            );
        }
    }
}
