//! Outward-facing hooks: alerts, form submission and named actions.

use crate::store::Store;
use crate::value::Value;
use crate::view::{BindingIndex, ViewUpdater};
use html::{Document, NodeId};
use log::info;
use std::collections::HashMap;
use std::sync::Arc;

/// What a page would get from its browser.
pub trait Host {
    /// Show a message to the user (`alertz`, `alertz-text`).
    fn alert(&mut self, message: &str);

    /// Submit `form` (`submitz`). The document is in its current state.
    fn submit(&mut self, form: NodeId, document: &Document);
}

/// Logs every hook through `log`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleHost;

impl Host for ConsoleHost {
    fn alert(&mut self, message: &str) {
        info!("alert: {message}");
    }

    fn submit(&mut self, form: NodeId, document: &Document) {
        let name = document
            .element_id(form)
            .map_or_else(|| String::from("<form>"), |id| format!("#{id}"));
        info!("submit: {name}");
    }
}

/// Remembers every hook call, in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingHost {
    pub alerts: Vec<String>,
    pub submissions: Vec<NodeId>,
}

impl Host for RecordingHost {
    fn alert(&mut self, message: &str) {
        info!("alert: {message}");
        self.alerts.push(message.to_owned());
    }

    fn submit(&mut self, form: NodeId, _document: &Document) {
        self.submissions.push(form);
    }
}

/// What a `clickz` action can see and change.
pub struct ActionContext<'ctx> {
    /// The clicked element.
    pub node: NodeId,
    pub document: &'ctx mut Document,
    store: &'ctx mut Store,
    index: Option<&'ctx BindingIndex>,
}

impl<'ctx> ActionContext<'ctx> {
    pub(crate) fn new(
        node: NodeId,
        document: &'ctx mut Document,
        store: &'ctx mut Store,
        index: Option<&'ctx BindingIndex>,
    ) -> Self {
        Self {
            node,
            document,
            store,
            index,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.store.get(key)
    }

    /// Write a variable and update every element bound to it.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let mut view = ViewUpdater::new(self.document, self.index);
        self.store.set(key, value.into(), &mut view);
    }
}

/// Type-erased action callback.
pub type Action = Arc<dyn Fn(&mut ActionContext<'_>) + Send + Sync>;

/// Named callbacks invoked by `clickz="name"`.
#[derive(Clone, Default)]
pub struct Actions {
    callbacks: HashMap<String, Action>,
}

impl Actions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&mut ActionContext<'_>) + Send + Sync + 'static,
    {
        self.callbacks.insert(name.into(), Arc::new(handler));
    }

    pub fn get(&self, name: &str) -> Option<Action> {
        self.callbacks.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }
}
