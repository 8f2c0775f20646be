//! Runtime switches for a binder instance.
//!
//! Configuration can be loaded from environment variables or constructed
//! programmatically.

use std::env;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenzConfig {
    /// Resolve bound elements through an index built at initialization
    /// instead of re-querying the document on every store write.
    pub binding_index: bool,
    /// Accept `#id` / `.class` element references in `getz` and `setz`.
    pub legacy_selectors: bool,
}

impl Default for GenzConfig {
    fn default() -> Self {
        Self::new(false, true)
    }
}

impl GenzConfig {
    pub const fn new(binding_index: bool, legacy_selectors: bool) -> Self {
        Self {
            binding_index,
            legacy_selectors,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `GENZ_BINDING_INDEX`: Set to "1" to use the binding index (default: disabled)
    /// - `GENZ_LEGACY_SELECTORS`: Set to "0" to disable element references (default: enabled)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let binding_index = lookup("GENZ_BINDING_INDEX").is_some_and(|val| val.trim() == "1");
        let legacy_selectors = lookup("GENZ_LEGACY_SELECTORS").is_none_or(|val| val.trim() != "0");
        Self::new(binding_index, legacy_selectors)
    }
}
