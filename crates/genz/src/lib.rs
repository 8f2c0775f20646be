#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

//! Gen-Z: behavior for HTML documents declared through attributes ending in `z`.
//!
//! `letz` creates two-way bindings between inputs and a shared store, `getz`
//! displays store values, `setz` evaluates expressions on click, and the
//! remaining attributes perform one-shot DOM operations (visibility, classes,
//! form reset and submit, hover classes, alerts).
//!
//! ```no_run
//! use genz::{Genz, GenzConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut genz = Genz::from_html(
//!     r#"<button setz="count:count + 1">+</button><span getz="count"></span>"#,
//!     GenzConfig::default(),
//! )?;
//! genz.set("count", 0);
//! genz.initialize();
//! genz.click_selector("button");
//! # Ok(())
//! # }
//! ```

pub mod attrs;
mod binder;
pub mod coerce;
pub mod config;
mod events;
pub mod expr;
pub mod handler;
pub mod host;
pub mod store;
pub mod value;
pub mod view;

pub use binder::Genz;
pub use coerce::{RawInput, TypeTag, coerce};
pub use config::GenzConfig;
pub use expr::{ExprError, evaluate, try_evaluate};
pub use handler::{AssignTarget, EventType, Handler};
pub use host::{Action, ActionContext, Actions, ConsoleHost, Host, RecordingHost};
pub use store::{ChangeSink, Store};
pub use value::Value;
pub use view::{BindingIndex, ViewUpdater};
