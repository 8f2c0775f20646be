//! One-shot DOM attributes: each performs exactly its mutation.

use core::cell::RefCell;
use genz::{Genz, GenzConfig, RecordingHost};
use html::{DOMSubscriber, DOMUpdate, Document, NodeId};
use std::rc::Rc;

const PAGE: &str = r##"<body>
  <button id="toggle" togglez="#panel">toggle</button>
  <button id="toggle-class" togglez-class="#panel:active">active</button>
  <button id="show" showz="#panel">show</button>
  <button id="hide" hidez="#panel">hide</button>
  <button id="missing" togglez="#nowhere">missing</button>
  <div id="panel" class="box">panel</div>

  <form id="signup">
    <input id="name" value="Ada">
    <input id="agree" type="checkbox">
  </form>
  <input id="search" value="query">
  <p id="note">some note</p>
  <button id="reset" clearz="#signup">reset</button>
  <button id="clear-search" clearz="#search">clear</button>
  <button id="clear-note" clearz="#note">clear note</button>
  <button id="submit" submitz="#signup">submit</button>
  <button id="submit-note" submitz="#note">not a form</button>

  <div id="card" hoverz="hovered">card</div>
  <button id="hello" alertz="Hello World!">hello</button>
  <button id="read" alertz-text="#note">read</button>
</body>"##;

struct Recorder(Rc<RefCell<Vec<DOMUpdate>>>);

impl DOMSubscriber for Recorder {
    fn apply_update(&mut self, update: &DOMUpdate) -> anyhow::Result<()> {
        self.0.borrow_mut().push(update.clone());
        Ok(())
    }
}

struct Fixture {
    genz: Genz<RecordingHost>,
    updates: Rc<RefCell<Vec<DOMUpdate>>>,
}

impl Fixture {
    fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut document =
            Document::parse(PAGE).unwrap_or_else(|err| panic!("page should parse: {err}"));
        let updates = Rc::new(RefCell::new(Vec::new()));
        document.subscribe(Box::new(Recorder(Rc::clone(&updates))));
        let mut genz = Genz::with_host(document, GenzConfig::default(), RecordingHost::default());
        genz.initialize();
        Self { genz, updates }
    }

    fn node(&self, selector: &str) -> NodeId {
        self.genz
            .query(selector)
            .unwrap_or_else(|| panic!("{selector} should match"))
    }

    /// Click `selector` and return the mutations it caused.
    fn click(&mut self, selector: &str) -> Vec<DOMUpdate> {
        self.updates.borrow_mut().clear();
        let node = self.node(selector);
        self.genz.click(node);
        self.updates.borrow().clone()
    }

    fn display(&self, selector: &str) -> Option<String> {
        self.genz
            .document()
            .style_property(self.node(selector), "display")
    }
}

/// `togglez`, `showz` and `hidez` drive the inline display property.
///
/// # Panics
/// Panics if visibility does not follow the clicks.
#[test]
fn visibility_attributes() {
    let mut fx = Fixture::new();
    let panel = fx.node("#panel");

    let updates = fx.click("#toggle");
    assert_eq!(fx.display("#panel").as_deref(), Some("none"));
    assert_eq!(
        updates,
        vec![DOMUpdate::SetAttr {
            node: panel,
            name: String::from("style"),
            value: String::from("display: none;"),
        }]
    );

    fx.click("#toggle");
    assert_eq!(fx.display("#panel"), None);
    assert!(!fx.genz.document().has_attr(panel, "style"));

    fx.click("#hide");
    fx.click("#hide");
    assert_eq!(fx.display("#panel").as_deref(), Some("none"));
    fx.click("#show");
    assert_eq!(fx.display("#panel"), None);
}

/// `togglez-class` flips one class and leaves the others.
///
/// # Panics
/// Panics if the class list is wrong.
#[test]
fn class_toggle() {
    let mut fx = Fixture::new();
    let panel = fx.node("#panel");
    fx.click("#toggle-class");
    assert_eq!(fx.genz.document().attr(panel, "class"), Some("box active"));
    fx.click("#toggle-class");
    assert_eq!(fx.genz.document().attr(panel, "class"), Some("box"));
}

/// A missing target is a silent no-op.
///
/// # Panics
/// Panics if anything is mutated.
#[test]
fn missing_target_does_nothing() {
    let mut fx = Fixture::new();
    let before = fx.genz.document().to_html(html::FormState::Live);
    assert!(fx.click("#missing").is_empty());
    assert_eq!(fx.genz.document().to_html(html::FormState::Live), before);
}

/// `clearz` resets forms and clears single fields or text.
///
/// # Panics
/// Panics if a control keeps its edited state.
#[test]
fn clear_attributes() {
    let mut fx = Fixture::new();
    let name = fx.node("#name");
    let agree = fx.node("#agree");
    fx.genz.input(name, "Grace");
    fx.genz.click(agree);
    assert!(fx.genz.document().checked(agree));

    let updates = fx.click("#reset");
    assert_eq!(
        updates,
        vec![DOMUpdate::ResetForm {
            node: fx.node("#signup"),
        }]
    );
    assert_eq!(fx.genz.document().value(name), Some("Ada"));
    assert!(!fx.genz.document().checked(agree));

    fx.click("#clear-search");
    assert_eq!(fx.genz.document().value(fx.node("#search")), Some(""));
    fx.click("#clear-note");
    assert_eq!(fx.genz.document().text_content(fx.node("#note")), "");
}

/// `submitz` submits forms through the host and ignores other elements.
///
/// # Panics
/// Panics if the host sees the wrong submissions.
#[test]
fn submit_attribute() {
    let mut fx = Fixture::new();
    let form = fx.node("#signup");
    assert!(fx.click("#submit").is_empty());
    fx.click("#submit-note");
    assert_eq!(fx.genz.host().submissions, vec![form]);
}

/// `hoverz` adds its class on enter and removes it on leave.
///
/// # Panics
/// Panics if the class does not follow the pointer.
#[test]
fn hover_attribute() {
    let mut fx = Fixture::new();
    let card = fx.node("#card");
    fx.genz.pointer_enter(card);
    assert!(fx.genz.document().has_class(card, "hovered"));
    fx.genz.pointer_leave(card);
    assert!(!fx.genz.document().has_class(card, "hovered"));
}

/// Alerts go to the host, with literal text or a target's text.
///
/// # Panics
/// Panics if the host sees the wrong messages.
#[test]
fn alert_attributes() {
    let mut fx = Fixture::new();
    assert!(fx.click("#hello").is_empty());
    fx.click("#read");
    assert_eq!(
        fx.genz.host().alerts,
        vec![String::from("Hello World!"), String::from("some note")]
    );
}

/// One-shot attributes never touch the store.
///
/// # Panics
/// Panics if any variable is created.
#[test]
fn one_shot_attributes_leave_store_alone() {
    let mut fx = Fixture::new();
    for selector in [
        "#toggle",
        "#toggle-class",
        "#show",
        "#hide",
        "#reset",
        "#clear-search",
        "#submit",
        "#hello",
        "#read",
    ] {
        fx.click(selector);
    }
    let card = fx.node("#card");
    fx.genz.pointer_enter(card);
    assert!(fx.genz.store().is_empty());
}
