//! Two-way bindings, displays and write triggers through the public API.

use genz::{AssignTarget, EventType, Genz, GenzConfig, Handler, RecordingHost, Value};
use html::{Document, NodeId};
use serde_json::json;

fn page(html: &str, config: GenzConfig) -> Genz<RecordingHost> {
    let _ = env_logger::builder().is_test(true).try_init();
    let document = Document::parse(html).unwrap_or_else(|err| panic!("markup should parse: {err}"));
    Genz::with_host(document, config, RecordingHost::default())
}

fn bind(html: &str) -> Genz<RecordingHost> {
    let mut genz = page(html, GenzConfig::default());
    genz.initialize();
    genz
}

fn node(genz: &Genz<RecordingHost>, selector: &str) -> NodeId {
    genz.query(selector)
        .unwrap_or_else(|| panic!("{selector} should match"))
}

fn shown(genz: &Genz<RecordingHost>, selector: &str) -> String {
    genz.document().text_content(node(genz, selector))
}

fn value(genz: &Genz<RecordingHost>, selector: &str) -> String {
    genz.document()
        .value(node(genz, selector))
        .unwrap_or_default()
        .to_owned()
}

/// Typing into a two-way input updates its display synchronously.
///
/// # Panics
/// Panics if the display does not follow the input.
#[test]
fn typing_updates_display() {
    let mut genz = bind(r#"<input letz="username" /><span getz="username"></span>"#);
    assert_eq!(genz.get("username"), Some(&Value::from("")));

    let input = node(&genz, "input");
    genz.input(input, "Ada");
    assert_eq!(shown(&genz, "span"), "Ada");
    assert_eq!(genz.get("username"), Some(&Value::from("Ada")));
}

/// A write trigger evaluates against the live store on every click.
///
/// # Panics
/// Panics if the counter does not advance by one per click.
#[test]
fn counter_increments_per_click() {
    let mut genz = page(
        r#"<button setz="count:count + 1">+</button><span getz="count"></span>"#,
        GenzConfig::default(),
    );
    genz.set("count", 0);
    genz.initialize();
    assert_eq!(shown(&genz, "span"), "0");

    assert!(genz.click_selector("button"));
    assert_eq!(shown(&genz, "span"), "1");
    assert!(genz.click_selector("button"));
    assert_eq!(shown(&genz, "span"), "2");
    assert_eq!(genz.get("count"), Some(&Value::from(2)));
}

/// Programmatic writes reach both the typed input and its display.
///
/// # Panics
/// Panics if either bound element shows the wrong text.
#[test]
fn typed_binding_round_trip() {
    let mut genz = bind(r#"<input letz="count:Number"><span getz="count"></span>"#);
    assert_eq!(genz.get("count"), Some(&Value::from(0)));
    assert_eq!(shown(&genz, "span"), "0");

    genz.set("count", 5);
    assert_eq!(value(&genz, "input"), "5");
    assert_eq!(shown(&genz, "span"), "5");

    let input = node(&genz, "input");
    genz.input(input, "12");
    assert_eq!(genz.get("count"), Some(&Value::from(12)));
    genz.input(input, "twelve");
    assert_eq!(shown(&genz, "span"), "NaN");
}

/// Dotted paths read into structured values; missing steps render empty.
///
/// # Panics
/// Panics if a nested display shows the wrong text.
#[test]
fn nested_paths_render() {
    let mut genz = bind(
        r#"<span id="name" getz="user.name"></span>
           <span id="missing" getz="user.missing"></span>
           <span id="deep" getz="user.address.city"></span>
           <pre id="whole" getz="user"></pre>"#,
    );
    assert_eq!(shown(&genz, "#name"), "");

    genz.set("user", Value::from_json(json!({"name": "Ada"})));
    assert_eq!(shown(&genz, "#name"), "Ada");
    assert_eq!(shown(&genz, "#missing"), "");
    assert_eq!(shown(&genz, "#deep"), "");
    assert_eq!(shown(&genz, "#whole"), "{\n  \"name\": \"Ada\"\n}");
}

/// Whitespace around a display name is ignored for later updates too,
/// with or without the binding index.
///
/// # Panics
/// Panics if a padded display stops following its variable.
#[test]
fn padded_display_names_stay_live() {
    for binding_index in [false, true] {
        let mut genz = page(
            r#"<span id="count" getz=" count "></span><span id="name" getz="user.name "></span>"#,
            GenzConfig::new(binding_index, true),
        );
        genz.set("count", 1);
        genz.initialize();
        assert_eq!(shown(&genz, "#count"), "1");

        genz.set("count", 2);
        assert_eq!(shown(&genz, "#count"), "2", "index: {binding_index}");
        genz.set("user", Value::from_json(json!({"name": "Ada"})));
        assert_eq!(shown(&genz, "#name"), "Ada", "index: {binding_index}");
    }
}

/// A store key containing a dot is read whole, both on the first render and
/// on later updates of either that key or its first segment.
///
/// # Panics
/// Panics if the two render paths disagree.
#[test]
fn dotted_store_keys_read_whole() {
    let mut genz = page(
        r#"<button setz="user.name:'Grace'">set</button><span getz="user.name"></span>"#,
        GenzConfig::default(),
    );
    genz.set("user", Value::from_json(json!({"name": "Ada"})));
    genz.initialize();
    assert_eq!(shown(&genz, "span"), "Ada");

    genz.click_selector("button");
    assert_eq!(genz.get("user.name"), Some(&Value::from("Grace")));
    assert_eq!(shown(&genz, "span"), "Grace");

    genz.set("user", Value::from_json(json!({"name": "Linus"})));
    assert_eq!(shown(&genz, "span"), "Grace");
}

/// Only the first colon separates target and expression.
///
/// # Panics
/// Panics if the registered handler or the evaluated result is wrong.
#[test]
fn write_trigger_keeps_colons_in_expression() {
    let mut genz = bind(
        r#"<button id="sum" setz="result:a + b:c">=</button>
           <button id="pick" setz="label:flag ? 'yes:1' : 'no'">?</button>
           <span getz="label"></span>"#,
    );
    let sum = node(&genz, "#sum");
    assert_eq!(
        genz.listeners(sum),
        &[(
            EventType::Click,
            Handler::Assign {
                target: AssignTarget::Variable(String::from("result")),
                expression: String::from("a + b:c"),
            },
        )]
    );

    genz.set("flag", true);
    assert!(genz.click_selector("#pick"));
    assert_eq!(shown(&genz, "span"), "yes:1");

    // `a + b:c` is outside the grammar: the result is undefined.
    genz.click(sum);
    assert_eq!(genz.get("result"), Some(&Value::Undefined));
}

/// Checkboxes bind their checked state.
///
/// # Panics
/// Panics if the store does not follow the checkbox.
#[test]
fn checkbox_binds_checked_state() {
    let mut genz = bind(
        r#"<input type="checkbox" letz="agree:boolean"><span getz="agree"></span>"#,
    );
    assert_eq!(shown(&genz, "span"), "false");
    assert!(genz.click_selector("input"));
    assert_eq!(genz.get("agree"), Some(&Value::from(true)));
    assert_eq!(shown(&genz, "span"), "true");

    let checkbox = node(&genz, "input");
    genz.set_checked(checkbox, false);
    assert_eq!(shown(&genz, "span"), "false");
}

/// Non-form elements bind through their text content; `hidez` hides them.
///
/// # Panics
/// Panics if the initial value or visibility is wrong.
#[test]
fn text_elements_and_hidden_bindings() {
    let genz = bind(
        r#"<div id="greet" letz="greeting">Hello</div>
           <input id="secret" letz="token" value="abc" hidez>
           <p getz="greeting"></p>"#,
    );
    assert_eq!(shown(&genz, "p"), "Hello");
    assert_eq!(genz.get("token"), Some(&Value::from("abc")));
    let secret = node(&genz, "#secret");
    assert_eq!(
        genz.document().style_property(secret, "display").as_deref(),
        Some("none")
    );
    assert!(genz.listeners(secret).iter().all(|(event, _)| *event == EventType::Input));
}

/// Object-typed bindings parse JSON and fall back to an empty object.
///
/// # Panics
/// Panics if the coerced values are wrong.
#[test]
fn object_bindings() {
    let mut genz = bind(
        r#"<textarea letz="config:object">{"theme": "dark"}</textarea>
           <span getz="config.theme"></span>"#,
    );
    assert_eq!(shown(&genz, "span"), "dark");
    let area = node(&genz, "textarea");
    genz.input(area, "{oops");
    assert_eq!(genz.get("config"), Some(&Value::empty_object()));
    assert_eq!(shown(&genz, "span"), "");
}

/// `#id` references in `getz` mirror another element; in `setz` they
/// write straight into the element.
///
/// # Panics
/// Panics if the mirrored or written text is wrong.
#[test]
fn legacy_element_references() {
    let mut genz = bind(
        r##"<input id="src" value="a"><span id="mirror" getz="#src"></span>
           <button id="fill" setz="#out:1 + 2">fill</button><input id="out">
           <button id="note" setz=".msg:'saved'">note</button><p class="msg">x</p>"##,
    );
    assert_eq!(shown(&genz, "#mirror"), "a");
    let src = node(&genz, "#src");
    genz.input(src, "b");
    assert_eq!(shown(&genz, "#mirror"), "b");

    assert!(genz.click_selector("#fill"));
    assert_eq!(value(&genz, "#out"), "3");
    assert!(genz.click_selector("#note"));
    assert_eq!(shown(&genz, ".msg"), "saved");
    assert!(genz.get("#out").is_none(), "element targets never touch the store");
}

/// With element references disabled the same text names a store variable.
///
/// # Panics
/// Panics if a reference is still followed.
#[test]
fn legacy_references_can_be_disabled() {
    let mut genz = page(
        r##"<input id="src" value="a"><span id="mirror" getz="#src"></span>
           <button setz="#src:'z'">x</button>"##,
        GenzConfig::new(false, false),
    );
    genz.initialize();
    assert_eq!(shown(&genz, "#mirror"), "");
    assert!(genz.click_selector("button"));
    assert_eq!(genz.get("#src"), Some(&Value::from("z")));
    assert_eq!(value(&genz, "#src"), "a");
}

/// Failed expressions write undefined, which renders as empty text.
///
/// # Panics
/// Panics if the failure leaks into the display as text.
#[test]
fn failed_expression_clears_display() {
    let mut genz = bind(r#"<button setz="count:missing + 1">+</button><span getz="count"></span>"#);
    genz.set("count", 3);
    assert_eq!(shown(&genz, "span"), "3");
    assert!(genz.click_selector("button"));
    assert_eq!(genz.get("count"), Some(&Value::Undefined));
    assert_eq!(shown(&genz, "span"), "");
}

/// Malformed declarations are skipped without affecting the rest.
///
/// # Panics
/// Panics if a malformed element gets a listener or a valid one does not.
#[test]
fn malformed_declarations_are_skipped() {
    let mut genz = bind(
        r##"<input id="bad" letz=":number">
           <button id="nocolon" setz="nothing here">x</button>
           <button id="noclass" togglez-class="#panel">y</button>
           <div id="nohover" hoverz="">z</div>
           <button id="empty" togglez="">w</button>
           <input id="good" letz="ok"><span getz="ok"></span>"##,
    );
    for selector in ["#bad", "#nocolon", "#noclass", "#nohover", "#empty"] {
        assert!(
            genz.listeners(node(&genz, selector)).is_empty(),
            "{selector} should have no listeners"
        );
    }
    let good = node(&genz, "#good");
    genz.input(good, "fine");
    assert_eq!(shown(&genz, "span"), "fine");
    assert_eq!(genz.store().keys().collect::<Vec<_>>(), vec!["ok"]);
}

/// A second initialization registers nothing new.
///
/// # Panics
/// Panics if listeners are duplicated.
#[test]
fn initialize_runs_once() {
    let mut genz = bind(r#"<button id="b" setz="n:(n ?? 0) + 1">+</button>"#);
    assert!(genz.is_initialized());
    genz.initialize();
    let button = node(&genz, "#b");
    assert_eq!(genz.listeners(button).len(), 1);
    genz.click(button);
    assert_eq!(
        genz.get("n"),
        Some(&Value::Undefined),
        "n was never declared, so the expression fails"
    );
}

/// Clicks bubble to ancestors; pointer enter does not.
///
/// # Panics
/// Panics if propagation differs.
#[test]
fn click_bubbles_hover_does_not() {
    let mut genz = page(
        r#"<div id="outer" setz="n:n + 1" hoverz="hot"><button id="inner">x</button></div>"#,
        GenzConfig::default(),
    );
    genz.set("n", 0);
    genz.initialize();
    let inner = node(&genz, "#inner");
    genz.click(inner);
    assert_eq!(genz.get("n"), Some(&Value::from(1)));

    genz.pointer_enter(inner);
    let outer = node(&genz, "#outer");
    assert!(!genz.document().has_class(outer, "hot"));
    genz.pointer_enter(outer);
    assert!(genz.document().has_class(outer, "hot"));
}
