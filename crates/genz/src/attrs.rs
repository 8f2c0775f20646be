//! Attribute names and the small grammars of their values.

use crate::coerce::TypeTag;

pub const ALERTZ: &str = "alertz";
pub const CLICKZ: &str = "clickz";
pub const ALERTZ_TEXT: &str = "alertz-text";
pub const LETZ: &str = "letz";
pub const GETZ: &str = "getz";
pub const SETZ: &str = "setz";
pub const TOGGLEZ: &str = "togglez";
pub const TOGGLEZ_CLASS: &str = "togglez-class";
pub const SHOWZ: &str = "showz";
pub const HIDEZ: &str = "hidez";
pub const CLEARZ: &str = "clearz";
pub const SUBMITZ: &str = "submitz";
pub const HOVERZ: &str = "hoverz";

/// `letz="name[:type]"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TwoWayDecl {
    pub name: String,
    pub tag: TypeTag,
}

/// `setz="target:expression"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteDecl {
    pub target: String,
    pub expression: String,
}

/// `togglez-class="selector:className"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassToggleDecl {
    pub selector: String,
    pub class: String,
}

/// Variable name of a `letz` value, without its type tag.
pub fn two_way_name(text: &str) -> &str {
    text.split(':').next().unwrap_or_default().trim()
}

/// Parse a `letz` value. Text after a second colon is ignored.
pub fn parse_two_way(text: &str) -> Option<TwoWayDecl> {
    let name = two_way_name(text);
    if name.is_empty() {
        return None;
    }
    let tag = text.split(':').nth(1).map(TypeTag::from_tag).unwrap_or_default();
    Some(TwoWayDecl {
        name: name.to_owned(),
        tag,
    })
}

/// Parse a `setz` value, splitting on the first colon only.
pub fn parse_write(text: &str) -> Option<WriteDecl> {
    let (target, expression) = text.split_once(':')?;
    let target = target.trim();
    if target.is_empty() {
        return None;
    }
    Some(WriteDecl {
        target: target.to_owned(),
        expression: expression.to_owned(),
    })
}

/// Parse a `togglez-class` value, splitting on the first colon only.
pub fn parse_class_toggle(text: &str) -> Option<ClassToggleDecl> {
    let (selector, class) = text.split_once(':')?;
    let selector = selector.trim();
    let class = class.trim();
    if selector.is_empty() || class.is_empty() || class.contains(char::is_whitespace) {
        return None;
    }
    Some(ClassToggleDecl {
        selector: selector.to_owned(),
        class: class.to_owned(),
    })
}

/// Variable or dotted path of a `getz` value, surrounding whitespace ignored.
pub fn display_path(text: &str) -> &str {
    text.trim()
}

/// True for the `#id` / `.class` element references of `getz` and `setz`.
pub fn is_selector_reference(text: &str) -> bool {
    text.starts_with('#') || text.starts_with('.')
}
