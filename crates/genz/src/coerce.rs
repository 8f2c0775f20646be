//! Conversion of raw element input into typed store values.

use crate::value::{Value, string_to_number};
use log::error;
use serde_json::Value as Json;

/// What an element reports as its current input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawInput {
    /// A value property or text content.
    Text(String),
    /// The checked state of a checkbox.
    Checked(bool),
}

/// Declared type of a two-way binding (`letz="name:type"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TypeTag {
    #[default]
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    Object,
}

impl TypeTag {
    /// Parse a tag case-insensitively. Unknown tags are `String`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "null" => Self::Null,
            "undefined" => Self::Undefined,
            "object" => Self::Object,
            _ => Self::String,
        }
    }
}

impl RawInput {
    fn to_value(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Checked(flag) => Value::Boolean(*flag),
        }
    }
}

/// Convert raw input to the declared type. Never fails: invalid numbers are
/// NaN and invalid JSON is an empty object.
pub fn coerce(raw: &RawInput, tag: TypeTag) -> Value {
    match tag {
        TypeTag::Number => Value::Number(match raw {
            RawInput::Text(text) => string_to_number(text),
            RawInput::Checked(flag) => f64::from(u8::from(*flag)),
        }),
        TypeTag::Boolean => Value::Boolean(match raw {
            RawInput::Checked(flag) => *flag,
            RawInput::Text(text) => text.to_lowercase() == "true" || text.is_empty(),
        }),
        TypeTag::Null => Value::Null,
        TypeTag::Undefined => Value::Undefined,
        TypeTag::Object => parse_object(&raw.to_value().to_js_string()),
        TypeTag::String => Value::String(raw.to_value().to_js_string()),
    }
}

fn parse_object(text: &str) -> Value {
    match serde_json::from_str::<Json>(text) {
        Ok(json @ (Json::Object(_) | Json::Array(_))) => Value::Structured(json),
        Ok(_) => {
            error!("Invalid JSON for object: {text} is not an object or array");
            Value::empty_object()
        }
        Err(err) => {
            error!("Invalid JSON for object: {text} ({err})");
            Value::empty_object()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> RawInput {
        RawInput::Text(value.to_owned())
    }

    #[test]
    fn tags_parse_case_insensitively() {
        assert_eq!(TypeTag::from_tag("Number"), TypeTag::Number);
        assert_eq!(TypeTag::from_tag("BOOLEAN"), TypeTag::Boolean);
        assert_eq!(TypeTag::from_tag("date"), TypeTag::String);
    }

    #[test]
    fn every_tag_yields_its_type() {
        let inputs = [
            text(""),
            text("12"),
            text("true"),
            text("{\"a\":1}"),
            text("not json"),
            text("7"),
            RawInput::Checked(true),
            RawInput::Checked(false),
        ];
        for raw in &inputs {
            assert!(matches!(coerce(raw, TypeTag::Number), Value::Number(_)));
            assert!(matches!(coerce(raw, TypeTag::Boolean), Value::Boolean(_)));
            assert!(matches!(coerce(raw, TypeTag::Null), Value::Null));
            assert!(matches!(coerce(raw, TypeTag::Undefined), Value::Undefined));
            assert!(matches!(coerce(raw, TypeTag::Object), Value::Structured(_)));
            assert!(matches!(coerce(raw, TypeTag::String), Value::String(_)));
        }
    }

    #[test]
    fn specific_conversions() {
        assert_eq!(coerce(&text("12"), TypeTag::Number), Value::Number(12.0));
        assert!(coerce(&text("abc"), TypeTag::Number).to_number().is_nan());
        assert_eq!(coerce(&RawInput::Checked(true), TypeTag::Number), Value::Number(1.0));
        assert_eq!(coerce(&text("TRUE"), TypeTag::Boolean), Value::Boolean(true));
        assert_eq!(coerce(&text(""), TypeTag::Boolean), Value::Boolean(true));
        assert_eq!(coerce(&text("yes"), TypeTag::Boolean), Value::Boolean(false));
        assert_eq!(coerce(&RawInput::Checked(false), TypeTag::String), Value::from("false"));
        assert_eq!(coerce(&text("bad"), TypeTag::Object), Value::empty_object());
        assert_eq!(
            coerce(&text("[1,2]"), TypeTag::Object).to_js_string(),
            "1,2"
        );
    }
}
