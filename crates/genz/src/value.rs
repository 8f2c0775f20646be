//! Dynamically typed values held by the store and produced by expressions.
//!
//! Conversions follow script-language rules so that markup written for a
//! browser behaves the same here.

use core::cmp::Ordering;
use core::fmt::{self, Display, Formatter};
use serde_json::{Map, Number, Value as Json};

/// A store or expression value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// The absent value.
    #[default]
    Undefined,
    /// The `null` value.
    Null,
    /// A boolean primitive.
    Boolean(bool),
    /// A number (IEEE 754 double precision).
    Number(f64),
    /// A string value (UTF-8).
    String(String),
    /// An object or array.
    Structured(Json),
}

impl Value {
    /// Convert parsed JSON, mapping scalars onto the primitive variants.
    pub fn from_json(json: Json) -> Self {
        match json {
            Json::Null => Self::Null,
            Json::Bool(flag) => Self::Boolean(flag),
            Json::Number(number) => Self::Number(number.as_f64().unwrap_or(f64::NAN)),
            Json::String(text) => Self::String(text),
            Json::Array(_) | Json::Object(_) => Self::Structured(json),
        }
    }

    /// An empty object.
    pub fn empty_object() -> Self {
        Self::Structured(Json::Object(Map::new()))
    }

    /// JSON form of the value. `undefined` and non-finite numbers become `null`.
    pub fn to_json(&self) -> Json {
        match self {
            Self::Undefined | Self::Null => Json::Null,
            Self::Boolean(flag) => Json::Bool(*flag),
            Self::Number(number) => Number::from_f64(*number).map_or(Json::Null, |finite| {
                if number.fract() == 0.0 && number.abs() < 9.007_199_254_740_992e15 {
                    Json::from(*number as i64)
                } else {
                    Json::Number(finite)
                }
            }),
            Self::String(text) => Json::String(text.clone()),
            Self::Structured(json) => json.clone(),
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// Script truthiness.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Boolean(flag) => *flag,
            Self::Number(number) => *number != 0.0 && !number.is_nan(),
            Self::String(text) => !text.is_empty(),
            Self::Structured(_) => true,
        }
    }

    /// Result of the `typeof` operator.
    pub fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null | Self::Structured(_) => "object",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
        }
    }

    /// Script number conversion.
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Undefined => f64::NAN,
            Self::Null => 0.0,
            Self::Boolean(flag) => f64::from(u8::from(*flag)),
            Self::Number(number) => *number,
            Self::String(text) => string_to_number(text),
            Self::Structured(_) => string_to_number(&self.to_js_string()),
        }
    }

    /// Script string conversion (`String(value)`).
    pub fn to_js_string(&self) -> String {
        match self {
            Self::Undefined => String::from("undefined"),
            Self::Null => String::from("null"),
            Self::Boolean(flag) => flag.to_string(),
            Self::Number(number) => number_to_string(*number),
            Self::String(text) => text.clone(),
            Self::Structured(json) => json_to_js_string(json),
        }
    }

    /// Text written into the document for this value: nullish values are
    /// empty, structured values are indented JSON.
    pub fn display_text(&self) -> String {
        match self {
            Self::Undefined | Self::Null => String::new(),
            Self::Structured(json) => {
                serde_json::to_string_pretty(json).unwrap_or_else(|_| self.to_js_string())
            }
            Self::Boolean(_) | Self::Number(_) | Self::String(_) => self.to_js_string(),
        }
    }

    /// Read a property. `None` when the base is `null` or `undefined`;
    /// missing properties are `Undefined`.
    pub fn property(&self, key: &str) -> Option<Self> {
        let found = match self {
            Self::Undefined | Self::Null => return None,
            Self::Boolean(_) | Self::Number(_) => Self::Undefined,
            Self::String(text) => {
                let units: Vec<u16> = text.encode_utf16().collect();
                if key == "length" {
                    Self::Number(units.len() as f64)
                } else {
                    array_index(key)
                        .and_then(|index| units.get(index))
                        .map_or(Self::Undefined, |unit| {
                            Self::String(String::from_utf16_lossy(&[*unit]))
                        })
                }
            }
            Self::Structured(Json::Array(items)) => {
                if key == "length" {
                    Self::Number(items.len() as f64)
                } else {
                    array_index(key)
                        .and_then(|index| items.get(index))
                        .map_or(Self::Undefined, |item| Self::from_json(item.clone()))
                }
            }
            Self::Structured(Json::Object(map)) => map
                .get(key)
                .map_or(Self::Undefined, |item| Self::from_json(item.clone())),
            Self::Structured(other) => Self::from_json(other.clone()).property(key)?,
        };
        Some(found)
    }

    /// Strict equality (`===`). Objects and arrays compare structurally.
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Boolean(left), Self::Boolean(right)) => left == right,
            (Self::Number(left), Self::Number(right)) => left == right,
            (Self::String(left), Self::String(right)) => left == right,
            (Self::Structured(left), Self::Structured(right)) => left == right,
            _ => false,
        }
    }

    /// Loose equality (`==`).
    pub fn loose_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (left, right) if left.is_nullish() && right.is_nullish() => true,
            (left, right) if left.is_nullish() || right.is_nullish() => false,
            (Self::Number(_), Self::String(_)) | (Self::String(_), Self::Number(_)) => {
                self.to_number() == other.to_number()
            }
            (Self::Boolean(_), _) => Self::Number(self.to_number()).loose_eq(other),
            (_, Self::Boolean(_)) => self.loose_eq(&Self::Number(other.to_number())),
            (Self::Structured(_), Self::Number(_) | Self::String(_)) => {
                Self::String(self.to_js_string()).loose_eq(other)
            }
            (Self::Number(_) | Self::String(_), Self::Structured(_)) => {
                self.loose_eq(&Self::String(other.to_js_string()))
            }
            _ => self.strict_eq(other),
        }
    }

    /// Relational comparison (`<` and friends). `None` when either side is NaN.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        let left = self.to_primitive();
        let right = other.to_primitive();
        if let (Self::String(left), Self::String(right)) = (&left, &right) {
            return Some(left.encode_utf16().cmp(right.encode_utf16()));
        }
        left.to_number().partial_cmp(&right.to_number())
    }

    /// Objects and arrays collapse to their string form.
    pub fn to_primitive(&self) -> Self {
        match self {
            Self::Structured(_) => Self::String(self.to_js_string()),
            Self::Undefined | Self::Null | Self::Boolean(_) | Self::Number(_) | Self::String(_) => {
                self.clone()
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(left), Self::Number(right)) if left.is_nan() && right.is_nan() => true,
            _ => self.strict_eq(other),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_js_string())
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Boolean(flag)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Self::Number(f64::from(number))
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::String(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::String(text)
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        Self::from_json(json)
    }
}

fn array_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    key.parse().ok()
}

fn json_to_js_string(json: &Json) -> String {
    match json {
        Json::Array(items) => items
            .iter()
            .map(|item| match item {
                Json::Null => String::new(),
                other => json_to_js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Json::Object(_) => String::from("[object Object]"),
        scalar => Value::from_json(scalar.clone()).to_js_string(),
    }
}

/// Format a number the way `String(number)` does.
pub fn number_to_string(number: f64) -> String {
    if number.is_nan() {
        return String::from("NaN");
    }
    if number.is_infinite() {
        return String::from(if number > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if number == 0.0 {
        return String::from("0");
    }
    let sign = if number < 0.0 { "-" } else { "" };
    // Shortest round-trip digits in `d.ddde±x` form.
    let scientific = format!("{:e}", number.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return format!("{sign}{}", number.abs());
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let Ok(exponent) = exponent.parse::<i64>() else {
        return format!("{sign}{}", number.abs());
    };
    let count = digits.len() as i64;
    let point = exponent + 1;

    let body = if count <= point && point <= 21 {
        format!("{digits}{}", "0".repeat((point - count) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{int}.{frac}")
    } else if -6 < point && point <= 0 {
        format!("0.{}{digits}", "0".repeat((-point) as usize))
    } else {
        let (lead, rest) = digits.split_at(1);
        let exp_sign = if point - 1 < 0 { '-' } else { '+' };
        let dot = if rest.is_empty() { "" } else { "." };
        format!("{lead}{dot}{rest}e{exp_sign}{}", (point - 1).abs())
    };
    format!("{sign}{body}")
}

/// Parse text the way `Number(text)` does; invalid text is NaN.
pub fn string_to_number(text: &str) -> f64 {
    let trimmed = text.trim_matches(|ch: char| ch.is_whitespace() || ch == '\u{feff}');
    if trimmed.is_empty() {
        return 0.0;
    }
    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix(trimmed.get(2..).unwrap_or_default(), radix);
    }
    let unsigned = trimmed
        .strip_prefix('+')
        .or_else(|| trimmed.strip_prefix('-'))
        .unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    if !is_decimal_literal(unsigned) {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut acc = 0.0_f64;
    for ch in digits.chars() {
        let Some(digit) = ch.to_digit(radix) else {
            return f64::NAN;
        };
        acc = acc.mul_add(f64::from(radix), f64::from(digit));
    }
    acc
}

/// `digits [. digits] [e [+-] digits]` or `. digits [e ...]`, no sign.
fn is_decimal_literal(text: &str) -> bool {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(at) => (&text[..at], Some(&text[at + 1..])),
        None => (text, None),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
    if int.is_empty() && frac.is_empty() {
        return false;
    }
    if !all_digits(int) || !all_digits(frac) {
        return false;
    }
    match exponent {
        None => true,
        Some(exp) => {
            let exp = exp
                .strip_prefix('+')
                .or_else(|| exp.strip_prefix('-'))
                .unwrap_or(exp);
            !exp.is_empty() && all_digits(exp)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_print_like_script() {
        assert_eq!(number_to_string(5.0), "5");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(number_to_string(1.5e-7), "1.5e-7");
        assert_eq!(number_to_string(0.000_001), "0.000001");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(123_456_789_012.0), "123456789012");
        assert_eq!(number_to_string(-2.5), "-2.5");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn strings_parse_like_script() {
        assert_eq!(string_to_number("  42 "), 42.0);
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("0x1F"), 31.0);
        assert_eq!(string_to_number("0b101"), 5.0);
        assert_eq!(string_to_number(".5"), 0.5);
        assert_eq!(string_to_number("-1e3"), -1000.0);
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert!(string_to_number("inf").is_nan());
        assert!(string_to_number("12px").is_nan());
        assert!(string_to_number("1_000").is_nan());
        assert!(string_to_number("-0x10").is_nan());
    }

    #[test]
    fn structured_values_stringify() {
        let list = Value::from_json(json!([1, "a", null]));
        assert_eq!(list.to_js_string(), "1,a,");
        let object = Value::from_json(json!({"a": 1}));
        assert_eq!(object.to_js_string(), "[object Object]");
        assert_eq!(object.display_text(), "{\n  \"a\": 1\n}");
        assert_eq!(Value::Null.display_text(), "");
        assert!(Value::from_json(json!([])).to_number() == 0.0);
    }

    #[test]
    fn loose_and_strict_equality() {
        assert!(Value::Null.loose_eq(&Value::Undefined));
        assert!(!Value::Null.strict_eq(&Value::Undefined));
        assert!(Value::from(1).loose_eq(&Value::from("1")));
        assert!(Value::from(true).loose_eq(&Value::from(1)));
        assert!(!Value::Null.loose_eq(&Value::from(0)));
        assert!(!Value::Number(f64::NAN).strict_eq(&Value::Number(f64::NAN)));
    }

    #[test]
    fn property_reads() {
        let user = Value::from_json(json!({"name": "Ada", "tags": ["x", "y"]}));
        assert_eq!(user.property("name"), Some(Value::from("Ada")));
        assert_eq!(user.property("missing"), Some(Value::Undefined));
        let tags = user.property("tags").unwrap_or_default();
        assert_eq!(tags.property("length"), Some(Value::from(2)));
        assert_eq!(tags.property("1"), Some(Value::from("y")));
        assert_eq!(Value::from("héllo").property("length"), Some(Value::from(5)));
        assert_eq!(Value::Null.property("x"), None);
    }
}
