//! Value model helpers.
//!
//! Needle and haystack documents are plain `serde_json::Value` trees. JSON
//! arrays decode to `Value::Array` and JSON objects to `Value::Object`, so the
//! list/object distinction survives decoding: `[]` and `{}` are always two
//! different shapes, no matter how empty they are.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::fmt;

/// Numeric strings accepted by the numeric matchers (`gt`, `lt`).
///
/// Optional sign, digits with an optional fraction, an optional exponent,
/// and surrounding whitespace. `inf`, `NaN` and hex literals are rejected.
static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?\s*$")
        .expect("numeric pattern is valid")
});

/// Structural classification of a decoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Null,
    Bool,
    Number,
    String,
    List,
    Object,
}

impl Shape {
    /// Classify a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Shape::Null,
            Value::Bool(_) => Shape::Bool,
            Value::Number(_) => Shape::Number,
            Value::String(_) => Shape::String,
            Value::Array(_) => Shape::List,
            Value::Object(_) => Shape::Object,
        }
    }

    /// Lists and objects are containers, everything else is a scalar.
    #[inline]
    pub fn is_container(self) -> bool {
        matches!(self, Shape::List | Shape::Object)
    }

    /// Get the label for this shape.
    pub fn label(self) -> &'static str {
        match self {
            Shape::Null => "null",
            Shape::Bool => "bool",
            Shape::Number => "number",
            Shape::String => "string",
            Shape::List => "list",
            Shape::Object => "object",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[inline]
pub fn is_list(value: &Value) -> bool {
    value.is_array()
}

#[inline]
pub fn is_object(value: &Value) -> bool {
    value.is_object()
}

/// Type name used in matcher diagnostics.
///
/// Numbers are split into `integer` and `double` so that `variableType`
/// can tell them apart; lists are reported as `array`.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "double",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Look up a plain key in a haystack container.
///
/// Objects are looked up by key presence (a present `null` is found). Lists
/// and scalars have no plain keys; list elements are only reachable through
/// `key[idx]` and `[idx]` keys.
pub fn lookup<'a>(haystack: &'a Value, key: &str) -> Option<&'a Value> {
    match haystack {
        Value::Object(map) => map.get(key),
        _ => None,
    }
}

/// Check whether a string is numeric (see [`NUMERIC`]).
pub fn is_numeric_str(s: &str) -> bool {
    NUMERIC.is_match(s)
}

/// Numeric view of a value: JSON numbers and numeric strings.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Parse a numeric string.
pub fn parse_number(s: &str) -> Option<f64> {
    if is_numeric_str(s) {
        s.trim().parse().ok()
    } else {
        None
    }
}

/// Text a scalar coerces to: strings verbatim, numbers and booleans as
/// their JSON text. Containers and `null` have no text form.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Pretty-printed JSON, used in failure reports.
pub fn render(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Single-line JSON, used inside messages.
pub fn render_inline(value: &Value) -> String {
    value.to_string()
}
