//! `@variableType(...)` matcher.

use crate::comparator::Comparator;
use crate::error::MatcherError;
use crate::registry::Matcher;
use crate::value::type_name;
use serde_json::Value;

/// A type name accepted by `variableType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Integer,
    Double,
    Boolean,
    String,
    Array,
    Object,
    Null,
    Scalar,
    Any,
}

impl TypeName {
    /// Parse a type name. Case-insensitive; `int`, `bool` and `float` are
    /// aliases of `integer`, `boolean` and `double`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Some(TypeName::Integer),
            "float" | "double" => Some(TypeName::Double),
            "bool" | "boolean" => Some(TypeName::Boolean),
            "string" => Some(TypeName::String),
            "array" => Some(TypeName::Array),
            "object" => Some(TypeName::Object),
            "null" => Some(TypeName::Null),
            "scalar" => Some(TypeName::Scalar),
            "any" => Some(TypeName::Any),
            _ => None,
        }
    }

    pub fn accepts(self, value: &Value) -> bool {
        match self {
            TypeName::Integer => value.is_i64() || value.is_u64(),
            TypeName::Double => value.is_f64(),
            TypeName::Boolean => value.is_boolean(),
            TypeName::String => value.is_string(),
            TypeName::Array => value.is_array(),
            TypeName::Object => value.is_object(),
            TypeName::Null => value.is_null(),
            TypeName::Scalar => !value.is_array() && !value.is_object(),
            TypeName::Any => true,
        }
    }
}

/// `@variableType(spec)`: the value has one of the `|`-separated types in
/// `spec`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableType;

impl Matcher for VariableType {
    fn invoke(&self, _: &Comparator, actual: &Value, args: &str) -> Result<(), MatcherError> {
        let types = args
            .split('|')
            .map(|name| {
                TypeName::parse(name)
                    .ok_or_else(|| MatcherError::UnsupportedType(name.trim().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if types.iter().any(|ty| ty.accepts(actual)) {
            Ok(())
        } else {
            Err(MatcherError::TypeMismatch {
                expected: args.trim().to_string(),
                actual: type_name(actual),
            })
        }
    }
}
