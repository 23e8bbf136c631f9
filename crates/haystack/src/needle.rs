//! Compiled needles.
//!
//! A needle document is resolved once into a tree of instructions: which
//! object keys are positional (`key[idx]`) and which strings are matcher
//! calls (`@name(args)`). Comparing then walks the instruction tree instead
//! of re-parsing key and string conventions for every haystack.

use crate::registry::MatcherRegistry;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};

static MATCHER_CALL: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^@([a-zA-Z0-9]+)\((.*)\)$").expect("matcher call pattern is valid")
});

static INDEXED_KEY: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^(.*?)\[(\d+)\]$").expect("indexed key pattern is valid")
});

/// A `@name(args)` string in a needle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherCall {
    pub name: String,
    pub args: String,
}

impl MatcherCall {
    /// Parse the `@name(args)` syntax. Does not check that `name` is
    /// registered.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = MATCHER_CALL.captures(text)?;
        Some(Self {
            name: caps[1].to_string(),
            args: caps[2].to_string(),
        })
    }

    /// The needle string this call was parsed from.
    pub fn source(&self) -> String {
        format!("@{}({})", self.name, self.args)
    }
}

/// How a needle object key addresses the haystack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NeedleKey {
    /// Look the key up in the haystack object.
    Plain(String),
    /// `key[index]`: `key` must hold a list; compare against one position.
    /// An empty `key` addresses the haystack itself.
    Indexed { key: String, index: usize },
}

impl NeedleKey {
    pub fn parse(raw: &str) -> Self {
        match INDEXED_KEY.captures(raw) {
            Some(caps) => NeedleKey::Indexed {
                key: caps[1].to_string(),
                // Digits too long for usize can never be in range.
                index: caps[2].parse().unwrap_or(usize::MAX),
            },
            None => NeedleKey::Plain(raw.to_string()),
        }
    }
}

/// One entry of a needle object.
#[derive(Debug, Clone, PartialEq)]
pub struct NeedleEntry {
    /// Key as written in the needle document.
    pub raw_key: String,
    pub key: NeedleKey,
    pub value: Needle,
}

/// Compiled needle node.
#[derive(Debug, Clone, PartialEq)]
pub enum Needle {
    /// Scalar compared by strict equality.
    Literal(Value),
    /// Scalar position handled by a registered matcher.
    MatcherCall(MatcherCall),
    /// Unordered containment over a haystack list.
    List(Vec<Needle>),
    /// Key-by-key containment.
    Object(Vec<NeedleEntry>),
}

impl Needle {
    /// Compile a needle document against a registry.
    ///
    /// A string becomes a [`Needle::MatcherCall`] only when it has the
    /// `@name(args)` form AND `name` is registered; anything else stays a
    /// literal, so strings that merely look like matcher calls still compare
    /// by equality. There is no escape for a literal string shaped like a
    /// call to a registered matcher.
    pub fn compile(value: &Value, registry: &MatcherRegistry) -> Self {
        match value {
            Value::Array(items) => Needle::List(
                items
                    .iter()
                    .map(|item| Self::compile(item, registry))
                    .collect(),
            ),
            Value::Object(map) => Needle::Object(
                map.iter()
                    .map(|(raw_key, item)| NeedleEntry {
                        raw_key: raw_key.clone(),
                        key: NeedleKey::parse(raw_key),
                        value: Self::compile(item, registry),
                    })
                    .collect(),
            ),
            Value::String(text) => match MatcherCall::parse(text) {
                Some(call) if registry.contains(&call.name) => Needle::MatcherCall(call),
                _ => Needle::Literal(value.clone()),
            },
            _ => Needle::Literal(value.clone()),
        }
    }

    /// Lists and objects recurse; literals and matcher calls do not.
    pub fn is_container(&self) -> bool {
        matches!(self, Needle::List(_) | Needle::Object(_))
    }

    /// Rebuild the needle document, used for failure reports.
    pub fn to_value(&self) -> Value {
        match self {
            Needle::Literal(value) => value.clone(),
            Needle::MatcherCall(call) => Value::String(call.source()),
            Needle::List(items) => Value::Array(items.iter().map(Needle::to_value).collect()),
            Needle::Object(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for entry in entries {
                    map.insert(entry.raw_key.clone(), entry.value.to_value());
                }
                Value::Object(map)
            }
        }
    }
}
