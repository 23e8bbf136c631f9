//! `@regExp(pattern)` matcher.
//!
//! Patterns are either bare (`^[a-z]+$`) or delimited with trailing flags
//! (`/^[a-z]+$/i`). Supported flags: `i`, `m`, `s`, `x` and `U` map to the
//! inline flags of the same name; `u` is accepted and ignored since patterns
//! are always Unicode-aware.

use crate::comparator::Comparator;
use crate::error::MatcherError;
use crate::registry::Matcher;
use crate::value::{scalar_text, type_name};
use parking_lot::RwLock;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

const DELIMITERS: &[char] = &['/', '#', '~', '!', '%', '|'];

/// Compiled patterns kept per matcher before the cache is flushed.
pub const MAX_CACHED_PATTERNS: usize = 256;

/// Translate a delimited pattern into regex syntax. Returns `None` when
/// `pattern` is not delimited (or carries unknown flags), in which case it is
/// used as-is.
fn translate_delimited(pattern: &str) -> Option<String> {
    let delimiter = pattern.chars().next().filter(|c| DELIMITERS.contains(c))?;
    let end = pattern.rfind(delimiter).filter(|&end| end > 0)?;
    let body = &pattern[delimiter.len_utf8()..end];
    let flags = &pattern[end + delimiter.len_utf8()..];

    let mut inline = String::new();
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' | 'x' | 'U' => inline.push(flag),
            'u' => {}
            _ => return None,
        }
    }

    if inline.is_empty() {
        Some(body.to_string())
    } else {
        Some(format!("(?{inline}){body}"))
    }
}

/// `@regExp(pattern)`: the value's text matches `pattern`.
///
/// Strings match as-is; numbers and booleans match their JSON text. Compiled
/// patterns are cached per matcher instance; the cache is flushed once it
/// holds [`MAX_CACHED_PATTERNS`] entries.
#[derive(Debug, Default)]
pub struct RegExp {
    cache: RwLock<HashMap<String, Arc<Regex>>>,
}

impl RegExp {
    pub fn new() -> Self {
        Self::default()
    }

    fn compile(&self, pattern: &str) -> Result<Arc<Regex>, MatcherError> {
        if let Some(regex) = self.cache.read().get(pattern) {
            return Ok(Arc::clone(regex));
        }

        let source = translate_delimited(pattern).unwrap_or_else(|| pattern.to_string());
        let regex = Regex::new(&source).map_err(|source| MatcherError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let regex = Arc::new(regex);
        let mut cache = self.cache.write();
        if cache.len() >= MAX_CACHED_PATTERNS {
            debug!(patterns = cache.len(), "flushing regExp pattern cache");
            cache.clear();
        }
        cache.insert(pattern.to_string(), Arc::clone(&regex));
        Ok(regex)
    }
}

impl Matcher for RegExp {
    fn invoke(&self, _: &Comparator, actual: &Value, args: &str) -> Result<(), MatcherError> {
        let subject = scalar_text(actual).ok_or(MatcherError::NotCoercible(type_name(actual)))?;
        let regex = self.compile(args)?;
        if regex.is_match(&subject) {
            Ok(())
        } else {
            Err(MatcherError::NoMatch {
                subject,
                pattern: args.to_string(),
            })
        }
    }
}
