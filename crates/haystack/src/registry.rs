//! Named matcher registry.
//!
//! Matchers are looked up by name when a needle string has the form
//! `@name(args)`. The registry owns its matchers; registering a second matcher
//! under an existing name replaces the first.

use crate::comparator::Comparator;
use crate::error::{MatcherError, UnknownMatcher};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// A named predicate over a haystack value.
///
/// `args` is the raw text between the parentheses of the matcher call. The
/// comparator is passed in so that matchers can run nested containment checks
/// with the same registry (the `jwt` matcher does).
pub trait Matcher: Send + Sync {
    fn invoke(
        &self,
        comparator: &Comparator,
        actual: &Value,
        args: &str,
    ) -> Result<(), MatcherError>;
}

impl<F> Matcher for F
where
    F: Fn(&Value, &str) -> Result<(), MatcherError> + Send + Sync,
{
    fn invoke(
        &self,
        _comparator: &Comparator,
        actual: &Value,
        args: &str,
    ) -> Result<(), MatcherError> {
        self(actual, args)
    }
}

/// Mapping from matcher name to matcher.
///
/// Populate it before comparing; `register` takes `&mut self`, so a registry
/// shared across threads behind `&` is read-only by construction.
#[derive(Default)]
pub struct MatcherRegistry {
    matchers: HashMap<String, Box<dyn Matcher>>,
}

impl MatcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a matcher, replacing any matcher already registered under
    /// `name`.
    pub fn register(&mut self, name: impl Into<String>, matcher: impl Matcher + 'static) {
        let name = name.into();
        if self.matchers.insert(name.clone(), Box::new(matcher)).is_some() {
            debug!(matcher = %name, "replaced matcher");
        } else {
            debug!(matcher = %name, "registered matcher");
        }
    }

    /// Look up a matcher by name.
    pub fn lookup(&self, name: &str) -> Result<&dyn Matcher, UnknownMatcher> {
        self.matchers
            .get(name)
            .map(|matcher| matcher.as_ref())
            .ok_or_else(|| UnknownMatcher {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.matchers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.matchers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl fmt::Debug for MatcherRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherRegistry")
            .field("matchers", &self.names())
            .finish()
    }
}
