//! Structural containment comparator.
//!
//! `compare(needle, haystack)` succeeds when every key and list element the
//! needle specifies is present in the haystack and matches, recursively.
//! Extra haystack keys and list elements are ignored.
//!
//! - Objects are matched key by key. `key[n]` keys address position `n` of the
//!   list stored under `key`; `[n]` addresses the haystack itself.
//! - Lists are matched without regard to order: each needle element must be
//!   satisfied by at least one haystack element. Several needle elements may
//!   be satisfied by the same haystack element.
//! - Scalars compare by strict equality, or through a registered matcher when
//!   the needle string is a `@name(args)` call.
//!
//! The first failure aborts the comparison. The only place failures are
//! absorbed is the candidate search of unordered list containment, where a
//! candidate that fails to match is simply skipped.

use crate::error::{
    CompareJsonError, ComparisonError, Document, ErrorKind, MatcherError, UnknownMatcher,
};
use crate::matchers::{self, JwtTokenStore};
use crate::needle::{MatcherCall, Needle, NeedleEntry, NeedleKey};
use crate::registry::{Matcher, MatcherRegistry};
use crate::value::{lookup, render_inline, Shape};
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Outcome of comparing one scalar needle against one haystack value.
enum Verdict {
    Equal,
    NotEqual,
    Rejected(MatcherCall, MatcherError),
    Unknown(UnknownMatcher),
}

/// Where a scalar comparison happened, for failure messages.
#[derive(Clone, Copy)]
enum Position<'a> {
    Key(&'a str),
    Index(usize),
}

impl Position<'_> {
    fn describe(self) -> String {
        match self {
            Position::Key(key) => format!("key \"{key}\""),
            Position::Index(index) => format!("index \"{index}\" in haystack list"),
        }
    }
}

/// Containment comparator with its matcher registry.
#[derive(Debug, Default)]
pub struct Comparator {
    registry: MatcherRegistry,
}

impl Comparator {
    /// Comparator with an empty registry: every needle string is a literal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Comparator with the built-in matchers registered and an empty JWT
    /// token store.
    pub fn with_default_matchers() -> Self {
        Self::with_jwt_tokens(JwtTokenStore::new())
    }

    /// Comparator with the built-in matchers registered; the `jwt` matcher
    /// resolves token names through `tokens`.
    pub fn with_jwt_tokens(tokens: JwtTokenStore) -> Self {
        let mut registry = MatcherRegistry::new();
        matchers::register_defaults(&mut registry, tokens);
        Self { registry }
    }

    pub fn from_registry(registry: MatcherRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &MatcherRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut MatcherRegistry {
        &mut self.registry
    }

    /// Register a matcher, replacing any matcher with the same name.
    pub fn register(&mut self, name: impl Into<String>, matcher: impl Matcher + 'static) {
        self.registry.register(name, matcher);
    }

    pub fn lookup(&self, name: &str) -> Result<&dyn Matcher, UnknownMatcher> {
        self.registry.lookup(name)
    }

    /// Compile a needle against the current registry.
    pub fn compile(&self, needle: &Value) -> Needle {
        Needle::compile(needle, &self.registry)
    }

    /// Check that `haystack` contains `needle`.
    pub fn compare(&self, needle: &Value, haystack: &Value) -> Result<(), ComparisonError> {
        self.compare_compiled(&self.compile(needle), haystack)
    }

    /// Check a pre-compiled needle against `haystack`.
    pub fn compare_compiled(
        &self,
        needle: &Needle,
        haystack: &Value,
    ) -> Result<(), ComparisonError> {
        self.compare_node(needle, haystack).inspect_err(|err| {
            debug!(
                kind = %err.kind(),
                path = %err.path_string(),
                "needle not contained in haystack"
            );
        })
    }

    /// Decode two JSON documents and check containment.
    pub fn compare_json(&self, needle: &str, haystack: &str) -> Result<(), CompareJsonError> {
        let needle: Value =
            serde_json::from_str(needle).map_err(|source| CompareJsonError::Decode {
                document: Document::Needle,
                source,
            })?;
        let haystack: Value =
            serde_json::from_str(haystack).map_err(|source| CompareJsonError::Decode {
                document: Document::Haystack,
                source,
            })?;
        Ok(self.compare(&needle, &haystack)?)
    }

    /// Compare a single needle value against a haystack value.
    ///
    /// Scalars compare by strict equality (no coercion between numbers,
    /// strings and booleans) unless the needle is a call to a registered
    /// matcher. Returns `Ok(false)` on a plain mismatch and an error when a
    /// matcher rejects the value. Containers are checked for containment.
    pub fn compare_value(&self, needle: &Value, haystack: &Value) -> Result<bool, ComparisonError> {
        let needle = self.compile(needle);
        if needle.is_container() {
            return self.compare_node(&needle, haystack).map(|()| true);
        }
        match self.judge(&needle, haystack) {
            Verdict::Equal => Ok(true),
            Verdict::NotEqual => Ok(false),
            Verdict::Rejected(call, err) => Err(matcher_failed(&call, err, None, haystack)),
            Verdict::Unknown(err) => Err(unknown_matcher(&needle, err, haystack)),
        }
    }

    fn judge(&self, needle: &Needle, haystack: &Value) -> Verdict {
        match needle {
            Needle::MatcherCall(call) => {
                let matcher = match self.registry.lookup(&call.name) {
                    Ok(matcher) => matcher,
                    Err(err) => return Verdict::Unknown(err),
                };
                trace!(matcher = %call.name, args = %call.args, "invoking matcher");
                match matcher.invoke(self, haystack, &call.args) {
                    Ok(()) => Verdict::Equal,
                    Err(err) => Verdict::Rejected(call.clone(), err),
                }
            }
            Needle::Literal(expected) if expected == haystack => Verdict::Equal,
            _ => Verdict::NotEqual,
        }
    }

    fn compare_node(&self, needle: &Needle, haystack: &Value) -> Result<(), ComparisonError> {
        match needle {
            Needle::List(items) => match haystack {
                Value::Array(list) => self.in_list(items, list, haystack),
                _ => Err(ComparisonError::new(
                    ErrorKind::TypeMismatch,
                    "The needle is a list, while the haystack is not.",
                    needle.to_value(),
                    haystack.clone(),
                )),
            },
            Needle::Object(entries) => {
                let shape = Shape::of(haystack);
                if !shape.is_container() {
                    return Err(ComparisonError::new(
                        ErrorKind::TypeMismatch,
                        format!("The needle is an object, while the haystack is a {shape}."),
                        needle.to_value(),
                        haystack.clone(),
                    ));
                }
                entries
                    .iter()
                    .try_for_each(|entry| self.compare_entry(entry, haystack))
            }
            scalar => match self.judge(scalar, haystack) {
                Verdict::Equal => Ok(()),
                Verdict::NotEqual => Err(ComparisonError::new(
                    ErrorKind::ValueMismatch,
                    "Value mismatch.",
                    scalar.to_value(),
                    haystack.clone(),
                )),
                Verdict::Rejected(call, err) => Err(matcher_failed(&call, err, None, haystack)),
                Verdict::Unknown(err) => Err(unknown_matcher(scalar, err, haystack)),
            },
        }
    }

    fn compare_entry(&self, entry: &NeedleEntry, haystack: &Value) -> Result<(), ComparisonError> {
        match &entry.key {
            NeedleKey::Indexed { key, index } => {
                let holder = if key.is_empty() {
                    haystack
                } else {
                    lookup(haystack, key).ok_or_else(|| missing_key(key, entry, haystack))?
                };

                let result = match holder {
                    Value::Array(list) => match list.get(*index) {
                        Some(item) => self
                            .compare_at(&entry.value, item, Position::Index(*index))
                            .map_err(|err| err.under_index(*index)),
                        None => Err(ComparisonError::new(
                            ErrorKind::IndexOutOfRange,
                            format!(
                                "The index \"{index}\" does not exist in the haystack list \
                                 (length: {}).",
                                list.len()
                            ),
                            entry.value.to_value(),
                            holder.clone(),
                        )),
                    },
                    _ if key.is_empty() => Err(ComparisonError::new(
                        ErrorKind::NotAList,
                        "The haystack is not a list.",
                        entry_fragment(entry),
                        holder.clone(),
                    )),
                    _ => Err(ComparisonError::new(
                        ErrorKind::NotAList,
                        format!("The element at key \"{key}\" in the haystack object is not a list."),
                        entry_fragment(entry),
                        holder.clone(),
                    )),
                };

                if key.is_empty() {
                    result
                } else {
                    result.map_err(|err| err.under_key(key))
                }
            }
            NeedleKey::Plain(key) => {
                let item =
                    lookup(haystack, key).ok_or_else(|| missing_key(key, entry, haystack))?;

                let shape = Shape::of(item);
                if entry.value.is_container() && !shape.is_container() {
                    return Err(ComparisonError::new(
                        ErrorKind::TypeMismatch,
                        format!(
                            "The element at key \"{key}\" in the haystack is a {shape}, \
                             expected a list or an object."
                        ),
                        entry.value.to_value(),
                        item.clone(),
                    )
                    .under_key(key));
                }

                self.compare_at(&entry.value, item, Position::Key(key))
                    .map_err(|err| err.under_key(key))
            }
        }
    }

    /// Compare a needle node found at `position` against the matching
    /// haystack value.
    fn compare_at(
        &self,
        needle: &Needle,
        haystack: &Value,
        position: Position<'_>,
    ) -> Result<(), ComparisonError> {
        if needle.is_container() {
            return self.compare_node(needle, haystack);
        }
        match self.judge(needle, haystack) {
            Verdict::Equal => Ok(()),
            Verdict::NotEqual => Err(ComparisonError::new(
                ErrorKind::ValueMismatch,
                format!("Value mismatch for {}.", position.describe()),
                needle.to_value(),
                haystack.clone(),
            )),
            Verdict::Rejected(call, err) => {
                Err(matcher_failed(&call, err, Some(position), haystack))
            }
            Verdict::Unknown(err) => Err(unknown_matcher(needle, err, haystack)),
        }
    }

    /// Unordered containment of `items` in `list`.
    fn in_list(
        &self,
        items: &[Needle],
        list: &[Value],
        haystack: &Value,
    ) -> Result<(), ComparisonError> {
        for item in items {
            match item {
                Needle::List(_) => {
                    let candidates: Vec<&Value> = list.iter().filter(|v| v.is_array()).collect();
                    if candidates.is_empty() {
                        return Err(ComparisonError::new(
                            ErrorKind::NoListElements,
                            "The haystack does not contain any list elements, so the needle \
                             can't be found.",
                            item.to_value(),
                            haystack.clone(),
                        ));
                    }
                    if !candidates.iter().any(|c| self.try_compare(item, c).is_none()) {
                        return Err(ComparisonError::new(
                            ErrorKind::ElementNotFound,
                            "The list in the needle was not found in the list elements of the \
                             haystack.",
                            item.to_value(),
                            haystack.clone(),
                        ));
                    }
                }
                Needle::Object(_) => {
                    let candidates: Vec<&Value> =
                        list.iter().filter(|v| v.is_object()).collect();
                    if candidates.is_empty() {
                        return Err(ComparisonError::new(
                            ErrorKind::NoObjectElements,
                            "The haystack does not contain any object elements, so the needle \
                             can't be found.",
                            item.to_value(),
                            haystack.clone(),
                        ));
                    }
                    if !candidates.iter().any(|c| self.try_compare(item, c).is_none()) {
                        return Err(ComparisonError::new(
                            ErrorKind::ElementNotFound,
                            "The object in the needle was not found in the object elements of \
                             the haystack.",
                            item.to_value(),
                            haystack.clone(),
                        ));
                    }
                }
                scalar => {
                    let mut found = false;
                    for candidate in list {
                        match self.judge(scalar, candidate) {
                            Verdict::Equal => {
                                found = true;
                                break;
                            }
                            Verdict::NotEqual => {}
                            Verdict::Rejected(call, err) => {
                                trace!(matcher = %call.name, error = %err, "candidate rejected");
                            }
                            Verdict::Unknown(err) => {
                                return Err(unknown_matcher(scalar, err, haystack));
                            }
                        }
                    }
                    if !found {
                        return Err(ComparisonError::new(
                            ErrorKind::ElementNotFound,
                            format!(
                                "The value {} was not found in the haystack list.",
                                render_inline(&scalar.to_value())
                            ),
                            scalar.to_value(),
                            haystack.clone(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Probe one candidate during list containment. Failures are returned
    /// instead of propagated so the search can move on to the next
    /// candidate.
    fn try_compare(&self, needle: &Needle, candidate: &Value) -> Option<ComparisonError> {
        match self.compare_node(needle, candidate) {
            Ok(()) => None,
            Err(err) => {
                trace!(kind = %err.kind(), error = %err.message(), "candidate rejected");
                Some(err)
            }
        }
    }
}

/// The needle object reduced to a single entry.
fn entry_fragment(entry: &NeedleEntry) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(entry.raw_key.clone(), entry.value.to_value());
    Value::Object(map)
}

fn missing_key(key: &str, entry: &NeedleEntry, haystack: &Value) -> ComparisonError {
    let message = if haystack.is_array() {
        format!(
            "Haystack list has no \"{key}\" key; list elements are addressed as \"[idx]\"."
        )
    } else {
        format!("Haystack object is missing the \"{key}\" key.")
    };
    ComparisonError::new(
        ErrorKind::MissingKey,
        message,
        entry_fragment(entry),
        haystack.clone(),
    )
}

fn matcher_failed(
    call: &MatcherCall,
    err: MatcherError,
    position: Option<Position<'_>>,
    haystack: &Value,
) -> ComparisonError {
    let message = match position {
        Some(position) => format!(
            "Matcher \"{}\" failed for {}: {err}",
            call.name,
            position.describe()
        ),
        None => format!("Matcher \"{}\" failed: {err}", call.name),
    };
    ComparisonError::new(
        ErrorKind::MatcherFailed,
        message,
        Value::String(call.source()),
        haystack.clone(),
    )
    .with_cause(err)
}

fn unknown_matcher(needle: &Needle, err: UnknownMatcher, haystack: &Value) -> ComparisonError {
    ComparisonError::new(
        ErrorKind::UnknownMatcher,
        err.to_string(),
        needle.to_value(),
        haystack.clone(),
    )
}
