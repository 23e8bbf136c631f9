//! Test world containing shared state for cucumber tests

use cucumber::World;
use haystack::{Comparator, ComparisonError, ErrorKind, JwtTokenStore};
use serde_json::Value;

/// The test world: one comparator plus the documents of the current scenario.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct ComparatorWorld {
    /// Comparator under test
    pub comparator: Comparator,

    /// Tokens visible to the `jwt` matcher of `comparator`
    pub tokens: JwtTokenStore,

    pub needle: Option<Value>,
    pub haystack: Option<Value>,

    /// Result of the last comparison
    pub outcome: Option<Result<(), ComparisonError>>,
}

impl ComparatorWorld {
    pub async fn new() -> Self {
        let tokens = JwtTokenStore::new();
        Self {
            comparator: Comparator::with_jwt_tokens(tokens.clone()),
            tokens,
            needle: None,
            haystack: None,
            outcome: None,
        }
    }

    /// Replace the comparator with one that has no matchers registered.
    pub fn without_matchers(&mut self) {
        self.comparator = Comparator::new();
    }

    pub fn compare(&mut self) {
        let needle = self.needle.as_ref().expect("No needle given");
        let haystack = self.haystack.as_ref().expect("No haystack given");
        self.outcome = Some(self.comparator.compare(needle, haystack));
    }

    /// The failure of the last comparison; panics if it succeeded.
    pub fn failure(&self) -> &ComparisonError {
        match self.outcome.as_ref().expect("No comparison was run") {
            Ok(()) => panic!("Expected the comparison to fail, but it succeeded"),
            Err(err) => err,
        }
    }
}

/// Parse a JSON doc string.
pub fn parse_json(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|e| panic!("Invalid JSON in doc string: {e}\n{text}"))
}

/// Resolve an error kind from its label.
pub fn parse_kind(label: &str) -> ErrorKind {
    [
        ErrorKind::TypeMismatch,
        ErrorKind::MissingKey,
        ErrorKind::NotAList,
        ErrorKind::IndexOutOfRange,
        ErrorKind::ValueMismatch,
        ErrorKind::ElementNotFound,
        ErrorKind::NoListElements,
        ErrorKind::NoObjectElements,
        ErrorKind::UnknownMatcher,
        ErrorKind::MatcherFailed,
    ]
    .into_iter()
    .find(|kind| kind.label() == label)
    .unwrap_or_else(|| panic!("Unknown error kind: {label}"))
}
