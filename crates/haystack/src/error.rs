//! Error types for comparisons and matchers.

use crate::value::render;
use serde::Serialize;
use serde_json::Value;
use std::error::Error as StdError;
use std::fmt;

const RULE: &str =
    "================================================================================";

/// Category of a comparison failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Needle and haystack disagree on shape (list vs object vs scalar).
    TypeMismatch,
    /// A key the needle names is absent from the haystack.
    MissingKey,
    /// An indexed key (`key[n]`) points at something that is not a list.
    NotAList,
    /// An indexed key addresses a position past the end of the list.
    IndexOutOfRange,
    /// A scalar value differs.
    ValueMismatch,
    /// No haystack element satisfies a needle list element.
    ElementNotFound,
    /// The needle looks for a list but the haystack list holds none.
    NoListElements,
    /// The needle looks for an object but the haystack list holds none.
    NoObjectElements,
    /// A matcher call names a matcher the registry does not know.
    UnknownMatcher,
    /// A matcher rejected the haystack value.
    MatcherFailed,
}

impl ErrorKind {
    /// Get the label for this kind.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::TypeMismatch => "TypeMismatch",
            ErrorKind::MissingKey => "MissingKey",
            ErrorKind::NotAList => "NotAList",
            ErrorKind::IndexOutOfRange => "IndexOutOfRange",
            ErrorKind::ValueMismatch => "ValueMismatch",
            ErrorKind::ElementNotFound => "ElementNotFound",
            ErrorKind::NoListElements => "NoListElements",
            ErrorKind::NoObjectElements => "NoObjectElements",
            ErrorKind::UnknownMatcher => "UnknownMatcher",
            ErrorKind::MatcherFailed => "MatcherFailed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One step from the needle root towards a failing node.
///
/// Serializes as a bare string (key) or number (index).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Render a path as `data.items[1].id`.
pub fn render_path(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(idx) => {
                out.push('[');
                out.push_str(&idx.to_string());
                out.push(']');
            }
        }
    }
    out
}

/// A failed containment check.
///
/// Carries the first failure found, the path to it, and the needle and
/// haystack fragments that disagreed. `Display` renders a full report with
/// both fragments pretty-printed.
#[derive(Debug)]
pub struct ComparisonError {
    kind: ErrorKind,
    message: String,
    path: Vec<PathSegment>,
    needle: Value,
    haystack: Value,
    cause: Option<Box<MatcherError>>,
}

impl ComparisonError {
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        needle: Value,
        haystack: Value,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            path: Vec::new(),
            needle,
            haystack,
            cause: None,
        }
    }

    /// Attach the matcher failure that caused this error.
    pub fn with_cause(mut self, cause: MatcherError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Prefix the path with a key segment (called while unwinding).
    pub(crate) fn under_key(mut self, key: &str) -> Self {
        self.path.insert(0, PathSegment::Key(key.to_string()));
        self
    }

    /// Prefix the path with an index segment (called while unwinding).
    pub(crate) fn under_index(mut self, index: usize) -> Self {
        self.path.insert(0, PathSegment::Index(index));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Short message without the fragment report.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Path rendered as `a.b[0]`; empty at the root.
    pub fn path_string(&self) -> String {
        render_path(&self.path)
    }

    /// The needle fragment that could not be satisfied.
    pub fn needle(&self) -> &Value {
        &self.needle
    }

    /// The haystack fragment it was compared against.
    pub fn haystack(&self) -> &Value {
        &self.haystack
    }

    /// The matcher failure behind a `MatcherFailed` error.
    pub fn matcher_error(&self) -> Option<&MatcherError> {
        self.cause.as_deref()
    }
}

impl fmt::Display for ComparisonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if !self.path.is_empty() {
            write!(f, "\nPath: {}", self.path_string())?;
        }
        write!(
            f,
            "\n\n{RULE}\n= Needle {}\n{RULE}\n{}\n\n{RULE}\n= Haystack {}\n{RULE}\n{}",
            "=".repeat(RULE.len() - 9),
            render(&self.needle),
            "=".repeat(RULE.len() - 11),
            render(&self.haystack),
        )
    }
}

impl StdError for ComparisonError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

/// Registry lookup miss.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("No matcher function registered for \"{name}\".")]
pub struct UnknownMatcher {
    pub name: String,
}

/// Token registration rejected by [`JwtTokenStore`](crate::JwtTokenStore).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JwtStoreError {
    #[error("JWT \"{name}\": at least one algorithm is required")]
    NoAlgorithms { name: String },

    #[error(
        "JWT \"{name}\": algorithm {algorithm:?} is not supported, tokens are verified \
         with a shared secret (HS256, HS384 or HS512)"
    )]
    UnsupportedAlgorithm {
        name: String,
        algorithm: jsonwebtoken::Algorithm,
    },
}

/// Failure reported by a matcher.
#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Only lists are supported, got \"{0}\".")]
    NotAList(&'static str),

    #[error("Invalid argument \"{argument}\": {reason}.")]
    InvalidArgument { argument: String, reason: String },

    #[error("Expected list to have exactly {expected} entries, actual length: {actual}.")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Expected list to have at least {min} entries, actual length: {actual}.")]
    BelowMinLength { min: usize, actual: usize },

    #[error("Expected list to have at most {max} entries, actual length: {actual}.")]
    AboveMaxLength { max: usize, actual: usize },

    #[error("Unsupported variable type: \"{0}\".")]
    UnsupportedType(String),

    #[error("Expected variable type \"{expected}\", got \"{actual}\".")]
    TypeMismatch {
        expected: String,
        actual: &'static str,
    },

    #[error("Regular expressions can only match strings, numbers and booleans, got \"{0}\".")]
    NotCoercible(&'static str),

    #[error("Invalid regular expression \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Subject \"{subject}\" did not match pattern \"{pattern}\".")]
    NoMatch { subject: String, pattern: String },

    #[error("\"{0}\" is not numeric.")]
    NotNumeric(String),

    #[error("\"{value}\" is not greater than \"{bound}\".")]
    NotGreater { value: String, bound: String },

    #[error("\"{value}\" is not less than \"{bound}\".")]
    NotLess { value: String, bound: String },

    #[error("No JWT registered for \"{0}\".")]
    UnknownToken(String),

    #[error("Invalid JWT: {0}")]
    InvalidToken(String),

    #[error("JWT claims do not match the registered payload: {}", .0.message())]
    JwtMismatch(#[source] Box<ComparisonError>),

    #[error("{0}")]
    Custom(String),
}

impl MatcherError {
    /// Failure with a free-form message, for user-defined matchers.
    pub fn custom(message: impl Into<String>) -> Self {
        MatcherError::Custom(message.into())
    }

    pub(crate) fn invalid_argument(argument: &str, reason: impl Into<String>) -> Self {
        MatcherError::InvalidArgument {
            argument: argument.to_string(),
            reason: reason.into(),
        }
    }
}

/// Which document failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    Needle,
    Haystack,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Document::Needle => f.write_str("needle"),
            Document::Haystack => f.write_str("haystack"),
        }
    }
}

/// Error from [`Comparator::compare_json`](crate::Comparator::compare_json).
#[derive(Debug, thiserror::Error)]
pub enum CompareJsonError {
    #[error("The {document} is not valid JSON: {source}")]
    Decode {
        document: Document,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Comparison(#[from] ComparisonError),
}

impl CompareJsonError {
    /// The comparison failure, if decoding succeeded.
    pub fn comparison(&self) -> Option<&ComparisonError> {
        match self {
            CompareJsonError::Comparison(err) => Some(err),
            CompareJsonError::Decode { .. } => None,
        }
    }
}
