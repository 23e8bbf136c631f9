//! Structural "contains" comparison for JSON documents.
//!
//! A *needle* document is contained in a *haystack* document when every key
//! and list element the needle names is present in the haystack with a
//! matching value. Extra haystack content is ignored and lists are compared
//! without regard to order. Needle strings of the form `@name(args)` are
//! dispatched to registered matchers instead of being compared literally.
//!
//! # Example
//!
//! ```
//! use haystack::{Comparator, ErrorKind};
//! use serde_json::json;
//!
//! let comparator = Comparator::with_default_matchers();
//!
//! let haystack = json!({
//!     "status": "ok",
//!     "items": [{"id": 7, "tags": ["a", "b"]}, {"id": 9}],
//!     "total": 2
//! });
//!
//! comparator
//!     .compare(
//!         &json!({
//!             "items": "@arrayLength(2)",
//!             "items[0]": {"tags": ["b"]},
//!             "total": "@variableType(int)"
//!         }),
//!         &haystack,
//!     )
//!     .unwrap();
//!
//! let err = comparator
//!     .compare(&json!({"status": "error"}), &haystack)
//!     .unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::ValueMismatch);
//! assert_eq!(err.path_string(), "status");
//! ```

pub mod comparator;
pub mod error;
pub mod matchers;
pub mod needle;
pub mod registry;
pub mod value;

// Re-export the main entry points
pub use comparator::Comparator;
pub use error::{
    CompareJsonError, ComparisonError, Document, ErrorKind, JwtStoreError, MatcherError,
    PathSegment, UnknownMatcher,
};
pub use matchers::{JwtToken, JwtTokenStore, DEFAULT_MATCHERS, HMAC_ALGORITHMS};
pub use needle::{MatcherCall, Needle, NeedleKey};
pub use registry::{Matcher, MatcherRegistry};
pub use value::Shape;
