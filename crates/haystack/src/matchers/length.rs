//! List length matchers.

use crate::comparator::Comparator;
use crate::error::MatcherError;
use crate::registry::Matcher;
use crate::value::type_name;
use serde_json::Value;

fn parse_length(args: &str) -> Result<usize, MatcherError> {
    args.trim()
        .parse()
        .map_err(|_| MatcherError::invalid_argument(args, "expected a non-negative integer"))
}

fn list_length(actual: &Value) -> Result<usize, MatcherError> {
    actual
        .as_array()
        .map(Vec::len)
        .ok_or_else(|| MatcherError::NotAList(type_name(actual)))
}

/// `@arrayLength(n)`: the value is a list of exactly `n` elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayLength;

impl Matcher for ArrayLength {
    fn invoke(&self, _: &Comparator, actual: &Value, args: &str) -> Result<(), MatcherError> {
        let expected = parse_length(args)?;
        let actual = list_length(actual)?;
        if actual == expected {
            Ok(())
        } else {
            Err(MatcherError::LengthMismatch { expected, actual })
        }
    }
}

/// `@arrayMinLength(n)`: the value is a list of at least `n` elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayMinLength;

impl Matcher for ArrayMinLength {
    fn invoke(&self, _: &Comparator, actual: &Value, args: &str) -> Result<(), MatcherError> {
        let min = parse_length(args)?;
        let actual = list_length(actual)?;
        if actual >= min {
            Ok(())
        } else {
            Err(MatcherError::BelowMinLength { min, actual })
        }
    }
}

/// `@arrayMaxLength(n)`: the value is a list of at most `n` elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayMaxLength;

impl Matcher for ArrayMaxLength {
    fn invoke(&self, _: &Comparator, actual: &Value, args: &str) -> Result<(), MatcherError> {
        let max = parse_length(args)?;
        let actual = list_length(actual)?;
        if actual <= max {
            Ok(())
        } else {
            Err(MatcherError::AboveMaxLength { max, actual })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(matcher: impl Matcher, actual: Value, args: &str) -> Result<(), MatcherError> {
        matcher.invoke(&Comparator::new(), &actual, args)
    }

    #[test]
    fn test_array_length() {
        assert!(run(ArrayLength, json!([1, 2, 3]), "3").is_ok());
        assert!(run(ArrayLength, json!([]), "0").is_ok());
        assert!(run(ArrayLength, json!([1, 2, 3]), " 3 ").is_ok());
        assert!(matches!(
            run(ArrayLength, json!([1, 2, 3]), "2"),
            Err(MatcherError::LengthMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_array_min_length_inclusive() {
        assert!(run(ArrayMinLength, json!([1, 2]), "2").is_ok());
        assert!(run(ArrayMinLength, json!([1, 2, 3]), "2").is_ok());
        assert!(matches!(
            run(ArrayMinLength, json!([1]), "2"),
            Err(MatcherError::BelowMinLength { min: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_array_max_length_inclusive() {
        assert!(run(ArrayMaxLength, json!([1, 2]), "2").is_ok());
        assert!(run(ArrayMaxLength, json!([]), "2").is_ok());
        assert!(matches!(
            run(ArrayMaxLength, json!([1, 2, 3]), "2"),
            Err(MatcherError::AboveMaxLength { max: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_objects_are_not_lists() {
        let err = run(ArrayLength, json!({"a": 1}), "1").unwrap_err();
        assert_eq!(err.to_string(), "Only lists are supported, got \"object\".");
        assert!(matches!(
            run(ArrayMinLength, json!({}), "0"),
            Err(MatcherError::NotAList("object"))
        ));
        assert!(matches!(
            run(ArrayMaxLength, json!("abc"), "5"),
            Err(MatcherError::NotAList("string"))
        ));
    }

    #[test]
    fn test_invalid_length_argument() {
        for args in ["", "-1", "1.5", "two"] {
            assert!(matches!(
                run(ArrayLength, json!([]), args),
                Err(MatcherError::InvalidArgument { .. })
            ));
        }
    }
}
