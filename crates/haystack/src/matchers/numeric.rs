//! Numeric bound matchers (`@gt(n)`, `@lt(n)`).

use crate::comparator::Comparator;
use crate::error::MatcherError;
use crate::registry::Matcher;
use crate::value::{as_number, parse_number, render_inline};
use serde_json::Value;

/// Text of the value as it appears in messages: strings unquoted.
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => render_inline(other),
    }
}

/// Both operands as numbers, or `NotNumeric` naming the offending one.
fn operands(actual: &Value, bound: &str) -> Result<(f64, f64), MatcherError> {
    let value = as_number(actual).ok_or_else(|| MatcherError::NotNumeric(display(actual)))?;
    let bound = parse_number(bound).ok_or_else(|| MatcherError::NotNumeric(bound.to_string()))?;
    Ok((value, bound))
}

/// `@gt(n)`: the value is a number (or numeric string) strictly greater
/// than `n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreaterThan;

impl Matcher for GreaterThan {
    fn invoke(&self, _: &Comparator, actual: &Value, args: &str) -> Result<(), MatcherError> {
        let (value, bound) = operands(actual, args)?;
        if value > bound {
            Ok(())
        } else {
            Err(MatcherError::NotGreater {
                value: display(actual),
                bound: args.trim().to_string(),
            })
        }
    }
}

/// `@lt(n)`: the value is a number (or numeric string) strictly less than
/// `n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LessThan;

impl Matcher for LessThan {
    fn invoke(&self, _: &Comparator, actual: &Value, args: &str) -> Result<(), MatcherError> {
        let (value, bound) = operands(actual, args)?;
        if value < bound {
            Ok(())
        } else {
            Err(MatcherError::NotLess {
                value: display(actual),
                bound: args.trim().to_string(),
            })
        }
    }
}
