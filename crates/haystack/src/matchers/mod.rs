//! Built-in matchers.
//!
//! Each matcher is registered under a fixed name and invoked from a needle
//! string of the form `@name(args)`:
//!
//! - `arrayLength(n)` / `arrayMinLength(n)` / `arrayMaxLength(n)` - list length
//! - `variableType(int|string|...)` - value type
//! - `regExp(pattern)` - regular expression over scalar text
//! - `gt(n)` / `lt(n)` - numeric bounds
//! - `jwt(name)` - signed token whose claims contain a registered payload

mod jwt;
mod length;
mod numeric;
mod regexp;
mod variable_type;

use crate::registry::MatcherRegistry;

pub use jwt::{Jwt, JwtToken, JwtTokenStore, HMAC_ALGORITHMS};
pub use length::{ArrayLength, ArrayMaxLength, ArrayMinLength};
pub use numeric::{GreaterThan, LessThan};
pub use regexp::RegExp;
pub use variable_type::{TypeName, VariableType};

pub const ARRAY_LENGTH: &str = "arrayLength";
pub const ARRAY_MIN_LENGTH: &str = "arrayMinLength";
pub const ARRAY_MAX_LENGTH: &str = "arrayMaxLength";
pub const VARIABLE_TYPE: &str = "variableType";
pub const REG_EXP: &str = "regExp";
pub const GREATER_THAN: &str = "gt";
pub const LESS_THAN: &str = "lt";
pub const JWT: &str = "jwt";

/// Names of all built-in matchers.
pub const DEFAULT_MATCHERS: [&str; 8] = [
    ARRAY_LENGTH,
    ARRAY_MIN_LENGTH,
    ARRAY_MAX_LENGTH,
    VARIABLE_TYPE,
    REG_EXP,
    GREATER_THAN,
    LESS_THAN,
    JWT,
];

/// Register every built-in matcher. The `jwt` matcher resolves token names
/// through `tokens`.
pub fn register_defaults(registry: &mut MatcherRegistry, tokens: JwtTokenStore) {
    registry.register(ARRAY_LENGTH, ArrayLength);
    registry.register(ARRAY_MIN_LENGTH, ArrayMinLength);
    registry.register(ARRAY_MAX_LENGTH, ArrayMaxLength);
    registry.register(VARIABLE_TYPE, VariableType);
    registry.register(REG_EXP, RegExp::new());
    registry.register(GREATER_THAN, GreaterThan);
    registry.register(LESS_THAN, LessThan);
    registry.register(JWT, Jwt::new(tokens));
}
