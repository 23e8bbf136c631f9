//! `@jwt(name)` matcher.
//!
//! Tokens are registered by name with the payload they are expected to
//! contain and the secret they are signed with. When invoked, the matcher
//! verifies the haystack string as a token signed with that secret and checks
//! that its claims contain the registered payload, using the same comparator
//! (so payloads may use matcher calls themselves).

use crate::comparator::Comparator;
use crate::error::{JwtStoreError, MatcherError};
use crate::registry::Matcher;
use crate::value::type_name;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Algorithms a shared secret can verify.
pub const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// A registered token expectation.
#[derive(Debug, Clone, PartialEq)]
pub struct JwtToken {
    /// Needle compared against the decoded claims.
    pub payload: Value,
    /// Shared secret the token must be signed with.
    pub secret: String,
    /// Algorithms the token header may name.
    pub algorithms: Vec<Algorithm>,
}

/// Shared, cloneable store of named token expectations.
///
/// Clones share the same map, so tokens added after the `jwt` matcher has
/// been registered are visible to it.
#[derive(Debug, Clone, Default)]
pub struct JwtTokenStore {
    tokens: Arc<RwLock<HashMap<String, JwtToken>>>,
}

impl JwtTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token signed with HS256, replacing any token with the same
    /// name.
    pub fn add(&self, name: impl Into<String>, payload: Value, secret: impl Into<String>) {
        self.insert(name.into(), payload, secret.into(), vec![Algorithm::HS256]);
    }

    /// Register a token accepted under any of `algorithms`.
    ///
    /// Only HMAC algorithms are accepted and the list must not be empty.
    pub fn add_with_algorithms(
        &self,
        name: impl Into<String>,
        payload: Value,
        secret: impl Into<String>,
        algorithms: Vec<Algorithm>,
    ) -> Result<(), JwtStoreError> {
        let name = name.into();
        if algorithms.is_empty() {
            return Err(JwtStoreError::NoAlgorithms { name });
        }
        if let Some(&algorithm) = algorithms.iter().find(|a| !HMAC_ALGORITHMS.contains(*a)) {
            return Err(JwtStoreError::UnsupportedAlgorithm { name, algorithm });
        }
        self.insert(name, payload, secret.into(), algorithms);
        Ok(())
    }

    fn insert(&self, name: String, payload: Value, secret: String, algorithms: Vec<Algorithm>) {
        self.tokens.write().insert(
            name,
            JwtToken {
                payload,
                secret,
                algorithms,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<JwtToken> {
        self.tokens.read().get(name).cloned()
    }

    pub fn remove(&self, name: &str) -> Option<JwtToken> {
        self.tokens.write().remove(name)
    }

    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }
}

/// Verify `encoded` against `token` and return its claims.
///
/// The signature is always checked; `exp` and `nbf` are checked when
/// present. The audience is not enforced.
fn decode_claims(encoded: &str, token: &JwtToken) -> Result<Value, MatcherError> {
    let header = decode_header(encoded).map_err(|e| MatcherError::InvalidToken(e.to_string()))?;
    if !token.algorithms.contains(&header.alg) {
        return Err(MatcherError::InvalidToken(format!(
            "algorithm {:?} is not allowed",
            header.alg
        )));
    }

    let mut validation = Validation::new(header.alg);
    validation.algorithms = token.algorithms.clone();
    validation.required_spec_claims.clear();
    validation.validate_nbf = true;
    validation.validate_aud = false;

    let key = DecodingKey::from_secret(token.secret.as_bytes());
    decode::<Value>(encoded, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| MatcherError::InvalidToken(e.to_string()))
}

/// `@jwt(name)`: the value is a token registered under `name`.
#[derive(Debug, Clone, Default)]
pub struct Jwt {
    tokens: JwtTokenStore,
}

impl Jwt {
    pub fn new(tokens: JwtTokenStore) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &JwtTokenStore {
        &self.tokens
    }
}

impl Matcher for Jwt {
    fn invoke(
        &self,
        comparator: &Comparator,
        actual: &Value,
        args: &str,
    ) -> Result<(), MatcherError> {
        let name = args.trim();
        let token = self
            .tokens
            .get(name)
            .ok_or_else(|| MatcherError::UnknownToken(name.to_string()))?;

        let encoded = actual.as_str().ok_or_else(|| {
            MatcherError::InvalidToken(format!("expected a string, got \"{}\"", type_name(actual)))
        })?;

        let claims = decode_claims(encoded, &token)?;
        trace!(token = %name, "decoded token claims");

        comparator
            .compare(&token.payload, &claims)
            .map_err(|err| MatcherError::JwtMismatch(Box::new(err)))
    }
}
