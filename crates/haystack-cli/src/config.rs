//! YAML configuration for the `haystack` binary.
//!
//! ```yaml
//! default_matchers: true
//! jwt:
//!   - name: session
//!     secret: s3cr3t
//!     algorithms: [HS256]
//!     payload: { sub: "user-1" }
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use haystack::{Comparator, JwtTokenStore, HMAC_ALGORITHMS};
use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

fn default_true() -> bool {
    true
}

fn default_algorithms() -> Vec<String> {
    vec!["HS256".to_string()]
}

fn empty_payload() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Register the built-in matchers (`arrayLength`, `regExp`, `jwt`, ...).
    #[serde(default = "default_true")]
    pub default_matchers: bool,

    /// Tokens resolvable by the `@jwt(name)` matcher.
    #[serde(default)]
    pub jwt: Vec<JwtConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_matchers: true,
            jwt: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct JwtConfig {
    pub name: String,
    pub secret: String,
    /// Accepted signing algorithms (HMAC only).
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<String>,
    /// Needle the decoded claims must contain.
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

impl JwtConfig {
    pub fn parsed_algorithms(&self) -> Result<Vec<Algorithm>, anyhow::Error> {
        self.algorithms
            .iter()
            .map(|name| {
                let algorithm = Algorithm::from_str(name).map_err(|_| {
                    anyhow::anyhow!("JWT '{}': unknown algorithm '{name}'", self.name)
                })?;
                if !HMAC_ALGORITHMS.contains(&algorithm) {
                    anyhow::bail!(
                        "JWT '{}': algorithm '{name}' is not supported. \
                         Tokens are verified with a shared secret; use HS256, HS384 or HS512",
                        self.name
                    );
                }
                Ok(algorithm)
            })
            .collect()
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, anyhow::Error> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.default_matchers && !self.jwt.is_empty() {
            anyhow::bail!(
                "JWT tokens are configured but 'default_matchers' is false. \
                 The jwt matcher is one of the default matchers"
            );
        }

        let mut names = HashSet::new();
        for token in &self.jwt {
            if token.name.trim().is_empty() {
                anyhow::bail!("JWT token name must not be empty");
            }
            if !names.insert(token.name.as_str()) {
                anyhow::bail!("Duplicate JWT token name: '{}'", token.name);
            }
            if token.secret.is_empty() {
                anyhow::bail!("JWT '{}': secret must not be empty", token.name);
            }
            if token.algorithms.is_empty() {
                anyhow::bail!("JWT '{}': at least one algorithm is required", token.name);
            }
            token.parsed_algorithms()?;
        }

        Ok(())
    }

    /// Build the comparator this configuration describes.
    ///
    /// `no_default_matchers` comes from the command line and wins over the
    /// file; configured tokens are then ignored.
    pub fn build_comparator(&self, no_default_matchers: bool) -> Result<Comparator, anyhow::Error> {
        if no_default_matchers || !self.default_matchers {
            if !self.jwt.is_empty() {
                warn!(
                    tokens = self.jwt.len(),
                    "default matchers disabled, ignoring configured JWT tokens"
                );
            }
            return Ok(Comparator::new());
        }

        let tokens = JwtTokenStore::new();
        for token in &self.jwt {
            tokens.add_with_algorithms(
                token.name.clone(),
                token.payload.clone(),
                token.secret.clone(),
                token.parsed_algorithms()?,
            )?;
            debug!(token = %token.name, "registered JWT token");
        }
        Ok(Comparator::with_jwt_tokens(tokens))
    }
}
