//! Validator configuration.
//!
//! There is exactly one knob: how strictly `ELAITHE` conditions are checked.
//! Configuration comes from code, from a JSON document, or from the
//! `YANTRA_STRICTNESS` environment variable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable consulted by [`ValidatorConfig::from_env`].
pub const STRICTNESS_ENV: &str = "YANTRA_STRICTNESS";

/// Errors loading a [`ValidatorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown strictness '{0}' (expected 'strict' or 'relaxed')")]
    UnknownStrictness(String),

    #[error("invalid validator config: {0}")]
    Json(#[from] serde_json::Error),
}

/// How much semantic checking `ELAITHE` headers receive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Conditions must be `name OP value` with operand types that agree.
    #[default]
    Strict,
    /// Conditions are accepted as written; only the header shape is checked.
    Relaxed,
}

impl Strictness {
    pub fn checks_conditions(self) -> bool {
        matches!(self, Strictness::Strict)
    }
}

impl FromStr for Strictness {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Strictness::Strict),
            "relaxed" => Ok(Strictness::Relaxed),
            other => Err(ConfigError::UnknownStrictness(other.to_string())),
        }
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strictness::Strict => write!(f, "strict"),
            Strictness::Relaxed => write!(f, "relaxed"),
        }
    }
}

/// Configuration for a [`Validator`](crate::Validator).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    pub strictness: Strictness,
}

impl ValidatorConfig {
    pub fn strict() -> Self {
        Self {
            strictness: Strictness::Strict,
        }
    }

    pub fn relaxed() -> Self {
        Self {
            strictness: Strictness::Relaxed,
        }
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Load from the process environment.
    ///
    /// An unset variable yields the default config.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match lookup(STRICTNESS_ENV) {
            Some(value) if !value.trim().is_empty() => Ok(Self {
                strictness: value.parse()?,
            }),
            _ => Ok(Self::default()),
        }
    }

    /// Parse a JSON document such as `{"strictness": "relaxed"}`.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}
