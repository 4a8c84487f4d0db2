//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! [`IdentifierGenerator`](crate::IdentifierGenerator) as an `Arc`. Library code never reads
//! environment variables during a resolution call.

use crate::constants::{
    DEFAULT_SOURCE_KEY_ENV, GP_IDENTIFIER_SOURCE_ID, GP_IDENTIFIER_SOURCE_ID_PREFIX,
    SOURCE_KEY_PREFIX_ENV,
};
use crate::error::{RegistryError, RegistryResult};

/// Names of the global properties the generator reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistrationConfig {
    default_source_key: String,
    source_key_prefix: String,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            default_source_key: GP_IDENTIFIER_SOURCE_ID.to_string(),
            source_key_prefix: GP_IDENTIFIER_SOURCE_ID_PREFIX.to_string(),
        }
    }
}

impl RegistrationConfig {
    /// Create a new `RegistrationConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidInput`] if either key is empty or whitespace.
    pub fn new(default_source_key: String, source_key_prefix: String) -> RegistryResult<Self> {
        if default_source_key.trim().is_empty() {
            return Err(RegistryError::InvalidInput(
                "default source key cannot be empty".into(),
            ));
        }
        if source_key_prefix.trim().is_empty() {
            return Err(RegistryError::InvalidInput(
                "source key prefix cannot be empty".into(),
            ));
        }

        Ok(Self {
            default_source_key,
            source_key_prefix,
        })
    }

    /// Build a config from optional override values, falling back to the platform defaults.
    ///
    /// Blank overrides are treated as absent. Intended to be called with values read from
    /// [`DEFAULT_SOURCE_KEY_ENV`] and [`SOURCE_KEY_PREFIX_ENV`] at startup.
    pub fn from_overrides(
        default_source_key: Option<String>,
        source_key_prefix: Option<String>,
    ) -> RegistryResult<Self> {
        fn non_blank(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        let defaults = Self::default();
        Self::new(
            non_blank(default_source_key).unwrap_or(defaults.default_source_key),
            non_blank(source_key_prefix).unwrap_or(defaults.source_key_prefix),
        )
    }

    /// Build a config from the process environment.
    pub fn from_env() -> RegistryResult<Self> {
        Self::from_overrides(
            std::env::var(DEFAULT_SOURCE_KEY_ENV).ok(),
            std::env::var(SOURCE_KEY_PREFIX_ENV).ok(),
        )
    }

    pub fn default_source_key(&self) -> &str {
        &self.default_source_key
    }

    pub fn source_key_prefix(&self) -> &str {
        &self.source_key_prefix
    }

    /// Property key for the identifier source registered under `name`.
    pub fn source_key_for(&self, name: &str) -> String {
        format!("{}{}", self.source_key_prefix, name)
    }
}
