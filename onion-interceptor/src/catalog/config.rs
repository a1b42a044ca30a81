//! Declarative chain configuration.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// An ordered list of catalog names describing a middleware chain.
///
/// ```json
/// { "middleware": ["logging", "timing"], "auto_patch": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Middleware names, outermost first.
    #[serde(default)]
    pub middleware: Vec<String>,
    /// Whether the interceptor hands out a wrapped client.
    ///
    /// `None` leaves the choice to the registry the configuration is
    /// applied to; a fresh registry defaults to `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_patch: Option<bool>,
}

impl ChainConfig {
    /// Creates a configuration for the given names.
    #[must_use]
    pub fn new<I, S>(middleware: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            middleware: middleware.into_iter().map(Into::into).collect(),
            auto_patch: None,
        }
    }

    /// Sets the auto-patch flag.
    #[must_use]
    pub fn with_auto_patch(mut self, auto_patch: bool) -> Self {
        self.auto_patch = Some(auto_patch);
        self
    }

    /// Returns the configured auto-patch flag, or `fallback` if unset.
    #[must_use]
    pub fn auto_patch_or(&self, fallback: bool) -> bool {
        self.auto_patch.unwrap_or(fallback)
    }

    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid configuration.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parses a configuration from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the value is not a valid configuration.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        serde_json::from_value(value).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}
