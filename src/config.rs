//! Configuration types for the response pipeline.
//!
//! This module provides clean configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! # Example
//!
//! ```rust
//! use wireform::config::ResponderConfig;
//! use wireform::core::models::EncodeConfig;
//! use wireform::Responder;
//!
//! let config = ResponderConfig::new()
//!     .with_default_format("csv")
//!     .with_encode(EncodeConfig::new().with_delimiter(b';'));
//!
//! let responder = Responder::with_config(config);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::models::EncodeConfig;
use crate::format::JSON;

/// Configuration for a [`Responder`](crate::Responder).
///
/// Controls the process default format, whether URL-embedded format tokens
/// participate in negotiation, and the encoder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponderConfig {
    /// Name of the process-wide default format (default: `json`)
    pub default_format: String,

    /// Honor format tokens embedded in the request path (default: true)
    pub path_tokens: bool,

    /// Encoder settings shared by all format writers
    pub encode: EncodeConfig,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            default_format: JSON.to_string(),
            path_tokens: true,
            encode: EncodeConfig::default(),
        }
    }
}

impl ResponderConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the process default format by name.
    #[must_use]
    pub fn with_default_format(mut self, name: impl Into<String>) -> Self {
        self.default_format = name.into();
        self
    }

    /// Disables URL-embedded format tokens.
    ///
    /// Negotiation then considers only the explicit override, the Accept
    /// header, and the default.
    #[must_use]
    pub fn without_path_tokens(mut self) -> Self {
        self.path_tokens = false;
        self
    }

    /// Sets the encoder configuration.
    #[must_use]
    pub fn with_encode(mut self, encode: EncodeConfig) -> Self {
        self.encode = encode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResponderConfig::new();
        assert_eq!(config.default_format, "json");
        assert!(config.path_tokens);
        assert_eq!(config.encode, EncodeConfig::default());
    }

    #[test]
    fn test_builder_methods() {
        let config = ResponderConfig::new()
            .with_default_format("csv")
            .without_path_tokens()
            .with_encode(EncodeConfig::new().with_pretty());

        assert_eq!(config.default_format, "csv");
        assert!(!config.path_tokens);
        assert!(config.encode.pretty);
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = ResponderConfig::new().with_default_format("jsonl");
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ResponderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
