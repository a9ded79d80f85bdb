//! Configuration errors.
//!
//! Every configuration constructor returns `Result<T, ConfigError>` so that a
//! bad endpoint or credential is rejected before the first request is sent.
//!
//! # Example
//!
//! ```rust
//! use automation_provider::{AccessToken, ConfigError};
//!
//! let result = AccessToken::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAccessToken)));
//! ```

use thiserror::Error;

/// Errors raised while building or validating configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API URL is not an absolute `http` or `https` URL with a host.
    #[error("Invalid API URL '{url}'. Expected an absolute http(s) URL such as 'https://automation.example.com/api'.")]
    InvalidApiUrl {
        /// The URL that was provided.
        url: String,
    },

    /// Access token cannot be empty.
    #[error("Access token cannot be empty. Omit the token instead of passing an empty one.")]
    EmptyAccessToken,

    /// API version is not a date.
    #[error("Invalid API version '{version}'. Expected format: 'YYYY-MM-DD' (e.g., '2024-03-01').")]
    InvalidApiVersion {
        /// The version string that was provided.
        version: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
