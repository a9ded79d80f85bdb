//! HTTP-specific error types.
//!
//! - [`HttpResponseError`]: non-2xx responses from the platform
//! - [`InvalidHttpRequestError`]: a request that fails validation before sending
//! - [`HttpError`]: the unified error returned by [`HttpClient`](super::HttpClient)
//!
//! # Example
//!
//! ```rust,ignore
//! use automation_provider::clients::HttpError;
//!
//! match client.request(request).await {
//!     Ok(response) => println!("{} bytes", response.body.len()),
//!     Err(HttpError::Response(e)) if e.code == 404 => println!("gone"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use thiserror::Error;

/// Error returned when the platform answers with a non-2xx status.
///
/// `message` is the platform's own error text when the body carries one,
/// otherwise the raw body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("HTTP {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Error text extracted from the response body.
    pub message: String,
    /// Reference ID for error reporting (from the `X-Request-Id` header).
    pub error_reference: Option<String>,
}

impl HttpResponseError {
    /// Returns `true` for `404 Not Found`.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.code == 404
    }
}

/// Error returned when a request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// A GET request was given a body.
    #[error("Cannot send data with {method}.")]
    UnexpectedBody {
        /// The HTTP method that must not carry a body.
        method: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network, TLS or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns `true` if the platform reported the target as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Response(e) if e.is_not_found())
    }
}
