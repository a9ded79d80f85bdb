//! Error types for property-document operations.
//!
//! HTTP failures are mapped to semantic variants where the status carries
//! meaning:
//!
//! - **404**: [`ResourceError::NotFound`]
//! - **Other non-2xx**: [`ResourceError::Http`]
//!
//! Bodies that do not decode as a property map become
//! [`ResourceError::Decode`], carrying the path they came from.
//!
//! # Example
//!
//! ```rust,ignore
//! use automation_provider::rest::ResourceError;
//!
//! match client.fetch("/resources/web/schema").await {
//!     Ok(map) => println!("{} properties", map.len()),
//!     Err(ResourceError::NotFound { path, .. }) => println!("{path} is gone"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use thiserror::Error;

use crate::clients::HttpError;
use crate::property::DecodeError;

/// Error type for property-document operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The platform has nothing at this path (HTTP 404).
    #[error("no property document at '{path}'")]
    NotFound {
        /// The path that was requested.
        path: String,
        /// The request ID for debugging (from the `X-Request-Id` header).
        request_id: Option<String>,
    },

    /// The response body is not a property map.
    #[error("response from '{path}' is not a property map: {source}")]
    Decode {
        /// The path the body came from.
        path: String,
        /// The decode failure.
        #[source]
        source: DecodeError,
    },

    /// The property map could not be serialized.
    #[error("could not encode property map: {0}")]
    Encode(#[from] serde_json::Error),

    /// Any other HTTP-level error.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl ResourceError {
    /// Maps an HTTP error for `path`, turning 404 into [`Self::NotFound`].
    #[must_use]
    pub fn from_http_error(path: &str, error: HttpError) -> Self {
        match error {
            HttpError::Response(e) if e.is_not_found() => Self::NotFound {
                path: path.to_string(),
                request_id: e.error_reference,
            },
            other => Self::Http(other),
        }
    }

    /// Returns the request ID if available.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::NotFound { request_id, .. } => request_id.as_deref(),
            Self::Http(HttpError::Response(e)) => e.error_reference.as_deref(),
            _ => None,
        }
    }
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};
