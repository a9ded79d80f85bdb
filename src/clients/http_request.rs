//! HTTP request types.

use std::fmt;

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods used against the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// Retrieve a resource.
    Get,
    /// Replace a resource.
    Put,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// A request to the platform's REST API.
///
/// Bodies are raw JSON bytes so that callers which care about key order
/// (such as property maps) control the exact encoding.
///
/// # Example
///
/// ```rust
/// use automation_provider::clients::{HttpMethod, HttpRequest};
///
/// let request = HttpRequest::builder(HttpMethod::Put, "/resources/web/schema")
///     .body(br#"{"cpu":{"type":"integer"}}"#.to_vec())
///     .build()
///     .unwrap();
/// assert_eq!(request.path, "/resources/web/schema");
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The path, relative to the configured API URL.
    pub path: String,
    /// The JSON request body, if any.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if a PUT has no body, or a GET
    /// has one.
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        let method = || self.http_method.to_string();
        match (self.http_method, &self.body) {
            (HttpMethod::Put, None) => {
                Err(InvalidHttpRequestError::MissingBody { method: method() })
            }
            (HttpMethod::Get, Some(_)) => {
                Err(InvalidHttpRequestError::UnexpectedBody { method: method() })
            }
            _ => Ok(()),
        }
    }
}

/// Builder for [`HttpRequest`].
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    body: Option<Vec<u8>>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            body: None,
        }
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            path: self.path,
            body: self.body,
        };
        request.verify()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "get");
        assert_eq!(HttpMethod::Put.to_string(), "put");
    }

    #[test]
    fn test_builder_creates_valid_get_request() {
        let request = HttpRequest::builder(HttpMethod::Get, "/resources/web")
            .build()
            .unwrap();

        assert_eq!(request.http_method, HttpMethod::Get);
        assert!(request.body.is_none());
    }

    #[test]
    fn test_put_requires_body() {
        let result = HttpRequest::builder(HttpMethod::Put, "/resources/web").build();

        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::MissingBody { method }) if method == "put"
        ));
    }

    #[test]
    fn test_get_rejects_body() {
        let result = HttpRequest::builder(HttpMethod::Get, "/resources/web")
            .body(b"{}".to_vec())
            .build();

        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::UnexpectedBody { method }) if method == "get"
        ));
    }
}
