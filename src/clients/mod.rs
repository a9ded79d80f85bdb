//! HTTP client layer for the automation platform.
//!
//! # Overview
//!
//! - [`HttpClient`]: the async client, built from a
//!   [`ProviderConfig`](crate::ProviderConfig)
//! - [`HttpRequest`]: a request with a raw JSON body
//! - [`HttpResponse`]: status, headers and raw body
//! - [`HttpMethod`]: GET and PUT
//! - [`HttpError`]: network, validation and non-2xx failures
//!
//! Requests are sent exactly once. Callers that want retries wrap
//! [`HttpClient::request`] themselves.
//!
//! # Example
//!
//! ```rust,ignore
//! use automation_provider::clients::{HttpClient, HttpMethod, HttpRequest};
//!
//! let client = HttpClient::new(&config)?;
//! let request = HttpRequest::builder(HttpMethod::Get, "/resources/web/schema").build()?;
//! let response = client.request(request).await?;
//! ```

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, API_VERSION_PARAM, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
