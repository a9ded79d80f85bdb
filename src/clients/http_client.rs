//! HTTP client for the automation platform's REST API.

use std::collections::HashMap;

use crate::clients::errors::{HttpError, HttpResponseError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::{ApiUrl, ProviderConfig};

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Query parameter carrying the configured API version.
pub const API_VERSION_PARAM: &str = "apiVersion";

/// HTTP client for the automation platform.
///
/// The client handles:
/// - URL construction from the configured [`ApiUrl`]
/// - Default headers: `Accept`, `User-Agent` and, when a token is
///   configured, `Authorization: Bearer`
/// - The `apiVersion` query parameter
/// - Per-request timeout and optional acceptance of self-signed certificates
///
/// Requests are sent once. Non-2xx responses become
/// [`HttpError::Response`].
///
/// # Example
///
/// ```rust,ignore
/// use automation_provider::clients::{HttpClient, HttpMethod, HttpRequest};
///
/// let client = HttpClient::new(&config)?;
/// let request = HttpRequest::builder(HttpMethod::Get, "/resources/web/schema").build()?;
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    api_url: ApiUrl,
    api_version: Option<String>,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the TLS backend cannot be
    /// initialized.
    pub fn new(config: &ProviderConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent = format!(
            "{user_agent_prefix}Automation Provider v{SDK_VERSION} | Rust {rust_version}"
        );

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        if let Some(token) = config.access_token() {
            default_headers.insert(
                "Authorization".to_string(),
                format!("Bearer {}", token.as_ref()),
            );
        }

        if config.insecure() {
            tracing::warn!(
                api_url = %config.api_url(),
                "TLS certificate verification is disabled"
            );
        }

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .danger_accept_invalid_certs(config.insecure())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url().clone(),
            api_version: config.api_version().map(ToString::to_string),
            default_headers,
        })
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn api_url(&self) -> &ApiUrl {
        &self.api_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends a request and returns the response if its status is 2xx.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - A network or timeout error occurs (`Network`)
    /// - A non-2xx response is received (`Response`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.api_url.join(&request.path);
        tracing::debug!(method = %request.http_method, %url, "sending request");

        let mut builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Put => self.client.put(&url),
        };

        for (key, value) in &self.default_headers {
            builder = builder.header(key, value);
        }
        if let Some(version) = &self.api_version {
            builder = builder.query(&[(API_VERSION_PARAM, version.as_str())]);
        }

        if let Some(body) = request.body {
            builder = builder
                .header("Content-Type", "application/json")
                .body(body);
        }

        let res = builder.send().await?;
        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.bytes().await?.to_vec();
        let response = HttpResponse::new(code, headers, body);

        tracing::debug!(code, bytes = response.body.len(), %url, "received response");

        if response.is_ok() {
            return Ok(response);
        }

        Err(HttpError::Response(HttpResponseError {
            code,
            message: response.error_message(),
            error_reference: response.request_id().map(String::from),
        }))
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccessToken;

    fn config() -> ProviderConfig {
        ProviderConfig::builder()
            .api_url(ApiUrl::new("https://automation.example.com/api").unwrap())
            .access_token(AccessToken::new("test-token").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_construction() {
        let client = HttpClient::new(&config()).unwrap();
        assert_eq!(client.api_url().as_ref(), "https://automation.example.com/api");
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&config()).unwrap();
        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("Automation Provider v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = ProviderConfig::builder()
            .api_url(ApiUrl::new("https://automation.example.com").unwrap())
            .user_agent_prefix("Deployer/2.1")
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("Deployer/2.1 | "));
    }

    #[test]
    fn test_bearer_token_header() {
        let client = HttpClient::new(&config()).unwrap();
        assert_eq!(
            client.default_headers().get("Authorization"),
            Some(&"Bearer test-token".to_string())
        );
    }

    #[test]
    fn test_no_authorization_header_without_token() {
        let config = ProviderConfig::builder()
            .api_url(ApiUrl::new("https://automation.example.com").unwrap())
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();
        assert!(client.default_headers().get("Authorization").is_none());
    }

    #[test]
    fn test_accept_header_is_json() {
        let client = HttpClient::new(&config()).unwrap();
        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }
}
