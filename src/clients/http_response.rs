//! HTTP response type.

use std::collections::HashMap;

/// A response from the platform's REST API.
///
/// The body is kept as raw bytes; callers decide how to parse it, which
/// lets property maps read keys in wire order.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lowercased names (headers may repeat).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(code: u16, headers: HashMap<String, Vec<String>>, body: Vec<u8>) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` for 2xx status codes.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code < 300
    }

    /// Returns `true` if the body is empty or whitespace only.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    /// Returns the first value of header `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Extracts the platform's error text from the body.
    ///
    /// Looks for a top-level `message` or `error` string, then an `errors`
    /// value, and falls back to the body as lossy UTF-8.
    #[must_use]
    pub fn error_message(&self) -> String {
        if let Ok(serde_json::Value::Object(fields)) =
            serde_json::from_slice::<serde_json::Value>(&self.body)
        {
            for key in ["message", "error"] {
                if let Some(serde_json::Value::String(text)) = fields.get(key) {
                    return text.clone();
                }
            }
            if let Some(errors) = fields.get("errors") {
                return errors.to_string();
            }
        }
        String::from_utf8_lossy(&self.body).trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(code: u16, body: &str) -> HttpResponse {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), vec!["req-1".to_string()]);
        HttpResponse::new(code, headers, body.as_bytes().to_vec())
    }

    #[test]
    fn test_is_ok_for_2xx() {
        assert!(response(200, "").is_ok());
        assert!(response(204, "").is_ok());
        assert!(!response(301, "").is_ok());
        assert!(!response(404, "").is_ok());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = response(200, "");
        assert_eq!(response.header("X-Request-Id"), Some("req-1"));
        assert_eq!(response.request_id(), Some("req-1"));
        assert!(response.header("retry-after").is_none());
    }

    #[test]
    fn test_is_empty_ignores_whitespace() {
        assert!(response(200, " \n").is_empty());
        assert!(!response(200, "{}").is_empty());
    }

    #[test]
    fn test_error_message_prefers_message_field() {
        assert_eq!(
            response(400, r#"{"message":"bad input","statusCode":400}"#).error_message(),
            "bad input"
        );
        assert_eq!(
            response(400, r#"{"errors":["a","b"]}"#).error_message(),
            r#"["a","b"]"#
        );
        assert_eq!(response(502, " upstream down ").error_message(), "upstream down");
    }
}
