//! Reading and writing property documents under per-resource locks.

use std::sync::Arc;

use crate::clients::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::locks::KeyedLockTable;
use crate::property::OrderedPropertyMap;
use crate::rest::ResourceError;

/// Client for property documents: JSON objects of named property
/// descriptors such as custom resource schemas and blueprint inputs.
///
/// Every operation locks the document's [`lock_key`](Self::lock_key) in the
/// shared [`KeyedLockTable`]. Reads take the lock shared; writes and
/// read-modify-write cycles take it exclusively, so concurrent
/// [`update`](Self::update) calls on one document never lose each other's
/// changes. Documents at different paths do not contend.
///
/// # Example
///
/// ```rust,ignore
/// use automation_provider::property::Property;
/// use automation_provider::rest::PropertyClient;
///
/// let client = PropertyClient::new(HttpClient::new(&config)?);
///
/// let schema = client
///     .update("/resources/web/schema", |map| {
///         map.set("zone", Property::string().with_title("Zone"));
///     })
///     .await?;
/// ```
#[derive(Debug)]
pub struct PropertyClient {
    http: HttpClient,
    locks: Arc<KeyedLockTable>,
}

// Verify PropertyClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PropertyClient>();
};

impl PropertyClient {
    /// Creates a client that locks through [`KeyedLockTable::global`].
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self::with_lock_table(http, KeyedLockTable::global())
    }

    /// Creates a client that locks through `locks`.
    #[must_use]
    pub const fn with_lock_table(http: HttpClient, locks: Arc<KeyedLockTable>) -> Self {
        Self { http, locks }
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Returns the lock table this client locks through.
    #[must_use]
    pub const fn lock_table(&self) -> &Arc<KeyedLockTable> {
        &self.locks
    }

    /// Returns the lock key for the document at `path`: its absolute URL.
    #[must_use]
    pub fn lock_key(&self, path: &str) -> String {
        self.http.api_url().join(path)
    }

    /// Reads the document at `path`, keeping its key order.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] for a 404,
    /// [`ResourceError::Decode`] if the body is not a property map, and
    /// [`ResourceError::Http`] for any other transport or status failure.
    pub async fn fetch(&self, path: &str) -> Result<OrderedPropertyMap, ResourceError> {
        let guard = self.locks.read_lock(&self.lock_key(path)).await;
        let result = self.get(path).await;
        guard.unlock();
        result
    }

    /// Writes `map` to `path` and returns the document the platform stored.
    ///
    /// An empty response body is taken to mean the platform stored `map`
    /// as sent.
    ///
    /// # Errors
    ///
    /// As for [`fetch`](Self::fetch), plus [`ResourceError::Encode`] if the
    /// map cannot be serialized.
    pub async fn replace(
        &self,
        path: &str,
        map: &OrderedPropertyMap,
    ) -> Result<OrderedPropertyMap, ResourceError> {
        let guard = self.locks.lock(&self.lock_key(path)).await;
        let result = self.put(path, map).await;
        guard.unlock();
        result
    }

    /// Applies `f` to the current document at `path` and writes the result
    /// back, holding the document's lock exclusively for the whole cycle.
    ///
    /// # Errors
    ///
    /// As for [`replace`](Self::replace). Nothing is written if the read or
    /// decode fails.
    pub async fn update<F>(&self, path: &str, f: F) -> Result<OrderedPropertyMap, ResourceError>
    where
        F: FnOnce(&mut OrderedPropertyMap),
    {
        let guard = self.locks.lock(&self.lock_key(path)).await;
        let result = async {
            let mut map = self.get(path).await?;
            f(&mut map);
            self.put(path, &map).await
        }
        .await;
        guard.unlock();
        result
    }

    async fn get(&self, path: &str) -> Result<OrderedPropertyMap, ResourceError> {
        let request = HttpRequest::builder(HttpMethod::Get, path)
            .build()
            .map_err(|e| ResourceError::Http(e.into()))?;
        let response = self
            .http
            .request(request)
            .await
            .map_err(|e| ResourceError::from_http_error(path, e))?;
        Self::decode(path, &response)
    }

    async fn put(
        &self,
        path: &str,
        map: &OrderedPropertyMap,
    ) -> Result<OrderedPropertyMap, ResourceError> {
        let request = HttpRequest::builder(HttpMethod::Put, path)
            .body(map.encode()?)
            .build()
            .map_err(|e| ResourceError::Http(e.into()))?;
        let response = self
            .http
            .request(request)
            .await
            .map_err(|e| ResourceError::from_http_error(path, e))?;

        if response.is_empty() {
            return Ok(map.clone());
        }
        Self::decode(path, &response)
    }

    fn decode(path: &str, response: &HttpResponse) -> Result<OrderedPropertyMap, ResourceError> {
        match OrderedPropertyMap::from_slice(&response.body) {
            Ok(map) => {
                tracing::debug!(path, entries = map.len(), "decoded property document");
                Ok(map)
            }
            Err(source) => {
                tracing::warn!(
                    path,
                    request_id = response.request_id(),
                    error = %source,
                    "response is not a property map"
                );
                Err(ResourceError::Decode {
                    path: path.to_string(),
                    source,
                })
            }
        }
    }
}
