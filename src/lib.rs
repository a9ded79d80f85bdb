//! # Automation Provider Core
//!
//! Building blocks for a provider that maps declarative resources onto the
//! REST API of a remote automation platform.
//!
//! ## Overview
//!
//! - [`property`]: typed property descriptors and the
//!   [`OrderedPropertyMap`](property::OrderedPropertyMap), which round-trips
//!   both its entries and their order through JSON
//! - [`locks`]: [`KeyedLockTable`](locks::KeyedLockTable), one reader/writer
//!   lock per remote object, so conflicting operations on the same object are
//!   serialized without a global lock
//! - [`rest`]: [`PropertyClient`](rest::PropertyClient), which reads and
//!   writes property documents under those locks
//! - [`clients`]: the HTTP client underneath
//! - [`config`]: validated provider configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use automation_provider::property::{OrderedPropertyMap, Property};
//!
//! let mut inputs = OrderedPropertyMap::new();
//! inputs.set("hostname", Property::string().with_title("Host name"));
//! inputs.set("cpu", Property::integer().with_default(2));
//! inputs.set("flavor", Property::string());
//!
//! let wire = inputs.encode().unwrap();
//! let decoded = OrderedPropertyMap::from_slice(&wire).unwrap();
//!
//! let names: Vec<&str> = decoded.keys().collect();
//! assert_eq!(names, ["hostname", "cpu", "flavor"]);
//! ```
//!
//! ## Talking to the Platform
//!
//! ```rust,ignore
//! use automation_provider::{AccessToken, ApiUrl, ProviderConfig};
//! use automation_provider::clients::HttpClient;
//! use automation_provider::property::Property;
//! use automation_provider::rest::PropertyClient;
//!
//! let config = ProviderConfig::builder()
//!     .api_url(ApiUrl::new("https://automation.example.com/api")?)
//!     .access_token(AccessToken::new(token)?)
//!     .build()?;
//!
//! let client = PropertyClient::new(HttpClient::new(&config)?);
//! client
//!     .update("/resources/web/schema", |schema| {
//!         schema.set("zone", Property::string());
//!     })
//!     .await?;
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events and never
//! installs a subscriber. Lock activity is logged at `trace`, requests and
//! decoded documents at `debug`, undecodable responses at `warn`.

pub mod clients;
pub mod config;
pub mod error;
pub mod locks;
pub mod property;
pub mod rest;

pub use config::{AccessToken, ApiUrl, ApiVersion, ProviderConfig, ProviderConfigBuilder};
pub use error::ConfigError;

pub use clients::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};
pub use locks::KeyedLockTable;
pub use property::{OrderedPropertyMap, Property, PropertyMap, UnorderedPropertyMap};
pub use rest::{PropertyClient, ResourceError};
