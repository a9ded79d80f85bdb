//! REST operations on the platform's property documents.
//!
//! - **[`PropertyClient`]**: fetch, replace and read-modify-write property
//!   documents, serialized per document through a
//!   [`KeyedLockTable`](crate::locks::KeyedLockTable)
//! - **[`ResourceError`]**: semantic errors for those operations
//!
//! # Control Flow
//!
//! An update runs entirely under the document's exclusive lock:
//!
//! 1. GET the document and decode it into an
//!    [`OrderedPropertyMap`](crate::property::OrderedPropertyMap), keeping the
//!    platform's key order
//! 2. Let the caller mutate the map
//! 3. Encode it in the same order and PUT it back
//! 4. Decode the platform's answer
//!
//! The lock is released on every exit path, including errors.

mod errors;
mod properties;

pub use errors::ResourceError;
pub use properties::PropertyClient;
