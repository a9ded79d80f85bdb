//! Property descriptors and the maps that carry them over the wire.
//!
//! This module provides:
//!
//! - **[`Property`]**: a typed, constrained descriptor, one variant per shape
//! - **[`OrderedPropertyMap`]**: name → property, preserving first-insertion
//!   order through encode and decode
//! - **[`UnorderedPropertyMap`]**: the same entries where order is irrelevant
//! - **[`PropertyMap`]**: the contract both maps share
//! - **[`DecodeError`]**, **[`PropertyError`]**, **[`ValidationError`]**
//!
//! # Why Two Maps
//!
//! The platform returns property sets as JSON objects. JSON objects carry no
//! ordering guarantee, yet inputs and custom resource fields are presented
//! to users in the order they were declared. [`OrderedPropertyMap`] encodes
//! keys straight from its own order and decodes by reading the object token
//! by token, so nothing ever passes through an unordered map on the way.
//! [`UnorderedPropertyMap`] makes the opposite choice explicit.
//!
//! # Example
//!
//! ```rust
//! use automation_provider::property::{OrderedPropertyMap, Property, PropertyMap};
//!
//! fn names<M: PropertyMap>(map: &M) -> Vec<String> {
//!     map.items().into_iter().map(|(name, _)| name).collect()
//! }
//!
//! let map = OrderedPropertyMap::from_slice(
//!     br#"{"zone": {"type": "string"}, "cpu": {"type": "integer", "minimum": 1}}"#,
//! )
//! .unwrap();
//!
//! assert_eq!(names(&map), vec!["zone", "cpu"]);
//! ```

mod codec;
mod errors;
mod ordered;
mod schema;
mod unordered;
mod validate;

pub use errors::{DecodeError, Expected, Found, PropertyError, ValidationError};
pub use ordered::{Iter, OrderedPropertyMap};
pub use schema::{
    ArrayProperty, BooleanProperty, NumericProperty, ObjectProperty, Property, PropertyMeta,
    PropertyType, ReferenceProperty, StringProperty,
};
pub use unordered::UnorderedPropertyMap;

/// Operations shared by [`OrderedPropertyMap`] and [`UnorderedPropertyMap`].
///
/// None of the in-memory operations fail; absence is reported through
/// `Option`. Only [`decode`](Self::decode) returns an error.
pub trait PropertyMap: Default {
    /// Returns the value stored under `name`.
    fn get(&self, name: &str) -> Option<&Property>;

    /// Inserts or overwrites. Returns `true` if `name` was not present.
    fn set(&mut self, name: impl Into<String>, value: Property) -> bool;

    /// Removes and returns the value stored under `name`.
    fn pop(&mut self, name: &str) -> Option<Property>;

    /// Resets the map to empty.
    fn init(&mut self);

    /// Returns the number of entries.
    fn len(&self) -> usize;

    /// Borrows every entry in the map's iteration order.
    fn entries(&self) -> Vec<(&str, &Property)>;

    /// Replaces the contents with the entries of a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the input is not a single well-formed
    /// object of property descriptors. The map is unchanged on error.
    fn decode(&mut self, input: &[u8]) -> Result<(), DecodeError>;

    /// Returns `true` if the map holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the value stored under `name`, or the zero-value property.
    fn get_or_default(&self, name: &str) -> Property {
        self.get(name).cloned().unwrap_or_default()
    }

    /// Returns an owned snapshot of every entry in iteration order.
    fn items(&self) -> Vec<(String, Property)> {
        self.entries()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    /// Serializes the map as a JSON object in iteration order.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error if a value fails to serialize.
    fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        codec::encode_entries(self.entries())
    }
}
