//! Insertion-ordered property map.
//!
//! [`OrderedPropertyMap`] keeps its names in a `Vec` alongside a `HashMap`
//! of values. The vector records first-insertion order; the hash map gives
//! constant-time lookup and overwrite.
//!
//! # Ordering Rules
//!
//! - A name takes its position the first time it is set
//! - Overwriting a value never moves it
//! - Popping removes name and value together; setting the name again later
//!   appends it at the end
//!
//! # Example
//!
//! ```rust
//! use automation_provider::property::{OrderedPropertyMap, Property};
//!
//! let mut map = OrderedPropertyMap::new();
//! assert!(map.set("region", Property::string()));
//! assert!(map.set("count", Property::integer()));
//! assert!(!map.set("region", Property::string().with_title("Region")));
//!
//! let encoded = map.encode().unwrap();
//! let decoded = OrderedPropertyMap::from_slice(&encoded).unwrap();
//! assert_eq!(decoded.items(), map.items());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::codec::{decode_entries, encode_entries};
use super::errors::DecodeError;
use super::{Property, PropertyMap};

/// A name → [`Property`] map that remembers first-insertion order.
///
/// Equality is order-sensitive: two maps with the same entries in a
/// different order are not equal.
#[derive(Clone, Debug, Default)]
pub struct OrderedPropertyMap {
    names: Vec<String>,
    values: HashMap<String, Property>,
}

impl OrderedPropertyMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a map from a JSON object, keeping the source key order.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the input is not a single well-formed
    /// object of property descriptors.
    pub fn from_slice(input: &[u8]) -> Result<Self, DecodeError> {
        let mut map = Self::new();
        map.decode(input)?;
        Ok(map)
    }

    /// Resets the map to empty.
    pub fn init(&mut self) {
        self.names.clear();
        self.values.clear();
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns `true` if `name` is present.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.values.get(name)
    }

    /// Returns a mutable reference to the value stored under `name`.
    ///
    /// Changing a value in place leaves its position untouched.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.values.get_mut(name)
    }

    /// Returns the value stored under `name`, or the zero-value
    /// [`Property`] if absent.
    #[must_use]
    pub fn get_or_default(&self, name: &str) -> Property {
        self.values.get(name).cloned().unwrap_or_default()
    }

    /// Inserts or overwrites an entry.
    ///
    /// Returns `true` if `name` was new (and was appended to the order),
    /// `false` if an existing value was replaced in place.
    pub fn set(&mut self, name: impl Into<String>, value: Property) -> bool {
        let name = name.into();
        if let Some(slot) = self.values.get_mut(&name) {
            *slot = value;
            return false;
        }
        self.names.push(name.clone());
        self.values.insert(name, value);
        true
    }

    /// Removes `name` and returns its value, or `None` if it was absent.
    ///
    /// The remaining entries keep their relative order.
    pub fn pop(&mut self, name: &str) -> Option<Property> {
        let value = self.values.remove(name)?;
        if let Some(index) = self.names.iter().position(|n| n == name) {
            self.names.remove(index);
        }
        Some(value)
    }

    /// Returns the names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            names: self.names.iter(),
            values: &self.values,
        }
    }

    /// Returns an owned snapshot of the entries in insertion order.
    ///
    /// The snapshot is independent of the map: later changes to the map do
    /// not show up in it.
    #[must_use]
    pub fn items(&self) -> Vec<(String, Property)> {
        self.iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    /// Serializes the map as a JSON object with keys in insertion order.
    ///
    /// Encoding the same map twice yields identical bytes.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error if a value fails to serialize.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        encode_entries(self.iter())
    }

    /// Replaces the contents of the map with the entries of a JSON object,
    /// in the order they appear in `input`.
    ///
    /// On error the map keeps its previous contents.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] naming the structural expectation that failed,
    /// or the entry whose value is not a property descriptor.
    pub fn decode(&mut self, input: &[u8]) -> Result<(), DecodeError> {
        let mut decoded = Self::new();
        let count = decode_entries(input, |name, property| {
            decoded.set(name, property);
        })?;
        tracing::trace!(entries = count, unique = decoded.len(), "decoded ordered property map");
        *self = decoded;
        Ok(())
    }
}

/// Borrowing iterator over an [`OrderedPropertyMap`] in insertion order.
#[derive(Debug)]
pub struct Iter<'a> {
    names: std::slice::Iter<'a, String>,
    values: &'a HashMap<String, Property>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Property);

    fn next(&mut self) -> Option<Self::Item> {
        let values = self.values;
        self.names
            .by_ref()
            .find_map(|name| values.get(name).map(|value| (name.as_str(), value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.names.len()))
    }
}

impl<'a> IntoIterator for &'a OrderedPropertyMap {
    type Item = (&'a str, &'a Property);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for OrderedPropertyMap {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names && self.values == other.values
    }
}

impl<N: Into<String>> FromIterator<(N, Property)> for OrderedPropertyMap {
    fn from_iter<I: IntoIterator<Item = (N, Property)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<N: Into<String>> Extend<(N, Property)> for OrderedPropertyMap {
    fn extend<I: IntoIterator<Item = (N, Property)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.set(name, value);
        }
    }
}

impl FromStr for OrderedPropertyMap {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(s.as_bytes())
    }
}

impl PropertyMap for OrderedPropertyMap {
    fn get(&self, name: &str) -> Option<&Property> {
        Self::get(self, name)
    }

    fn set(&mut self, name: impl Into<String>, value: Property) -> bool {
        Self::set(self, name, value)
    }

    fn pop(&mut self, name: &str) -> Option<Property> {
        Self::pop(self, name)
    }

    fn init(&mut self) {
        Self::init(self);
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn entries(&self) -> Vec<(&str, &Property)> {
        self.iter().collect()
    }

    fn decode(&mut self, input: &[u8]) -> Result<(), DecodeError> {
        Self::decode(self, input)
    }
}

impl Serialize for OrderedPropertyMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct OrderedPropertyMapVisitor;

impl<'de> Visitor<'de> for OrderedPropertyMapVisitor {
    type Value = OrderedPropertyMap;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object of property descriptors")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = OrderedPropertyMap::new();
        while let Some((name, value)) = access.next_entry::<String, Property>()? {
            if name.is_empty() {
                return Err(de::Error::custom("property names must be non-empty"));
            }
            map.set(name, value);
        }
        Ok(map)
    }
}

/// Entries are set in the order the deserializer visits them, which for
/// `serde_json` is the order of the source text.
impl<'de> Deserialize<'de> for OrderedPropertyMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(OrderedPropertyMapVisitor)
    }
}

// Verify OrderedPropertyMap is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OrderedPropertyMap>();
};
