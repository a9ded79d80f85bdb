//! Property map for places where order carries no meaning.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::codec::decode_entries;
use super::errors::DecodeError;
use super::{Property, PropertyMap};

/// A name → [`Property`] map with no ordering guarantee.
///
/// Use this where the platform and the caller agree that order is
/// irrelevant. [`items`](PropertyMap::items) and
/// [`encode`](PropertyMap::encode) emit entries sorted by name so encoded
/// output is still reproducible.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnorderedPropertyMap {
    entries: HashMap<String, Property>,
}

impl UnorderedPropertyMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `name` is present.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

impl PropertyMap for UnorderedPropertyMap {
    fn get(&self, name: &str) -> Option<&Property> {
        self.entries.get(name)
    }

    fn set(&mut self, name: impl Into<String>, value: Property) -> bool {
        self.entries.insert(name.into(), value).is_none()
    }

    fn pop(&mut self, name: &str) -> Option<Property> {
        self.entries.remove(name)
    }

    fn init(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entries(&self) -> Vec<(&str, &Property)> {
        let mut entries: Vec<(&str, &Property)> = self
            .entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    fn decode(&mut self, input: &[u8]) -> Result<(), DecodeError> {
        let mut entries = HashMap::new();
        decode_entries(input, |name, property| {
            entries.insert(name, property);
        })?;
        self.entries = entries;
        Ok(())
    }
}

impl<N: Into<String>> FromIterator<(N, Property)> for UnorderedPropertyMap {
    fn from_iter<I: IntoIterator<Item = (N, Property)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_pop() {
        let mut map = UnorderedPropertyMap::new();
        assert!(map.set("a", Property::string()));
        assert!(!map.set("a", Property::integer()));
        assert_eq!(map.get("a"), Some(&Property::integer()));
        assert_eq!(map.pop("a"), Some(Property::integer()));
        assert!(map.pop("a").is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_encode_sorts_by_name() {
        let map: UnorderedPropertyMap = [
            ("zeta", Property::string()),
            ("alpha", Property::boolean()),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            String::from_utf8(map.encode().unwrap()).unwrap(),
            r#"{"alpha":{"type":"boolean"},"zeta":{"type":"string"}}"#
        );
    }

    #[test]
    fn test_decode_shares_structural_errors_with_ordered_map() {
        let mut map = UnorderedPropertyMap::new();
        map.set("kept", Property::string());

        let err = map.decode(b"{\"a\": {\"type\":\"string\"}").unwrap_err();

        assert!(matches!(err, DecodeError::Unexpected { .. }));
        assert!(map.contains_key("kept"));
    }

    #[test]
    fn test_round_trip() {
        let map: UnorderedPropertyMap = [
            ("count", Property::integer()),
            ("name", Property::string().with_title("Name")),
        ]
        .into_iter()
        .collect();

        let mut decoded = UnorderedPropertyMap::new();
        decoded.decode(&map.encode().unwrap()).unwrap();
        assert_eq!(decoded, map);
    }
}
