//! Free-form annotations on shelf entries
//!
//! Distinct from the five-dimension [`crate::tags::Tag`]: these are arbitrary
//! string pairs a caller attaches for its own bookkeeping.
//!
//! Keys are unique and keep their first insertion position; inserting an
//! existing key replaces its value in place. Keys and values compare
//! byte-for-byte, so matching is case-sensitive.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Small insertion-ordered string map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    pairs: Vec<(String, String)>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace; returns the previous value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.pairs.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// True when every pair in `filter` is present here with an equal value.
    /// Extra keys on `self` are ignored; an empty filter matches everything.
    pub fn contains_all(&self, filter: &TagMap) -> bool {
        filter
            .iter()
            .all(|(k, v)| self.get(k).is_some_and(|own| own == v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TagMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for TagMap {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl Serialize for TagMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pairs.len()))?;
        for (k, v) in &self.pairs {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = TagMap::from([("a", "1"), ("b", "2")]);
        let previous = map.insert("a", "3");

        assert_eq!(previous.as_deref(), Some("1"));
        assert_eq!(map.len(), 2);
        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(map.get("a"), Some("3"));
    }

    #[test]
    fn test_superset_match() {
        let entry = TagMap::from([("layer", "orient"), ("lang", "rust")]);

        assert!(entry.contains_all(&TagMap::new()));
        assert!(entry.contains_all(&TagMap::from([("layer", "orient")])));
        assert!(!entry.contains_all(&TagMap::from([("layer", "execute")])));
        assert!(!entry.contains_all(&TagMap::from([("missing", "orient")])));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let entry = TagMap::from([("Layer", "Orient")]);
        assert!(!entry.contains_all(&TagMap::from([("layer", "Orient")])));
        assert!(!entry.contains_all(&TagMap::from([("Layer", "orient")])));
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let map = TagMap::new().with("z", "1").with("a", "2");
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"z":"1","a":"2"}"#);
    }
}
