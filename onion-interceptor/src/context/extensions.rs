//! Open key/value storage attached to an invocation context.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Arbitrary keyed data middleware attach to a context.
///
/// Unlike the well-known context fields, entries here are free-form. Writing
/// an existing key replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Extensions {
    data: HashMap<String, serde_json::Value>,
}

impl Extensions {
    /// Creates an empty set of extensions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates extensions from existing data.
    #[must_use]
    pub fn from_data(data: HashMap<String, serde_json::Value>) -> Self {
        Self { data }
    }

    /// Gets a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Gets a mutable reference to a value.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut serde_json::Value> {
        self.data.get_mut(key)
    }

    /// Gets a value and deserializes it into `T`.
    ///
    /// Returns `None` when the key is missing or has a different shape.
    #[must_use]
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Checks if a key exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Inserts a value, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Option<serde_json::Value> {
        self.data.insert(key.into(), value.into())
    }

    /// Removes a value.
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns all keys.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    /// Returns a copy of all data.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        self.data.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_and_get() {
        let mut ext = Extensions::new();
        ext.insert("token", "abc");

        assert_eq!(ext.get("token"), Some(&json!("abc")));
        assert!(ext.contains_key("token"));
        assert!(!ext.contains_key("other"));
    }

    #[test]
    fn test_insert_overwrites() {
        let mut ext = Extensions::new();
        assert!(ext.insert("attempt", 1).is_none());

        let previous = ext.insert("attempt", 2);
        assert_eq!(previous, Some(json!(1)));
        assert_eq!(ext.get("attempt"), Some(&json!(2)));
    }

    #[test]
    fn test_get_as() {
        let mut ext = Extensions::new();
        ext.insert("elapsed_ms", 12.5);
        ext.insert("tags", json!(["a", "b"]));

        assert_eq!(ext.get_as::<f64>("elapsed_ms"), Some(12.5));
        assert_eq!(
            ext.get_as::<Vec<String>>("tags"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(ext.get_as::<u32>("tags"), None);
    }

    #[test]
    fn test_remove() {
        let mut ext = Extensions::new();
        ext.insert("k", true);

        assert_eq!(ext.remove("k"), Some(json!(true)));
        assert!(ext.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut ext = Extensions::new();
        ext.insert("a", 1);

        let value = serde_json::to_value(&ext).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }
}
