//! # Entity Registry
//!
//! Natural key → entity maps, one per entity kind.
//!
//! A registry keeps entities in the order they were first inserted, so
//! anything iterating it (reports, exports) sees the load order of the
//! source rows. A key can only be inserted once.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::ValidationError;
use crate::item::Item;
use crate::types::{Person, Sale, Store};

// =============================================================================
// Keyed Trait
// =============================================================================

/// An entity with a natural key.
pub trait Keyed {
    /// Entity name used in logs and errors.
    const KIND: &'static str;

    fn key(&self) -> &str;
}

impl Keyed for Person {
    const KIND: &'static str = "Person";

    fn key(&self) -> &str {
        &self.uuid
    }
}

impl Keyed for Store {
    const KIND: &'static str = "Store";

    fn key(&self) -> &str {
        &self.code
    }
}

impl Keyed for Item {
    const KIND: &'static str = "Item";

    fn key(&self) -> &str {
        self.code()
    }
}

impl Keyed for Sale {
    const KIND: &'static str = "Sale";

    fn key(&self) -> &str {
        &self.code
    }
}

impl<T: Keyed> Keyed for Arc<T> {
    const KIND: &'static str = T::KIND;

    fn key(&self) -> &str {
        self.as_ref().key()
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Insertion-ordered map from natural key to entity.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Registry<T> {
    entries: IndexMap<String, T>,
}

impl<T: Keyed> Registry<T> {
    pub fn new() -> Self {
        Registry {
            entries: IndexMap::new(),
        }
    }

    /// Inserts an entity under its own key.
    ///
    /// ## Errors
    /// `ValidationError::Duplicate` if the key is already present. The
    /// existing entry is left untouched.
    pub fn insert(&mut self, value: T) -> Result<(), ValidationError> {
        let key = value.key().to_string();
        if self.entries.contains_key(&key) {
            return Err(ValidationError::Duplicate {
                field: T::KIND.to_string(),
                value: key,
            });
        }
        self.entries.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    /// Mutable access for the pipeline stage that is still building `T`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.entries.get_mut(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<T: Keyed> Default for Registry<T> {
    fn default() -> Self {
        Registry::new()
    }
}

impl<'a, T> IntoIterator for &'a Registry<T> {
    type Item = &'a T;
    type IntoIter = indexmap::map::Values<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Address;

    fn person(uuid: &str, last: &str) -> Arc<Person> {
        Arc::new(Person::new(
            uuid,
            last,
            "Test",
            Address::new("1 Main St", "Lincoln", "NE", "68508"),
        ))
    }

    #[test]
    fn test_insert_and_get() {
        let mut registry: Registry<Arc<Person>> = Registry::new();
        assert!(registry.is_empty());
        registry.insert(person("u1", "Turing")).unwrap();
        registry.insert(person("u2", "Hopper")).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("u1"));
        assert_eq!(registry.get("u2").unwrap().last_name.as_deref(), Some("Hopper"));
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_key_rejected_first_kept() {
        let mut registry: Registry<Arc<Person>> = Registry::new();
        registry.insert(person("u1", "Turing")).unwrap();
        let err = registry.insert(person("u1", "Impostor")).unwrap_err();

        assert_eq!(
            err,
            ValidationError::Duplicate {
                field: "Person".to_string(),
                value: "u1".to_string()
            }
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("u1").unwrap().last_name.as_deref(), Some("Turing"));
    }

    #[test]
    fn test_iteration_keeps_insertion_order() {
        let mut registry: Registry<Arc<Person>> = Registry::new();
        for uuid in ["c", "a", "b"] {
            registry.insert(person(uuid, "X")).unwrap();
        }
        let keys: Vec<&str> = registry.keys().collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
        let uuids: Vec<&str> = (&registry).into_iter().map(|p| p.uuid.as_str()).collect();
        assert_eq!(uuids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_serializes_as_map() {
        let mut registry: Registry<Arc<Person>> = Registry::new();
        registry.insert(person("u1", "Turing")).unwrap();
        let json = serde_json::to_value(&registry).unwrap();
        assert_eq!(json["u1"]["last_name"], "Turing");
    }
}
