//! # Reference Resolver
//!
//! Turns natural keys embedded in a row into live references from a
//! completed registry.
//!
//! ## Policy
//! ```text
//! ┌──────────────────────┬──────────────┬─────────────────────────────────┐
//! │ Reference            │ Registry     │ When missing                    │
//! ├──────────────────────┼──────────────┼─────────────────────────────────┤
//! │ Store manager        │ Person       │ placeholder Person (uuid only)  │
//! │ Sale customer        │ Person       │ HardFail                        │
//! │ Sale salesperson     │ Person       │ HardFail                        │
//! │ Sale store           │ Store        │ HardFail                        │
//! │ Service servicer     │ Person       │ HardFail                        │
//! └──────────────────────┴──────────────┴─────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::error::{LoadError, LoadResult};
use crate::registry::Registry;
use crate::types::{Person, Store};

/// Role a person reference plays in the row that names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonRole {
    Manager,
    Customer,
    Salesperson,
    Servicer,
}

impl PersonRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PersonRole::Manager => "manager",
            PersonRole::Customer => "customer",
            PersonRole::Salesperson => "salesperson",
            PersonRole::Servicer => "servicer",
        }
    }
}

/// Read-only view over the registries loaded by earlier stages.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    persons: &'a Registry<Arc<Person>>,
    stores: Option<&'a Registry<Arc<Store>>>,
}

impl<'a> Resolver<'a> {
    /// A resolver that can only answer person lookups.
    pub fn persons(persons: &'a Registry<Arc<Person>>) -> Self {
        Resolver {
            persons,
            stores: None,
        }
    }

    pub fn new(persons: &'a Registry<Arc<Person>>, stores: &'a Registry<Arc<Store>>) -> Self {
        Resolver {
            persons,
            stores: Some(stores),
        }
    }

    /// Strict person lookup.
    ///
    /// ## Errors
    /// `LoadError::MissingReference` naming the role and the referencing
    /// entity.
    pub fn person(&self, uuid: &str, role: PersonRole, context: &str) -> LoadResult<Arc<Person>> {
        self.persons.get(uuid).cloned().ok_or_else(|| {
            LoadError::missing("Person", uuid, format!("{} of {}", role.as_str(), context))
        })
    }

    /// Lenient manager lookup: an unknown uuid yields a placeholder person.
    ///
    /// The placeholder is not added to the person registry.
    pub fn manager(&self, uuid: &str, store_code: &str) -> Arc<Person> {
        match self.persons.get(uuid) {
            Some(person) => person.clone(),
            None => {
                debug!(
                    store_code = %store_code,
                    manager_uuid = %uuid,
                    "manager not loaded, using placeholder"
                );
                Arc::new(Person::placeholder(uuid))
            }
        }
    }

    /// Strict store lookup.
    pub fn store(&self, code: &str, context: &str) -> LoadResult<Arc<Store>> {
        self.stores
            .and_then(|stores| stores.get(code))
            .cloned()
            .ok_or_else(|| LoadError::missing("Store", code, context))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Address;

    fn persons() -> Registry<Arc<Person>> {
        let mut registry = Registry::new();
        registry
            .insert(Arc::new(Person::new(
                "c1",
                "Turing",
                "Alan",
                Address::new("1 Main St", "Lincoln", "NE", "68508"),
            )))
            .unwrap();
        registry
    }

    fn stores(persons: &Registry<Arc<Person>>) -> Registry<Arc<Store>> {
        let mut registry = Registry::new();
        let manager = persons.get("c1").unwrap().clone();
        registry
            .insert(Arc::new(Store::new(
                "ST1",
                manager,
                Address::new("9 Elm St", "Omaha", "NE", "68102"),
            )))
            .unwrap();
        registry
    }

    #[test]
    fn test_strict_person_lookup() {
        let persons = persons();
        let resolver = Resolver::persons(&persons);

        let found = resolver.person("c1", PersonRole::Customer, "sale S001").unwrap();
        assert!(Arc::ptr_eq(&found, persons.get("c1").unwrap()));

        let err = resolver
            .person("ghost", PersonRole::Salesperson, "sale S001")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Person 'ghost' referenced by salesperson of sale S001 was not found"
        );
    }

    #[test]
    fn test_manager_placeholder() {
        let persons = persons();
        let resolver = Resolver::persons(&persons);

        let manager = resolver.manager("m-404", "ST9");
        assert!(manager.is_placeholder());
        assert_eq!(manager.uuid, "m-404");
        assert!(!persons.contains("m-404"));

        assert!(!resolver.manager("c1", "ST1").is_placeholder());
    }

    #[test]
    fn test_store_lookup() {
        let persons = persons();
        let stores = stores(&persons);
        let resolver = Resolver::new(&persons, &stores);

        assert_eq!(resolver.store("ST1", "sale S001").unwrap().code, "ST1");
        assert!(matches!(
            resolver.store("ST9", "sale S001"),
            Err(LoadError::MissingReference { kind: "Store", .. })
        ));
        assert!(Resolver::persons(&persons).store("ST1", "sale S001").is_err());
    }
}
