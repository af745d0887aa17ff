//! # Domain Types
//!
//! Core entities of the sales graph.
//!
//! ## Entity Graph
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Person      │   │      Store      │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  uuid (key)     │◄──│  manager        │◄──│  store          │       │
//! │  │  last / first   │   │  code (key)     │   │  code (key)     │       │
//! │  │  address        │   │  address        │   │  customer ──────┼──► Person
//! │  │  emails[]       │   └─────────────────┘   │  salesperson ───┼──► Person
//! │  └─────────────────┘                         │  date           │       │
//! │                                              │  items[] (Item) │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sharing Model
//! Registries own their entities behind `Arc`. A link from one entity to
//! another is a clone of that `Arc`, never a copy of the entity. Links only
//! point at entities from an earlier pipeline stage, so the graph is acyclic;
//! the Store → Sales direction lives in [`crate::loader::SalesGraph`].

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::item::Item;

// =============================================================================
// Address
// =============================================================================

/// A postal address. Every part is an opaque string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        Address {
            street: street.into(),
            city: city.into(),
            state: state.into(),
            zip: zip.into(),
        }
    }
}

// =============================================================================
// Person
// =============================================================================

/// A customer, salesperson, store manager or servicer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    /// Natural key.
    pub uuid: String,

    /// `None` only on a placeholder.
    pub last_name: Option<String>,

    /// `None` only on a placeholder.
    pub first_name: Option<String>,

    /// `None` only on a placeholder.
    pub address: Option<Address>,

    /// Append-only, in file order.
    pub emails: Vec<String>,
}

impl Person {
    /// Creates a fully described person with no emails yet.
    pub fn new(
        uuid: impl Into<String>,
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        address: Address,
    ) -> Self {
        Person {
            uuid: uuid.into(),
            last_name: Some(last_name.into()),
            first_name: Some(first_name.into()),
            address: Some(address),
            emails: Vec::new(),
        }
    }

    /// Creates a person known only by uuid.
    ///
    /// Used when a store names a manager that was never loaded.
    pub fn placeholder(uuid: impl Into<String>) -> Self {
        Person {
            uuid: uuid.into(),
            last_name: None,
            first_name: None,
            address: None,
            emails: Vec::new(),
        }
    }

    /// Returns true if this person was synthesized from a bare uuid.
    pub fn is_placeholder(&self) -> bool {
        self.last_name.is_none() && self.first_name.is_none() && self.address.is_none()
    }

    pub fn add_email(&mut self, email: impl Into<String>) {
        self.emails.push(email.into());
    }

    pub fn last_name_or_empty(&self) -> &str {
        self.last_name.as_deref().unwrap_or("")
    }

    pub fn first_name_or_empty(&self) -> &str {
        self.first_name.as_deref().unwrap_or("")
    }

    /// Renders `"Last, First"`. Missing parts render empty.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name_or_empty(), self.first_name_or_empty())
    }
}

// =============================================================================
// Store
// =============================================================================

/// A retail location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Store {
    /// Natural key.
    pub code: String,

    /// May be a placeholder person.
    pub manager: Arc<Person>,

    pub address: Address,
}

impl Store {
    pub fn new(code: impl Into<String>, manager: Arc<Person>, address: Address) -> Self {
        Store {
            code: code.into(),
            manager,
            address,
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A sales transaction with its sale-line items.
///
/// ## Equality
/// Two sales are equal when their code, date and item lines are equal.
/// Store, customer and salesperson do not take part.
#[derive(Debug, Clone, Serialize)]
pub struct Sale {
    /// Natural key.
    pub code: String,
    pub store: Arc<Store>,
    pub customer: Arc<Person>,
    pub salesperson: Arc<Person>,
    pub date: NaiveDate,

    /// Sale-line items in load order.
    pub items: Vec<Item>,
}

impl Sale {
    pub fn new(
        code: impl Into<String>,
        store: Arc<Store>,
        customer: Arc<Person>,
        salesperson: Arc<Person>,
        date: NaiveDate,
    ) -> Self {
        Sale {
            code: code.into(),
            store,
            customer,
            salesperson,
            date,
            items: Vec::new(),
        }
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }
}

impl PartialEq for Sale {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.date == other.date && self.items == other.items
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Item, Purchase};
    use crate::money::UnitPrice;

    fn person(uuid: &str, last: &str, first: &str) -> Arc<Person> {
        Arc::new(Person::new(
            uuid,
            last,
            first,
            Address::new("1 Main St", "Lincoln", "NE", "68508"),
        ))
    }

    fn store(code: &str, manager: Arc<Person>) -> Arc<Store> {
        Arc::new(Store::new(
            code,
            manager,
            Address::new("9 Elm St", "Omaha", "NE", "68102"),
        ))
    }

    #[test]
    fn test_placeholder_person() {
        let p = Person::placeholder("abc-123");
        assert!(p.is_placeholder());
        assert_eq!(p.uuid, "abc-123");
        assert_eq!(p.display_name(), ", ");
        assert!(p.emails.is_empty());
    }

    #[test]
    fn test_display_name_and_emails() {
        let mut p = Person::new(
            "u1",
            "Lovelace",
            "Ada",
            Address::new("1 Main St", "Lincoln", "NE", "68508"),
        );
        p.add_email("ada@example.com");
        p.add_email("ada@work.example.com");
        assert!(!p.is_placeholder());
        assert_eq!(p.display_name(), "Lovelace, Ada");
        assert_eq!(p.emails, vec!["ada@example.com", "ada@work.example.com"]);
    }

    #[test]
    fn test_sale_equality_ignores_parties() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let line = Item::Purchase(Purchase::new("P01", "Phone", UnitPrice::new(100.0)));

        let mut a = Sale::new(
            "S001",
            store("ST1", person("m1", "Hopper", "Grace")),
            person("c1", "Turing", "Alan"),
            person("e1", "Knuth", "Donald"),
            date,
        );
        let mut b = Sale::new(
            "S001",
            store("ST2", person("m2", "Ritchie", "Dennis")),
            person("c2", "Liskov", "Barbara"),
            person("e2", "Dijkstra", "Edsger"),
            date,
        );
        a.add_item(line.clone());
        b.add_item(line);
        assert_eq!(a, b);

        b.add_item(Item::Purchase(Purchase::new("P02", "Case", UnitPrice::new(5.0))));
        assert_ne!(a, b);
    }

    #[test]
    fn test_sale_equality_checks_date() {
        let c = person("c1", "Turing", "Alan");
        let st = store("ST1", c.clone());
        let a = Sale::new("S001", st.clone(), c.clone(), c.clone(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let b = Sale::new("S001", st, c.clone(), c, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert_ne!(a, b);
    }
}
