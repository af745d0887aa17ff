//! # Repository Module
//!
//! The "add*" sink: insert operations that persist a sales graph piece by
//! piece, each addressed by natural keys.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sink Repositories                                    │
//! │                                                                         │
//! │  seed binary / tests                                                   │
//! │       │                                                                 │
//! │       │  db.sales().add_lease_to_sale("S001", "P01", start, end)       │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── natural key → generated id (lookup_id)                            │
//! │  └── INSERT with generated ids                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Callers never see generated ids of other tables. A natural key        │
//! │  that does not resolve is DbError::NotFound and nothing is written.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`PersonRepository`](person::PersonRepository) - Addresses, persons, emails
//! - [`StoreRepository`](store::StoreRepository) - Stores
//! - [`ItemRepository`](item::ItemRepository) - Catalog items
//! - [`SaleRepository`](sale::SaleRepository) - Sales and every sale-line variant

pub mod item;
pub mod person;
pub mod sale;
pub mod store;

use sqlx::SqlitePool;

use crate::error::{DbError, DbResult};

/// Resolves a natural key to its generated integer id.
///
/// `sql` must select exactly one integer column and bind the key as `?1`.
pub(crate) async fn lookup_id(pool: &SqlitePool, sql: &str, key: &str, entity: &str) -> DbResult<i64> {
    let id: Option<i64> = sqlx::query_scalar(sql)
        .bind(key)
        .fetch_optional(pool)
        .await?;

    id.ok_or_else(|| DbError::not_found(entity, key))
}

/// Returns the id of an identical address row, inserting one if none exists.
pub(crate) async fn find_or_insert_address(
    pool: &SqlitePool,
    street: &str,
    city: &str,
    state: &str,
    zip: &str,
) -> DbResult<i64> {
    let existing: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT addressId FROM Address
        WHERE street = ?1 AND city = ?2 AND state = ?3 AND zip = ?4
        LIMIT 1
        "#,
    )
    .bind(street)
    .bind(city)
    .bind(state)
    .bind(zip)
    .fetch_optional(pool)
    .await?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let result = sqlx::query("INSERT INTO Address (street, city, state, zip) VALUES (?1, ?2, ?3, ?4)")
        .bind(street)
        .bind(city)
        .bind(state)
        .bind(zip)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Maps a unique violation to a duplicate error carrying the offending key.
pub(crate) fn with_key(err: sqlx::Error, field: &str, value: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { .. } => DbError::duplicate(field, value),
        other => other,
    }
}
