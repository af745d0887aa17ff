//! # Store Repository

use sqlx::SqlitePool;
use tracing::debug;

use super::{find_or_insert_address, lookup_id, with_key};
use crate::error::DbResult;

/// Repository for store database operations.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StoreRepository { pool }
    }

    /// Inserts a store managed by an existing person.
    ///
    /// ## Errors
    /// - `NotFound` when the manager uuid is unknown (nothing is written)
    /// - `UniqueViolation` when the store code is taken
    pub async fn add_store(
        &self,
        code: &str,
        manager_uuid: &str,
        street: &str,
        city: &str,
        state: &str,
        zip: &str,
    ) -> DbResult<i64> {
        debug!(code, manager = manager_uuid, "Adding store");

        let manager_id = lookup_id(
            &self.pool,
            "SELECT personId FROM Person WHERE uuid = ?1",
            manager_uuid,
            "Person",
        )
        .await?;
        let address_id = find_or_insert_address(&self.pool, street, city, state, zip).await?;

        let result = sqlx::query("INSERT INTO Store (storeCode, personId, addressId) VALUES (?1, ?2, ?3)")
            .bind(code)
            .bind(manager_id)
            .bind(address_id)
            .execute(&self.pool)
            .await
            .map_err(|e| with_key(e, "storeCode", code))?;

        Ok(result.last_insert_rowid())
    }
}
