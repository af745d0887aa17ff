//! # Item Repository
//!
//! Catalog items. The type column holds the one-letter code (V/D/S/P) and
//! `basePrice` is the catalog price in dollars.

use salesgraph_core::ItemKind;
use sqlx::SqlitePool;
use tracing::debug;

use super::with_key;
use crate::error::{DbError, DbResult};

/// Repository for catalog item database operations.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Inserts a catalog item.
    ///
    /// ## Errors
    /// - `InvalidInput` for a type code other than V, D, S or P
    /// - `UniqueViolation` when the item code is taken
    pub async fn add_item(&self, code: &str, name: &str, type_code: &str, base_price: f64) -> DbResult<i64> {
        let kind = ItemKind::from_code(type_code)
            .ok_or_else(|| DbError::invalid("type", format!("unknown item type '{}'", type_code)))?;
        if !base_price.is_finite() {
            return Err(DbError::invalid("basePrice", "not a finite number"));
        }

        debug!(code, kind = %kind, "Adding item");

        let result = sqlx::query("INSERT INTO Item (code, name, type, basePrice) VALUES (?1, ?2, ?3, ?4)")
            .bind(code)
            .bind(name)
            .bind(kind.as_code())
            .bind(base_price)
            .execute(&self.pool)
            .await
            .map_err(|e| with_key(e, "code", code))?;

        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_add_item_validates_type() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.items().add_item("P01", "Phone", "P", 100.0).await.unwrap();
        db.items().add_item("V01", "Talk", "V", 30.0).await.unwrap();

        let err = db.items().add_item("X01", "Mystery", "X", 1.0).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidInput { ref field, .. } if field == "type"));

        let err = db.items().add_item("P01", "Phone again", "P", 1.0).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "P01"));
    }
}
