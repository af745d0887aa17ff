//! # Person Repository
//!
//! Inserts addresses, persons and their email addresses.

use sqlx::SqlitePool;
use tracing::debug;

use super::{find_or_insert_address, lookup_id, with_key};
use crate::error::DbResult;

const PERSON_ID_BY_UUID: &str = "SELECT personId FROM Person WHERE uuid = ?1";

/// Repository for person database operations.
#[derive(Debug, Clone)]
pub struct PersonRepository {
    pool: SqlitePool,
}

impl PersonRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PersonRepository { pool }
    }

    /// Inserts an address, returning its generated id.
    ///
    /// Always inserts; use [`add_person`](Self::add_person) to share an
    /// identical existing address.
    pub async fn add_address(&self, street: &str, city: &str, state: &str, zip: &str) -> DbResult<i64> {
        let result = sqlx::query("INSERT INTO Address (street, city, state, zip) VALUES (?1, ?2, ?3, ?4)")
            .bind(street)
            .bind(city)
            .bind(state)
            .bind(zip)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Inserts a person with their address.
    ///
    /// ## Errors
    /// `UniqueViolation` when the uuid is already taken.
    #[allow(clippy::too_many_arguments)]
    pub async fn add_person(
        &self,
        uuid: &str,
        first_name: &str,
        last_name: &str,
        street: &str,
        city: &str,
        state: &str,
        zip: &str,
    ) -> DbResult<i64> {
        debug!(uuid, "Adding person");

        let address_id = find_or_insert_address(&self.pool, street, city, state, zip).await?;

        let result = sqlx::query(
            "INSERT INTO Person (uuid, lastName, firstName, addressId) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(uuid)
        .bind(last_name)
        .bind(first_name)
        .bind(address_id)
        .execute(&self.pool)
        .await
        .map_err(|e| with_key(e, "uuid", uuid))?;

        Ok(result.last_insert_rowid())
    }

    /// Attaches an email address to an existing person.
    ///
    /// ## Errors
    /// `NotFound` when no person has this uuid.
    pub async fn add_email(&self, uuid: &str, email: &str) -> DbResult<i64> {
        let person_id = lookup_id(&self.pool, PERSON_ID_BY_UUID, uuid, "Person").await?;

        let result = sqlx::query("INSERT INTO Email (email, personId) VALUES (?1, ?2)")
            .bind(email)
            .bind(person_id)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Resolves a person uuid to the generated id.
    pub async fn id_of(&self, uuid: &str) -> DbResult<i64> {
        lookup_id(&self.pool, PERSON_ID_BY_UUID, uuid, "Person").await
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_add_person_shares_identical_address() {
        let db = db().await;
        let persons = db.persons();
        persons
            .add_person("u1", "Ada", "Lovelace", "1 Main St", "Lincoln", "NE", "68508")
            .await
            .unwrap();
        persons
            .add_person("u2", "Alan", "Turing", "1 Main St", "Lincoln", "NE", "68508")
            .await
            .unwrap();

        let addresses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Address")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(addresses, 1);
    }

    #[tokio::test]
    async fn test_duplicate_uuid() {
        let db = db().await;
        let persons = db.persons();
        persons
            .add_person("u1", "Ada", "Lovelace", "1 Main St", "Lincoln", "NE", "68508")
            .await
            .unwrap();
        let err = persons
            .add_person("u1", "Ada", "King", "2 Oak St", "Lincoln", "NE", "68508")
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "u1"));
    }

    #[tokio::test]
    async fn test_add_email() {
        let db = db().await;
        let persons = db.persons();
        persons
            .add_person("u1", "Ada", "Lovelace", "1 Main St", "Lincoln", "NE", "68508")
            .await
            .unwrap();
        persons.add_email("u1", "ada@example.com").await.unwrap();

        let err = persons.add_email("ghost", "x@example.com").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref id, .. } if id == "ghost"));
    }

    #[tokio::test]
    async fn test_add_address_always_inserts() {
        let db = db().await;
        let a = db.persons().add_address("1 Main St", "Lincoln", "NE", "68508").await.unwrap();
        let b = db.persons().add_address("1 Main St", "Lincoln", "NE", "68508").await.unwrap();
        assert_ne!(a, b);
    }
}
