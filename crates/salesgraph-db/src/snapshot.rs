//! # SQLite Snapshot
//!
//! Reads the persisted graph back as rows, one query per record kind, and
//! hands them to the loader as a [`MemorySource`]. The rows have the same
//! positional shape as the CSV files, so the loader cannot tell the two
//! sources apart.
//!
//! ## Query → Row Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Person    Person ⋈ Address, then Email rows appended per person       │
//! │  Store     storeCode, manager uuid, address                            │
//! │  Item      code, type, name, basePrice                                 │
//! │  Sale      saleCode, storeCode, customer uuid, salesperson uuid, date  │
//! │  SaleItem  saleCode, itemCode, start, end, hours, servicer uuid,       │
//! │            GBs, phone, days   (NULL → empty field)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each query borrows a pooled connection only while it runs.

use std::collections::HashMap;

use salesgraph_core::{MemorySource, Record, RecordKind};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::pool::Database;

type PersonRow = (String, String, String, String, String, String, String);
type SaleItemRow = (
    String,
    String,
    Option<String>,
    Option<String>,
    Option<f64>,
    Option<String>,
    Option<f64>,
    Option<String>,
    Option<i64>,
);

/// Snapshot reader for a [`Database`].
pub struct SqliteSnapshot;

impl SqliteSnapshot {
    /// Fetches every record kind from the database.
    pub async fn fetch(db: &Database) -> DbResult<MemorySource> {
        let pool = db.pool();

        let source = MemorySource::new()
            .with_rows(RecordKind::Person, persons(pool).await?)
            .with_rows(RecordKind::Store, stores(pool).await?)
            .with_rows(RecordKind::Item, items(pool).await?)
            .with_rows(RecordKind::Sale, sales(pool).await?)
            .with_rows(RecordKind::SaleItem, sale_items(pool).await?);

        info!("Database snapshot taken");
        Ok(source)
    }
}

fn numbered<I>(rows: I) -> Vec<Record>
where
    I: IntoIterator<Item = Vec<String>>,
{
    rows.into_iter()
        .enumerate()
        .map(|(i, fields)| Record::new(i + 1, fields))
        .collect()
}

fn or_empty<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

async fn persons(pool: &SqlitePool) -> DbResult<Vec<Record>> {
    let people: Vec<PersonRow> = sqlx::query_as(
        r#"
        SELECT p.uuid, p.firstName, p.lastName, a.street, a.city, a.state, a.zip
        FROM Person p
        JOIN Address a ON a.addressId = p.addressId
        ORDER BY p.personId
        "#,
    )
    .fetch_all(pool)
    .await?;

    let emails: Vec<(String, String)> = sqlx::query_as(
        r#"
        SELECT p.uuid, e.email
        FROM Email e
        JOIN Person p ON p.personId = e.personId
        ORDER BY e.emailId
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut by_person: HashMap<String, Vec<String>> = HashMap::new();
    for (uuid, email) in emails {
        by_person.entry(uuid).or_default().push(email);
    }

    debug!(persons = people.len(), "Fetched persons");
    Ok(numbered(people.into_iter().map(
        |(uuid, first, last, street, city, state, zip)| {
            let emails = by_person.remove(&uuid).unwrap_or_default();
            let mut fields = vec![uuid, first, last, street, city, state, zip];
            fields.extend(emails);
            fields
        },
    )))
}

async fn stores(pool: &SqlitePool) -> DbResult<Vec<Record>> {
    let rows: Vec<(String, String, String, String, String, String)> = sqlx::query_as(
        r#"
        SELECT s.storeCode, p.uuid, a.street, a.city, a.state, a.zip
        FROM Store s
        JOIN Person p ON p.personId = s.personId
        JOIN Address a ON a.addressId = s.addressId
        ORDER BY s.storeId
        "#,
    )
    .fetch_all(pool)
    .await?;

    debug!(stores = rows.len(), "Fetched stores");
    Ok(numbered(rows.into_iter().map(
        |(code, manager, street, city, state, zip)| vec![code, manager, street, city, state, zip],
    )))
}

async fn items(pool: &SqlitePool) -> DbResult<Vec<Record>> {
    let rows: Vec<(String, String, String, f64)> =
        sqlx::query_as("SELECT code, type, name, basePrice FROM Item ORDER BY itemId")
            .fetch_all(pool)
            .await?;

    debug!(items = rows.len(), "Fetched items");
    Ok(numbered(rows.into_iter().map(|(code, kind, name, price)| {
        vec![code, kind, name, price.to_string()]
    })))
}

async fn sales(pool: &SqlitePool) -> DbResult<Vec<Record>> {
    let rows: Vec<(String, String, String, String, String)> = sqlx::query_as(
        r#"
        SELECT s.saleCode, st.storeCode, c.uuid, sp.uuid, s.date
        FROM Sale s
        JOIN Store st ON st.storeId = s.storeId
        JOIN Person c ON c.personId = s.customerId
        JOIN Person sp ON sp.personId = s.salesPersonId
        ORDER BY s.saleId
        "#,
    )
    .fetch_all(pool)
    .await?;

    debug!(sales = rows.len(), "Fetched sales");
    Ok(numbered(rows.into_iter().map(
        |(code, store, customer, salesperson, date)| vec![code, store, customer, salesperson, date],
    )))
}

async fn sale_items(pool: &SqlitePool) -> DbResult<Vec<Record>> {
    let rows: Vec<SaleItemRow> = sqlx::query_as(
        r#"
        SELECT s.saleCode, i.code, si.startDate, si.endDate, si.numHours,
               sv.uuid, si.numGBs, si.phoneNum, si.numDays
        FROM SaleItem si
        JOIN Sale s ON s.saleId = si.saleId
        JOIN Item i ON i.itemId = si.itemId
        LEFT JOIN Person sv ON sv.personId = si.servicerId
        ORDER BY si.saleItemId
        "#,
    )
    .fetch_all(pool)
    .await?;

    debug!(lines = rows.len(), "Fetched sale lines");
    Ok(numbered(rows.into_iter().map(
        |(sale, item, start, end, hours, servicer, gbs, phone, days)| {
            vec![
                sale,
                item,
                or_empty(start),
                or_empty(end),
                or_empty(hours),
                or_empty(servicer),
                or_empty(gbs),
                or_empty(phone),
                or_empty(days),
            ]
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use chrono::NaiveDate;
    use salesgraph_core::{load_graph, Item, Priced, RecordSource};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let persons = db.persons();
        persons
            .add_person("c1", "Ada", "Lovelace", "1 Main St", "Lincoln", "NE", "68508")
            .await
            .unwrap();
        persons.add_email("c1", "ada@example.com").await.unwrap();
        persons.add_email("c1", "countess@example.com").await.unwrap();
        persons
            .add_person("e1", "Grace", "Hopper", "3 Pine St", "Omaha", "NE", "68102")
            .await
            .unwrap();
        db.stores()
            .add_store("ST1", "e1", "9 Elm St", "Omaha", "NE", "68102")
            .await
            .unwrap();

        let items = db.items();
        items.add_item("P01", "Phone", "P", 100.0).await.unwrap();
        items.add_item("S01", "Repair", "S", 40.0).await.unwrap();
        items.add_item("D01", "Data", "D", 10.0).await.unwrap();
        items.add_item("V01", "Talk", "V", 30.0).await.unwrap();

        let sales = db.sales();
        sales
            .add_sale("S001", "ST1", "c1", "e1", date(2024, 3, 1))
            .await
            .unwrap();
        sales.add_product_to_sale("S001", "P01").await.unwrap();
        sales
            .add_lease_to_sale("S001", "P01", date(2024, 1, 1), date(2024, 8, 1))
            .await
            .unwrap();
        sales.add_service_to_sale("S001", "S01", 2.0, "e1").await.unwrap();
        sales.add_data_plan_to_sale("S001", "D01", 3.0).await.unwrap();
        sales
            .add_voice_plan_to_sale("S001", "V01", "402-555-0100", 15)
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_person_rows_carry_emails() {
        let db = seeded().await;
        let source = SqliteSnapshot::fetch(&db).await.unwrap();
        let rows = source.fetch_rows(RecordKind::Person).unwrap().unwrap();
        assert_eq!(rows[0].len(), 9);
        assert_eq!(rows[0].get(8), Some("countess@example.com"));
        assert_eq!(rows[1].len(), 7);
    }

    #[tokio::test]
    async fn test_sale_line_shapes() {
        let db = seeded().await;
        let source = SqliteSnapshot::fetch(&db).await.unwrap();
        let rows = source.fetch_rows(RecordKind::SaleItem).unwrap().unwrap();
        let shapes: Vec<Vec<&str>> = rows.iter().map(|r| r.non_empty()).collect();
        assert_eq!(shapes[0], vec!["S001", "P01"]);
        assert_eq!(shapes[1], vec!["S001", "P01", "2024-01-01", "2024-08-01"]);
        assert_eq!(shapes[2], vec!["S001", "S01", "2", "e1"]);
        assert_eq!(shapes[3], vec!["S001", "D01", "3"]);
        assert_eq!(shapes[4], vec!["S001", "V01", "402-555-0100", "15"]);
    }

    #[tokio::test]
    async fn test_round_trip_through_loader() {
        let db = seeded().await;
        let source = SqliteSnapshot::fetch(&db).await.unwrap();
        let graph = load_graph(&source).unwrap();

        assert_eq!(graph.persons.len(), 2);
        assert_eq!(graph.items.len(), 4);
        let sale = graph.sales.get("S001").unwrap();
        assert_eq!(sale.num_items(), 5);
        assert!(matches!(sale.items[1], Item::Lease(_)));

        // Purchase 10000, lease 100*1.5/7 = 2143, service 8000, data 3000,
        // voice 30*(15/30) = 1500
        assert_eq!(sale.subtotal().cents(), 10000 + 2143 + 8000 + 3000 + 1500);
        // 650 + 0 + 280 + 165 + 98 (97.5 rounds up)
        assert_eq!(sale.tax().cents(), 650 + 280 + 165 + 98);
    }
}
