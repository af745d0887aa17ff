//! # Graph Import
//!
//! Writes a loaded [`SalesGraph`] into the database through the "add*"
//! repositories, parents before children.
//!
//! ```text
//! persons (+ emails) → stores → items → sales → sale lines
//! ```
//!
//! A store whose manager is a placeholder has no Person row to point at and
//! is left out, together with its sales.

use salesgraph_core::{Item, SalesGraph};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::DbResult;
use crate::pool::Database;

/// Row counts written by one import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub persons: usize,
    pub emails: usize,
    pub stores: usize,
    pub items: usize,
    pub sales: usize,
    pub lines: usize,
    pub skipped_stores: usize,
}

/// Persists every entity of `graph`.
///
/// ## Errors
/// The first repository failure, e.g. a key that already exists in the
/// database. Rows written before the failure stay written.
pub async fn import_graph(db: &Database, graph: &SalesGraph) -> DbResult<ImportStats> {
    let mut stats = ImportStats::default();

    let persons = db.persons();
    for person in &graph.persons {
        let address = person.address.clone().unwrap_or_default();
        persons
            .add_person(
                &person.uuid,
                person.first_name_or_empty(),
                person.last_name_or_empty(),
                &address.street,
                &address.city,
                &address.state,
                &address.zip,
            )
            .await?;
        stats.persons += 1;

        for email in &person.emails {
            persons.add_email(&person.uuid, email).await?;
            stats.emails += 1;
        }
    }

    let stores = db.stores();
    for store in &graph.stores {
        if store.manager.is_placeholder() {
            warn!(store = %store.code, manager = %store.manager.uuid, "Skipping store with unknown manager");
            stats.skipped_stores += 1;
            continue;
        }
        let address = &store.address;
        stores
            .add_store(
                &store.code,
                &store.manager.uuid,
                &address.street,
                &address.city,
                &address.state,
                &address.zip,
            )
            .await?;
        stats.stores += 1;
    }

    let items = db.items();
    for item in &graph.items {
        items
            .add_item(item.code(), item.name(), item.kind().as_code(), item.unit_price().value())
            .await?;
        stats.items += 1;
    }

    let sales = db.sales();
    for sale in &graph.sales {
        if sale.store.manager.is_placeholder() {
            continue;
        }
        sales
            .add_sale(
                &sale.code,
                &sale.store.code,
                &sale.customer.uuid,
                &sale.salesperson.uuid,
                sale.date,
            )
            .await?;
        stats.sales += 1;

        for line in &sale.items {
            let written = match line {
                Item::Purchase(p) => Some(sales.add_product_to_sale(&sale.code, &p.code).await?),
                Item::Lease(l) => Some(
                    sales
                        .add_lease_to_sale(&sale.code, &l.code, l.start, l.end)
                        .await?,
                ),
                Item::Service(s) => match &s.servicer {
                    Some(servicer) => Some(
                        sales
                            .add_service_to_sale(&sale.code, &s.code, s.num_hours, &servicer.uuid)
                            .await?,
                    ),
                    None => None,
                },
                Item::Data(d) => Some(sales.add_data_plan_to_sale(&sale.code, &d.code, d.num_gbs).await?),
                Item::Voice(v) => Some(
                    sales
                        .add_voice_plan_to_sale(
                            &sale.code,
                            &v.code,
                            v.phone.as_deref().unwrap_or_default(),
                            v.num_days,
                        )
                        .await?,
                ),
                Item::Product(_) => None,
            };

            match written {
                Some(_) => stats.lines += 1,
                None => warn!(sale = %sale.code, item = %line.code(), "Sale line has no persisted form"),
            }
        }
    }

    info!(
        persons = stats.persons,
        stores = stats.stores,
        items = stats.items,
        sales = stats.sales,
        lines = stats.lines,
        "Graph imported"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use crate::snapshot::SqliteSnapshot;
    use salesgraph_core::pricing::total_of;
    use salesgraph_core::{load_graph, MemorySource, Priced, RecordKind};

    fn source() -> MemorySource {
        MemorySource::new()
            .with_lines(
                RecordKind::Person,
                &[
                    "c1,Ada,Lovelace,1 Main St,Lincoln,NE,68508,ada@example.com",
                    "e1,Grace,Hopper,3 Pine St,Omaha,NE,68102",
                ],
            )
            .with_lines(
                RecordKind::Store,
                &["ST1,e1,9 Elm St,Omaha,NE,68102", "ST2,ghost,10 Elm St,Omaha,NE,68102"],
            )
            .with_lines(
                RecordKind::Item,
                &[
                    "P01,P,Phone,100.00",
                    "S01,S,Repair,40.00",
                    "D01,D,Data,10.00",
                    "V01,V,Talk,30.00",
                ],
            )
            .with_lines(
                RecordKind::Sale,
                &["S001,ST1,c1,e1,2024-03-01", "S002,ST2,c1,e1,2024-03-02"],
            )
            .with_lines(
                RecordKind::SaleItem,
                &[
                    "S001,P01",
                    "S001,P01,2024-01-01,2024-08-01",
                    "S001,S01,,,2,e1",
                    "S001,D01,,,,,3",
                    "S001,V01,,,,,,402-555-0100,15",
                    "S002,P01",
                ],
            )
    }

    #[tokio::test]
    async fn test_import_then_snapshot_round_trip() {
        let graph = load_graph(&source()).unwrap();
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let stats = import_graph(&db, &graph).await.unwrap();
        assert_eq!(stats.persons, 2);
        assert_eq!(stats.emails, 1);
        assert_eq!((stats.stores, stats.skipped_stores), (1, 1));
        assert_eq!(stats.sales, 1);
        assert_eq!(stats.lines, 5);

        let reloaded = load_graph(&SqliteSnapshot::fetch(&db).await.unwrap()).unwrap();
        let loaded = graph.sales.get("S001").unwrap();
        let copy = reloaded.sales.get("S001").unwrap();
        assert_eq!(copy, loaded);
        assert_eq!(copy.grand_total(), loaded.grand_total());
        assert_eq!(total_of(&reloaded.sales), copy.grand_total());
    }

    #[tokio::test]
    async fn test_second_import_hits_existing_keys() {
        let graph = load_graph(&source()).unwrap();
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        import_graph(&db, &graph).await.unwrap();
        assert!(import_graph(&db, &graph).await.is_err());
    }
}
