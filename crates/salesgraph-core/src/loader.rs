//! # Loading Pipeline
//!
//! Builds a [`SalesGraph`] from a [`RecordSource`] in strict dependency order.
//!
//! ## Stages
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Person ──► Store ──► Item ──► Sale ──► SaleItem ──► SalesGraph        │
//! │    │          │                 ▲  ▲       │  ▲                         │
//! │    │          └── stores ───────┘  │       │  └── items (catalog)       │
//! │    └────────────── persons ────────┴───────┘                            │
//! │                                                                         │
//! │  Each stage reads the finished registries of earlier stages.           │
//! │  SaleItem appends lines to the sales built by the Sale stage.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Handling
//! - Wrong row shape, unknown item type, unknown sale or item code in a sale
//!   line, duplicate key: `warn!` and skip the row
//! - Header-only source: `info!` and an empty registry
//! - No source for a kind: `debug!` and an empty registry
//! - Missing customer, salesperson, store or servicer, unparseable field:
//!   the whole load returns `Err` and nothing is kept

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::dispatch;
use crate::error::LoadResult;
use crate::item::Item;
use crate::parser::{self, Parsed};
use crate::record::{Record, RecordKind, RecordSource};
use crate::registry::{Keyed, Registry};
use crate::resolver::{PersonRole, Resolver};
use crate::types::{Person, Sale, Store};

// =============================================================================
// Sales Graph
// =============================================================================

/// The fully resolved result of one load.
///
/// Every reference inside points at an entity of one of these registries
/// (or at a placeholder manager), so the graph can be handed to an exporter
/// as is.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SalesGraph {
    pub persons: Registry<Arc<Person>>,
    pub stores: Registry<Arc<Store>>,
    pub items: Registry<Item>,
    pub sales: Registry<Sale>,

    /// Store code → codes of its sales, in sale load order.
    pub sales_by_store: IndexMap<String, Vec<String>>,
}

impl SalesGraph {
    /// Sales recorded at one store. Empty for an unknown store.
    pub fn sales_of_store<'a>(&'a self, store_code: &str) -> impl Iterator<Item = &'a Sale> + 'a {
        self.sales_by_store
            .get(store_code)
            .into_iter()
            .flatten()
            .filter_map(|code| self.sales.get(code))
    }

    /// Total number of sale lines across all sales.
    pub fn line_count(&self) -> usize {
        self.sales.iter().map(Sale::num_items).sum()
    }
}

fn index_sales_by_store(
    stores: &Registry<Arc<Store>>,
    sales: &Registry<Sale>,
) -> IndexMap<String, Vec<String>> {
    let mut index: IndexMap<String, Vec<String>> = stores
        .keys()
        .map(|code| (code.to_string(), Vec::new()))
        .collect();
    for sale in sales {
        index
            .entry(sale.store.code.clone())
            .or_default()
            .push(sale.code.clone());
    }
    index
}

// =============================================================================
// Pipeline
// =============================================================================

/// Runs every stage and assembles the graph.
///
/// ## Errors
/// The first hard failure of any stage; no partial graph is returned.
pub fn load_graph(source: &dyn RecordSource) -> LoadResult<SalesGraph> {
    let persons = load_persons(source)?;
    let stores = load_stores(source, &persons)?;
    let items = load_items(source)?;
    let mut sales = load_sales(source, &persons, &stores)?;
    let lines = load_sale_items(source, &items, &persons, &mut sales)?;

    let sales_by_store = index_sales_by_store(&stores, &sales);
    info!(
        persons = persons.len(),
        stores = stores.len(),
        items = items.len(),
        sales = sales.len(),
        lines,
        "sales graph loaded"
    );

    Ok(SalesGraph {
        persons,
        stores,
        items,
        sales,
        sales_by_store,
    })
}

/// Fetches the rows for a stage, logging the absent and empty cases.
fn rows_for(source: &dyn RecordSource, kind: RecordKind) -> LoadResult<Vec<Record>> {
    match source.fetch_rows(kind)? {
        None => {
            debug!(kind = %kind, "no source configured");
            Ok(Vec::new())
        }
        Some(rows) if rows.is_empty() => {
            info!(kind = %kind, "no data");
            Ok(rows)
        }
        Some(rows) => Ok(rows),
    }
}

fn skip(kind: RecordKind, row: usize, reason: &str) {
    warn!(kind = %kind, row, reason = %reason, "skipping record");
}

/// Inserts into a registry, logging and dropping a duplicate key.
fn register<T: Keyed>(registry: &mut Registry<T>, kind: RecordKind, row: usize, value: T) {
    if let Err(err) = registry.insert(value) {
        skip(kind, row, &err.to_string());
    }
}

pub fn load_persons(source: &dyn RecordSource) -> LoadResult<Registry<Arc<Person>>> {
    let kind = RecordKind::Person;
    let mut persons = Registry::new();

    for record in rows_for(source, kind)? {
        let row = match parser::parse_person(&record) {
            Parsed::Row(row) => row,
            Parsed::Skip(reason) => {
                skip(kind, record.row, &reason);
                continue;
            }
        };
        let mut person = Person::new(row.uuid, row.last_name, row.first_name, row.address);
        for email in row.emails {
            person.add_email(email);
        }
        register(&mut persons, kind, record.row, Arc::new(person));
    }

    info!(count = persons.len(), "persons loaded");
    Ok(persons)
}

pub fn load_stores(
    source: &dyn RecordSource,
    persons: &Registry<Arc<Person>>,
) -> LoadResult<Registry<Arc<Store>>> {
    let kind = RecordKind::Store;
    let resolver = Resolver::persons(persons);
    let mut stores = Registry::new();

    for record in rows_for(source, kind)? {
        let row = match parser::parse_store(&record) {
            Parsed::Row(row) => row,
            Parsed::Skip(reason) => {
                skip(kind, record.row, &reason);
                continue;
            }
        };
        let manager = resolver.manager(&row.manager_uuid, &row.code);
        let store = Store::new(row.code, manager, row.address);
        register(&mut stores, kind, record.row, Arc::new(store));
    }

    info!(count = stores.len(), "stores loaded");
    Ok(stores)
}

pub fn load_items(source: &dyn RecordSource) -> LoadResult<Registry<Item>> {
    let kind = RecordKind::Item;
    let mut items = Registry::new();

    for record in rows_for(source, kind)? {
        let parsed = match parser::parse_item(&record)? {
            Parsed::Row(row) => dispatch::catalog_item(row),
            Parsed::Skip(reason) => Parsed::Skip(reason),
        };
        match parsed {
            Parsed::Row(item) => register(&mut items, kind, record.row, item),
            Parsed::Skip(reason) => skip(kind, record.row, &reason),
        }
    }

    info!(count = items.len(), "items loaded");
    Ok(items)
}

pub fn load_sales(
    source: &dyn RecordSource,
    persons: &Registry<Arc<Person>>,
    stores: &Registry<Arc<Store>>,
) -> LoadResult<Registry<Sale>> {
    let kind = RecordKind::Sale;
    let resolver = Resolver::new(persons, stores);
    let mut sales = Registry::new();

    for record in rows_for(source, kind)? {
        let row = match parser::parse_sale(&record)? {
            Parsed::Row(row) => row,
            Parsed::Skip(reason) => {
                skip(kind, record.row, &reason);
                continue;
            }
        };
        let context = format!("sale {}", row.code);
        let customer = resolver.person(&row.customer_uuid, PersonRole::Customer, &context)?;
        let salesperson =
            resolver.person(&row.salesperson_uuid, PersonRole::Salesperson, &context)?;
        let store = resolver.store(&row.store_code, &context)?;

        let sale = Sale::new(row.code, store, customer, salesperson, row.date);
        register(&mut sales, kind, record.row, sale);
    }

    info!(count = sales.len(), "sales loaded");
    Ok(sales)
}

/// Attaches sale lines to the sales they name.
///
/// Returns the number of lines attached.
pub fn load_sale_items(
    source: &dyn RecordSource,
    items: &Registry<Item>,
    persons: &Registry<Arc<Person>>,
    sales: &mut Registry<Sale>,
) -> LoadResult<usize> {
    let kind = RecordKind::SaleItem;
    let resolver = Resolver::persons(persons);
    let mut attached = 0;

    for record in rows_for(source, kind)? {
        let line = match parser::parse_sale_line(&record) {
            Parsed::Row(line) => line,
            Parsed::Skip(reason) => {
                skip(kind, record.row, &reason);
                continue;
            }
        };
        let Some(catalog) = items.get(&line.item_code) else {
            skip(kind, record.row, &format!("unknown item {}", line.item_code));
            continue;
        };
        let item = match dispatch::sale_line(catalog, &line, &resolver)? {
            Parsed::Row(item) => item,
            Parsed::Skip(reason) => {
                skip(kind, record.row, &reason);
                continue;
            }
        };
        match sales.get_mut(&line.sale_code) {
            Some(sale) => {
                sale.add_item(item);
                attached += 1;
            }
            None => skip(kind, record.row, &format!("unknown sale {}", line.sale_code)),
        }
    }

    info!(count = attached, "sale lines loaded");
    Ok(attached)
}

// =============================================================================
// Unit Tests
// =============================================================================
