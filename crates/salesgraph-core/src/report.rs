//! # Reports
//!
//! Orderings and aggregates over a loaded [`SalesGraph`]. Layout is left to
//! the caller; this module only decides order and numbers.
//!
//! ## Orderings
//! ```text
//! ┌────────────────────┬──────────────────────────────────────────────────┐
//! │ Report             │ Order                                            │
//! ├────────────────────┼──────────────────────────────────────────────────┤
//! │ sales_by_customer  │ customer last name, then first name              │
//! │ sales_by_total     │ grand total, highest first                       │
//! │ sales_by_store     │ store code, then salesperson last, first         │
//! └────────────────────┴──────────────────────────────────────────────────┘
//! ```
//!
//! Each ordering is a fresh [`SortedList`] filled from the same sales.

use std::cmp::Ordering;

use serde::Serialize;

use crate::loader::SalesGraph;
use crate::money::Money;
use crate::ordered::SortedList;
use crate::pricing::Priced;
use crate::types::{Person, Sale};

// =============================================================================
// Comparators
// =============================================================================

fn by_name(a: &Person, b: &Person) -> Ordering {
    a.last_name_or_empty()
        .cmp(b.last_name_or_empty())
        .then_with(|| a.first_name_or_empty().cmp(b.first_name_or_empty()))
}

pub fn compare_by_customer(a: &Sale, b: &Sale) -> Ordering {
    by_name(&a.customer, &b.customer)
}

/// Highest grand total first.
pub fn compare_by_total(a: &Sale, b: &Sale) -> Ordering {
    b.grand_total().cmp(&a.grand_total())
}

pub fn compare_by_store(a: &Sale, b: &Sale) -> Ordering {
    a.store
        .code
        .cmp(&b.store.code)
        .then_with(|| by_name(&a.salesperson, &b.salesperson))
}

fn ordered<'a, I, F>(sales: I, cmp: F) -> SortedList<&'a Sale>
where
    I: IntoIterator<Item = &'a Sale>,
    F: Fn(&Sale, &Sale) -> Ordering + 'static,
{
    let mut list = SortedList::with_comparator(move |a: &&Sale, b: &&Sale| cmp(a, b));
    list.extend(sales);
    list
}

pub fn sales_by_customer<'a, I>(sales: I) -> SortedList<&'a Sale>
where
    I: IntoIterator<Item = &'a Sale>,
{
    ordered(sales, compare_by_customer)
}

pub fn sales_by_total<'a, I>(sales: I) -> SortedList<&'a Sale>
where
    I: IntoIterator<Item = &'a Sale>,
{
    ordered(sales, compare_by_total)
}

pub fn sales_by_store<'a, I>(sales: I) -> SortedList<&'a Sale>
where
    I: IntoIterator<Item = &'a Sale>,
{
    ordered(sales, compare_by_store)
}

// =============================================================================
// Summaries
// =============================================================================

/// One line of the per-sale summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleSummary {
    pub code: String,
    pub store_code: String,
    pub customer: String,
    pub salesperson: String,
    pub num_items: usize,
    pub subtotal: Money,
    pub tax: Money,
    pub grand_total: Money,
}

impl SaleSummary {
    pub fn of(sale: &Sale) -> Self {
        SaleSummary {
            code: sale.code.clone(),
            store_code: sale.store.code.clone(),
            customer: sale.customer.display_name(),
            salesperson: sale.salesperson.display_name(),
            num_items: sale.num_items(),
            subtotal: sale.subtotal(),
            tax: sale.tax(),
            grand_total: sale.grand_total(),
        }
    }
}

/// Per-sale rows plus totals across all of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSummary {
    pub rows: Vec<SaleSummary>,
    pub total_items: usize,
    pub total_tax: Money,
    pub total: Money,
}

/// Summarizes every sale in load order.
pub fn sale_summaries(graph: &SalesGraph) -> SalesSummary {
    let rows: Vec<SaleSummary> = graph.sales.iter().map(SaleSummary::of).collect();
    SalesSummary {
        total_items: rows.iter().map(|r| r.num_items).sum(),
        total_tax: rows.iter().map(|r| r.tax).sum(),
        total: rows.iter().map(|r| r.grand_total).sum(),
        rows,
    }
}

/// One line of the per-store summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSummary {
    pub code: String,
    pub manager: String,
    pub num_sales: usize,
    pub grand_total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoresSummary {
    pub rows: Vec<StoreSummary>,
    pub total_sales: usize,
    pub total: Money,
}

/// Summarizes every store in load order, stores without sales included.
pub fn store_summaries(graph: &SalesGraph) -> StoresSummary {
    let rows: Vec<StoreSummary> = graph
        .stores
        .iter()
        .map(|store| {
            let sales: Vec<&Sale> = graph.sales_of_store(&store.code).collect();
            StoreSummary {
                code: store.code.clone(),
                manager: store.manager.display_name(),
                num_sales: sales.len(),
                grand_total: sales.iter().map(|s| s.grand_total()).sum(),
            }
        })
        .collect();
    StoresSummary {
        total_sales: rows.iter().map(|r| r.num_sales).sum(),
        total: rows.iter().map(|r| r.grand_total).sum(),
        rows,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_graph;
    use crate::record::{MemorySource, RecordKind};

    fn graph() -> SalesGraph {
        let source = MemorySource::new()
            .with_lines(
                RecordKind::Person,
                &[
                    "c1,Alan,Turing,1 Main St,Lincoln,NE,68508",
                    "c2,Ada,Lovelace,2 Oak St,Lincoln,NE,68508",
                    "c3,Betty,Turing,3 Oak St,Lincoln,NE,68508",
                    "e1,Grace,Hopper,3 Pine St,Omaha,NE,68102",
                    "e2,Donald,Knuth,5 Pine St,Omaha,NE,68102",
                    "m1,Edsger,Dijkstra,4 Ash St,Omaha,NE,68102",
                ],
            )
            .with_lines(
                RecordKind::Store,
                &[
                    "ST2,m1,10 Elm St,Omaha,NE,68102",
                    "ST1,ghost,9 Elm St,Omaha,NE,68102",
                    "ST3,m1,11 Elm St,Omaha,NE,68102",
                ],
            )
            .with_lines(
                RecordKind::Item,
                &["P01,P,Phone,100.00", "P02,P,Case,20.00", "D01,D,Data,10.00"],
            )
            .with_lines(
                RecordKind::Sale,
                &[
                    "S001,ST2,c1,e2,2024-03-01",
                    "S002,ST1,c2,e1,2024-03-02",
                    "S003,ST1,c3,e2,2024-03-03",
                    "S004,ST2,c1,e1,2024-03-04",
                ],
            )
            .with_lines(
                RecordKind::SaleItem,
                &[
                    "S001,P01",
                    "S002,P02",
                    "S003,D01,,,,,3",
                    "S004,P01",
                    "S004,P02",
                ],
            );
        load_graph(&source).unwrap()
    }

    fn codes(list: &SortedList<&Sale>) -> Vec<String> {
        list.iter().map(|s| s.code.clone()).collect()
    }

    #[test]
    fn test_by_customer() {
        let graph = graph();
        let list = sales_by_customer(graph.sales.iter());
        // Lovelace; Turing, Alan (S004 added after S001, lands before it); Turing, Betty
        assert_eq!(codes(&list), vec!["S002", "S004", "S001", "S003"]);
    }

    #[test]
    fn test_by_total_descending() {
        let graph = graph();
        let list = sales_by_total(graph.sales.iter());
        // S004 127.80, S001 106.50, S003 31.65, S002 21.30
        assert_eq!(codes(&list), vec!["S004", "S001", "S003", "S002"]);
        let totals: Vec<i64> = list.iter().map(|s| s.grand_total().cents()).collect();
        assert_eq!(totals, vec![12780, 10650, 3165, 2130]);
    }

    #[test]
    fn test_by_store_then_salesperson() {
        let graph = graph();
        let list = sales_by_store(graph.sales.iter());
        // ST1: Hopper (S002), Knuth (S003); ST2: Hopper (S004), Knuth (S001)
        assert_eq!(codes(&list), vec!["S002", "S003", "S004", "S001"]);
    }

    #[test]
    fn test_sale_summaries() {
        let graph = graph();
        let summary = sale_summaries(&graph);
        assert_eq!(summary.rows.len(), 4);
        assert_eq!(summary.rows[0].customer, "Turing, Alan");
        assert_eq!(summary.total_items, 5);
        assert_eq!(summary.total, Money::from_cents(12780 + 10650 + 3165 + 2130));
        assert_eq!(
            summary.total_tax,
            summary.rows.iter().map(|r| r.tax).sum::<Money>()
        );
    }

    #[test]
    fn test_store_summaries() {
        let graph = graph();
        let summary = store_summaries(&graph);
        let codes: Vec<&str> = summary.rows.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["ST2", "ST1", "ST3"]);

        assert_eq!(summary.rows[0].manager, "Dijkstra, Edsger");
        assert_eq!(summary.rows[0].num_sales, 2);
        assert_eq!(summary.rows[0].grand_total, Money::from_cents(10650 + 12780));
        assert_eq!(summary.rows[1].manager, ", ");
        assert_eq!(summary.rows[2].num_sales, 0);
        assert_eq!(summary.total_sales, 4);
    }
}
