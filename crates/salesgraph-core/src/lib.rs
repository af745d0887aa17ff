//! # salesgraph-core: Pure Domain Logic for Salesgraph
//!
//! Turns flat records about people, stores, catalog items and sales into a
//! connected, priced graph, and orders that graph for reporting. There is no
//! I/O in this crate: rows arrive through the [`record::RecordSource`] trait.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Salesgraph Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               salesgraph-db (I/O layer + binaries)              │   │
//! │  │     CsvSource, SqliteSnapshot ──► RecordSource                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ rows                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ salesgraph-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   record ─► parser ─► dispatch ─► resolver ─► registry          │   │
//! │  │                                                │                │   │
//! │  │                                   loader::SalesGraph            │   │
//! │  │                                                │                │   │
//! │  │                         pricing ◄──────────────┤                │   │
//! │  │                         ordered ◄── report ◄───┘                │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO FILES                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Address, Person, Store, Sale
//! - [`item`] - Item sum type (catalog and sale-line variants)
//! - [`money`] - Money in integer cents, unrounded unit prices, tax rates in basis points
//! - [`pricing`] - Subtotal / tax / grand total per variant and per sale
//! - [`record`] - Raw rows and the record source trait
//! - [`parser`] - Row shape classification
//! - [`dispatch`] - Variant selection for catalog and sale-line rows
//! - [`resolver`] - Natural key → entity reference resolution
//! - [`registry`] - Insertion-ordered natural key maps
//! - [`loader`] - The Person → Store → Item → Sale → SaleItem pipeline
//! - [`ordered`] - Comparator-driven sorted sequence
//! - [`report`] - Report orderings and summaries
//! - [`error`] - Domain, validation and load errors
//!
//! ## Example Usage
//!
//! ```rust
//! use salesgraph_core::loader::load_graph;
//! use salesgraph_core::pricing::Priced;
//! use salesgraph_core::record::{MemorySource, RecordKind};
//!
//! let source = MemorySource::new()
//!     .with_lines(RecordKind::Person, &["c1,Ada,Lovelace,1 Main St,Lincoln,NE,68508"])
//!     .with_lines(RecordKind::Store, &["ST1,c1,9 Elm St,Omaha,NE,68102"])
//!     .with_lines(RecordKind::Item, &["P01,P,Phone,100.00"])
//!     .with_lines(RecordKind::Sale, &["S001,ST1,c1,c1,2024-03-01"])
//!     .with_lines(RecordKind::SaleItem, &["S001,P01"]);
//!
//! let graph = load_graph(&source).unwrap();
//! let sale = graph.sales.get("S001").unwrap();
//! assert_eq!(sale.grand_total().cents(), 10650); // $100.00 + 6.5% tax
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dispatch;
pub mod error;
pub mod item;
pub mod loader;
pub mod money;
pub mod ordered;
pub mod parser;
pub mod pricing;
pub mod record;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, LoadError, LoadResult, ValidationError};
pub use item::{Item, ItemKind};
pub use loader::{load_graph, SalesGraph};
pub use money::{Money, TaxRate, UnitPrice};
pub use ordered::SortedList;
pub use pricing::Priced;
pub use record::{MemorySource, Record, RecordKind, RecordSource};
pub use registry::Registry;
pub use types::*;
