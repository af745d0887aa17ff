//! # salesgraph-db: Record Sources and Persistence for Salesgraph
//!
//! Everything around the pure core that touches the outside world: CSV
//! record files, the SQLite store with its migrations and "add*" sink, the
//! snapshot that feeds the database back into the loader, and configuration.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Salesgraph Data Flow                             │
//! │                                                                         │
//! │  seed / sales-report binaries                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 salesgraph-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│  add_person   │    │  (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │  add_sale ... │    │ 001_init.sql │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                     │   │
//! │  │   ┌───────▼───────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │SqliteSnapshot │    │   CsvSource   │    │ LoaderConfig │  │   │
//! │  │   └───────┬───────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │           └──── RecordSource ──┘                               │   │
//! │  └──────────────────────┬──────────────────────────────────────────┘   │
//! │                         ▼                                               │
//! │             salesgraph_core::load_graph                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database, file and configuration error types
//! - [`repository`] - "add*" sink repositories
//! - [`csv_source`] - Delimited-file record source
//! - [`snapshot`] - SQLite record source
//! - [`import`] - Writes a loaded graph through the repositories
//! - [`config`] - TOML + environment configuration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use salesgraph_db::{Database, DbConfig, SqliteSnapshot};
//!
//! let db = Database::new(DbConfig::new("salesgraph.db")).await?;
//! let source = SqliteSnapshot::fetch(&db).await?;
//! let graph = salesgraph_core::load_graph(&source)?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod csv_source;
pub mod error;
pub mod import;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod snapshot;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{LoaderConfig, SourceKind};
pub use csv_source::CsvSource;
pub use error::{DbError, DbResult};
pub use import::{import_graph, ImportStats};
pub use pool::{Database, DbConfig};
pub use snapshot::SqliteSnapshot;

// Repository re-exports for convenience
pub use repository::item::ItemRepository;
pub use repository::person::PersonRepository;
pub use repository::sale::SaleRepository;
pub use repository::store::StoreRepository;
