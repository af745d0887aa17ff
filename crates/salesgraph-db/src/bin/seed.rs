//! # Seed Importer
//!
//! Loads a directory of CSV record files and writes the resulting graph into
//! the SQLite database.
//!
//! ## Usage
//! ```bash
//! # Import ./data into ./salesgraph.db
//! cargo run -p salesgraph-db --bin seed
//!
//! # Custom locations, wiping existing rows first
//! cargo run -p salesgraph-db --bin seed -- --data ./fixtures --db ./dev.db --clear
//! ```
//!
//! Rows the loader skips are logged and never reach the database. A hard
//! load failure aborts before anything is written.

use std::env;

use salesgraph_core::load_graph;
use salesgraph_db::{import_graph, CsvSource, Database, DbConfig};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,salesgraph=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut data_dir = String::from("./data");
    let mut db_path = String::from("./salesgraph.db");
    let mut clear = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--data" | "-i" => {
                if i + 1 < args.len() {
                    data_dir = args[i + 1].clone();
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--clear" => clear = true,
            "--help" | "-h" => {
                println!("Salesgraph Seed Importer");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -i, --data <DIR>   CSV data directory (default: ./data)");
                println!("  -d, --db <PATH>    Database file path (default: ./salesgraph.db)");
                println!("      --clear        Delete existing rows before importing");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    println!("🌱 Salesgraph Seed Importer");
    println!("===========================");
    println!("Data:     {}", data_dir);
    println!("Database: {}", db_path);
    println!();

    let graph = load_graph(&CsvSource::new(&data_dir))?;
    println!(
        "✓ Loaded {} persons, {} stores, {} items, {} sales, {} lines",
        graph.persons.len(),
        graph.stores.len(),
        graph.items.len(),
        graph.sales.len(),
        graph.line_count()
    );

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if clear {
        db.clear_database().await?;
        println!("✓ Existing rows deleted");
    }

    let start = std::time::Instant::now();
    let stats = import_graph(&db, &graph).await?;
    let elapsed = start.elapsed();

    println!();
    println!(
        "✓ Wrote {} persons ({} emails), {} stores, {} items, {} sales, {} lines in {:?}",
        stats.persons, stats.emails, stats.stores, stats.items, stats.sales, stats.lines, elapsed
    );
    if stats.skipped_stores > 0 {
        println!(
            "⚠ {} store(s) without a known manager were not written",
            stats.skipped_stores
        );
    }

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
