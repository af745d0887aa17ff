//! # Sales Report
//!
//! Loads the sales graph from the configured source and prints the three
//! ordered sale listings plus the per-sale and per-store summaries.
//!
//! ## Usage
//! ```bash
//! # Source and paths from salesgraph.toml / SALESGRAPH_* variables
//! cargo run -p salesgraph-db --bin sales-report
//!
//! # Read the database instead of the CSV files
//! cargo run -p salesgraph-db --bin sales-report -- --source sqlite --db ./dev.db
//!
//! # Dump the loaded graph as JSON
//! cargo run -p salesgraph-db --bin sales-report -- --json graph.json
//! ```
//!
//! Command-line flags override the configuration file and environment.

use std::env;
use std::path::PathBuf;

use salesgraph_core::pricing::Priced;
use salesgraph_core::report::{
    sale_summaries, sales_by_customer, sales_by_store, sales_by_total, store_summaries,
};
use salesgraph_core::{load_graph, Sale, SalesGraph, SortedList};
use salesgraph_db::{Database, LoaderConfig, SourceKind, SqliteSnapshot};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,salesgraph=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_help() {
    println!("Salesgraph Sales Report");
    println!();
    println!("Usage: sales-report [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>    Config file (default: platform config dir)");
    println!("  -s, --source <KIND>    Record source: csv | sqlite");
    println!("  -i, --data <DIR>       CSV data directory");
    println!("  -d, --db <PATH>        Database file path");
    println!("      --json <PATH>      Write the loaded graph as JSON ('-' for stdout)");
    println!("  -h, --help             Show this help message");
}

/// Flags given on the command line.
#[derive(Default)]
struct Args {
    config: Option<PathBuf>,
    source: Option<SourceKind>,
    data_dir: Option<PathBuf>,
    db_path: Option<PathBuf>,
    json: Option<String>,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<Args, Box<dyn std::error::Error>> {
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match args[i].as_str() {
            "--config" | "-c" => parsed.config = value.map(PathBuf::from),
            "--source" | "-s" => {
                parsed.source = match value.as_deref() {
                    Some(kind) => Some(kind.parse()?),
                    None => None,
                }
            }
            "--data" | "-i" => parsed.data_dir = value.map(PathBuf::from),
            "--db" | "-d" => parsed.db_path = value.map(PathBuf::from),
            "--json" => parsed.json = value,
            "--help" | "-h" => {
                parsed.help = true;
                i += 1;
                continue;
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
                i += 1;
                continue;
            }
        }
        i += 2;
    }

    Ok(parsed)
}

// =============================================================================
// Printing
// =============================================================================

fn print_listing(title: &str, list: &SortedList<&Sale>) {
    println!("{}", title);
    println!("{}", "=".repeat(title.len()));
    println!(
        "{:<8} {:<8} {:<24} {:<24} {:>12}",
        "Sale", "Store", "Customer", "Salesperson", "Total"
    );
    for sale in list {
        println!(
            "{:<8} {:<8} {:<24} {:<24} {:>12}",
            sale.code,
            sale.store.code,
            sale.customer.display_name(),
            sale.salesperson.display_name(),
            sale.grand_total().to_string()
        );
    }
    println!();
}

fn print_sale_summary(graph: &SalesGraph) {
    let summary = sale_summaries(graph);

    println!("Sale Summary");
    println!("============");
    println!(
        "{:<8} {:<8} {:<24} {:>6} {:>12} {:>12}",
        "Sale", "Store", "Customer", "Items", "Tax", "Total"
    );
    for row in &summary.rows {
        println!(
            "{:<8} {:<8} {:<24} {:>6} {:>12} {:>12}",
            row.code,
            row.store_code,
            row.customer,
            row.num_items,
            row.tax.to_string(),
            row.grand_total.to_string()
        );
    }
    println!(
        "{:<42} {:>6} {:>12} {:>12}",
        "",
        summary.total_items,
        summary.total_tax.to_string(),
        summary.total.to_string()
    );
    println!();

    for sale in &graph.sales {
        println!("Sale {} on {} at {}", sale.code, sale.date, sale.store.code);
        for item in &sale.items {
            println!("  {:<60} {:>12}", item.to_string(), item.subtotal().to_string());
        }
        println!("  {:<60} {:>12}", "Subtotal", sale.subtotal().to_string());
        println!("  {:<60} {:>12}", "Tax", sale.tax().to_string());
        println!("  {:<60} {:>12}", "Grand Total", sale.grand_total().to_string());
        println!();
    }
}

fn print_store_summary(graph: &SalesGraph) {
    let summary = store_summaries(graph);

    println!("Store Sales Summary");
    println!("===================");
    println!("{:<8} {:<24} {:>6} {:>12}", "Store", "Manager", "Sales", "Total");
    for row in &summary.rows {
        println!(
            "{:<8} {:<24} {:>6} {:>12}",
            row.code,
            row.manager,
            row.num_sales,
            row.grand_total.to_string()
        );
    }
    println!(
        "{:<33} {:>6} {:>12}",
        "",
        summary.total_sales,
        summary.total.to_string()
    );
    println!();
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let argv: Vec<String> = env::args().collect();
    let args = parse_args(&argv)?;
    if args.help {
        print_help();
        return Ok(());
    }

    let mut config = LoaderConfig::load(args.config)?;
    if let Some(kind) = args.source {
        config.source.kind = kind;
    }
    if let Some(dir) = args.data_dir {
        config.source.data_dir = dir;
    }
    if let Some(path) = args.db_path {
        config.database.path = path;
    }
    config.validate()?;

    info!(source = %config.source.kind, "Loading sales graph");

    let graph = match config.source.kind {
        SourceKind::Csv => load_graph(&config.source.csv_source())?,
        SourceKind::Sqlite => {
            let db = Database::new(config.database.db_config()).await?;
            let snapshot = SqliteSnapshot::fetch(&db).await?;
            db.close().await;
            load_graph(&snapshot)?
        }
    };

    if let Some(target) = args.json {
        let json = serde_json::to_string_pretty(&graph)?;
        if target == "-" {
            println!("{}", json);
        } else {
            std::fs::write(&target, json)?;
            info!(path = %target, "Graph written as JSON");
        }
        return Ok(());
    }

    print_listing("Sales by Customer", &sales_by_customer(&graph.sales));
    print_listing("Sales by Total", &sales_by_total(&graph.sales));
    print_listing("Sales by Store", &sales_by_store(&graph.sales));
    print_sale_summary(&graph);
    print_store_summary(&graph);

    Ok(())
}
