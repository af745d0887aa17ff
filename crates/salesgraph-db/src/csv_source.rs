//! # CSV Record Source
//!
//! Reads one delimited file per record kind from a data directory.
//!
//! ## File Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  data/                                                                  │
//! │  ├── Persons.csv     uuid,first,last,street,city,state,zip,email...    │
//! │  ├── Stores.csv      code,manager,street,city,state,zip                │
//! │  ├── Items.csv       code,type,name,price                              │
//! │  ├── Sales.csv       code,store,customer,salesperson,date              │
//! │  └── SaleItems.csv   sale,item,start,end,hours,servicer,gbs,phone,days │
//! │                                                                         │
//! │  The first line of every file is a header and is not a record.        │
//! │  Rows may have any number of fields; shape is judged by the parser.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use salesgraph_core::{LoadError, LoadResult, Record, RecordKind, RecordSource};
use tracing::debug;

/// Default file name for each record kind.
pub fn default_file_name(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Person => "Persons.csv",
        RecordKind::Store => "Stores.csv",
        RecordKind::Item => "Items.csv",
        RecordKind::Sale => "Sales.csv",
        RecordKind::SaleItem => "SaleItems.csv",
    }
}

/// Record source backed by delimited files.
#[derive(Debug, Clone, Default)]
pub struct CsvSource {
    paths: HashMap<RecordKind, PathBuf>,
}

impl CsvSource {
    /// Uses the default file name for every kind under `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let paths = RecordKind::PIPELINE
            .iter()
            .map(|&kind| (kind, dir.join(default_file_name(kind))))
            .collect();
        CsvSource { paths }
    }

    /// A source with no files configured; every kind reads as absent.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Points one kind at a specific file.
    pub fn with_file(mut self, kind: RecordKind, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(kind, path.into());
        self
    }

    /// Removes the file for one kind.
    pub fn without(mut self, kind: RecordKind) -> Self {
        self.paths.remove(&kind);
        self
    }

    pub fn path(&self, kind: RecordKind) -> Option<&Path> {
        self.paths.get(&kind).map(PathBuf::as_path)
    }
}

fn source_error(path: &Path, err: impl std::fmt::Display) -> LoadError {
    LoadError::Source(format!("{}: {}", path.display(), err))
}

/// Reads every data row of one file, header excluded, numbered from 1.
pub fn read_records(path: &Path) -> LoadResult<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| source_error(path, e))?;

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = result.map_err(|e| source_error(path, e))?;
        records.push(Record::new(index + 1, row.iter()));
    }

    debug!(path = %path.display(), rows = records.len(), "Read record file");
    Ok(records)
}

impl RecordSource for CsvSource {
    fn fetch_rows(&self, kind: RecordKind) -> LoadResult<Option<Vec<Record>>> {
        match self.paths.get(&kind) {
            Some(path) => read_records(path).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesgraph_core::{load_graph, Priced};
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_header_skipped_and_rows_numbered() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "Items.csv",
            "code,type,name,price\nP01,P,Phone,100.00\nD01,D,Data,10.00\n",
        );

        let source = CsvSource::new(dir.path());
        let rows = source.fetch_rows(RecordKind::Item).unwrap().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row, 1);
        assert_eq!(rows[1].get(0), Some("D01"));
    }

    #[test]
    fn test_ragged_rows_and_trailing_commas() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "SaleItems.csv",
            "sale,item,start,end,hours,servicer,gbs,phone,days\nS001,P01,,,,,,,\nS001,D01,,,,,2.5\n",
        );

        let source = CsvSource::empty().with_file(RecordKind::SaleItem, dir.path().join("SaleItems.csv"));
        let rows = source.fetch_rows(RecordKind::SaleItem).unwrap().unwrap();
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[1].non_empty(), vec!["S001", "D01", "2.5"]);
    }

    #[test]
    fn test_unconfigured_kind_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvSource::new(dir.path()).without(RecordKind::Store);
        assert!(source.fetch_rows(RecordKind::Store).unwrap().is_none());
        assert!(source.path(RecordKind::Store).is_none());
    }

    #[test]
    fn test_missing_file_is_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvSource::new(dir.path());
        let err = source.fetch_rows(RecordKind::Person).unwrap_err();
        assert!(matches!(err, LoadError::Source(ref msg) if msg.contains("Persons.csv")));
    }

    #[test]
    fn test_load_graph_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "Persons.csv",
            "uuid,first,last,street,city,state,zip,emails\n\
             c1,Ada,Lovelace,1 Main St,Lincoln,NE,68508,ada@example.com\n\
             e1,Grace,Hopper,3 Pine St,Omaha,NE,68102\n",
        );
        write(
            dir.path(),
            "Stores.csv",
            "code,manager,street,city,state,zip\nST1,e1,9 Elm St,Omaha,NE,68102\n",
        );
        write(
            dir.path(),
            "Items.csv",
            "code,type,name,price\nP01,P,Phone,100.00\nS01,S,Repair,40.00\n",
        );
        write(
            dir.path(),
            "Sales.csv",
            "code,store,customer,salesperson,date\nS001,ST1,c1,e1,2024-03-01\n",
        );
        write(
            dir.path(),
            "SaleItems.csv",
            "sale,item,start,end,hours,servicer,gbs,phone,days\nS001,P01\nS001,S01,,,2,e1\n",
        );

        let graph = load_graph(&CsvSource::new(dir.path())).unwrap();
        let sale = graph.sales.get("S001").unwrap();
        assert_eq!(sale.num_items(), 2);
        // 100.00 + 6.50 tax, 80.00 + 2.80 tax
        assert_eq!(sale.grand_total().cents(), 10650 + 8280);
        assert_eq!(graph.persons.get("c1").unwrap().emails, vec!["ada@example.com"]);
    }
}
