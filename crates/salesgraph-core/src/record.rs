//! # Records and Record Sources
//!
//! A record is one row of ordered string fields, exactly as it came from a
//! delimited file or a query result. Nothing here knows what the fields mean.
//!
//! ## Source Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RecordSource::fetch_rows(kind)                                         │
//! │                                                                         │
//! │    Ok(None)            no source configured for this kind → empty      │
//! │    Ok(Some(vec![]))    source exists, header only        → "no data"   │
//! │    Ok(Some(rows))      rows in source order                             │
//! │    Err(LoadError)      source unreadable                 → HardFail    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;

use crate::error::{LoadError, LoadResult, ValidationError};
use crate::money::UnitPrice;

// =============================================================================
// Record Kind
// =============================================================================

/// The five record streams, listed in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Person,
    Store,
    Item,
    Sale,
    SaleItem,
}

impl RecordKind {
    /// All kinds in dependency order.
    pub const PIPELINE: [RecordKind; 5] = [
        RecordKind::Person,
        RecordKind::Store,
        RecordKind::Item,
        RecordKind::Sale,
        RecordKind::SaleItem,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Person => "Person",
            RecordKind::Store => "Store",
            RecordKind::Item => "Item",
            RecordKind::Sale => "Sale",
            RecordKind::SaleItem => "SaleItem",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Record
// =============================================================================

/// One row of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based position in the source, header excluded.
    pub row: usize,
    fields: Vec<String>,
}

impl Record {
    /// Builds a record, dropping trailing empty fields.
    ///
    /// `"a,b,,"` and `"a,b"` are the same record.
    pub fn new<I, S>(row: usize, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        while fields.last().is_some_and(|f| f.is_empty()) {
            fields.pop();
        }
        Record { row, fields }
    }

    /// Splits one comma-delimited line. No quoting rules.
    pub fn from_line(row: usize, line: &str) -> Self {
        Record::new(row, line.split(','))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Fields with every empty entry removed, leading and interior included.
    pub fn non_empty(&self) -> Vec<&str> {
        self.fields
            .iter()
            .map(String::as_str)
            .filter(|f| !f.is_empty())
            .collect()
    }
}

// =============================================================================
// Record Source
// =============================================================================

/// Anything that can hand the loader its rows, one kind at a time.
pub trait RecordSource {
    fn fetch_rows(&self, kind: RecordKind) -> LoadResult<Option<Vec<Record>>>;
}

/// Rows held in memory.
///
/// Kinds that were never given rows report `None`, like an unset file path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: HashMap<RecordKind, Vec<Record>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rows for a kind, replacing any earlier rows.
    pub fn with_rows(mut self, kind: RecordKind, rows: Vec<Record>) -> Self {
        self.rows.insert(kind, rows);
        self
    }

    /// Sets the rows for a kind from comma-delimited lines, numbered from 1.
    pub fn with_lines(self, kind: RecordKind, lines: &[&str]) -> Self {
        let rows = lines
            .iter()
            .enumerate()
            .map(|(i, line)| Record::from_line(i + 1, line))
            .collect();
        self.with_rows(kind, rows)
    }

    /// Appends one row to a kind, creating its stream if needed.
    pub fn push(&mut self, kind: RecordKind, record: Record) {
        self.rows.entry(kind).or_default().push(record);
    }
}

impl RecordSource for MemorySource {
    fn fetch_rows(&self, kind: RecordKind) -> LoadResult<Option<Vec<Record>>> {
        Ok(self.rows.get(&kind).cloned())
    }
}

// =============================================================================
// Field Parsing
// =============================================================================

fn invalid(row: usize, source: ValidationError) -> LoadError {
    LoadError::InvalidField { row, source }
}

/// Parses a catalog price, keeping every decimal.
pub fn parse_price(row: usize, field: &str, raw: &str) -> LoadResult<UnitPrice> {
    UnitPrice::parse(field, raw).map_err(|e| invalid(row, e))
}

/// Parses a finite decimal quantity (GBs, hours).
pub fn parse_quantity(row: usize, field: &str, raw: &str) -> LoadResult<f64> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(invalid(
            row,
            ValidationError::invalid(field, raw, "not a finite number"),
        )),
    }
}

/// Parses a non-negative whole count (days).
pub fn parse_count(row: usize, field: &str, raw: &str) -> LoadResult<u32> {
    raw.trim().parse::<u32>().map_err(|_| {
        invalid(
            row,
            ValidationError::invalid(field, raw, "not a whole number"),
        )
    })
}

/// Parses an ISO `YYYY-MM-DD` date.
pub fn parse_date(row: usize, field: &str, raw: &str) -> LoadResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        invalid(
            row,
            ValidationError::invalid(field, raw, "expected YYYY-MM-DD"),
        )
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_empty_fields_dropped() {
        let record = Record::from_line(1, "S001,ST1,c1,e1,2024-03-01,,");
        assert_eq!(record.len(), 5);
        assert_eq!(record.get(4), Some("2024-03-01"));
        assert_eq!(record.get(5), None);
    }

    #[test]
    fn test_interior_empty_fields_kept_until_filtered() {
        let record = Record::from_line(3, "S001,D01,,,,,2.5");
        assert_eq!(record.len(), 7);
        assert_eq!(record.non_empty(), vec!["S001", "D01", "2.5"]);
        assert_eq!(Record::from_line(4, ",,S001").non_empty(), vec!["S001"]);
    }

    #[test]
    fn test_blank_line_is_empty() {
        assert!(Record::from_line(1, "").is_empty());
        assert!(Record::from_line(1, ",,,").is_empty());
    }

    #[test]
    fn test_memory_source_absent_vs_empty() {
        let source = MemorySource::new()
            .with_lines(RecordKind::Person, &[])
            .with_lines(RecordKind::Item, &["P01,P,Phone,100.00"]);

        assert_eq!(source.fetch_rows(RecordKind::Person).unwrap(), Some(vec![]));
        assert_eq!(source.fetch_rows(RecordKind::Store).unwrap(), None);
        let items = source.fetch_rows(RecordKind::Item).unwrap().unwrap();
        assert_eq!(items[0].row, 1);
        assert_eq!(items[0].get(1), Some("P"));
    }

    #[test]
    fn test_field_parsers() {
        assert_eq!(parse_price(1, "basePrice", "0.125").unwrap().value(), 0.125);
        assert_eq!(parse_quantity(1, "numGBs", "2.5").unwrap(), 2.5);
        assert_eq!(parse_count(1, "numDays", "15").unwrap(), 15);
        assert_eq!(
            parse_date(1, "date", "2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );

        let err = parse_count(9, "numDays", "-3").unwrap_err();
        assert!(matches!(err, LoadError::InvalidField { row: 9, .. }));
        assert!(parse_quantity(2, "numHours", "inf").is_err());
        assert!(parse_date(2, "date", "03/01/2024").is_err());
    }
}
