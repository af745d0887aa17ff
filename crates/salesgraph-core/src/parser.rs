//! # Record Parser
//!
//! Classifies a raw [`Record`] by its shape and lifts the fields into a typed
//! row for one entity kind. No cross-entity lookups happen here.
//!
//! ## Accepted Shapes
//! ```text
//! ┌──────────┬──────────────┬──────────────────────────────────────────────┐
//! │ Kind     │ Field count  │ Layout                                       │
//! ├──────────┼──────────────┼──────────────────────────────────────────────┤
//! │ Person   │ ≥ 7          │ uuid, first, last, street, city, state, zip, │
//! │          │              │ email*                                       │
//! │ Store    │ exactly 6    │ code, manager uuid, street, city, state, zip │
//! │ Item     │ ≥ 4          │ code, type (V/D/S/P), name, price            │
//! │ Sale     │ exactly 5    │ code, store, customer, salesperson, date     │
//! │ SaleItem │ ≥ 2 nonempty │ sale code, item code, extra*                 │
//! └──────────┴──────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Any other shape is a [`Parsed::Skip`]: the loader logs it and moves on.
//! A right-shaped row with an unparseable number or date is a hard
//! [`LoadError::InvalidField`](crate::error::LoadError::InvalidField).

use chrono::NaiveDate;

use crate::error::LoadResult;
use crate::money::UnitPrice;
use crate::record::{parse_date, parse_price, Record};
use crate::types::Address;

/// Exact field count of a Store record.
pub const STORE_FIELDS: usize = 6;

/// Exact field count of a Sale record.
pub const SALE_FIELDS: usize = 5;

/// Minimum field count of a Person record (emails follow).
pub const PERSON_MIN_FIELDS: usize = 7;

/// Minimum field count of an Item record.
pub const ITEM_MIN_FIELDS: usize = 4;

/// Outcome of classifying one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    Row(T),
    Skip(String),
}

impl<T> Parsed<T> {
    fn wrong_count(expected: &str, found: usize) -> Self {
        Parsed::Skip(format!("expected {} fields, found {}", expected, found))
    }
}

// =============================================================================
// Typed Rows
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PersonRow {
    pub uuid: String,
    pub first_name: String,
    pub last_name: String,
    pub address: Address,
    pub emails: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreRow {
    pub code: String,
    pub manager_uuid: String,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRow {
    pub code: String,
    pub type_code: String,
    pub name: String,
    pub price: UnitPrice,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaleRow {
    pub code: String,
    pub store_code: String,
    pub customer_uuid: String,
    pub salesperson_uuid: String,
    pub date: NaiveDate,
}

/// A sale line after empty fields are filtered out.
///
/// `extra` is interpreted only once the catalog item is known.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleLineRow {
    pub row: usize,
    pub sale_code: String,
    pub item_code: String,
    pub extra: Vec<String>,
}

// =============================================================================
// Parsers
// =============================================================================

fn field(record: &Record, index: usize) -> String {
    record.get(index).unwrap_or_default().to_string()
}

fn address_at(record: &Record, start: usize) -> Address {
    Address::new(
        field(record, start),
        field(record, start + 1),
        field(record, start + 2),
        field(record, start + 3),
    )
}

pub fn parse_person(record: &Record) -> Parsed<PersonRow> {
    if record.len() < PERSON_MIN_FIELDS {
        return Parsed::wrong_count("at least 7", record.len());
    }
    Parsed::Row(PersonRow {
        uuid: field(record, 0),
        first_name: field(record, 1),
        last_name: field(record, 2),
        address: address_at(record, 3),
        emails: record.fields()[PERSON_MIN_FIELDS..]
            .iter()
            .filter(|e| !e.is_empty())
            .cloned()
            .collect(),
    })
}

pub fn parse_store(record: &Record) -> Parsed<StoreRow> {
    if record.len() != STORE_FIELDS {
        return Parsed::wrong_count("6", record.len());
    }
    Parsed::Row(StoreRow {
        code: field(record, 0),
        manager_uuid: field(record, 1),
        address: address_at(record, 2),
    })
}

pub fn parse_item(record: &Record) -> LoadResult<Parsed<ItemRow>> {
    if record.len() < ITEM_MIN_FIELDS {
        return Ok(Parsed::wrong_count("at least 4", record.len()));
    }
    let price = parse_price(record.row, "basePrice", &field(record, 3))?;
    Ok(Parsed::Row(ItemRow {
        code: field(record, 0),
        type_code: field(record, 1),
        name: field(record, 2),
        price,
    }))
}

pub fn parse_sale(record: &Record) -> LoadResult<Parsed<SaleRow>> {
    if record.len() != SALE_FIELDS {
        return Ok(Parsed::wrong_count("5", record.len()));
    }
    let date = parse_date(record.row, "date", &field(record, 4))?;
    Ok(Parsed::Row(SaleRow {
        code: field(record, 0),
        store_code: field(record, 1),
        customer_uuid: field(record, 2),
        salesperson_uuid: field(record, 3),
        date,
    }))
}

pub fn parse_sale_line(record: &Record) -> Parsed<SaleLineRow> {
    let tokens = record.non_empty();
    match tokens.as_slice() {
        [] => Parsed::Skip("blank line".to_string()),
        [_] => Parsed::Skip("no item code".to_string()),
        [sale_code, item_code, extra @ ..] => Parsed::Row(SaleLineRow {
            row: record.row,
            sale_code: sale_code.to_string(),
            item_code: item_code.to_string(),
            extra: extra.iter().map(|s| s.to_string()).collect(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
