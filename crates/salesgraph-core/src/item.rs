//! # Items
//!
//! Catalog items and sale-line items as one sum type.
//!
//! ## Variants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              Item                                       │
//! │                                                                         │
//! │   Catalog role (one per code)        Sale-line role (one per line)      │
//! │   ───────────────────────────        ─────────────────────────────      │
//! │   Voice   price/period, 0 days  ──►  Voice   + phone, days              │
//! │   Data    price/GB, 0 GB        ──►  Data    + GBs                      │
//! │   Service hourly, 0 hours       ──►  Service + hours, servicer          │
//! │   Product base price            ──►  Purchase                           │
//! │                                 ──►  Lease   + start, end               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A sale line is always a fresh value built from the catalog entry; the
//! catalog entry itself is never modified by a sale.

use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::money::UnitPrice;
use crate::types::Person;

// =============================================================================
// Item Kind
// =============================================================================

/// The one-character catalog discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ItemKind {
    Voice,
    Data,
    Service,
    Product,
}

impl ItemKind {
    /// Every discriminant accepted in a catalog record.
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Voice,
        ItemKind::Data,
        ItemKind::Service,
        ItemKind::Product,
    ];

    /// Parses `V`, `D`, `S` or `P`. Anything else is `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "V" => Some(ItemKind::Voice),
            "D" => Some(ItemKind::Data),
            "S" => Some(ItemKind::Service),
            "P" => Some(ItemKind::Product),
            _ => None,
        }
    }

    pub const fn as_code(&self) -> &'static str {
        match self {
            ItemKind::Voice => "V",
            ItemKind::Data => "D",
            ItemKind::Service => "S",
            ItemKind::Product => "P",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

// =============================================================================
// Variants
// =============================================================================

/// A voice plan. The catalog entry carries zero days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Voice {
    pub code: String,
    pub name: String,
    pub price_per_period: UnitPrice,
    pub phone: Option<String>,
    pub num_days: u32,
}

impl Voice {
    /// Length of one billing period, in days.
    pub const PERIOD_DAYS: f64 = 30.0;

    pub fn catalog(code: impl Into<String>, name: impl Into<String>, price: UnitPrice) -> Self {
        Voice {
            code: code.into(),
            name: name.into(),
            price_per_period: price,
            phone: None,
            num_days: 0,
        }
    }

    /// Builds a sale line from the catalog entry.
    pub fn line(&self, phone: impl Into<String>, num_days: u32) -> Self {
        Voice {
            phone: Some(phone.into()),
            num_days,
            ..self.clone()
        }
    }
}

/// A data plan. The catalog entry carries zero GBs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Data {
    pub code: String,
    pub name: String,
    pub price_per_gb: UnitPrice,
    pub num_gbs: f64,
}

impl Data {
    pub fn catalog(code: impl Into<String>, name: impl Into<String>, price: UnitPrice) -> Self {
        Data {
            code: code.into(),
            name: name.into(),
            price_per_gb: price,
            num_gbs: 0.0,
        }
    }

    pub fn line(&self, num_gbs: f64) -> Self {
        Data {
            num_gbs,
            ..self.clone()
        }
    }
}

/// A billable service. The catalog entry has no hours and no servicer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    pub code: String,
    pub name: String,
    pub hourly_price: UnitPrice,
    pub num_hours: f64,
    pub servicer: Option<Arc<Person>>,
}

impl Service {
    pub fn catalog(code: impl Into<String>, name: impl Into<String>, price: UnitPrice) -> Self {
        Service {
            code: code.into(),
            name: name.into(),
            hourly_price: price,
            num_hours: 0.0,
            servicer: None,
        }
    }

    pub fn line(&self, num_hours: f64, servicer: Arc<Person>) -> Self {
        Service {
            num_hours,
            servicer: Some(servicer),
            ..self.clone()
        }
    }
}

/// A catalog product that has not been sold as either a purchase or a lease.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub code: String,
    pub name: String,
    pub base_price: UnitPrice,
}

impl Product {
    pub fn new(code: impl Into<String>, name: impl Into<String>, base_price: UnitPrice) -> Self {
        Product {
            code: code.into(),
            name: name.into(),
            base_price,
        }
    }

    pub fn purchase(&self) -> Purchase {
        Purchase::new(self.code.clone(), self.name.clone(), self.base_price)
    }

    pub fn lease(&self, start: NaiveDate, end: NaiveDate) -> CoreResult<Lease> {
        Lease::new(self.code.clone(), self.name.clone(), self.base_price, start, end)
    }
}

/// A one-time product sale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Purchase {
    pub code: String,
    pub name: String,
    pub base_price: UnitPrice,
}

impl Purchase {
    pub fn new(code: impl Into<String>, name: impl Into<String>, base_price: UnitPrice) -> Self {
        Purchase {
            code: code.into(),
            name: name.into(),
            base_price,
        }
    }
}

/// A product leased between two dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lease {
    pub code: String,
    pub name: String,
    pub base_price: UnitPrice,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Lease {
    /// Builds a lease, rejecting a term of zero whole months.
    ///
    /// ## Errors
    /// `CoreError::ZeroLeaseTerm` when start and end are less than one
    /// whole month apart.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        base_price: UnitPrice,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CoreResult<Self> {
        let lease = Lease {
            code: code.into(),
            name: name.into(),
            base_price,
            start,
            end,
        };
        if lease.term_months() == 0 {
            return Err(CoreError::ZeroLeaseTerm {
                item_code: lease.code,
            });
        }
        Ok(lease)
    }

    /// Whole months from start to end, partial months dropped.
    ///
    /// Counts calendar months between the two dates, then gives one back
    /// when the end day-of-month has not yet reached the start
    /// day-of-month. Negative when end precedes start.
    pub fn term_months(&self) -> i32 {
        months_between(self.start, self.end)
    }
}

fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let start_month = start.year() * 12 + start.month0() as i32;
    let end_month = end.year() * 12 + end.month0() as i32;
    let mut months = end_month - start_month;
    let days = end.day() as i32 - start.day() as i32;
    if months > 0 && days < 0 {
        months -= 1;
    } else if months < 0 && days > 0 {
        months += 1;
    }
    months
}

// =============================================================================
// Item
// =============================================================================

/// Every item shape the loader can produce.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Item {
    Voice(Voice),
    Data(Data),
    Service(Service),
    Product(Product),
    Purchase(Purchase),
    Lease(Lease),
}

impl Item {
    pub fn code(&self) -> &str {
        match self {
            Item::Voice(v) => &v.code,
            Item::Data(d) => &d.code,
            Item::Service(s) => &s.code,
            Item::Product(p) => &p.code,
            Item::Purchase(p) => &p.code,
            Item::Lease(l) => &l.code,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Item::Voice(v) => &v.name,
            Item::Data(d) => &d.name,
            Item::Service(s) => &s.name,
            Item::Product(p) => &p.name,
            Item::Purchase(p) => &p.name,
            Item::Lease(l) => &l.name,
        }
    }

    /// Catalog discriminant. Purchases and leases report `Product`.
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Voice(_) => ItemKind::Voice,
            Item::Data(_) => ItemKind::Data,
            Item::Service(_) => ItemKind::Service,
            Item::Product(_) | Item::Purchase(_) | Item::Lease(_) => ItemKind::Product,
        }
    }

    /// Price figure from the catalog: per period, per GB, per hour or base.
    pub fn unit_price(&self) -> UnitPrice {
        match self {
            Item::Voice(v) => v.price_per_period,
            Item::Data(d) => d.price_per_gb,
            Item::Service(s) => s.hourly_price,
            Item::Product(p) => p.base_price,
            Item::Purchase(p) => p.base_price,
            Item::Lease(l) => l.base_price,
        }
    }

    /// Builds the catalog entry for a discriminant.
    pub fn catalog(
        kind: ItemKind,
        code: impl Into<String>,
        name: impl Into<String>,
        price: UnitPrice,
    ) -> Self {
        match kind {
            ItemKind::Voice => Item::Voice(Voice::catalog(code, name, price)),
            ItemKind::Data => Item::Data(Data::catalog(code, name, price)),
            ItemKind::Service => Item::Service(Service::catalog(code, name, price)),
            ItemKind::Product => Item::Product(Product::new(code, name, price)),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Voice(v) => write!(
                f,
                "{} ({}) - Voice {}, {} days @ {}/30 day period",
                v.name,
                v.code,
                v.phone.as_deref().unwrap_or(""),
                v.num_days,
                v.price_per_period
            ),
            Item::Data(d) => write!(
                f,
                "{} ({}) - Data, {:.2} GB @ {}/GB",
                d.name, d.code, d.num_gbs, d.price_per_gb
            ),
            Item::Service(s) => write!(
                f,
                "{} ({}) - Served by {}, {:.2} hours @ {}/hour",
                s.name,
                s.code,
                s.servicer
                    .as_ref()
                    .map(|p| p.display_name())
                    .unwrap_or_default(),
                s.num_hours,
                s.hourly_price
            ),
            Item::Product(p) => write!(f, "{} ({}) - Product", p.name, p.code),
            Item::Purchase(p) => write!(f, "{} ({})", p.name, p.code),
            Item::Lease(l) => write!(
                f,
                "{} ({}) - Lease for {} months",
                l.name,
                l.code,
                l.term_months()
            ),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
