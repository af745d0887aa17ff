//! # Pricing Engine
//!
//! Subtotal, tax and grand total for every item shape, composed upward into
//! sale aggregates.
//!
//! ## Formula Table
//! ```text
//! ┌──────────┬──────────────────────────────────┬────────┬────────────────┐
//! │ Variant  │ Subtotal                         │ Tax    │ Grand Total    │
//! ├──────────┼──────────────────────────────────┼────────┼────────────────┤
//! │ Purchase │ base                             │ 6.5%   │ subtotal + tax │
//! │ Lease    │ base × 1.5 ÷ term months         │ none   │ subtotal       │
//! │ Data     │ GBs × price per GB               │ 5.5%   │ subtotal + tax │
//! │ Voice    │ price per period × (days ÷ 30)   │ 6.5%   │ subtotal + tax │
//! │ Service  │ hourly price × hours             │ 3.5%   │ subtotal + tax │
//! │ Product  │ 0                                │ 0      │ 0              │
//! └──────────┴──────────────────────────────────┴────────┴────────────────┘
//! ```
//!
//! Catalog prices enter the formulas unrounded. Every subtotal and every tax
//! is rounded to the cent on its own (see [`Money::from_rounded`]); the tax
//! is computed from the rounded subtotal.
//! A sale sums the already rounded line figures, so no second rounding
//! happens at the sale level.

use crate::item::{Data, Item, Lease, Product, Purchase, Service, Voice};
use crate::money::{Money, TaxRate};
use crate::types::Sale;

// =============================================================================
// Rates
// =============================================================================

/// 6.5% on product purchases.
pub const PURCHASE_TAX: TaxRate = TaxRate::from_bps(650);

/// 5.5% on data plans.
pub const DATA_TAX: TaxRate = TaxRate::from_bps(550);

/// 6.5% on voice plans.
pub const VOICE_TAX: TaxRate = TaxRate::from_bps(650);

/// 3.5% on services.
pub const SERVICE_TAX: TaxRate = TaxRate::from_bps(350);

/// Multiplier applied to a product's base price when it is leased.
pub const LEASE_MARKUP: f64 = 1.5;

// =============================================================================
// Priced Trait
// =============================================================================

/// Anything with a subtotal and a tax.
///
/// `grand_total` is always `subtotal + tax`; implementors only override it
/// when they can compute it more cheaply.
pub trait Priced {
    fn subtotal(&self) -> Money;

    fn tax(&self) -> Money;

    fn grand_total(&self) -> Money {
        self.subtotal() + self.tax()
    }
}

impl Priced for Purchase {
    fn subtotal(&self) -> Money {
        Money::from_rounded(self.base_price.value())
    }

    fn tax(&self) -> Money {
        PURCHASE_TAX.apply(self.subtotal())
    }
}

impl Priced for Lease {
    /// Construction guarantees a nonzero term.
    fn subtotal(&self) -> Money {
        let term = self.term_months() as f64;
        Money::from_rounded(self.base_price.value() * LEASE_MARKUP / term)
    }

    fn tax(&self) -> Money {
        Money::zero()
    }
}

impl Priced for Data {
    fn subtotal(&self) -> Money {
        Money::from_rounded(self.num_gbs * self.price_per_gb.value())
    }

    fn tax(&self) -> Money {
        DATA_TAX.apply(self.subtotal())
    }
}

impl Priced for Voice {
    fn subtotal(&self) -> Money {
        let periods = self.num_days as f64 / Voice::PERIOD_DAYS;
        Money::from_rounded(self.price_per_period.value() * periods)
    }

    fn tax(&self) -> Money {
        VOICE_TAX.apply(self.subtotal())
    }
}

impl Priced for Service {
    fn subtotal(&self) -> Money {
        Money::from_rounded(self.hourly_price.value() * self.num_hours)
    }

    fn tax(&self) -> Money {
        SERVICE_TAX.apply(self.subtotal())
    }
}

/// An unsold catalog product prices to zero.
impl Priced for Product {
    fn subtotal(&self) -> Money {
        Money::zero()
    }

    fn tax(&self) -> Money {
        Money::zero()
    }
}

impl Priced for Item {
    fn subtotal(&self) -> Money {
        match self {
            Item::Voice(v) => v.subtotal(),
            Item::Data(d) => d.subtotal(),
            Item::Service(s) => s.subtotal(),
            Item::Product(p) => p.subtotal(),
            Item::Purchase(p) => p.subtotal(),
            Item::Lease(l) => l.subtotal(),
        }
    }

    fn tax(&self) -> Money {
        match self {
            Item::Voice(v) => v.tax(),
            Item::Data(d) => d.tax(),
            Item::Service(s) => s.tax(),
            Item::Product(p) => p.tax(),
            Item::Purchase(p) => p.tax(),
            Item::Lease(l) => l.tax(),
        }
    }
}

// =============================================================================
// Aggregates
// =============================================================================

/// A sale prices as the sum of its lines.
impl Priced for Sale {
    fn subtotal(&self) -> Money {
        self.items.iter().map(Priced::subtotal).sum()
    }

    fn tax(&self) -> Money {
        self.items.iter().map(Priced::tax).sum()
    }
}

/// Sums grand totals over a set of sales (a store, or a whole report).
pub fn total_of<'a, I>(sales: I) -> Money
where
    I: IntoIterator<Item = &'a Sale>,
{
    sales.into_iter().map(Priced::grand_total).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
