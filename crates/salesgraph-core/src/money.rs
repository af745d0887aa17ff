//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Rounding Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EVERY PRICED FIGURE IS ROUNDED ONCE, AT THE CENT BOUNDARY              │
//! │                                                                         │
//! │  formula value (f64)   30.00 × 15/30 = 15.0                            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Money::from_rounded   round(value × 100) → 1500 cents                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Money (i64 cents)     sums are exact from here on                      │
//! │                                                                         │
//! │  Round-half-up: 137.5 cents → 138, 97.5 cents → 98                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The per-line formulas are defined over floating point values (`price ×
//! quantity × rate`), so the f64 product is formed first and then rounded
//! into integer cents. Aggregation across lines and sales happens in cents.
//!
//! ## Usage
//! ```rust
//! use salesgraph_core::money::{Money, TaxRate};
//!
//! let subtotal = Money::from_cents(2500); // $25.00
//! let tax = TaxRate::from_bps(550).apply(subtotal);
//! assert_eq!(tax.cents(), 138); // $1.375 rounds half-up to $1.38
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: a lease whose end precedes its start prices negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use salesgraph_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Rounds a formula result to the nearest cent, halves rounding up.
    ///
    /// Computes `floor(value × 100 + ½)` exactly: the fractional part is
    /// compared against one half instead of adding one half in floating
    /// point, so `0.49999999999999994` cents stays at zero.
    ///
    /// ```rust
    /// use salesgraph_core::money::Money;
    ///
    /// assert_eq!(Money::from_rounded(1.375).cents(), 138);
    /// assert_eq!(Money::from_rounded(300.0).cents(), 30000);
    /// assert_eq!(Money::from_rounded(-0.125).cents(), -12);
    /// ```
    pub fn from_rounded(value: f64) -> Self {
        let scaled = value * 100.0;
        let floor = scaled.floor();
        let cents = if scaled - floor >= 0.5 { floor + 1.0 } else { floor };
        Money(cents as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value as a floating point dollar amount.
    ///
    /// Only for feeding the tax formula.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Unit Price
// =============================================================================

/// A catalog price as given in the record: per period, per GB, per hour or
/// base price.
///
/// Kept unrounded. Rounding to the cent happens once, on the priced result,
/// so a fractional-cent price still prices exactly.
///
/// ```rust
/// use salesgraph_core::money::{Money, UnitPrice};
///
/// let per_gb = UnitPrice::new(0.125);
/// assert_eq!(Money::from_rounded(per_gb.value() * 3.0).cents(), 38);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitPrice(f64);

impl UnitPrice {
    #[inline]
    pub const fn new(value: f64) -> Self {
        UnitPrice(value)
    }

    /// Parses a decimal amount such as `"1200.00"`, `"9.5"` or `"0.125"`.
    pub fn parse(field: &str, raw: &str) -> Result<Self, ValidationError> {
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| ValidationError::invalid(field, raw, "not a decimal amount"))?;
        if !value.is_finite() {
            return Err(ValidationError::invalid(field, raw, "not a finite amount"));
        }
        Ok(UnitPrice(value))
    }

    /// The price in dollars.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

/// Display rounds to the cent: `$0.13` for 0.125.
impl fmt::Display for UnitPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Money::from_rounded(self.0), f)
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 650 bps = 6.5%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction (650 bps → 0.065).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Computes `round(amount × rate × 100) / 100` as Money.
    ///
    /// ## Example
    /// ```rust
    /// use salesgraph_core::money::{Money, TaxRate};
    ///
    /// let tax = TaxRate::from_bps(650).apply(Money::from_cents(10000));
    /// assert_eq!(tax.cents(), 650); // $100.00 at 6.5% = $6.50
    /// ```
    pub fn apply(&self, amount: Money) -> Money {
        Money::from_rounded(amount.as_f64() * self.fraction())
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows `$10.99`, negative values as `-$5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
