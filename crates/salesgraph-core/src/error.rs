//! # Error Types
//!
//! Domain-specific error types for salesgraph-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  salesgraph-core errors (this file)                                    │
//! │  ├── CoreError        - Domain errors, container bounds                │
//! │  ├── ValidationError  - Field-level input failures                     │
//! │  └── LoadError        - Hard failures that abort a load                │
//! │                                                                         │
//! │  salesgraph-db errors (separate crate)                                 │
//! │  └── DbError          - Database / file operation failures             │
//! │                                                                         │
//! │  Flow: ValidationError → LoadError → DbError → binary exit            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Load Failure Taxonomy
//! ```text
//! ┌──────────────┬───────────────────────────────┬────────────────────────┐
//! │ Class        │ Example                       │ Handling               │
//! ├──────────────┼───────────────────────────────┼────────────────────────┤
//! │ Skip         │ Store row with 5 fields       │ warn!, row dropped     │
//! │ EmptySource  │ header line only              │ info!, empty registry  │
//! │ HardFail     │ customer uuid not registered  │ LoadError, load aborts │
//! │ Bounds       │ list.get(7) on 3 elements     │ CoreError to caller    │
//! └──────────────┴───────────────────────────────┴────────────────────────┘
//! ```
//!
//! Skip and EmptySource never become error values.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// Index-based access to an ordered container outside `[0, len)`.
    ///
    /// Always a programming error; callers never recover from it.
    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A lease whose start and end fall in the same month has no term to
    /// prorate over.
    #[error("Lease of {item_code} has a zero-month term")]
    ZeroLeaseTerm { item_code: String },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level input errors.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Invalid format (e.g., unparseable number or date).
    #[error("{field} has invalid format: '{value}' ({reason})")]
    InvalidFormat {
        field: String,
        value: String,
        reason: String,
    },

    /// Duplicate natural key within a registry.
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Creates an InvalidFormat error for a field value.
    pub fn invalid(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Load Error
// =============================================================================

/// Hard failures that abort the current load.
///
/// ## When This Occurs
/// - A Sale names a customer, salesperson or store that is not loaded
/// - A Service sale line names a servicer that is not loaded
/// - A numeric or date field cannot be parsed
/// - The record source itself cannot be read
#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    /// A foreign natural key did not resolve to a loaded entity.
    #[error("{kind} '{key}' referenced by {context} was not found")]
    MissingReference {
        kind: &'static str,
        key: String,
        context: String,
    },

    /// A row had the right shape but an unusable field value.
    #[error("Row {row}: {source}")]
    InvalidField {
        row: usize,
        #[source]
        source: ValidationError,
    },

    /// A sale line could not be priced as constructed.
    #[error("Row {row}: {source}")]
    Domain {
        row: usize,
        #[source]
        source: CoreError,
    },

    /// The record source could not be read.
    #[error("Record source failed: {0}")]
    Source(String),
}

impl LoadError {
    /// Creates a MissingReference error.
    pub fn missing(kind: &'static str, key: impl Into<String>, context: impl Into<String>) -> Self {
        LoadError::MissingReference {
            kind,
            key: key.into(),
            context: context.into(),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for Results with LoadError.
pub type LoadResult<T> = Result<T, LoadError>;

// =============================================================================
// Unit Tests
// =============================================================================
