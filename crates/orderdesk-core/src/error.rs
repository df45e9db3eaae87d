//! # Error Types
//!
//! Domain-specific error types for orderdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  orderdesk-core errors (this file)                                     │
//! │  ├── MoneyError       - Parse / arithmetic failures of Money           │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── CoreError        - Wizard/session domain errors (wraps the above) │
//! │                                                                         │
//! │  orderdesk-db errors (separate crate)                                  │
//! │  └── DbError          - Order history storage failures                 │
//! │                                                                         │
//! │  Flow: MoneyError / ValidationError → CoreError → caller / UI          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (input text, field, id)
//! 3. Errors are enum variants, never String
//! 4. A zero-duration MRR is NOT an error - it is a defined zero result

use thiserror::Error;

// =============================================================================
// Money Error
// =============================================================================

/// Failures of the exact decimal money type.
///
/// ## When These Occur
/// ```text
/// Money::from("abc")          → Parse
/// Money::from("1e-40")        → Precision
/// Money::try_from(f64::NAN)   → NonFinite
/// money.divide(0)             → DivisionByZero
/// 7.9e28 + 7.9e28             → Overflow
/// ```
///
/// None of these are ever papered over with a zero: callers decide the fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoneyError {
    /// The input string is not a decimal number.
    #[error("Cannot parse '{input}' as a decimal amount")]
    Parse { input: String },

    /// The input is a number but holds more digits than fit exactly.
    #[error("Cannot represent '{input}' exactly as a decimal amount")]
    Precision { input: String },

    /// A native number was NaN or infinite.
    #[error("Cannot represent non-finite number {value} as a decimal amount")]
    NonFinite { value: f64 },

    /// Division by a zero operand.
    #[error("Division by zero: {dividend} / 0")]
    DivisionByZero { dividend: String },

    /// Result does not fit the decimal representation.
    #[error("Decimal overflow during {operation}")]
    Overflow { operation: &'static str },
}

/// Convenience type alias for Results with MoneyError.
pub type MoneyResult<T> = Result<T, MoneyError>;

// =============================================================================
// Core Error
// =============================================================================

/// Order wizard domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Plan id does not belong to the selected product.
    ///
    /// ## When This Occurs
    /// - Selecting a plan before choosing a product
    /// - Selecting a plan id copied from a different product
    #[error("Plan {plan_id} not found for product {product_id}")]
    PlanNotFound { product_id: String, plan_id: String },

    /// A plan was selected while no product is chosen.
    #[error("No product selected")]
    NoProductSelected,

    /// Add-on id is not part of the order.
    #[error("Add-on not found: {0}")]
    AddOnNotFound(String),

    /// Wizard step outside 1..=4.
    #[error("Invalid step: {0}")]
    InvalidStep(u8),

    /// Environment/config value could not be interpreted.
    #[error("Invalid configuration for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    /// Money error (wraps MoneyError).
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when wizard input doesn't meet requirements.
/// Used to block progression to the next step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: String, max: String },

    /// Value must not be negative (zero is fine).
    #[error("{field} must be 0 or greater")]
    Negative { field: String },

    /// Invalid format (e.g., invalid ZIP, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Negative { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
