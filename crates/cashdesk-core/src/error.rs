//! # Error Types
//!
//! Domain-specific error types for cashdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cashdesk-core errors (this file)                                      │
//! │  ├── CoreError        - Settlement and change failures                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  cashdesk-cli errors (app)                                             │
//! │  └── AppError         - What the operator sees (code + message)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → stderr / exit code     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The core never logs and never retries. Every failure travels back to the
//! caller as a value.

use rust_decimal::Decimal;
use thiserror::Error;

/// Message prefix of [`CoreError::InvalidCurrency`].
///
/// Serde surfaces currency rejections as plain text, so callers that need
/// to tell them apart from other parse failures match on this.
pub const UNSUPPORTED_CURRENCY: &str = "Unsupported currency";

// =============================================================================
// Core Error
// =============================================================================

/// Settlement engine errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Change resolution was asked for while the customer still owes money.
    ///
    /// ## User Workflow
    /// ```text
    /// Total: $54.00, tendered: $50.00
    ///      │
    ///      ▼
    /// remaining owed USD = +4.00
    ///      │
    ///      ▼
    /// InsufficientCash { owed: 4.00 }
    ///      │
    ///      ▼
    /// Checkout halts, nothing is committed
    /// ```
    #[error("Not enough cash: customer still owes {owed} USD")]
    InsufficientCash { owed: Decimal },

    /// A currency code outside USD/KHR.
    #[error("{}: {}", UNSUPPORTED_CURRENCY, .0)]
    InvalidCurrency(String),

    /// A caller-supplied precondition was broken.
    ///
    /// This is a programming-level failure (negative drawer quantity,
    /// zero face value, positive remainder after change), never a normal
    /// business outcome.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Stable machine-readable message code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::InsufficientCash { .. } => "NOT_ENOUGH_CASH",
            CoreError::InvalidCurrency(_) => "INVALID_CURRENCY",
            CoreError::InvariantViolation(_) => "INVARIANT_VIOLATION",
            CoreError::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Arithmetic on the value would leave the representable range.
    #[error("{field} is too large to compute")]
    Overflow { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
