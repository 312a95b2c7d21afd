//! # Validation Module
//!
//! Sign and range checks the engine performs before it computes anything.
//!
//! Structural completeness (required fields, shapes) is the job of the
//! layer that parses requests. What lives here are the invariants the
//! arithmetic depends on: a zero rate would divide by zero, a negative
//! drawer count would hand out notes that do not exist.
//!
//! ## Usage
//! ```rust
//! use cashdesk_core::validation::validate_adjustment_value;
//! use rust_decimal::Decimal;
//!
//! assert!(validate_adjustment_value(Decimal::from(10)).is_ok());
//! assert!(validate_adjustment_value(Decimal::from(-10)).is_err());
//! ```

use rust_decimal::Decimal;

use crate::change::CashDenomination;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{ExchangeRate, Money};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Rate Validators
// =============================================================================

/// Validates that both sides of an exchange rate are strictly positive.
pub fn validate_exchange_rate(rate: &ExchangeRate) -> ValidationResult<()> {
    if rate.sell_rate <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "sell_rate".to_string(),
        });
    }

    if rate.buy_rate <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "buy_rate".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Amount Validators
// =============================================================================

/// Validates a discount, service or voucher value.
///
/// Zero is allowed (a no-op adjustment).
pub fn validate_adjustment_value(value: Decimal) -> ValidationResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::MustNotBeNegative {
            field: "adjustment value".to_string(),
        });
    }

    Ok(())
}

/// Validates an amount handed over by the customer.
pub fn validate_tender(tender: &Money) -> ValidationResult<()> {
    if tender.value < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: "tendered amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Drawer Invariants
// =============================================================================

/// Checks a drawer snapshot before change is taken from it.
///
/// A broken drawer is a caller bug, not a business outcome, so this
/// reports [`CoreError::InvariantViolation`] rather than a validation error.
pub fn check_drawer(cashes: &[CashDenomination]) -> CoreResult<()> {
    for cash in cashes {
        if cash.quantity < 0 {
            return Err(CoreError::InvariantViolation(format!(
                "{} {} has negative quantity {}",
                cash.cash, cash.currency, cash.quantity
            )));
        }

        if cash.cash <= Decimal::ZERO {
            return Err(CoreError::InvariantViolation(format!(
                "denomination face value must be positive, got {} {}",
                cash.cash, cash.currency
            )));
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
