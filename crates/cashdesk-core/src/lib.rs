//! # cashdesk-core: Pricing & Settlement Engine
//!
//! The checkout math of Cashdesk: currency normalization, discounts,
//! service charges, vouchers and physical cash change across USD and KHR.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cashdesk Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 cashdesk-cli (caller)                           │   │
//! │  │   config ──► parse request ──► core ──► log ──► persist drawer  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain function calls                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    cashdesk-core (THIS CRATE)                   │   │
//! │  │   money ──► pricing / adjustment ──► checkout ──► change        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Currency, Money, ExchangeRate and the USD normalizer
//! - [`adjustment`] - Discounts, service charges, vouchers
//! - [`pricing`] - Subtotals and the settled total
//! - [`change`] - Greedy cash change from a drawer snapshot
//! - [`checkout`] - Tenders, remaining balance, the whole chain
//! - [`validation`] - Rate, amount and drawer invariants
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output; no state across calls
//! 2. **No I/O, no logging**: the caller decides what to record
//! 3. **Decimal Money**: `rust_decimal`, rounding only for display
//! 4. **Explicit Rates**: every call receives its `ExchangeRate`; there is
//!    no built-in default
//! 5. **Value Semantics**: the drawer passed in is never mutated
//!
//! ## Example Usage
//!
//! ```rust
//! use cashdesk_core::{resolve, CashDenomination, Currency, ExchangeRate, RemainingOwed};
//! use rust_decimal::Decimal;
//!
//! let rate = ExchangeRate::new(Decimal::from(4000), Decimal::from(4100)).unwrap();
//! let drawer = [
//!     CashDenomination::new(Decimal::from(20), Currency::Usd, 5),
//!     CashDenomination::new(Decimal::from(5), Currency::Usd, 10),
//! ];
//! let owed = RemainingOwed::from_usd(Decimal::from(-27), &rate).unwrap();
//!
//! let change = resolve(&drawer, &owed, &rate).unwrap();
//! assert_eq!(change.remain_cash, Decimal::from(-2));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod adjustment;
pub mod change;
pub mod checkout;
pub mod error;
pub mod money;
pub mod pricing;
pub mod validation;

#[cfg(test)]
mod props;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use adjustment::{apply, Adjust, Adjustment, AdjustmentRecord, Discount, ServiceCharge, Voucher};
pub use change::{resolve, CashDenomination, ChangeResult, RemainingOwed, ReturnCash};
pub use checkout::{checkout, remaining_owed, CheckoutOutcome};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{to_usd, Currency, ExchangeRate, Money};
pub use pricing::{settle, subtotal, Adjustments, SettlementResult, Subtotal, Transaction};
