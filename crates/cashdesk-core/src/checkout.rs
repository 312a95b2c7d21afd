//! # Checkout
//!
//! Chains pricing, payment and change into one call.
//!
//! ```text
//! transactions + adjustments ──► settle ──► total
//!                                             │
//!                          tenders ──► remaining_owed (USD, signed)
//!                                             │
//!                    drawer snapshot ──► resolve ──► change + new drawer
//! ```
//!
//! Still pure: the caller persists the payment and the returned drawer
//! together, and serializes concurrent checkouts against the same drawer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::change::{resolve, CashDenomination, ChangeResult, RemainingOwed};
use crate::error::CoreResult;
use crate::money::{checked, ExchangeRate, Money};
use crate::pricing::{settle, Adjustments, SettlementResult, Transaction};
use crate::validation::{validate_exchange_rate, validate_tender};

/// Everything a completed checkout produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOutcome {
    pub settlement: SettlementResult,
    /// Sum of all tenders, in USD.
    #[ts(as = "String")]
    pub tendered: Decimal,
    pub remaining: RemainingOwed,
    pub change: ChangeResult,
}

/// Total minus what the customer handed over, in USD.
///
/// Positive means the customer still owes; negative means change is due.
///
/// ```rust
/// use cashdesk_core::checkout::remaining_owed;
/// use cashdesk_core::money::{ExchangeRate, Money};
/// use rust_decimal::Decimal;
///
/// let rate = ExchangeRate::new(Decimal::from(4000), Decimal::from(4100)).unwrap();
/// let tenders = [Money::usd(Decimal::from(50)), Money::khr(Decimal::from(20000))];
///
/// let owed = remaining_owed(&Money::usd(Decimal::from(54)), &tenders, &rate).unwrap();
/// assert_eq!(owed.usd, Decimal::from(-1));
/// assert_eq!(owed.khr, Decimal::from(-4000));
/// ```
pub fn remaining_owed(
    total: &Money,
    tenders: &[Money],
    rate: &ExchangeRate,
) -> CoreResult<RemainingOwed> {
    validate_exchange_rate(rate)?;

    let paid = tendered_usd(tenders, rate)?;
    let due = total.into_usd(rate)?.value;
    RemainingOwed::from_usd(checked(due.checked_sub(paid), "remaining balance")?, rate)
}

fn tendered_usd(tenders: &[Money], rate: &ExchangeRate) -> CoreResult<Decimal> {
    let mut paid = Decimal::ZERO;
    for tender in tenders {
        validate_tender(tender)?;
        let usd = tender.into_usd(rate)?.value;
        paid = checked(paid.checked_add(usd), "tendered total")?;
    }
    Ok(paid)
}

/// Runs a full checkout against a drawer snapshot.
///
/// Fails with [`crate::CoreError::InsufficientCash`] when the tenders do not
/// cover the total; the drawer is left as it was.
pub fn checkout(
    transactions: &[Transaction],
    adjustments: &Adjustments,
    tenders: &[Money],
    drawer: &[CashDenomination],
    rate: &ExchangeRate,
) -> CoreResult<CheckoutOutcome> {
    let settlement = settle(transactions, adjustments, rate)?;
    let remaining = remaining_owed(&settlement.total, tenders, rate)?;
    let change = resolve(drawer, &remaining, rate)?;

    let tendered = tendered_usd(tenders, rate)?;

    Ok(CheckoutOutcome {
        settlement,
        tendered,
        remaining,
        change,
    })
}
