//! # Adjustment Applier
//!
//! Discounts, service charges and vouchers applied to a running total.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  running total ──► [into USD] ──► adjust ──► [into USD] ──► adjust ...  │
//! │                                                                         │
//! │  Every adjustment sees the running total expressed in USD. Only a       │
//! │  fixed-price discount can move it to KHR, and the next step brings it   │
//! │  straight back.                                                         │
//! │                                                                         │
//! │  Discount   PCT     total - total × v / 100                             │
//! │             fixed   total - v (exchanged into running currency)         │
//! │             isFixed + fixed  total := v          (absolute price)       │
//! │             isFixed + PCT    total := total × v / 100                   │
//! │  Service    PCT     total + total × v / 100                             │
//! │             fixed   total + v (exchanged)                               │
//! │  Voucher    same as a non-fixed discount                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Percentages compound, so the order of a list matters and the order of the
//! three lists matters. [`crate::pricing::settle`] owns the category order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{checked, Currency, ExchangeRate, Money};
use crate::validation::validate_adjustment_value;

/// Record type marking a percentage adjustment.
pub const PERCENT_TYPE: &str = "PCT";

// =============================================================================
// Adjustment
// =============================================================================

/// How much an adjustment is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Percent of the running total (10 = 10%).
    Percentage(Decimal),
    /// A fixed amount in a given currency.
    FixedAmount(Money),
}

impl Adjustment {
    /// The amount this adjustment adds or removes, in the running currency.
    fn portion(&self, running: Money, rate: &ExchangeRate) -> CoreResult<Decimal> {
        match self {
            Adjustment::Percentage(pct) => percent_of(running.value, *pct),
            Adjustment::FixedAmount(amount) => amount.exchange_value(running.currency, rate),
        }
    }
}

/// `value × pct / 100`, checked.
fn percent_of(value: Decimal, pct: Decimal) -> CoreResult<Decimal> {
    let scaled = checked(value.checked_mul(pct), "percentage adjustment")?;
    checked(scaled.checked_div(Decimal::ONE_HUNDRED), "percentage adjustment")
}

/// A price reduction. `is_fixed` turns it into a price override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discount {
    pub adjustment: Adjustment,
    pub is_fixed: bool,
}

/// A surcharge added on top of the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceCharge(pub Adjustment);

/// A redeemed voucher. Behaves like a non-fixed discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voucher(pub Adjustment);

// =============================================================================
// Adjust Trait
// =============================================================================

/// One step of the applier.
pub trait Adjust {
    /// Returns the new running total. `running` is always in USD here.
    fn adjust(&self, running: Money, rate: &ExchangeRate) -> CoreResult<Money>;
}

impl Adjust for Discount {
    fn adjust(&self, running: Money, rate: &ExchangeRate) -> CoreResult<Money> {
        if self.is_fixed {
            return match self.adjustment {
                Adjustment::FixedAmount(price) => Ok(price),
                // Percentage-of-total price, not a reduction
                Adjustment::Percentage(pct) => {
                    Ok(Money::new(percent_of(running.value, pct)?, running.currency))
                }
            };
        }

        let off = self.adjustment.portion(running, rate)?;
        let value = checked(running.value.checked_sub(off), "discounted total")?;
        Ok(Money::new(value, running.currency))
    }
}

impl Adjust for ServiceCharge {
    fn adjust(&self, running: Money, rate: &ExchangeRate) -> CoreResult<Money> {
        let charge = self.0.portion(running, rate)?;
        let value = checked(running.value.checked_add(charge), "service total")?;
        Ok(Money::new(value, running.currency))
    }
}

impl Adjust for Voucher {
    fn adjust(&self, running: Money, rate: &ExchangeRate) -> CoreResult<Money> {
        let off = self.0.portion(running, rate)?;
        let value = checked(running.value.checked_sub(off), "voucher total")?;
        Ok(Money::new(value, running.currency))
    }
}

/// Applies `adjustments` in order, normalizing the running total to USD
/// before each one.
///
/// An empty list returns `total` untouched, in its original currency.
///
/// ## Example
/// ```rust
/// use cashdesk_core::adjustment::{apply, Adjustment, ServiceCharge};
/// use cashdesk_core::money::{ExchangeRate, Money};
/// use rust_decimal::Decimal;
///
/// let rate = ExchangeRate::new(Decimal::from(4000), Decimal::from(4100)).unwrap();
/// let services = [ServiceCharge(Adjustment::Percentage(Decimal::from(10)))];
///
/// let total = apply(Money::usd(Decimal::from(90)), &services, &rate).unwrap();
/// assert_eq!(total, Money::usd(Decimal::from(99)));
/// ```
pub fn apply<A: Adjust>(
    total: Money,
    adjustments: &[A],
    rate: &ExchangeRate,
) -> CoreResult<Money> {
    adjustments.iter().try_fold(total, |running, adjustment| {
        adjustment.adjust(running.into_usd(rate)?, rate)
    })
}

// =============================================================================
// Wire Record
// =============================================================================

/// An adjustment as stored and sent over the wire.
///
/// ```json
/// { "type": "PCT", "value": 10, "isFixed": false }
/// { "type": "KHR", "value": 4100 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentRecord {
    /// `PCT` or a currency code.
    #[serde(rename = "type")]
    pub kind: String,

    #[ts(as = "String")]
    pub value: Decimal,

    /// Only meaningful for discounts.
    #[serde(default)]
    pub is_fixed: bool,
}

impl TryFrom<&AdjustmentRecord> for Adjustment {
    type Error = CoreError;

    fn try_from(record: &AdjustmentRecord) -> CoreResult<Self> {
        validate_adjustment_value(record.value)?;

        if record.kind.trim() == PERCENT_TYPE {
            return Ok(Adjustment::Percentage(record.value));
        }

        let currency: Currency = record.kind.parse()?;
        Ok(Adjustment::FixedAmount(Money::new(record.value, currency)))
    }
}

impl TryFrom<&AdjustmentRecord> for Discount {
    type Error = CoreError;

    fn try_from(record: &AdjustmentRecord) -> CoreResult<Self> {
        Ok(Discount {
            adjustment: Adjustment::try_from(record)?,
            is_fixed: record.is_fixed,
        })
    }
}

impl TryFrom<&AdjustmentRecord> for ServiceCharge {
    type Error = CoreError;

    fn try_from(record: &AdjustmentRecord) -> CoreResult<Self> {
        Ok(ServiceCharge(Adjustment::try_from(record)?))
    }
}

impl TryFrom<&AdjustmentRecord> for Voucher {
    type Error = CoreError;

    fn try_from(record: &AdjustmentRecord) -> CoreResult<Self> {
        Ok(Voucher(Adjustment::try_from(record)?))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
