//! # Pricing
//!
//! Turns the line items of a sale plus its promotions into the amount due.
//!
//! ## Settlement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  transactions ──► subtotal { USD, KHR, BOTH = USD + KHR / sell_rate }   │
//! │                                  │                                      │
//! │                                  ▼  BOTH, in USD                        │
//! │                            discounts (in order)                         │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                            services  (in order)                         │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                            vouchers  (in order)                         │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                        SettlementResult.total                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::adjustment::{apply, AdjustmentRecord, Discount, ServiceCharge, Voucher};
use crate::error::CoreResult;
use crate::money::{checked, to_usd, Currency, ExchangeRate, Money};
use crate::validation::validate_exchange_rate;

// =============================================================================
// Transaction
// =============================================================================

/// One line of the sale, already priced by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    pub total: Money,
}

impl Transaction {
    #[inline]
    pub const fn new(total: Money) -> Self {
        Transaction { total }
    }
}

// =============================================================================
// Subtotal
// =============================================================================

/// Per-currency sums of the transactions, kept for audit and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Subtotal {
    #[serde(rename = "USD")]
    #[ts(as = "String")]
    pub usd: Decimal,

    #[serde(rename = "KHR")]
    #[ts(as = "String")]
    pub khr: Decimal,

    /// Everything in USD. Only this one feeds the adjustments.
    #[serde(rename = "BOTH")]
    #[ts(as = "String")]
    pub both: Decimal,
}

/// Sums transactions per currency and combines them into USD.
pub fn subtotal(transactions: &[Transaction], rate: &ExchangeRate) -> CoreResult<Subtotal> {
    let mut usd = Decimal::ZERO;
    let mut khr = Decimal::ZERO;
    for transaction in transactions {
        let value = transaction.total.value;
        match transaction.total.currency {
            Currency::Usd => usd = checked(usd.checked_add(value), "USD subtotal")?,
            Currency::Khr => khr = checked(khr.checked_add(value), "KHR subtotal")?,
        }
    }

    let khr_in_usd = to_usd(khr, Currency::Khr, rate)?;
    Ok(Subtotal {
        usd,
        khr,
        both: checked(usd.checked_add(khr_in_usd), "subtotal")?,
    })
}

// =============================================================================
// Adjustments
// =============================================================================

/// The three ordered adjustment lists of a checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjustments {
    pub discounts: Vec<Discount>,
    pub services: Vec<ServiceCharge>,
    pub vouchers: Vec<Voucher>,
}

impl Adjustments {
    /// Parses wire records, keeping each list in its original order.
    pub fn from_records(
        discounts: &[AdjustmentRecord],
        services: &[AdjustmentRecord],
        vouchers: &[AdjustmentRecord],
    ) -> CoreResult<Self> {
        Ok(Adjustments {
            discounts: discounts
                .iter()
                .map(Discount::try_from)
                .collect::<CoreResult<_>>()?,
            services: services
                .iter()
                .map(ServiceCharge::try_from)
                .collect::<CoreResult<_>>()?,
            vouchers: vouchers
                .iter()
                .map(Voucher::try_from)
                .collect::<CoreResult<_>>()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.discounts.is_empty() && self.services.is_empty() && self.vouchers.is_empty()
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// The priced checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettlementResult {
    pub total: Money,
    pub subtotal: Subtotal,
    pub rate: ExchangeRate,
}

/// Prices a checkout.
///
/// Discounts, then services, then vouchers. The order is fixed: a 10%
/// discount followed by a 10% service charge on 100 gives 99, not 100.
///
/// ## Example
/// ```rust
/// use cashdesk_core::adjustment::{Adjustment, Discount};
/// use cashdesk_core::money::{ExchangeRate, Money};
/// use cashdesk_core::pricing::{settle, Adjustments, Transaction};
/// use rust_decimal::Decimal;
///
/// let rate = ExchangeRate::new(Decimal::from(4000), Decimal::from(4100)).unwrap();
/// let transactions = [
///     Transaction::new(Money::usd(Decimal::from(50))),
///     Transaction::new(Money::khr(Decimal::from(40000))),
/// ];
/// let adjustments = Adjustments {
///     discounts: vec![Discount {
///         adjustment: Adjustment::Percentage(Decimal::from(10)),
///         is_fixed: false,
///     }],
///     ..Default::default()
/// };
///
/// let result = settle(&transactions, &adjustments, &rate).unwrap();
/// assert_eq!(result.subtotal.both, Decimal::from(60));
/// assert_eq!(result.total, Money::usd(Decimal::from(54)));
/// ```
pub fn settle(
    transactions: &[Transaction],
    adjustments: &Adjustments,
    rate: &ExchangeRate,
) -> CoreResult<SettlementResult> {
    validate_exchange_rate(rate)?;

    let subtotal = subtotal(transactions, rate)?;

    let total = Money::usd(subtotal.both);
    let total = apply(total, &adjustments.discounts, rate)?;
    let total = apply(total, &adjustments.services, rate)?;
    let total = apply(total, &adjustments.vouchers, rate)?;

    Ok(SettlementResult {
        total,
        subtotal,
        rate: *rate,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjustment::Adjustment;
    use crate::error::CoreError;
    use rust_decimal_macros::dec;

    fn rate() -> ExchangeRate {
        ExchangeRate::new(dec!(4000), dec!(4100)).unwrap()
    }

    fn record(kind: &str, value: Decimal, is_fixed: bool) -> AdjustmentRecord {
        AdjustmentRecord {
            kind: kind.to_string(),
            value,
            is_fixed,
        }
    }

    #[test]
    fn test_subtotal_splits_currencies() {
        let transactions = [
            Transaction::new(Money::usd(dec!(12.5))),
            Transaction::new(Money::khr(dec!(2000))),
            Transaction::new(Money::usd(dec!(7.5))),
            Transaction::new(Money::khr(dec!(6000))),
        ];
        let sub = subtotal(&transactions, &rate()).unwrap();
        assert_eq!(sub.usd, dec!(20));
        assert_eq!(sub.khr, dec!(8000));
        assert_eq!(sub.both, dec!(22));
    }

    #[test]
    fn test_subtotal_of_nothing() {
        assert_eq!(subtotal(&[], &rate()).unwrap(), Subtotal::default());
    }

    #[test]
    fn test_settle_overflowing_subtotal_is_an_error() {
        let transactions = [
            Transaction::new(Money::usd(Decimal::MAX)),
            Transaction::new(Money::usd(Decimal::MAX)),
        ];
        let err = settle(&transactions, &Adjustments::default(), &rate()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(crate::error::ValidationError::Overflow { .. })
        ));
    }

    #[test]
    fn test_subtotal_overflow_when_currencies_combine() {
        let transactions = [
            Transaction::new(Money::usd(Decimal::MAX)),
            Transaction::new(Money::khr(Decimal::MAX)),
        ];
        assert!(subtotal(&transactions, &rate()).is_err());
    }

    #[test]
    fn test_settle_without_adjustments() {
        let transactions = [Transaction::new(Money::khr(dec!(10000)))];
        let result = settle(&transactions, &Adjustments::default(), &rate()).unwrap();
        assert_eq!(result.total, Money::usd(dec!(2.5)));
        assert_eq!(result.rate, rate());
    }

    #[test]
    fn test_settle_category_order() {
        let transactions = [Transaction::new(Money::usd(dec!(100)))];
        let adjustments = Adjustments::from_records(
            &[record("PCT", dec!(10), false)],
            &[record("PCT", dec!(10), false)],
            &[record("USD", dec!(9), false)],
        )
        .unwrap();

        // 100 × 0.9 × 1.1 - 9
        let result = settle(&transactions, &adjustments, &rate()).unwrap();
        assert_eq!(result.total, Money::usd(dec!(90)));
    }

    #[test]
    fn test_settle_voucher_after_fixed_price() {
        let transactions = [Transaction::new(Money::usd(dec!(80)))];
        let adjustments = Adjustments {
            discounts: vec![Discount {
                adjustment: Adjustment::FixedAmount(Money::usd(dec!(50))),
                is_fixed: true,
            }],
            services: vec![],
            vouchers: vec![Voucher(Adjustment::FixedAmount(Money::khr(dec!(41000))))],
        };
        let result = settle(&transactions, &adjustments, &rate()).unwrap();
        assert_eq!(result.total, Money::usd(dec!(40)));
    }

    #[test]
    fn test_settle_rejects_bad_rate() {
        let bad = ExchangeRate {
            sell_rate: dec!(0),
            buy_rate: dec!(4100),
        };
        let err = settle(&[], &Adjustments::default(), &bad).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_from_records_rejects_third_currency() {
        let err = Adjustments::from_records(&[], &[], &[record("JPY", dec!(100), false)])
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidCurrency(_)));
    }

    #[test]
    fn test_settlement_json_shape() {
        let transactions = [Transaction::new(Money::usd(dec!(5)))];
        let result = settle(&transactions, &Adjustments::default(), &rate()).unwrap();
        let json = serde_json::to_value(result).unwrap();

        assert_eq!(json["total"]["currency"], "USD");
        assert!(json["subtotal"].get("BOTH").is_some());
        assert!(json["rate"].get("sellRate").is_some());
    }
}
