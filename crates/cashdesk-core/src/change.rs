//! # Cash Change Resolver
//!
//! Picks the notes and coins to hand back when a customer overpays.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Drawer: 20 USD ×5, 5 USD ×10        Change due: 27 USD                 │
//! │                                                                         │
//! │  1. Normalize every face value to USD (KHR / sell_rate)                 │
//! │  2. Sort largest first (stable: equal values keep drawer order)         │
//! │  3. Greedy:                                                             │
//! │       20 USD  → floor(27 / 20) = 1, take 1      27 → 7                 │
//! │        5 USD  → floor( 7 /  5) = 1, take 1       7 → 2                 │
//! │  4. Nothing small enough left → one synthetic 2 USD "change" entry     │
//! │                                                                         │
//! │  remainCash = -2                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Counts are taken in each note's own currency and compared at
//! [`COMPARE_SCALE`], so a riel note worth an uneven fraction of a dollar
//! still fits a riel amount exactly. Residuals below [`DUST_SCALE`] are
//! conversion noise and are dropped.
//!
//! The input drawer is never touched. The result carries a new snapshot with
//! the taken quantities removed; persisting it is up to the caller.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{checked, to_usd, Currency, ExchangeRate, COMPARE_SCALE, DUST_SCALE};
use crate::validation::{check_drawer, validate_exchange_rate};

// =============================================================================
// Drawer Types
// =============================================================================

/// Bills or coins of one face value held in the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashDenomination {
    /// Face value in `currency`.
    #[ts(as = "String")]
    pub cash: Decimal,
    pub currency: Currency,
    pub quantity: i64,
}

impl CashDenomination {
    #[inline]
    pub const fn new(cash: Decimal, currency: Currency, quantity: i64) -> Self {
        CashDenomination {
            cash,
            currency,
            quantity,
        }
    }
}

/// Signed balance of a checkout. Negative USD means change is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RemainingOwed {
    #[serde(rename = "USD")]
    #[ts(as = "String")]
    pub usd: Decimal,

    /// Same balance in riel, for display.
    #[serde(rename = "KHR")]
    #[ts(as = "String")]
    pub khr: Decimal,
}

impl RemainingOwed {
    /// Builds the balance from its USD value, deriving KHR with the sell rate.
    pub fn from_usd(usd: Decimal, rate: &ExchangeRate) -> CoreResult<Self> {
        Ok(RemainingOwed {
            usd,
            khr: checked(usd.checked_mul(rate.sell_rate), "remaining balance")?,
        })
    }
}

/// One line of the change handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReturnCash {
    /// Original face value (or the residual amount for a synthetic entry).
    #[ts(as = "String")]
    pub cash: Decimal,
    pub quantity: i64,
    pub currency: Currency,
    /// Sell rate the change was computed with.
    #[ts(as = "String")]
    pub rate: Decimal,
    /// KHR equivalent, only on the synthetic residual entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub exchange: Option<Decimal>,
}

impl ReturnCash {
    /// True for the residual entry that no physical denomination covered.
    pub fn is_synthetic(&self) -> bool {
        self.exchange.is_some()
    }
}

/// Outcome of one change resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ChangeResult {
    /// Negative residual left after the greedy pass (zero when exact).
    #[ts(as = "String")]
    pub remain_cash: Decimal,
    pub return_cashes: Vec<ReturnCash>,
    /// The drawer after change was taken, largest denomination first.
    pub cashes: Vec<CashDenomination>,
}

// =============================================================================
// Resolver
// =============================================================================

/// Computes the change for an overpaid checkout.
///
/// ## Errors
/// - [`CoreError::InsufficientCash`] when `owed.usd > 0`
/// - [`CoreError::InvariantViolation`] for a negative quantity or a
///   non-positive face value in the drawer
///
/// Running out of small denominations is not an error: the remainder comes
/// back as a single synthetic USD entry with its KHR equivalent.
///
/// ## Example
/// ```rust
/// use cashdesk_core::change::{resolve, CashDenomination, RemainingOwed};
/// use cashdesk_core::money::{Currency, ExchangeRate};
/// use rust_decimal::Decimal;
///
/// let rate = ExchangeRate::new(Decimal::from(4000), Decimal::from(4100)).unwrap();
/// let drawer = [CashDenomination::new(Decimal::from(10), Currency::Usd, 3)];
/// let owed = RemainingOwed::from_usd(Decimal::from(-20), &rate).unwrap();
///
/// let change = resolve(&drawer, &owed, &rate).unwrap();
/// assert_eq!(change.return_cashes[0].quantity, 2);
/// assert_eq!(change.cashes[0].quantity, 1);
/// assert!(change.remain_cash.is_zero());
/// ```
pub fn resolve(
    available: &[CashDenomination],
    owed: &RemainingOwed,
    rate: &ExchangeRate,
) -> CoreResult<ChangeResult> {
    if owed.usd > Decimal::ZERO {
        return Err(CoreError::InsufficientCash { owed: owed.usd });
    }
    validate_exchange_rate(rate)?;
    check_drawer(available)?;

    let mut drawer = Vec::with_capacity(available.len());
    for cash in available {
        drawer.push((to_usd(cash.cash, cash.currency, rate)?, *cash));
    }
    // sort_by is stable
    drawer.sort_by(|a, b| b.0.cmp(&a.0));

    let mut return_cash = owed.usd.abs();
    let mut return_cashes = Vec::new();

    for (value, cash) in drawer.iter_mut() {
        if return_cash <= Decimal::ZERO || cash.quantity < 1 {
            continue;
        }

        let need = notes_needed(return_cash, cash, rate)?;
        if need < Decimal::ONE {
            continue;
        }

        let taken = need.min(Decimal::from(cash.quantity));
        let count = taken.to_i64().ok_or_else(|| {
            CoreError::InvariantViolation(format!("cannot count {taken} units of {}", cash.cash))
        })?;

        return_cashes.push(ReturnCash {
            cash: cash.cash,
            quantity: count,
            currency: cash.currency,
            rate: rate.sell_rate,
            exchange: None,
        });
        let handed = checked(value.checked_mul(taken), "change due")?;
        return_cash = checked(return_cash.checked_sub(handed), "change due")?;
        cash.quantity -= count;
    }

    if return_cash.abs().round_dp(DUST_SCALE).is_zero() {
        return_cash = Decimal::ZERO;
    }

    if return_cash > Decimal::ZERO {
        return_cashes.push(ReturnCash {
            cash: return_cash,
            quantity: 1,
            currency: Currency::Usd,
            rate: rate.sell_rate,
            exchange: Some(checked(
                return_cash.checked_mul(rate.sell_rate),
                "change due",
            )?),
        });
    }

    let remain_cash = -return_cash;
    if remain_cash > Decimal::ZERO {
        return Err(CoreError::InvariantViolation(format!(
            "change left a positive remainder {remain_cash}"
        )));
    }

    Ok(ChangeResult {
        remain_cash,
        return_cashes,
        cashes: drawer.into_iter().map(|(_, cash)| cash).collect(),
    })
}

/// Whole notes of `cash` that fit into `return_usd`, counted in the note's
/// own currency.
fn notes_needed(
    return_usd: Decimal,
    cash: &CashDenomination,
    rate: &ExchangeRate,
) -> CoreResult<Decimal> {
    let due_here = match cash.currency {
        Currency::Usd => return_usd,
        Currency::Khr => checked(return_usd.checked_mul(rate.sell_rate), "change due")?,
    };
    let ratio = checked(due_here.checked_div(cash.cash), "change due")?;
    Ok(ratio.round_dp(COMPARE_SCALE).floor())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rate() -> ExchangeRate {
        ExchangeRate::new(dec!(4000), dec!(4100)).unwrap()
    }

    fn owed(usd: Decimal) -> RemainingOwed {
        RemainingOwed::from_usd(usd, &rate()).unwrap()
    }

    #[test]
    fn test_greedy_with_residual() {
        let drawer = [
            CashDenomination::new(dec!(20), Currency::Usd, 5),
            CashDenomination::new(dec!(5), Currency::Usd, 10),
        ];
        let change = resolve(&drawer, &owed(dec!(-27)), &rate()).unwrap();

        assert_eq!(change.remain_cash, dec!(-2));
        assert_eq!(change.return_cashes.len(), 3);
        assert_eq!(change.return_cashes[0].cash, dec!(20));
        assert_eq!(change.return_cashes[0].quantity, 1);
        assert_eq!(change.return_cashes[1].cash, dec!(5));
        assert_eq!(change.return_cashes[1].quantity, 1);

        let residual = change.return_cashes[2];
        assert!(residual.is_synthetic());
        assert_eq!(residual.cash, dec!(2));
        assert_eq!(residual.currency, Currency::Usd);
        assert_eq!(residual.quantity, 1);
        assert_eq!(residual.exchange, Some(dec!(8000)));

        assert_eq!(change.cashes[0].quantity, 4);
        assert_eq!(change.cashes[1].quantity, 9);
    }

    #[test]
    fn test_owed_amount_fails_without_touching_drawer() {
        let drawer = vec![CashDenomination::new(dec!(20), Currency::Usd, 5)];
        let before = drawer.clone();

        let err = resolve(&drawer, &owed(dec!(5)), &rate()).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientCash { owed } if owed == dec!(5)));
        assert_eq!(drawer, before);
    }

    #[test]
    fn test_denomination_too_large_is_skipped() {
        let drawer = [CashDenomination::new(dec!(100), Currency::Usd, 1)];
        let change = resolve(&drawer, &owed(dec!(-30)), &rate()).unwrap();

        assert_eq!(change.return_cashes.len(), 1);
        assert!(change.return_cashes[0].is_synthetic());
        assert_eq!(change.return_cashes[0].cash, dec!(30));
        assert_eq!(change.remain_cash, dec!(-30));
        assert_eq!(change.cashes[0].quantity, 1);
    }

    #[test]
    fn test_exact_change_has_no_residual() {
        let drawer = [
            CashDenomination::new(dec!(10), Currency::Usd, 1),
            CashDenomination::new(dec!(1), Currency::Usd, 10),
        ];
        let change = resolve(&drawer, &owed(dec!(-13)), &rate()).unwrap();

        assert!(change.remain_cash.is_zero());
        assert!(change.return_cashes.iter().all(|c| !c.is_synthetic()));
        assert_eq!(change.return_cashes[1].quantity, 3);
    }

    #[test]
    fn test_mixed_currencies_sorted_by_usd_value() {
        // 20000 KHR = 5 USD, 2000 KHR = 0.5 USD
        let drawer = [
            CashDenomination::new(dec!(2000), Currency::Khr, 4),
            CashDenomination::new(dec!(1), Currency::Usd, 10),
            CashDenomination::new(dec!(20000), Currency::Khr, 2),
        ];
        let change = resolve(&drawer, &owed(dec!(-6.5)), &rate()).unwrap();

        let picked: Vec<(Decimal, Currency, i64)> = change
            .return_cashes
            .iter()
            .map(|c| (c.cash, c.currency, c.quantity))
            .collect();
        assert_eq!(
            picked,
            vec![
                (dec!(20000), Currency::Khr, 1),
                (dec!(1), Currency::Usd, 1),
                (dec!(2000), Currency::Khr, 1),
            ]
        );
        assert!(change.remain_cash.is_zero());
        assert_eq!(change.cashes[0].cash, dec!(20000));
        assert_eq!(change.cashes[0].quantity, 1);
    }

    #[test]
    fn test_limited_quantity_falls_through_to_smaller() {
        let drawer = [
            CashDenomination::new(dec!(10), Currency::Usd, 1),
            CashDenomination::new(dec!(5), Currency::Usd, 4),
        ];
        let change = resolve(&drawer, &owed(dec!(-30)), &rate()).unwrap();

        assert_eq!(change.return_cashes[0].quantity, 1);
        assert_eq!(change.return_cashes[1].quantity, 4);
        assert!(change.remain_cash.is_zero());
        assert!(change.cashes.iter().all(|c| c.quantity == 0));
    }

    #[test]
    fn test_equal_values_keep_drawer_order() {
        // 4000 KHR and 1 USD are both worth one dollar
        let drawer = [
            CashDenomination::new(dec!(4000), Currency::Khr, 1),
            CashDenomination::new(dec!(1), Currency::Usd, 1),
        ];
        let change = resolve(&drawer, &owed(dec!(-1)), &rate()).unwrap();

        assert_eq!(change.return_cashes.len(), 1);
        assert_eq!(change.return_cashes[0].currency, Currency::Khr);
        assert_eq!(change.cashes[1].quantity, 1);
    }

    #[test]
    fn test_empty_drawer_and_zero_owed() {
        let change = resolve(&[], &owed(dec!(0)), &rate()).unwrap();
        assert!(change.return_cashes.is_empty());
        assert!(change.remain_cash.is_zero());
    }

    #[test]
    fn test_negative_quantity_is_invariant_violation() {
        let drawer = [CashDenomination::new(dec!(5), Currency::Usd, -2)];
        let err = resolve(&drawer, &owed(dec!(-5)), &rate()).unwrap_err();
        assert!(matches!(err, CoreError::InvariantViolation(_)));
    }

    #[test]
    fn test_riel_notes_at_uneven_rate_are_all_taken() {
        // 6000 KHR paid on a zero total at 4100: six 1000 KHR notes back
        let rate = ExchangeRate::new(dec!(4100), dec!(4200)).unwrap();
        let paid = to_usd(dec!(6000), Currency::Khr, &rate).unwrap();
        let owed = RemainingOwed::from_usd(-paid, &rate).unwrap();
        let drawer = [CashDenomination::new(dec!(1000), Currency::Khr, 10)];

        let change = resolve(&drawer, &owed, &rate).unwrap();

        assert_eq!(change.return_cashes.len(), 1);
        assert_eq!(change.return_cashes[0].cash, dec!(1000));
        assert_eq!(change.return_cashes[0].quantity, 6);
        assert!(!change.return_cashes[0].is_synthetic());
        assert!(change.remain_cash.is_zero());
        assert_eq!(change.cashes[0].quantity, 4);
    }

    #[test]
    fn test_uneven_rate_short_drawer_keeps_real_residual() {
        let rate = ExchangeRate::new(dec!(4100), dec!(4200)).unwrap();
        let paid = to_usd(dec!(6000), Currency::Khr, &rate).unwrap();
        let owed = RemainingOwed::from_usd(-paid, &rate).unwrap();
        let drawer = [CashDenomination::new(dec!(1000), Currency::Khr, 5)];

        let change = resolve(&drawer, &owed, &rate).unwrap();

        // one 1000 KHR note short, worth 1000 / 4100 USD
        let residual = change.return_cashes.last().unwrap();
        assert!(residual.is_synthetic());
        assert_eq!(residual.cash.round_dp(6), dec!(0.243902));
        assert_eq!(residual.exchange.unwrap().round_dp(2), dec!(1000));
    }

    #[test]
    fn test_overflowing_balance_is_an_error() {
        let err = RemainingOwed::from_usd(Decimal::MAX, &rate()).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_change_result_json_shape() {
        let drawer = [CashDenomination::new(dec!(100), Currency::Usd, 1)];
        let change = resolve(&drawer, &owed(dec!(-1)), &rate()).unwrap();
        let json = serde_json::to_value(&change).unwrap();

        assert!(json.get("remainCash").is_some());
        assert_eq!(json["returnCashes"][0]["currency"], "USD");
        assert!(json["returnCashes"][0].get("exchange").is_some());
        assert_eq!(json["cashes"][0]["quantity"], 1);
    }
}
