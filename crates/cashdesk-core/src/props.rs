//! Property-based tests for the settlement engine.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::adjustment::{apply, Adjustment, Discount, ServiceCharge};
use crate::change::{resolve, CashDenomination};
use crate::checkout::remaining_owed;
use crate::money::{to_usd, Currency, ExchangeRate, Money};

/// Positive amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Plausible KHR per USD (1.00 to 10,000.00).
fn positive_rate() -> impl Strategy<Value = ExchangeRate> {
    (100i64..1_000_000i64, 0i64..20_000i64).prop_map(|(sell, spread)| ExchangeRate {
        sell_rate: Decimal::new(sell, 2),
        buy_rate: Decimal::new(sell + spread, 2),
    })
}

/// Percentages 0.0 to 100.0.
fn percentage() -> impl Strategy<Value = Decimal> {
    (0i64..=1000i64).prop_map(|v| Decimal::new(v, 1))
}

/// Drawers mixing dollar and riel notes, duplicates allowed.
fn mixed_drawer() -> impl Strategy<Value = Vec<CashDenomination>> {
    let usd = prop::sample::select(vec![1i64, 5, 10, 20, 50, 100])
        .prop_map(|face| (Decimal::from(face), Currency::Usd));
    let khr = prop::sample::select(vec![100i64, 500, 1000, 2000, 5000, 10000, 20000, 50000])
        .prop_map(|face| (Decimal::from(face), Currency::Khr));

    prop::collection::vec((prop_oneof![usd, khr], 0i64..10), 0..8).prop_map(|notes| {
        notes
            .into_iter()
            .map(|((face, currency), qty)| CashDenomination::new(face, currency, qty))
            .collect()
    })
}

/// A single tender: dollars to the cent, or riel in hundreds.
fn tender() -> impl Strategy<Value = Money> {
    prop_oneof![
        (0i64..50_000).prop_map(|cents| Money::usd(Decimal::new(cents, 2))),
        (0i64..2_000).prop_map(|hundreds| Money::khr(Decimal::from(hundreds * 100))),
    ]
}

fn usd_value(cash: &CashDenomination, rate: &ExchangeRate) -> Decimal {
    to_usd(cash.cash, cash.currency, rate).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// KHR to USD and back lands on the original amount.
    #[test]
    fn prop_khr_round_trip(amount in positive_amount(), rate in positive_rate()) {
        let back = to_usd(amount, Currency::Khr, &rate).unwrap() * rate.sell_rate;
        let tolerance = Decimal::new(1, 12);
        prop_assert!((back - amount).abs() <= tolerance, "{} != {}", back, amount);
    }

    /// USD amounts pass through the normalizer unchanged.
    #[test]
    fn prop_usd_passthrough(amount in positive_amount(), rate in positive_rate()) {
        prop_assert_eq!(to_usd(amount, Currency::Usd, &rate).unwrap(), amount);
    }

    /// Discount then service equals the product of both factors.
    #[test]
    fn prop_discount_then_service_compounds(
        amount in positive_amount(),
        off in percentage(),
        extra in percentage(),
        rate in positive_rate(),
    ) {
        let discounted = apply(
            Money::usd(amount),
            &[Discount { adjustment: Adjustment::Percentage(off), is_fixed: false }],
            &rate,
        )
        .unwrap();
        let charged =
            apply(discounted, &[ServiceCharge(Adjustment::Percentage(extra))], &rate).unwrap();

        let hundred = Decimal::ONE_HUNDRED;
        let expected = amount * (hundred - off) / hundred * (hundred + extra) / hundred;
        prop_assert!((charged.value - expected).abs() <= Decimal::new(1, 12));
    }

    /// Change handed back never exceeds what was due and never invents notes.
    #[test]
    fn prop_change_is_conserved(
        drawer in mixed_drawer(),
        paid in tender(),
        rate in positive_rate(),
    ) {
        let owed = remaining_owed(&Money::usd(Decimal::ZERO), &[paid], &rate).unwrap();
        let change = resolve(&drawer, &owed, &rate).unwrap();

        let physical: Decimal = change
            .return_cashes
            .iter()
            .filter(|c| !c.is_synthetic())
            .map(|c| to_usd(c.cash, c.currency, &rate).unwrap() * Decimal::from(c.quantity))
            .sum();
        let due = paid.into_usd(&rate).unwrap().value;
        let drift = (physical - change.remain_cash - due).abs();
        prop_assert!(drift <= Decimal::new(1, 6), "drift {}", drift);
        prop_assert!(change.remain_cash <= Decimal::ZERO);
        prop_assert!(change.cashes.iter().all(|c| c.quantity >= 0));

        let before: i64 = drawer.iter().map(|c| c.quantity).sum();
        let after: i64 = change.cashes.iter().map(|c| c.quantity).sum();
        let taken: i64 = change
            .return_cashes
            .iter()
            .filter(|c| !c.is_synthetic())
            .map(|c| c.quantity)
            .sum();
        prop_assert_eq!(before - after, taken);
    }

    /// A residual is only reported once no remaining note fits into it.
    #[test]
    fn prop_no_residual_while_a_note_fits(
        drawer in mixed_drawer(),
        paid in tender(),
        rate in positive_rate(),
    ) {
        let owed = remaining_owed(&Money::usd(Decimal::ZERO), &[paid], &rate).unwrap();
        let change = resolve(&drawer, &owed, &rate).unwrap();

        if let Some(residual) = change.return_cashes.iter().find(|c| c.is_synthetic()) {
            prop_assert_eq!(residual.cash, -change.remain_cash);
            let slack = Decimal::ONE + Decimal::new(1, 9);
            for left in change.cashes.iter().filter(|c| c.quantity > 0) {
                let value = usd_value(left, &rate);
                prop_assert!(
                    value * slack > residual.cash,
                    "{} {:?} fits into residual {}",
                    left.cash,
                    left.currency,
                    residual.cash
                );
            }
        } else {
            prop_assert!(change.remain_cash.is_zero());
        }
    }

    /// Same drawer, same owed amount, same answer; drawer comes back largest first.
    #[test]
    fn prop_change_is_deterministic(
        drawer in mixed_drawer(),
        paid in tender(),
        rate in positive_rate(),
    ) {
        let owed = remaining_owed(&Money::usd(Decimal::ZERO), &[paid], &rate).unwrap();

        let first = resolve(&drawer, &owed, &rate).unwrap();
        let second = resolve(&drawer, &owed, &rate).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert!(first
            .cashes
            .windows(2)
            .all(|w| usd_value(&w[0], &rate) >= usd_value(&w[1], &rate)));
    }
}
