//! # Money Module
//!
//! Currencies, amounts and the exchange-rate policy between them.
//!
//! ## Two Rates, One Direction Each
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  KHR per 1 USD                                                          │
//! │                                                                         │
//! │  sell_rate (e.g. 4000)                                                  │
//! │    • normalizing any KHR amount into USD      amount / sell_rate        │
//! │    • fixed USD adjustment into a KHR total    value  * sell_rate        │
//! │                                                                         │
//! │  buy_rate (e.g. 4100)                                                   │
//! │    • fixed KHR adjustment into a USD total    value  / buy_rate         │
//! │                                                                         │
//! │  No rate is ever implied: every call receives an ExchangeRate.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Decimal?
//! KHR to USD conversion divides by the rate, so amounts are rarely whole
//! cents. `rust_decimal` keeps 28 significant digits and never drifts the way
//! `f64` does. The tails it leaves after a division still differ in the
//! last digit depending on the path taken, so comparisons between converted
//! amounts go through [`COMPARE_SCALE`]. Every operation is checked: an
//! amount that would overflow is a [`ValidationError::Overflow`], never a
//! panic.
//!
//! ## Usage
//! ```rust
//! use cashdesk_core::money::{to_usd, Currency, ExchangeRate};
//! use rust_decimal::Decimal;
//!
//! let rate = ExchangeRate::new(Decimal::from(4000), Decimal::from(4100)).unwrap();
//! let usd = to_usd(Decimal::from(40000), Currency::Khr, &rate).unwrap();
//! assert_eq!(usd, Decimal::from(10));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::validation::validate_exchange_rate;

/// Decimal places that matter when two converted amounts are compared.
pub const COMPARE_SCALE: u32 = 10;

/// Residual change smaller than this many decimal places of a dollar is
/// conversion noise, not money owed.
pub const DUST_SCALE: u32 = 6;

/// Unwraps a checked `Decimal` operation, naming `field` on overflow.
#[inline]
pub(crate) fn checked(result: Option<Decimal>, field: &str) -> CoreResult<Decimal> {
    result.ok_or_else(|| {
        ValidationError::Overflow {
            field: field.to_string(),
        }
        .into()
    })
}

// =============================================================================
// Currency
// =============================================================================

/// The two currencies a drawer can hold.
///
/// Parsing is strict: any code other than `USD` or `KHR` is rejected with
/// [`CoreError::InvalidCurrency`] instead of silently falling back to one of
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US dollar.
    Usd,
    /// Cambodian riel.
    Khr,
}

impl Currency {
    /// ISO 4217 code.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Khr => "KHR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "KHR" => Ok(Currency::Khr),
            _ => Err(CoreError::InvalidCurrency(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Exchange Rate
// =============================================================================

/// KHR per USD, with distinct rates for selling and buying dollars.
///
/// `buy_rate >= sell_rate` is the usual spread but is not enforced; both
/// must be strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    #[ts(as = "String")]
    pub sell_rate: Decimal,
    #[ts(as = "String")]
    pub buy_rate: Decimal,
}

impl ExchangeRate {
    /// Creates a validated exchange rate.
    pub fn new(sell_rate: Decimal, buy_rate: Decimal) -> CoreResult<Self> {
        let rate = ExchangeRate {
            sell_rate,
            buy_rate,
        };
        validate_exchange_rate(&rate)?;
        Ok(rate)
    }
}

// =============================================================================
// Currency Normalizer
// =============================================================================

/// Converts an amount into USD.
///
/// USD passes through untouched; KHR is divided by the sell rate.
#[inline]
pub fn to_usd(amount: Decimal, currency: Currency, rate: &ExchangeRate) -> CoreResult<Decimal> {
    match currency {
        Currency::Usd => Ok(amount),
        Currency::Khr => checked(amount.checked_div(rate.sell_rate), "KHR amount"),
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// An amount tagged with its currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money {
    #[ts(as = "String")]
    pub value: Decimal,
    pub currency: Currency,
}

impl Money {
    #[inline]
    pub const fn new(value: Decimal, currency: Currency) -> Self {
        Money { value, currency }
    }

    #[inline]
    pub const fn usd(value: Decimal) -> Self {
        Money::new(value, Currency::Usd)
    }

    #[inline]
    pub const fn khr(value: Decimal) -> Self {
        Money::new(value, Currency::Khr)
    }

    /// Re-expresses this amount in USD via the sell rate.
    #[inline]
    pub fn into_usd(self, rate: &ExchangeRate) -> CoreResult<Money> {
        Ok(Money::usd(to_usd(self.value, self.currency, rate)?))
    }

    /// Value of this amount once exchanged into `target`.
    ///
    /// Used for fixed adjustments landing on a running total. Same currency
    /// returns the raw value with no conversion at all.
    ///
    /// ```rust
    /// use cashdesk_core::money::{Currency, ExchangeRate, Money};
    /// use rust_decimal::Decimal;
    ///
    /// let rate = ExchangeRate::new(Decimal::from(4000), Decimal::from(4100)).unwrap();
    /// let voucher = Money::khr(Decimal::from(8200));
    /// assert_eq!(voucher.exchange_value(Currency::Usd, &rate).unwrap(), Decimal::from(2));
    /// ```
    pub fn exchange_value(&self, target: Currency, rate: &ExchangeRate) -> CoreResult<Decimal> {
        if self.currency == target {
            return Ok(self.value);
        }

        let exchanged = match target {
            // USD into KHR
            Currency::Khr => self.value.checked_mul(rate.sell_rate),
            // KHR into USD
            Currency::Usd => self.value.checked_div(rate.buy_rate),
        };
        checked(exchanged, "adjustment amount")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_amount(self.value), self.currency)
    }
}

// =============================================================================
// Display Formatting
// =============================================================================

/// Formats an amount with two decimals and comma thousands separators.
///
/// For receipts and logs only; the engine itself never rounds.
///
/// ```rust
/// use cashdesk_core::money::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::new(123456789, 2)), "1,234,567.89");
/// ```
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded.abs());
    let (whole, frac) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac}")
}

// =============================================================================
// Unit Tests
// =============================================================================
