//! # Money
//!
//! Decimal currency amounts with explicit minor-unit rounding.
//!
//! All proposal figures are carried as [`Money`], a thin wrapper over
//! [`rust_decimal::Decimal`]. Rounding to the minor unit (cents) always uses
//! round-half-up so that displayed totals and billed totals agree.
//!
//! # Examples
//!
//! ```
//! use proposal_dispatch::domain::value_objects::money::Money;
//! use rust_decimal::Decimal;
//!
//! let monthly = Money::from_whole(4500);
//! let discounted = monthly.apply_discount(Decimal::new(5, 2));
//! assert_eq!(discounted, Money::from_whole(4275));
//! assert_eq!(discounted.to_string(), "$4,275.00");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Number of decimal places in the currency's minor unit.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// A currency amount.
///
/// Amounts are not rounded on construction; call
/// [`Money::round_to_minor_unit`] where a billed figure is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wraps a decimal amount.
    #[inline]
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Creates an amount from whole currency units.
    #[inline]
    #[must_use]
    pub fn from_whole(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Creates an amount from minor units (cents).
    #[inline]
    #[must_use]
    pub fn from_minor(cents: i64) -> Self {
        Self(Decimal::new(cents, MINOR_UNIT_SCALE))
    }

    /// Returns the underlying decimal.
    #[inline]
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is below zero.
    #[inline]
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to the minor unit using round-half-up (midpoint away from zero).
    #[must_use]
    pub fn round_to_minor_unit(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Applies a fractional discount rate and rounds to the minor unit.
    ///
    /// `rate` is a fraction in `0..=1`, e.g. `0.05` for five percent.
    #[must_use]
    pub fn apply_discount(self, rate: Decimal) -> Self {
        Self(self.0 * (Decimal::ONE - rate)).round_to_minor_unit()
    }

    /// Multiplies the amount by a whole number of periods.
    #[must_use]
    pub fn times(self, periods: u32) -> Self {
        Self(self.0 * Decimal::from(periods))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Formats as `$1,234.50` (negative amounts as `-$1,234.50`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_to_minor_unit();
        let fixed = format!("{:.2}", rounded.0.abs());
        let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        if rounded.is_negative() {
            write!(f, "-")?;
        }
        write!(f, "${}.{}", group_thousands(whole), fraction)
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
