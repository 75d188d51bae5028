//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In JavaScript/floating point:                                      │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  OUR SOLUTION: rust_decimal                                         │
//! │    Exact base-10 arithmetic. Prices may carry sub-cent precision    │
//! │    (e.g. an override of 10.005); line subtotals are rounded to the  │
//! │    currency's minor unit BEFORE summation, half-up.                 │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Contract
//! A line of qty 2 at 10.005 rounds to 20.01 at the line level; totals are
//! sums of already-rounded line subtotals, never rounded post-sum.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

/// Number of decimal places in the currency's minor unit.
pub const MINOR_UNIT_DP: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value backed by exact decimal arithmetic.
///
/// ## Design Decisions
/// - **Decimal (not f64)**: exact base-10 math, no representation drift
/// - **Single-field tuple struct**: zero-cost wrapper, serializes as a number
/// - **Half-up rounding**: `RoundingStrategy::MidpointAwayFromZero`, applied
///   at the line-item level only
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a Money value from a raw decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from integer cents.
    ///
    /// ## Example
    /// ```rust
    /// use vendr_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.to_string(), "10.99");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, MINOR_UNIT_DP))
    }

    /// Returns the inner decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Zero money value.
    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (refund territory; catalog prices
    /// are validated non-negative before they ever become Money).
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to the currency's minor unit using half-up rounding.
    ///
    /// ## Example
    /// ```rust
    /// use vendr_core::money::Money;
    /// use rust_decimal_macros::dec;
    ///
    /// let m = Money::new(dec!(20.005));
    /// assert_eq!(m.round_minor_unit().amount(), dec!(20.01));
    /// ```
    pub fn round_minor_unit(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(MINOR_UNIT_DP, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Computes a line subtotal: qty × unit price, rounded to the minor
    /// unit. This is THE rounding point of the system; totals are sums of
    /// these, never re-rounded.
    ///
    /// ## Example
    /// ```rust
    /// use vendr_core::money::Money;
    /// use rust_decimal_macros::dec;
    ///
    /// let unit = Money::new(dec!(10.005));
    /// assert_eq!(unit.line_subtotal(2).amount(), dec!(20.01));
    /// ```
    pub fn line_subtotal(&self, qty: u32) -> Self {
        Money(self.0 * Decimal::from(qty)).round_minor_unit()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the raw decimal; UI formatting/localization lives outside
/// this crate.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.amount(), dec!(10.99));
    }

    #[test]
    fn test_half_up_rounding() {
        assert_eq!(Money::new(dec!(20.005)).round_minor_unit().amount(), dec!(20.01));
        assert_eq!(Money::new(dec!(20.004)).round_minor_unit().amount(), dec!(20.00));
        assert_eq!(Money::new(dec!(20.015)).round_minor_unit().amount(), dec!(20.02));
    }

    #[test]
    fn test_line_subtotal_rounds_before_summation() {
        // 3 × 3.335 = 10.005 → 10.01 at the line level
        let unit = Money::new(dec!(3.335));
        assert_eq!(unit.line_subtotal(3).amount(), dec!(10.01));

        // The documented contract: sum of rounded lines, not rounded sum
        let lines = [unit.line_subtotal(3), unit.line_subtotal(3)];
        let total: Money = lines.into_iter().sum();
        assert_eq!(total.amount(), dec!(20.02));
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::new(dec!(10.00));
        let b = Money::new(dec!(5.50));
        assert_eq!((a + b).amount(), dec!(15.50));
        assert_eq!((a - b).amount(), dec!(4.50));
    }

    #[test]
    fn test_zero_and_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_negative());
        assert!(Money::new(dec!(-1)).is_negative());
        assert!(!Money::new(dec!(1)).is_negative());
    }

    #[test]
    fn test_sum_iterator() {
        let total: Money = [Money::from_cents(100), Money::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total.amount(), dec!(3.50));
    }
}
