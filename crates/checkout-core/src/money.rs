//! # Money
//!
//! Every amount in the checkout is a whole number of cents.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Receipt math                                                           │
//! │                                                                         │
//! │   line total  = unit cents × quantity          exact                    │
//! │   subtotal    = Σ line totals                  exact                    │
//! │   tax         = subtotal × bps / 10000         rounded ONCE, half-up    │
//! │   total       = subtotal + tax                 exact                    │
//! │                                                                         │
//! │   3 × $2.49 = 747¢ → tax 74.7¢ → 75¢ → total $8.22                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```rust
//! use checkout_core::money::Money;
//!
//! let line = Money::from_cents(1099).multiply_quantity(2);
//! assert_eq!(line.to_string(), "$21.98");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use crate::types::TaxRate;

/// An amount in cents. Negative values only appear in tests and display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Tax on this amount at `rate`, half-up to the cent.
    ///
    /// Meant for the cart subtotal. Taxing lines one by one and adding the
    /// results can differ from this by a cent per line.
    ///
    /// ```rust
    /// use checkout_core::money::Money;
    /// use checkout_core::types::TaxRate;
    ///
    /// let tax = Money::from_cents(2500).calculate_tax(TaxRate::from_bps(1000));
    /// assert_eq!(tax.cents(), 250);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // widened so a huge subtotal times 10000 bps can't overflow
        let scaled = self.0 as i128 * rate.bps() as i128;
        Money::from_cents(((scaled + 5_000) / 10_000) as i64)
    }

    /// Unit price times quantity.
    ///
    /// ```rust
    /// use checkout_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(299).multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, quantity: i64) -> Self {
        Money(self.0.saturating_mul(quantity))
    }
}

/// `$12.34`, with a leading `-` for negative amounts.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(7).to_string(), "$0.07");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_sum_of_lines() {
        let subtotal: Money = [(1000, 2), (500, 1)]
            .into_iter()
            .map(|(cents, qty)| Money::from_cents(cents).multiply_quantity(qty))
            .sum();
        assert_eq!(subtotal.cents(), 2500);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        let ten_percent = TaxRate::from_bps(1000);

        // 74.7 -> 75
        assert_eq!(Money::from_cents(747).calculate_tax(ten_percent).cents(), 75);
        // 0.5 -> 1
        assert_eq!(Money::from_cents(5).calculate_tax(ten_percent).cents(), 1);
        // 0.4 -> 0
        assert_eq!(Money::from_cents(4).calculate_tax(ten_percent).cents(), 0);
    }

    #[test]
    fn test_zero_rate() {
        let tax = Money::from_cents(123_456).calculate_tax(TaxRate::from_bps(0));
        assert!(tax.is_zero());
    }

    #[test]
    fn test_serializes_as_plain_cents() {
        assert_eq!(serde_json::to_string(&Money::from_cents(2750)).unwrap(), "2750");
    }
}
