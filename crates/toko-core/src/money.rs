//! # Money Module
//!
//! Provides the `Money` type for Rupiah amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Rupiah has no minor unit in retail use. Prices, line totals and       │
//! │  subtotals are whole numbers, so every amount is an i64 of Rupiah:     │
//! │                                                                         │
//! │    15.000 × 2 + 10.000 × 2 = 50.000   (exact, no rounding ever)        │
//! │                                                                         │
//! │  Multiplication and addition are CHECKED: an overflow is reported      │
//! │  instead of wrapping into a negative subtotal.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use toko_core::money::Money;
//!
//! let price = Money::from_rupiah(15_000);
//! let line = price.checked_mul_quantity(2).unwrap();
//! assert_eq!(line.rupiah(), 30_000);
//! assert_eq!(line.to_string(), "Rp 30.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole Rupiah.
///
/// A newtype, so JSON bodies carry a bare integer: `"subtotal": 30000`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole Rupiah.
    #[inline]
    pub const fn from_rupiah(rupiah: i64) -> Self {
        Money(rupiah)
    }

    /// Returns the value in whole Rupiah.
    #[inline]
    pub const fn rupiah(&self) -> i64 {
        self.0
    }

    /// Zero Rupiah.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Line total for `qty` units, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use toko_core::money::Money;
    ///
    /// let unit_price = Money::from_rupiah(110_000);
    /// assert_eq!(unit_price.checked_mul_quantity(3), Some(Money::from_rupiah(330_000)));
    /// assert_eq!(Money::from_rupiah(i64::MAX).checked_mul_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Sum of two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Formats as `Rp 1.250.000` (Indonesian thousands separator).
///
/// For logs and seed output; the front-end formats amounts itself.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rp {}", sign, grouped)
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl From<i64> for Money {
    fn from(rupiah: i64) -> Self {
        Money(rupiah)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rupiah() {
        let money = Money::from_rupiah(15_000);
        assert_eq!(money.rupiah(), 15_000);
        assert!(!money.is_zero());
        assert!(Money::zero().is_zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_rupiah(0).to_string(), "Rp 0");
        assert_eq!(Money::from_rupiah(999).to_string(), "Rp 999");
        assert_eq!(Money::from_rupiah(15_000).to_string(), "Rp 15.000");
        assert_eq!(Money::from_rupiah(1_250_000).to_string(), "Rp 1.250.000");
        assert_eq!(Money::from_rupiah(-40_000).to_string(), "-Rp 40.000");
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::from_rupiah(70_000);
        assert_eq!(a.checked_mul_quantity(1), Some(a));
        assert_eq!(
            a.checked_add(Money::from_rupiah(40_000)),
            Some(Money::from_rupiah(110_000))
        );
        assert_eq!(Money::from_rupiah(i64::MAX).checked_add(a), None);
    }

    #[test]
    fn test_sum() {
        let total: Money = [50_000, 200_000, 430_000]
            .into_iter()
            .map(Money::from_rupiah)
            .sum();
        assert_eq!(total.rupiah(), 680_000);
    }

    #[test]
    fn test_serializes_as_integer() {
        let json = serde_json::to_string(&Money::from_rupiah(30_000)).unwrap();
        assert_eq!(json, "30000");
    }
}
