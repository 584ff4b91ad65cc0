//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Minor Units                                      │
//! │    Every price, total, paid and change value is an i64 count of the    │
//! │    smallest currency unit (1 rupiah). No fractions exist anywhere.     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kasir_core::money::Money;
//!
//! let price = Money::from_minor(12_000);
//! let line_total = price.multiply_quantity(3);
//! assert_eq!(line_total.minor(), 36_000);
//!
//! // Change owed to the customer
//! let change = Money::from_minor(50_000).change_for(line_total);
//! assert_eq!(change.minor(), 14_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in minor currency units.
///
/// ## Design Decisions
/// - **i64 (signed)**: change can be negative when a customer underpays
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Saturating arithmetic**: client-supplied prices and quantities can be
///   arbitrarily large, overflow clamps instead of panicking
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.price × quantity ──► line total ──► Σ items total            │
/// │                                                   │                     │
/// │  Checkout.total (client supplied) ◄── compared ───┘                     │
/// │        │                                                                │
/// │        └──► paid - total ──► Sale.change                               │
/// │                                                                         │
/// │  Product.price ──► "50.000" on the HTML index                          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use kasir_core::money::Money;
    ///
    /// let price = Money::from_minor(50_000);
    /// assert_eq!(price.minor(), 50_000);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use kasir_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(50_000);
    /// assert_eq!(unit_price.multiply_quantity(2).minor(), 100_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Change owed when `self` is the amount paid against `total`.
    ///
    /// ## User Workflow
    /// ```text
    /// Total:  100.000
    /// Paid:   150.000
    ///      │
    ///      ▼
    /// paid.change_for(total) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Change:  50.000
    /// ```
    ///
    /// Underpayment yields a negative value; it is recorded as-is.
    #[inline]
    pub const fn change_for(&self, total: Money) -> Money {
        Money(self.0.saturating_sub(total.0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display groups thousands with dots, the way rupiah amounts are written.
///
/// ```rust
/// use kasir_core::money::Money;
///
/// assert_eq!(Money::from_minor(1_250_000).to_string(), "1.250.000");
/// assert_eq!(Money::from_minor(-500).to_string(), "-500");
/// ```
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

        if self.0 < 0 {
            write!(f, "-{}", grouped)
        } else {
            f.write_str(&grouped)
        }
    }
}

impl From<i64> for Money {
    fn from(minor: i64) -> Self {
        Money(minor)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
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

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(15_000);
        assert_eq!(money.minor(), 15_000);
        assert!(!money.is_zero());
        assert!(!money.is_negative());
    }

    #[test]
    fn test_display_grouping() {
        assert_eq!(Money::from_minor(0).to_string(), "0");
        assert_eq!(Money::from_minor(999).to_string(), "999");
        assert_eq!(Money::from_minor(1_000).to_string(), "1.000");
        assert_eq!(Money::from_minor(50_000).to_string(), "50.000");
        assert_eq!(Money::from_minor(123_456_789).to_string(), "123.456.789");
        assert_eq!(Money::from_minor(-25_000).to_string(), "-25.000");
    }

    #[test]
    fn test_change_for() {
        let total = Money::from_minor(100_000);
        assert_eq!(Money::from_minor(150_000).change_for(total).minor(), 50_000);
        assert_eq!(Money::from_minor(100_000).change_for(total).minor(), 0);
        assert_eq!(Money::from_minor(90_000).change_for(total).minor(), -10_000);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1_000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1_500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((a * 3).minor(), 3_000);

        let mut c = a;
        c += b;
        assert_eq!(c.minor(), 1_500);
    }

    #[test]
    fn test_sum() {
        let total: Money = [50_000, 15_000, 12_000]
            .into_iter()
            .map(Money::from_minor)
            .sum();
        assert_eq!(total.minor(), 77_000);
    }

    #[test]
    fn test_overflow_saturates() {
        let huge = Money::from_minor(i64::MAX);
        assert_eq!(huge.multiply_quantity(2).minor(), i64::MAX);
        assert_eq!((huge + Money::from_minor(1)).minor(), i64::MAX);
        assert_eq!(Money::from_minor(i64::MIN).change_for(huge).minor(), i64::MIN);
    }
}
