//! # Money Module
//!
//! Provides the `Money` type for handling peso amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    ₱500.00 + ₱300.00 = 50000 + 30000 = 80000 centavos                   │
//! │    Rounding happens exactly once, at the discount step                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use clinic_core::money::Money;
//!
//! let price: Money = "1,250.50".parse().unwrap();
//! assert_eq!(price.cents(), 125050);
//! assert_eq!(price.to_string(), "₱1,250.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;
use ts_rs::TS;

use crate::pricing::DiscountRate;

/// Display symbol for the Philippine peso.
pub const PESO_SIGN: &str = "₱";

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (1/100 of a peso).
///
/// ## Where Money is Used
/// ```text
/// Service.price ──► CartLine.price (frozen) ──► TransactionLine.price
///                                   │
///                                   ▼
///                          PricingBreakdown { subtotal, discount, total }
///                                   │
///                                   ▼
///                   Receipt / Invoice / Dashboard revenue
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use clinic_core::money::Money;
    ///
    /// let price = Money::from_cents(50000); // ₱500.00
    /// assert_eq!(price.pesos(), 500);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole pesos.
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos * 100)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-peso portion.
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Computes `round2(self * rate)`, the discount amount for a rate.
    ///
    /// ## Implementation
    /// Integer math on basis points: `(cents * bps + 5000) / 10000`.
    /// The +5000 rounds half away from zero for non-negative amounts,
    /// which matches rounding a 2-decimal amount to the nearest centavo.
    ///
    /// ## Example
    /// ```rust
    /// use clinic_core::money::Money;
    /// use clinic_core::pricing::DiscountRate;
    ///
    /// let subtotal = Money::from_pesos(800);
    /// let discount = subtotal.percentage(DiscountRate::from_percent(10.0));
    /// assert_eq!(discount, Money::from_pesos(80));
    /// ```
    pub fn percentage(&self, rate: DiscountRate) -> Money {
        // i128 keeps large subtotals from overflowing during the multiply
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Formats the amount with thousands grouping and two decimals, no sign
    /// marker: `1234550` → `"12,345.50"`.
    pub fn format_grouped(&self) -> String {
        let digits = self.pesos().abs().to_string();
        let grouped = digits
            .as_bytes()
            .rchunks(3)
            .rev()
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join(",");

        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, grouped, self.cents_part())
    }

    /// Formats with an arbitrary currency marker in front of the digits.
    ///
    /// ## Example
    /// ```rust
    /// use clinic_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-550).format_with("PHP "), "-PHP 5.50");
    /// ```
    pub fn format_with(&self, marker: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}{}", sign, marker, self.abs().format_grouped())
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Why a money string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoneyError {
    #[error("amount is empty")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("at most two decimal places are allowed")]
    TooPrecise,

    #[error("amount is too large")]
    Overflow,
}

/// Parses operator input such as `"500"`, `"1,250.5"` or `"₱ 99.99"`.
///
/// ## Rules
/// - Optional leading `-` and optional peso sign
/// - Commas are treated as grouping separators and ignored
/// - At most two fractional digits
impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let rest = rest.trim_start_matches(PESO_SIGN).trim();
        let cleaned: String = rest.chars().filter(|c| *c != ',').collect();

        if cleaned.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let not_a_number = || ParseMoneyError::NotANumber(trimmed.to_string());

        let (whole, fraction) = match cleaned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (cleaned.as_str(), ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(not_a_number());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(not_a_number());
        }
        if fraction.len() > 2 {
            return Err(ParseMoneyError::TooPrecise);
        }

        let pesos: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| ParseMoneyError::Overflow)?
        };
        let centavos: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| not_a_number())? * 10,
            _ => fraction.parse::<i64>().map_err(|_| not_a_number())?,
        };

        let cents = pesos
            .checked_mul(100)
            .and_then(|c| c.checked_add(centavos))
            .ok_or(ParseMoneyError::Overflow)?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// On-screen format: peso sign, thousands grouping, two decimals.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with(PESO_SIGN))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.pesos(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_cents(123456789).to_string(), "₱1,234,567.89");
        assert_eq!(Money::from_pesos(500).to_string(), "₱500.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-₱5.50");
        assert_eq!(Money::zero().to_string(), "₱0.00");
        assert_eq!(Money::from_pesos(100_000).format_with("PHP "), "PHP 100,000.00");
    }

    #[test]
    fn test_parse_accepts_operator_input() {
        assert_eq!("500".parse::<Money>().unwrap(), Money::from_pesos(500));
        assert_eq!("1,250.5".parse::<Money>().unwrap(), Money::from_cents(125050));
        assert_eq!("₱ 99.99".parse::<Money>().unwrap(), Money::from_cents(9999));
        assert_eq!(".75".parse::<Money>().unwrap(), Money::from_cents(75));
        assert_eq!("-20".parse::<Money>().unwrap(), Money::from_pesos(-20));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<Money>(), Err(ParseMoneyError::Empty));
        assert!(matches!("abc".parse::<Money>(), Err(ParseMoneyError::NotANumber(_))));
        assert!(matches!("12a".parse::<Money>(), Err(ParseMoneyError::NotANumber(_))));
        assert!(matches!(".".parse::<Money>(), Err(ParseMoneyError::NotANumber(_))));
        assert_eq!("1.005".parse::<Money>(), Err(ParseMoneyError::TooPrecise));
        assert_eq!(
            "99999999999999999999".parse::<Money>(),
            Err(ParseMoneyError::Overflow)
        );
    }

    #[test]
    fn test_percentage_rounds_to_centavo() {
        let subtotal = Money::from_pesos(800);
        assert_eq!(
            subtotal.percentage(DiscountRate::from_percent(10.0)),
            Money::from_pesos(80)
        );

        // ₱0.05 at 50% = ₱0.025 → ₱0.03
        let tiny = Money::from_cents(5);
        assert_eq!(tiny.percentage(DiscountRate::from_percent(50.0)).cents(), 3);
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }
}
