//! # Pricing
//!
//! Discount rates and the subtotal / discount / total breakdown.
//!
//! ## Breakdown Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal        = Σ line.price                                         │
//! │  discount_amount = round2(subtotal × pct / 100)                         │
//! │  total           = subtotal − discount_amount                           │
//! │                                                                         │
//! │  pct is clamped to [0, 100] before use, never rejected                  │
//! │  → 0 ≤ discount_amount ≤ subtotal, so total ≤ subtotal                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

/// 100% expressed in basis points.
pub const MAX_DISCOUNT_BPS: u32 = 10_000;

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount percentage represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1000 bps = 10%.
/// Always within `0..=10000`; every constructor clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// No discount.
    pub const ZERO: DiscountRate = DiscountRate(0);

    /// Creates a rate from basis points, clamping to 100%.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > MAX_DISCOUNT_BPS {
            DiscountRate(MAX_DISCOUNT_BPS)
        } else {
            DiscountRate(bps)
        }
    }

    /// Creates a rate from a percentage, clamping to `[0, 100]`.
    ///
    /// NaN counts as 0.
    ///
    /// ## Example
    /// ```rust
    /// use clinic_core::pricing::DiscountRate;
    ///
    /// assert_eq!(DiscountRate::from_percent(12.5).bps(), 1250);
    /// assert_eq!(DiscountRate::from_percent(150.0).bps(), 10_000);
    /// assert_eq!(DiscountRate::from_percent(-5.0).bps(), 0);
    /// ```
    pub fn from_percent(pct: f64) -> Self {
        if pct.is_nan() {
            return DiscountRate::ZERO;
        }
        let clamped = pct.clamp(0.0, 100.0);
        DiscountRate::from_bps((clamped * 100.0).round() as u32)
    }

    /// Reads the discount field as typed by the operator.
    ///
    /// Empty or non-numeric input means no discount; out-of-range input is
    /// clamped.
    ///
    /// ## Example
    /// ```rust
    /// use clinic_core::pricing::DiscountRate;
    ///
    /// assert_eq!(DiscountRate::parse_lenient("10").bps(), 1000);
    /// assert_eq!(DiscountRate::parse_lenient("abc"), DiscountRate::ZERO);
    /// assert_eq!(DiscountRate::parse_lenient("250").bps(), 10_000);
    /// ```
    pub fn parse_lenient(input: &str) -> Self {
        match input.trim().trim_end_matches('%').trim().parse::<f64>() {
            Ok(pct) => DiscountRate::from_percent(pct),
            Err(_) => DiscountRate::ZERO,
        }
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Shortest exact form: `10%`, `12.5%`, `12.34%`.
impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}%", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}%", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}%", whole, frac)
        }
    }
}

// =============================================================================
// Pricing Breakdown
// =============================================================================

/// The subtotal / discount / total triple of a cart or transaction.
///
/// Derived, never stored on its own: a transaction persists the four values
/// computed here at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingBreakdown {
    pub subtotal: Money,
    pub discount_rate: DiscountRate,
    pub discount_amount: Money,
    pub total: Money,
}

impl PricingBreakdown {
    /// Computes the breakdown for a set of line prices.
    ///
    /// Pure: same prices and rate always give the same breakdown.
    ///
    /// ## Example
    /// ```rust
    /// use clinic_core::money::Money;
    /// use clinic_core::pricing::{DiscountRate, PricingBreakdown};
    ///
    /// let b = PricingBreakdown::compute(
    ///     [Money::from_pesos(500), Money::from_pesos(300)],
    ///     DiscountRate::from_percent(10.0),
    /// );
    /// assert_eq!(b.subtotal, Money::from_pesos(800));
    /// assert_eq!(b.discount_amount, Money::from_pesos(80));
    /// assert_eq!(b.total, Money::from_pesos(720));
    /// ```
    pub fn compute<I>(prices: I, rate: DiscountRate) -> Self
    where
        I: IntoIterator<Item = Money>,
    {
        let subtotal: Money = prices.into_iter().sum();
        let discount_amount = subtotal.percentage(rate);

        PricingBreakdown {
            subtotal,
            discount_rate: rate,
            discount_amount,
            total: subtotal - discount_amount,
        }
    }

    /// Whether a discount line should be shown on documents.
    #[inline]
    pub fn has_discount(&self) -> bool {
        !self.discount_rate.is_zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pesos(values: &[i64]) -> Vec<Money> {
        values.iter().map(|p| Money::from_pesos(*p)).collect()
    }

    #[test]
    fn test_two_lines_ten_percent() {
        let b = PricingBreakdown::compute(pesos(&[500, 300]), DiscountRate::from_percent(10.0));
        assert_eq!(b.subtotal, Money::from_pesos(800));
        assert_eq!(b.discount_amount, Money::from_pesos(80));
        assert_eq!(b.total, Money::from_pesos(720));
        assert!(b.has_discount());
    }

    #[test]
    fn test_free_line_half_discount() {
        let b = PricingBreakdown::compute(pesos(&[0]), DiscountRate::from_percent(50.0));
        assert_eq!(b.subtotal, Money::zero());
        assert_eq!(b.discount_amount, Money::zero());
        assert_eq!(b.total, Money::zero());
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let prices = pesos(&[1000]);
        let over = PricingBreakdown::compute(prices.clone(), DiscountRate::from_percent(140.0));
        assert_eq!(over.discount_rate.bps(), 10_000);
        assert_eq!(over.total, Money::zero());

        let under = PricingBreakdown::compute(prices, DiscountRate::from_percent(-20.0));
        assert_eq!(under.discount_rate, DiscountRate::ZERO);
        assert_eq!(under.total, Money::from_pesos(1000));
    }

    #[test]
    fn test_total_never_exceeds_subtotal() {
        let prices = [Money::from_cents(33333), Money::from_cents(1), Money::from_cents(99999)];
        for bps in (0..=10_000).step_by(37) {
            let b = PricingBreakdown::compute(prices, DiscountRate::from_bps(bps));
            assert!(b.total <= b.subtotal);
            assert!(!b.total.is_negative());
            assert_eq!(b.total, b.subtotal - b.subtotal.percentage(b.discount_rate));
        }
    }

    #[test]
    fn test_lenient_parse() {
        assert_eq!(DiscountRate::parse_lenient("").bps(), 0);
        assert_eq!(DiscountRate::parse_lenient("  15 ").bps(), 1500);
        assert_eq!(DiscountRate::parse_lenient("7.5%").bps(), 750);
        assert_eq!(DiscountRate::parse_lenient("NaN").bps(), 0);
        assert_eq!(DiscountRate::parse_lenient("-3").bps(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(DiscountRate::from_bps(1000).to_string(), "10%");
        assert_eq!(DiscountRate::from_bps(1250).to_string(), "12.5%");
        assert_eq!(DiscountRate::from_bps(1234).to_string(), "12.34%");
        assert_eq!(DiscountRate::from_bps(5).to_string(), "0.05%");
    }
}
