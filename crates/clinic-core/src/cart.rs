//! # Cart Builder
//!
//! Accumulates services for one customer visit and prices them.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operator Action          Cart Method             State Change          │
//! │  ───────────────          ───────────             ────────────          │
//! │  Pick service ──────────► add_line() ───────────► lines.push(snapshot)  │
//! │  Click remove ──────────► remove_line(token) ───► lines.retain(..)      │
//! │  Type discount ─────────► set_discount_input() ─► discount (clamped)    │
//! │  Type customer ─────────► set_customer_name() ──► customer_name         │
//! │  View totals ───────────► breakdown() ──────────► (read only)           │
//! │  Finish ────────────────► checkout() ───────────► NewTransaction        │
//! │                                                   (cart untouched)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Line Tokens
//! The same service may appear on several lines. Each line gets a token from
//! a per-cart counter; the token is the removal key and is never reused.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::checkout::NewTransaction;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{DiscountRate, PricingBreakdown};
use crate::types::{Service, TransactionLine};
use crate::MAX_CART_LINES;

// =============================================================================
// Line Token
// =============================================================================

/// Monotonic per-cart line identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineToken(u64);

impl LineToken {
    #[inline]
    pub const fn new(value: u64) -> Self {
        LineToken(value)
    }

    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LineToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// A service in the cart.
///
/// ## Price Freezing
/// Title, details and price are copied when the line is added. Editing the
/// service afterwards does not change this line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub token: LineToken,
    pub service_id: String,
    pub title: String,
    pub details: String,
    pub price_cents: i64,
}

impl CartLine {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// The frozen transaction line for this cart line.
    pub fn to_transaction_line(&self) -> TransactionLine {
        TransactionLine {
            service_id: self.service_id.clone(),
            service_name: self.title.clone(),
            details: self.details.clone(),
            price_cents: self.price_cents,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The in-progress, unpersisted selection for one customer.
///
/// ## Invariants
/// - Duplicate services are allowed as distinct lines
/// - Tokens are unique within the cart lifetime, including across `clear()`
/// - The discount is always within `[0, 100]`
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    pub customer_name: String,
    pub lines: Vec<CartLine>,
    pub discount: DiscountRate,
    #[serde(skip)]
    #[ts(skip)]
    next_token: u64,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Appends a snapshot of the service.
    ///
    /// ## Returns
    /// - `Ok(token)` identifying the new line
    /// - `Err(ServiceUnavailable)` if the service is switched off
    /// - `Err(CartTooLarge)` past the line limit
    pub fn add_line(&mut self, service: &Service) -> CoreResult<LineToken> {
        if !service.available {
            return Err(CoreError::ServiceUnavailable(service.title.clone()));
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.next_token += 1;
        let token = LineToken(self.next_token);

        self.lines.push(CartLine {
            token,
            service_id: service.id.clone(),
            title: service.title.clone(),
            details: service.details.clone(),
            price_cents: service.price_cents,
        });

        Ok(token)
    }

    /// Removes the line with this token. No-op if absent.
    ///
    /// ## Returns
    /// Whether a line was removed.
    pub fn remove_line(&mut self, token: LineToken) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.token != token);
        self.lines.len() != before
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.customer_name = name.into();
    }

    pub fn set_discount(&mut self, rate: DiscountRate) {
        self.discount = rate;
    }

    /// Sets the discount from raw operator input (lenient, clamped).
    pub fn set_discount_input(&mut self, input: &str) {
        self.discount = DiscountRate::parse_lenient(input);
    }

    /// Prices the current lines at an arbitrary rate. Pure.
    pub fn compute_breakdown(&self, rate: DiscountRate) -> PricingBreakdown {
        PricingBreakdown::compute(self.lines.iter().map(CartLine::price), rate)
    }

    /// Prices the current lines at the cart's own discount.
    pub fn breakdown(&self) -> PricingBreakdown {
        self.compute_breakdown(self.discount)
    }

    /// Builds the commit request. The cart itself is not modified, so a
    /// failed commit can be retried as-is.
    pub fn checkout(&self) -> CoreResult<NewTransaction> {
        NewTransaction::new(
            &self.customer_name,
            self.lines.iter().map(CartLine::to_transaction_line).collect(),
            self.discount,
        )
    }

    /// Empties the cart for the next customer.
    pub fn clear(&mut self) {
        self.customer_name.clear();
        self.lines.clear();
        self.discount = DiscountRate::ZERO;
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn service(id: &str, pesos: i64) -> Service {
        Service {
            id: id.to_string(),
            title: format!("Service {}", id),
            details: String::new(),
            price_cents: pesos * 100,
            available: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_duplicates_are_distinct_lines() {
        let mut cart = Cart::new();
        let svc = service("1", 500);

        let a = cart.add_line(&svc).unwrap();
        let b = cart.add_line(&svc).unwrap();

        assert_ne!(a, b);
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.breakdown().subtotal, Money::from_pesos(1000));

        assert!(cart.remove_line(a));
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines[0].token, b);
    }

    #[test]
    fn test_remove_missing_token_is_noop() {
        let mut cart = Cart::new();
        cart.add_line(&service("1", 100)).unwrap();
        assert!(!cart.remove_line(LineToken::new(999)));
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_price_frozen_at_add() {
        let mut cart = Cart::new();
        let mut svc = service("1", 500);
        cart.add_line(&svc).unwrap();

        svc.price_cents = 99_900;
        assert_eq!(cart.breakdown().subtotal, Money::from_pesos(500));
    }

    #[test]
    fn test_unavailable_service_rejected() {
        let mut cart = Cart::new();
        let mut svc = service("1", 500);
        svc.available = false;

        assert!(matches!(
            cart.add_line(&svc),
            Err(CoreError::ServiceUnavailable(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_discount_input_clamps() {
        let mut cart = Cart::new();
        cart.add_line(&service("1", 500)).unwrap();
        cart.add_line(&service("2", 300)).unwrap();

        cart.set_discount_input("10");
        let b = cart.breakdown();
        assert_eq!(b.total, Money::from_pesos(720));

        cart.set_discount_input("250");
        assert_eq!(cart.breakdown().total, Money::zero());

        cart.set_discount_input("abc");
        assert_eq!(cart.breakdown().total, Money::from_pesos(800));
    }

    #[test]
    fn test_tokens_not_reused_after_clear() {
        let mut cart = Cart::new();
        let first = cart.add_line(&service("1", 1)).unwrap();
        cart.clear();
        let second = cart.add_line(&service("1", 1)).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_checkout_requires_customer_and_lines() {
        let mut cart = Cart::new();
        assert!(cart.checkout().is_err());

        cart.add_line(&service("1", 500)).unwrap();
        assert!(cart.checkout().is_err());

        cart.set_customer_name("Ana Reyes");
        let tx = cart.checkout().unwrap();
        assert_eq!(tx.lines.len(), 1);
        // Cart untouched so a failed commit can be retried
        assert_eq!(cart.line_count(), 1);
    }
}
