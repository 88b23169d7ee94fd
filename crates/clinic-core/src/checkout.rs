//! # Checkout
//!
//! The validated commit request handed from the cart to the store.
//!
//! The pricing breakdown is re-derived here from the lines and the rate, so
//! whatever reaches the store always satisfies:
//!
//! ```text
//! subtotal        = Σ line.price
//! discount_amount = round2(subtotal × pct / 100)
//! total           = subtotal − discount_amount   (never below zero)
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::pricing::{DiscountRate, PricingBreakdown};
use crate::types::TransactionLine;
use crate::validation::validate_customer_name;
use crate::MAX_CART_LINES;

/// A transaction that has not been committed yet.
///
/// `id` and `finished_at` are assigned by the store at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub customer_name: String,
    pub lines: Vec<TransactionLine>,
    pub breakdown: PricingBreakdown,
}

impl NewTransaction {
    /// Validates the request and computes its breakdown.
    ///
    /// ## Errors
    /// - `Validation` when the trimmed customer name is empty or too long
    /// - `EmptyCart` when there are no lines
    /// - `CartTooLarge` past the line limit
    pub fn new(
        customer_name: &str,
        lines: Vec<TransactionLine>,
        rate: DiscountRate,
    ) -> CoreResult<Self> {
        let customer_name = validate_customer_name(customer_name)?;

        if lines.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        if lines.len() > MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        let breakdown = PricingBreakdown::compute(lines.iter().map(TransactionLine::price), rate);

        Ok(NewTransaction {
            customer_name,
            lines,
            breakdown,
        })
    }
}
