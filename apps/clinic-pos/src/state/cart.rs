//! # Cart State
//!
//! Holds the POS cart for the current customer visit.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operator Action          Command                 Cart State Change     │
//! │  ───────────────          ───────                 ─────────────────     │
//! │                                                                         │
//! │  Pick Service ───────────► add_to_cart() ───────► lines.push(snapshot)  │
//! │  Click Remove ───────────► remove_from_cart() ──► lines.retain(token)   │
//! │  Type Customer ──────────► set_customer_name()                          │
//! │  Type Discount ──────────► set_discount() ──────► clamped to 0..100     │
//! │  Click Checkout ─────────► checkout() ──────────► cleared after commit  │
//! │  Click Clear ────────────► clear_cart() ────────► lines.clear()         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! The cart sits behind `Arc<Mutex<_>>`. The lock is only held inside the
//! closures below, never across an `.await`.

use std::sync::{Arc, Mutex, PoisonError};

use clinic_core::Cart;

#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let breakdown = cart_state.with_cart(|cart| cart.breakdown());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        // Poison is ignored; every cart mutation is a single field write.
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    /// Clone of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.with_cart(Cart::clone)
    }
}
