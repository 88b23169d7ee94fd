//! # clinic-core: Pure Business Logic for Clinic POS
//!
//! Pricing, cart building, validation, sessions and dashboard folding as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Clinic POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    clinic-pos (CLI + app state)                 │   │
//! │  │    login ──► services ──► checkout ──► receipts ──► dashboard   │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────────────────┐  ┌▼──────────────────┐    │
//! │  │          ★ clinic-core (THIS CRATE) ★   │  │  clinic-receipt   │    │
//! │  │                                         │  │  PDF invoice and  │    │
//! │  │  ┌─────────┐ ┌─────────┐ ┌───────────┐  │  │  receipt layout   │    │
//! │  │  │  money  │ │  cart   │ │  session  │  │  └───────────────────┘    │
//! │  │  │ pricing │ │checkout │ │  window   │  │                           │
//! │  │  └─────────┘ └─────────┘ └───────────┘  │                           │
//! │  │   NO I/O • NO DATABASE • NO NETWORK     │                           │
//! │  └──────────────┬──────────────────────────┘                           │
//! │                 │                                                       │
//! │  ┌──────────────▼──────────────────────────────────────────────────┐   │
//! │  │                    clinic-db (SQLite store)                     │   │
//! │  │          services, transactions, expenses, live watches         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Service, Transaction, Expense)
//! - [`money`] - Peso amounts as integer centavos
//! - [`pricing`] - Discount rate and the subtotal/discount/total breakdown
//! - [`cart`] - In-progress selection for one customer
//! - [`checkout`] - Validated commit request
//! - [`session`] - Roles, capabilities, the `Authenticator` seam
//! - [`window`] - Reporting date windows
//! - [`dashboard`] - Revenue and expense folding
//! - [`validation`] - Input rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use clinic_core::money::Money;
//! use clinic_core::pricing::{DiscountRate, PricingBreakdown};
//!
//! let prices = [Money::from_pesos(500), Money::from_pesos(300)];
//! let b = PricingBreakdown::compute(prices, DiscountRate::from_percent(10.0));
//!
//! assert_eq!(b.subtotal, Money::from_pesos(800));
//! assert_eq!(b.discount_amount, Money::from_pesos(80));
//! assert_eq!(b.total, Money::from_pesos(720));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod dashboard;
pub mod error;
pub mod money;
pub mod pricing;
pub mod session;
pub mod types;
pub mod validation;
pub mod window;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine, LineToken};
pub use checkout::NewTransaction;
pub use dashboard::{summarize, CatalogCounts, DashboardSnapshot, RevenuePoint};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{DiscountRate, PricingBreakdown};
pub use session::{Authenticator, Capability, Role, Session};
pub use types::*;
pub use window::{DateWindow, WindowPreset};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Note stored on an expense recorded without one.
pub const NO_DETAILS_NOTE: &str = "No details";

/// Maximum lines allowed in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Clinic local time, UTC+8 (Philippines).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;
