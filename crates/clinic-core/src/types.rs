//! # Domain Types
//!
//! Core domain types used throughout Clinic POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │    Service      │   │   Transaction    │   │    Expense      │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  id (UUID)      │   │  id (UUID)       │   │  id (UUID)      │      │
//! │  │  title          │   │  customer_name   │   │  amount_cents   │      │
//! │  │  details        │   │  lines (frozen)  │   │  note           │      │
//! │  │  price_cents    │   │  subtotal/total  │   │  date           │      │
//! │  │  available      │   │  finished_at     │   └─────────────────┘      │
//! │  └────────┬────────┘   └────────▲─────────┘                            │
//! │           │  snapshot at add     │  snapshot at commit                  │
//! │           └──────► CartLine ─────┘                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A transaction copies the title, details and price of every line. Editing
//! or deleting a service later never changes a committed transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::pricing::{DiscountRate, PricingBreakdown};
use crate::validation::{self, ValidationResult};
use crate::NO_DETAILS_NOTE;

// =============================================================================
// Service
// =============================================================================

/// An offerable clinic service (consultation, lab test, imaging, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Service {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown at the counter and on receipts.
    pub title: String,

    /// Free-text details (preparation notes, inclusions).
    pub details: String,

    /// Price in centavos.
    pub price_cents: i64,

    /// Unavailable services cannot enter a cart.
    pub available: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Service {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Case-insensitive substring match over title and details.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.title.to_lowercase().contains(&query)
            || self.details.to_lowercase().contains(&query)
    }
}

/// Raw catalog form input, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServiceInput {
    pub title: String,
    pub details: String,
    /// Price as typed, e.g. `"1,500"` or `"350.50"`.
    pub price: String,
    pub available: bool,
}

/// Validated catalog fields ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDraft {
    pub title: String,
    pub details: String,
    pub price: Money,
    pub available: bool,
}

impl ServiceInput {
    /// Validates the form. Title, details and price are all required.
    ///
    /// ## Example
    /// ```rust
    /// use clinic_core::ServiceInput;
    ///
    /// let input = ServiceInput {
    ///     title: "CBC".into(),
    ///     details: "Complete blood count".into(),
    ///     price: "350".into(),
    ///     available: true,
    /// };
    /// assert_eq!(input.validate().unwrap().price.cents(), 35000);
    /// ```
    pub fn validate(&self) -> ValidationResult<ServiceDraft> {
        let title = validation::validate_service_title(&self.title)?;
        let details = validation::validate_service_details(&self.details)?;
        let price = validation::parse_price(&self.price)?;

        Ok(ServiceDraft {
            title,
            details,
            price,
            available: self.available,
        })
    }
}

/// Catalog listing filter on the `available` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityFilter {
    #[default]
    All,
    Available,
    Unavailable,
}

impl AvailabilityFilter {
    /// Returns true if a service with the given flag passes the filter.
    pub fn matches(&self, available: bool) -> bool {
        match self {
            AvailabilityFilter::All => true,
            AvailabilityFilter::Available => available,
            AvailabilityFilter::Unavailable => !available,
        }
    }

    /// The flag value to filter on, or `None` for all.
    pub fn flag(&self) -> Option<bool> {
        match self {
            AvailabilityFilter::All => None,
            AvailabilityFilter::Available => Some(true),
            AvailabilityFilter::Unavailable => Some(false),
        }
    }
}

impl std::str::FromStr for AvailabilityFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(AvailabilityFilter::All),
            "available" => Ok(AvailabilityFilter::Available),
            "unavailable" => Ok(AvailabilityFilter::Unavailable),
            other => Err(ValidationError::invalid(
                "availability",
                format!("expected all, available or unavailable, got '{}'", other),
            )),
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A line of a committed transaction. Frozen copy of the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionLine {
    pub service_id: String,
    /// Service title at time of sale (frozen).
    pub service_name: String,
    /// Service details at time of sale (frozen).
    pub details: String,
    /// Price in centavos at time of sale (frozen).
    pub price_cents: i64,
}

impl TransactionLine {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// `name — details` when details are present, else `name`.
    pub fn label(&self) -> String {
        if self.details.trim().is_empty() {
            self.service_name.clone()
        } else {
            format!("{} — {}", self.service_name, self.details)
        }
    }
}

/// An immutable committed sale record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    pub customer_name: String,
    pub lines: Vec<TransactionLine>,
    pub subtotal_cents: i64,
    pub discount_bps: u32,
    pub discount_amount_cents: i64,
    pub total_cents: i64,
    /// Assigned by the store at the moment of write.
    #[ts(as = "String")]
    pub finished_at: DateTime<Utc>,
}

impl Transaction {
    /// The pricing values persisted with this transaction.
    pub fn breakdown(&self) -> PricingBreakdown {
        PricingBreakdown {
            subtotal: Money::from_cents(self.subtotal_cents),
            discount_rate: DiscountRate::from_bps(self.discount_bps),
            discount_amount: Money::from_cents(self.discount_amount_cents),
            total: Money::from_cents(self.total_cents),
        }
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Comma-joined service names, e.g. `"CBC, X-Ray"`.
    pub fn service_names(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.service_name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// =============================================================================
// Expense
// =============================================================================

/// A dated clinic expense. Created and deleted, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Expense {
    pub id: String,
    pub amount_cents: i64,
    pub note: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

impl Expense {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// Ledger total, recomputed from the listed entries.
    pub fn total(expenses: &[Expense]) -> Money {
        expenses.iter().map(Expense::amount).sum()
    }
}

/// Raw expense form input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExpenseInput {
    /// Amount as typed; must parse to a positive amount.
    pub amount: String,
    /// Optional note; blank becomes "No details".
    pub note: String,
}

/// Validated expense ready for the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub amount: Money,
    pub note: String,
}

impl ExpenseInput {
    /// Validates the form before anything reaches the ledger.
    ///
    /// ## Example
    /// ```rust
    /// use clinic_core::ExpenseInput;
    ///
    /// let bad = ExpenseInput { amount: "abc".into(), note: String::new() };
    /// assert!(bad.validate().is_err());
    /// ```
    pub fn validate(&self) -> ValidationResult<ExpenseDraft> {
        let amount = validation::parse_expense_amount(&self.amount)?;
        let note = self.note.trim();

        Ok(ExpenseDraft {
            amount,
            note: if note.is_empty() {
                NO_DETAILS_NOTE.to_string()
            } else {
                note.to_string()
            },
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
