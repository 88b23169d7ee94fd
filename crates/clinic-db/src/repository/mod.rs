//! # Repository Module
//!
//! Database repository implementations for Clinic POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  clinic-pos command                                                     │
//! │       │                                                                 │
//! │       │  db.transactions().commit(&new_tx)                              │
//! │       ▼                                                                 │
//! │  TransactionRepository                                                  │
//! │  ├── commit(&self, new_tx)        one SQL transaction                   │
//! │  ├── get_by_id(&self, id)                                               │
//! │  ├── list_between(&self, a, b)                                          │
//! │  └── delete(&self, id)            lines cascade                         │
//! │       │                                                                 │
//! │       ├── SQL Query ──► SQLite                                          │
//! │       └── notify ─────► ChangeFeed ──► live watches                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ServiceRepository`] - Catalog CRUD, availability and search
//! - [`TransactionRepository`] - Atomic commits and history
//! - [`ExpenseRepository`] - Expense ledger
//!
//! [`ServiceRepository`]: service::ServiceRepository
//! [`TransactionRepository`]: transaction::TransactionRepository
//! [`ExpenseRepository`]: expense::ExpenseRepository

pub mod expense;
pub mod service;
pub mod transaction;

use chrono::{DateTime, Utc};

use crate::error::{DbError, DbResult};

/// Stored epoch milliseconds back to a UTC timestamp.
pub(crate) fn from_millis(entity: &str, ms: i64) -> DbResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| DbError::corrupt(entity, format!("timestamp out of range: {}", ms)))
}

#[inline]
pub(crate) fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}
