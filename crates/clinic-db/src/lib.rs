//! # clinic-db: Database Layer for Clinic POS
//!
//! SQLite persistence for services, transactions and expenses, plus live
//! watches that stand in for a hosted store's real-time queries.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Clinic POS Data Flow                             │
//! │                                                                         │
//! │  clinic-pos command (checkout)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     clinic-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │    watch     │  │   │
//! │  │   │   (pool.rs)   │    │               │    │              │  │   │
//! │  │   │               │    │ ServiceRepo   │    │ ChangeFeed   │  │   │
//! │  │   │ SqlitePool    │◄───│ TransactionRe │───►│ Subscription │  │   │
//! │  │   │ schema        │    │ ExpenseRepo   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │               <data dir>/clinic.db                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`schema`] - Idempotent table bootstrap
//! - [`feed`] - Write notifications
//! - [`watch`] - Cancellable live queries
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clinic_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/clinic.db")).await?;
//!
//! let tx = db.transactions().commit(&cart.checkout()?).await?;
//! let mut live = db.watch_transactions(window.start(), window.end());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod feed;
pub mod pool;
pub mod repository;
pub mod schema;
pub mod watch;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use feed::{ChangeFeed, Collection};
pub use pool::{Database, DbConfig};
pub use watch::Subscription;

// Repository re-exports for convenience
pub use repository::expense::ExpenseRepository;
pub use repository::service::ServiceRepository;
pub use repository::transaction::TransactionRepository;
