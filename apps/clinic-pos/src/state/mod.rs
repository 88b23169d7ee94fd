//! # State Module
//!
//! Application state shared by commands.
//!
//! ## Why Multiple State Types?
//! Instead of a single `AppState` struct that every command receives, each
//! concern has its own type and a command takes only what it needs:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌────────────┐ ┌────────────┐ ┌──────────────┐ ┌─────────────┐         │
//! │  │  DbState   │ │ CartState  │ │ SessionState │ │ ConfigState │         │
//! │  │            │ │            │ │              │ │             │         │
//! │  │  Database  │ │ Arc<Mutex< │ │ Option<      │ │ AppConfig   │         │
//! │  │  (SQLite   │ │   Cart     │ │   Session>   │ │ (read-only) │         │
//! │  │   pool)    │ │ >>         │ │ + Authent.   │ │             │         │
//! │  └────────────┘ └────────────┘ └──────────────┘ └─────────────┘         │
//! │                                                                         │
//! │  ┌────────────┐ ┌────────────────┐                                      │
//! │  │ PendingOps │ │ DocumentState  │                                      │
//! │  │ in-flight  │ │ renderer +     │                                      │
//! │  │ op keys    │ │ output dir     │                                      │
//! │  └────────────┘ └────────────────┘                                      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has an internal connection pool                   │
//! │  • CartState, SessionState, PendingOps: short std locks, never held    │
//! │    across an await                                                     │
//! │  • ConfigState, DocumentState: read-only after initialization          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod db;
mod documents;
mod pending;
mod session;

pub use cart::CartState;
pub use config::{
    AccountConfig, AppConfig, ClinicSettings, ConfigError, ConfigResult, ConfigState,
    LocaleSettings, StorageSettings,
};
pub use db::DbState;
pub use documents::DocumentState;
pub use pending::{delete_key, PendingGuard, PendingOps, CHECKOUT_KEY};
pub use session::SessionState;
