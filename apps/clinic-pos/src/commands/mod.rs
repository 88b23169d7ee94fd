//! # Commands Module
//!
//! Every operation the front-end (or the CLI) can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── auth.rs       ◄─── login / logout
//! ├── service.rs    ◄─── Catalog: search, save, toggle, delete
//! ├── cart.rs       ◄─── Cart manipulation
//! ├── checkout.rs   ◄─── Commit + best-effort invoice
//! ├── receipt.rs    ◄─── Receipts listing, re-render, delete
//! ├── expense.rs    ◄─── Expense ledger
//! ├── dashboard.rs  ◄─── One-shot dashboard snapshot
//! └── config.rs     ◄─── Public configuration
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs the cart
//! fn get_cart(cart: &CartState) -> CartResponse
//!
//! // Needs database, session and the duplicate-submission guard
//! async fn delete_service(db: &DbState, session: &SessionState, pending: &PendingOps, id: &str)
//! ```
//!
//! Every command returns `Result<T, ApiError>`; a failed command never
//! leaves partial state behind.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod dashboard;
pub mod expense;
pub mod receipt;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory fixtures shared by command tests.

    use std::sync::Arc;

    use chrono::{FixedOffset, Utc};
    use clinic_core::{Authenticator, CoreError, CoreResult, Role, Service, ServiceInput, Session};
    use clinic_db::{Database, DbConfig};
    use clinic_receipt::{Letterhead, ReceiptRenderer};

    use crate::state::{CartState, DbState, DocumentState, PendingOps, SessionState};

    /// `admin@...` logs in as admin, anything else as staff; the password
    /// must be "pw".
    pub struct FixtureAuth;

    impl Authenticator for FixtureAuth {
        fn authenticate(&self, email: &str, password: &str) -> CoreResult<Session> {
            if password != "pw" {
                return Err(CoreError::InvalidCredentials);
            }
            let role = if email.starts_with("admin@") {
                Role::Admin
            } else {
                Role::Staff
            };
            Ok(Session::new(email, role, Utc::now()))
        }
    }

    pub struct Fixture {
        pub db: DbState,
        pub cart: CartState,
        pub session: SessionState,
        pub pending: PendingOps,
        pub documents: DocumentState,
        _dir: tempfile::TempDir,
    }

    impl Fixture {
        pub async fn new() -> Self {
            let db = Database::new(DbConfig::in_memory()).await.unwrap();
            let dir = tempfile::tempdir().unwrap();
            let renderer = ReceiptRenderer::new(Letterhead::default(), offset());

            Fixture {
                db: DbState::new(db),
                cart: CartState::new(),
                session: SessionState::new(Arc::new(FixtureAuth)),
                pending: PendingOps::new(),
                documents: DocumentState::new(renderer, dir.path().join("docs")),
                _dir: dir,
            }
        }

        pub fn as_admin(&self) -> &Self {
            self.session.login("admin@clinic.ph", "pw").unwrap();
            self
        }

        pub fn as_staff(&self) -> &Self {
            self.session.login("desk@clinic.ph", "pw").unwrap();
            self
        }

        pub async fn service(&self, title: &str, price: &str, available: bool) -> Service {
            let draft = ServiceInput {
                title: title.into(),
                details: format!("{} details", title),
                price: price.into(),
                available,
            }
            .validate()
            .unwrap();
            self.db.inner().services().insert(&draft).await.unwrap()
        }
    }

    pub fn offset() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }
}
