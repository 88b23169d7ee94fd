//! # Checkout Command
//!
//! Commits the cart as an immutable transaction, then renders the invoice.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout()                                                             │
//! │     │                                                                   │
//! │     ├── authorize(Checkout)            no session / role → refused      │
//! │     ├── try_begin("checkout")          already running → BUSY           │
//! │     ├── cart.checkout()                name + lines required,           │
//! │     │                                  breakdown re-derived             │
//! │     ├── transactions().commit()        one SQLite transaction           │
//! │     │        │ failure → error, cart untouched, operator retries        │
//! │     ├── cart.clear()                                                    │
//! │     └── render invoice (best effort)   failure → reported, sale stays   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

use clinic_core::{Capability, Transaction};
use clinic_receipt::DocumentKind;

use crate::error::ApiError;
use crate::state::{CartState, DbState, DocumentState, PendingOps, SessionState, CHECKOUT_KEY};

/// Result of a successful commit.
///
/// The transaction is always present; the document fields report the
/// post-commit rendering, which may fail without affecting the sale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOutcome {
    pub transaction: Transaction,
    pub document_path: Option<PathBuf>,
    pub render_error: Option<String>,
}

pub async fn checkout(
    db: &DbState,
    cart: &CartState,
    session: &SessionState,
    pending: &PendingOps,
    documents: &DocumentState,
) -> Result<CheckoutOutcome, ApiError> {
    let session = session.authorize(Capability::Checkout)?;
    let _guard = pending.try_begin(CHECKOUT_KEY)?;

    // Validation happens on a read; the cart only changes after the commit.
    let request = cart.with_cart(|c| c.checkout())?;
    let transaction = db.inner().transactions().commit(&request).await?;
    cart.with_cart_mut(|c| c.clear());

    info!(
        id = %transaction.id,
        total = %transaction.total(),
        lines = transaction.lines.len(),
        by = %session.email,
        "Checkout complete"
    );

    let (document_path, render_error) = match documents.save(DocumentKind::Invoice, &transaction).await {
        Ok(path) => (Some(path), None),
        Err(e) => {
            warn!(id = %transaction.id, "Invoice not saved: {}", e);
            (None, Some(e.to_string()))
        }
    };

    Ok(CheckoutOutcome {
        transaction,
        document_path,
        render_error,
    })
}
