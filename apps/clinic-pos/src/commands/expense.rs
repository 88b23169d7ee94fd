//! # Expense Commands
//!
//! The ledger: append, list, delete. The total is recomputed from the
//! listed entries on every call and never stored.

use serde::Serialize;
use tracing::info;

use clinic_core::{Capability, Expense, ExpenseInput, Money};

use crate::error::ApiError;
use crate::state::{delete_key, DbState, PendingOps, SessionState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    /// In insertion order.
    pub entries: Vec<Expense>,
    pub total: Money,
}

pub async fn list_expenses(db: &DbState, session: &SessionState) -> Result<Ledger, ApiError> {
    session.authorize(Capability::RecordExpense)?;
    let entries = db.inner().expenses().list().await?;
    let total = Expense::total(&entries);
    Ok(Ledger { entries, total })
}

/// Records an expense. Non-numeric, empty, zero or negative amounts are
/// rejected before the ledger is touched.
pub async fn add_expense(
    db: &DbState,
    session: &SessionState,
    input: &ExpenseInput,
) -> Result<Expense, ApiError> {
    session.authorize(Capability::RecordExpense)?;
    let draft = input.validate()?;

    let expense = db.inner().expenses().add(&draft).await?;
    info!(id = %expense.id, amount = %expense.amount(), "Expense recorded");
    Ok(expense)
}

/// Deletes an expense. Admin only.
pub async fn delete_expense(
    db: &DbState,
    session: &SessionState,
    pending: &PendingOps,
    id: &str,
) -> Result<(), ApiError> {
    let session = session.authorize(Capability::DeleteRecords)?;
    let _guard = pending.try_begin(delete_key(id))?;

    db.inner().expenses().delete(id).await?;
    info!(id = %id, by = %session.email, "Expense deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::Fixture;
    use crate::error::ErrorCode;
    use clinic_core::NO_DETAILS_NOTE;

    fn input(amount: &str, note: &str) -> ExpenseInput {
        ExpenseInput {
            amount: amount.into(),
            note: note.into(),
        }
    }

    #[tokio::test]
    async fn test_add_and_total() {
        let fx = Fixture::new().await;
        fx.as_staff();

        add_expense(&fx.db, &fx.session, &input("250", "Gloves")).await.unwrap();
        let second = add_expense(&fx.db, &fx.session, &input("1,000.50", "")).await.unwrap();
        assert_eq!(second.note, NO_DETAILS_NOTE);

        let ledger = list_expenses(&fx.db, &fx.session).await.unwrap();
        assert_eq!(ledger.entries.len(), 2);
        assert_eq!(ledger.entries[0].note, "Gloves");
        assert_eq!(ledger.total, Money::from_cents(125_050));
    }

    #[tokio::test]
    async fn test_non_numeric_rejected() {
        let fx = Fixture::new().await;
        fx.as_staff();

        for bad in ["abc", "", "0", "-10"] {
            let err = add_expense(&fx.db, &fx.session, &input(bad, "x")).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError);
        }
        assert!(list_expenses(&fx.db, &fx.session).await.unwrap().entries.is_empty());
    }

    #[tokio::test]
    async fn test_delete_gated() {
        let fx = Fixture::new().await;
        fx.as_staff();
        let e = add_expense(&fx.db, &fx.session, &input("100", "Water")).await.unwrap();

        let err = delete_expense(&fx.db, &fx.session, &fx.pending, &e.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        fx.as_admin();
        delete_expense(&fx.db, &fx.session, &fx.pending, &e.id).await.unwrap();
        assert_eq!(list_expenses(&fx.db, &fx.session).await.unwrap().total, Money::zero());
    }
}
