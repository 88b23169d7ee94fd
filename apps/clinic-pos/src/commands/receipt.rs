//! # Receipt Commands
//!
//! The receipts listing: committed transactions, newest first, each of
//! which can be re-rendered on demand as an invoice or official receipt.

use std::path::PathBuf;
use tracing::{debug, info};

use clinic_core::{Capability, Transaction};
use clinic_receipt::DocumentKind;

use crate::error::ApiError;
use crate::state::{delete_key, DbState, DocumentState, PendingOps, SessionState};

pub async fn list_receipts(db: &DbState, session: &SessionState) -> Result<Vec<Transaction>, ApiError> {
    session.authorize(Capability::ViewReports)?;
    let transactions = db.inner().transactions().list().await?;
    debug!(count = transactions.len(), "list_receipts complete");
    Ok(transactions)
}

pub async fn get_receipt(db: &DbState, session: &SessionState, id: &str) -> Result<Transaction, ApiError> {
    session.authorize(Capability::ViewReports)?;
    db.inner()
        .transactions()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction", id))
}

/// Renders a stored transaction and returns the saved file path.
pub async fn render_document(
    db: &DbState,
    session: &SessionState,
    documents: &DocumentState,
    id: &str,
    kind: DocumentKind,
) -> Result<PathBuf, ApiError> {
    let transaction = get_receipt(db, session, id).await?;
    let path = documents.save(kind, &transaction).await?;

    info!(id = %id, kind = %kind, path = %path.display(), "Document rendered");
    Ok(path)
}

/// Deletes a transaction and its lines. Admin only.
pub async fn delete_receipt(
    db: &DbState,
    session: &SessionState,
    pending: &PendingOps,
    id: &str,
) -> Result<(), ApiError> {
    let session = session.authorize(Capability::DeleteRecords)?;
    let _guard = pending.try_begin(delete_key(id))?;

    db.inner().transactions().delete(id).await?;
    info!(id = %id, by = %session.email, "Transaction deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::Fixture;
    use crate::error::ErrorCode;
    use clinic_core::{DiscountRate, NewTransaction, TransactionLine};

    async fn commit(fx: &Fixture, customer: &str) -> Transaction {
        let lines = vec![TransactionLine {
            service_id: "svc-1".into(),
            service_name: "CBC".into(),
            details: "Complete blood count".into(),
            price_cents: 35_000,
        }];
        let request = NewTransaction::new(customer, lines, DiscountRate::ZERO).unwrap();
        fx.db.inner().transactions().commit(&request).await.unwrap()
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let fx = Fixture::new().await;
        fx.as_staff();
        let first = commit(&fx, "Ana").await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = commit(&fx, "Ben").await;

        let listed = list_receipts(&fx.db, &fx.session).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_render_receipt_file_name() {
        let fx = Fixture::new().await;
        fx.as_staff();
        let tx = commit(&fx, "Ana Reyes").await;

        let path = render_document(&fx.db, &fx.session, &fx.documents, &tx.id, DocumentKind::Receipt)
            .await
            .unwrap();

        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            format!("receipt-Ana_Reyes-{}.pdf", tx.id)
        );
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_render_unknown_id() {
        let fx = Fixture::new().await;
        fx.as_staff();
        let err = render_document(&fx.db, &fx.session, &fx.documents, "nope", DocumentKind::Invoice)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_delete_is_admin_only() {
        let fx = Fixture::new().await;
        let tx = commit(&fx, "Ana").await;

        fx.as_staff();
        let err = delete_receipt(&fx.db, &fx.session, &fx.pending, &tx.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert_eq!(fx.db.inner().transactions().count().await.unwrap(), 1);

        fx.as_admin();
        delete_receipt(&fx.db, &fx.session, &fx.pending, &tx.id).await.unwrap();
        assert_eq!(fx.db.inner().transactions().count().await.unwrap(), 0);
    }
}
