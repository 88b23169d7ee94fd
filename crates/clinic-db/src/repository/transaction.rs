//! # Transaction Repository
//!
//! Persists finalized carts as immutable transactions.
//!
//! ## Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  commit(NewTransaction)                                                 │
//! │       │                                                                 │
//! │       ├── id          = uuid v4                                         │
//! │       ├── finished_at = wall clock now (never caller supplied)          │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │    INSERT transactions        (customer, breakdown, finished_at)        │
//! │    INSERT transaction_lines   (one per line, frozen snapshot)           │
//! │  COMMIT  ──────────────────── all or nothing                            │
//! │       │                                                                 │
//! │       └── notify(Transactions)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no update. Delete removes the transaction and, through the
//! foreign key cascade, its lines.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::feed::{ChangeFeed, Collection};
use crate::repository::{from_millis, to_millis};
use clinic_core::checkout::NewTransaction;
use clinic_core::types::{Transaction, TransactionLine};

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: String,
    customer_name: String,
    subtotal_cents: i64,
    discount_bps: i64,
    discount_amount_cents: i64,
    total_cents: i64,
    finished_at_ms: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct LineRow {
    transaction_id: String,
    service_id: String,
    service_name: String,
    details: String,
    price_cents: i64,
}

impl TransactionRow {
    fn into_transaction(self, lines: Vec<TransactionLine>) -> DbResult<Transaction> {
        let discount_bps = u32::try_from(self.discount_bps)
            .map_err(|_| DbError::corrupt("Transaction", "discount out of range"))?;

        Ok(Transaction {
            finished_at: from_millis("Transaction", self.finished_at_ms)?,
            id: self.id,
            customer_name: self.customer_name,
            lines,
            subtotal_cents: self.subtotal_cents,
            discount_bps,
            discount_amount_cents: self.discount_amount_cents,
            total_cents: self.total_cents,
        })
    }
}

impl From<LineRow> for TransactionLine {
    fn from(row: LineRow) -> Self {
        TransactionLine {
            service_id: row.service_id,
            service_name: row.service_name,
            details: row.details,
            price_cents: row.price_cents,
        }
    }
}

const SELECT_TRANSACTION: &str = r#"
    SELECT id, customer_name, subtotal_cents, discount_bps,
           discount_amount_cents, total_cents, finished_at_ms
    FROM transactions
"#;

/// Repository for transaction history.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
    feed: ChangeFeed,
}

impl TransactionRepository {
    pub fn new(pool: SqlitePool, feed: ChangeFeed) -> Self {
        TransactionRepository { pool, feed }
    }

    /// Writes the transaction and all its lines atomically.
    ///
    /// ## Returns
    /// The stored transaction, including the generated id and commit time.
    /// On error nothing is written.
    pub async fn commit(&self, new_tx: &NewTransaction) -> DbResult<Transaction> {
        let id = Uuid::new_v4().to_string();
        let finished_at = from_millis("Transaction", Utc::now().timestamp_millis())?;
        let b = &new_tx.breakdown;

        debug!(id = %id, lines = new_tx.lines.len(), total = %b.total, "Committing transaction");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, customer_name, subtotal_cents, discount_bps,
                discount_amount_cents, total_cents, finished_at_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(&new_tx.customer_name)
        .bind(b.subtotal.cents())
        .bind(i64::from(b.discount_rate.bps()))
        .bind(b.discount_amount.cents())
        .bind(b.total.cents())
        .bind(to_millis(finished_at))
        .execute(&mut *tx)
        .await?;

        for (position, line) in new_tx.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO transaction_lines (
                    transaction_id, position, service_id, service_name, details, price_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&id)
            .bind(position as i64)
            .bind(&line.service_id)
            .bind(&line.service_name)
            .bind(&line.details)
            .bind(line.price_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %id, customer = %new_tx.customer_name, "Transaction committed");
        self.feed.notify(Collection::Transactions);

        Ok(Transaction {
            id,
            customer_name: new_tx.customer_name.clone(),
            lines: new_tx.lines.clone(),
            subtotal_cents: b.subtotal.cents(),
            discount_bps: b.discount_rate.bps(),
            discount_amount_cents: b.discount_amount.cents(),
            total_cents: b.total.cents(),
            finished_at,
        })
    }

    /// Gets a transaction with its lines.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Transaction>> {
        let row: Option<TransactionRow> =
            sqlx::query_as(&format!("{SELECT_TRANSACTION} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let lines: Vec<LineRow> = sqlx::query_as(
            r#"
            SELECT transaction_id, service_id, service_name, details, price_cents
            FROM transaction_lines
            WHERE transaction_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        row.into_transaction(lines.into_iter().map(TransactionLine::from).collect())
            .map(Some)
    }

    /// All transactions, newest first.
    pub async fn list(&self) -> DbResult<Vec<Transaction>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            "{SELECT_TRANSACTION} ORDER BY finished_at_ms DESC, seq DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        let lines: Vec<LineRow> = sqlx::query_as(
            r#"
            SELECT transaction_id, service_id, service_name, details, price_cents
            FROM transaction_lines
            ORDER BY transaction_id, position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        assemble(rows, lines)
    }

    /// Transactions with `start <= finished_at <= end`, oldest first.
    pub async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Transaction>> {
        debug!(%start, %end, "Listing transactions in range");

        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            "{SELECT_TRANSACTION} WHERE finished_at_ms BETWEEN ?1 AND ?2 ORDER BY finished_at_ms, seq"
        ))
        .bind(to_millis(start))
        .bind(to_millis(end))
        .fetch_all(&self.pool)
        .await?;

        let lines: Vec<LineRow> = sqlx::query_as(
            r#"
            SELECT l.transaction_id, l.service_id, l.service_name, l.details, l.price_cents
            FROM transaction_lines l
            JOIN transactions t ON t.id = l.transaction_id
            WHERE t.finished_at_ms BETWEEN ?1 AND ?2
            ORDER BY l.transaction_id, l.position
            "#,
        )
        .bind(to_millis(start))
        .bind(to_millis(end))
        .fetch_all(&self.pool)
        .await?;

        assemble(rows, lines)
    }

    /// Deletes a transaction and its lines.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting transaction");

        let result = sqlx::query("DELETE FROM transactions WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction", id));
        }

        self.feed.notify(Collection::Transactions);
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Groups line rows under their transactions, keeping row order.
fn assemble(rows: Vec<TransactionRow>, lines: Vec<LineRow>) -> DbResult<Vec<Transaction>> {
    let mut by_tx: HashMap<String, Vec<TransactionLine>> = HashMap::new();
    for line in lines {
        by_tx
            .entry(line.transaction_id.clone())
            .or_default()
            .push(TransactionLine::from(line));
    }

    rows.into_iter()
        .map(|row| {
            let lines = by_tx.remove(&row.id).unwrap_or_default();
            row.into_transaction(lines)
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::Duration;
    use clinic_core::money::Money;
    use clinic_core::pricing::DiscountRate;

    fn line(name: &str, pesos: i64) -> TransactionLine {
        TransactionLine {
            service_id: format!("svc-{}", name),
            service_name: name.to_string(),
            details: "details".to_string(),
            price_cents: pesos * 100,
        }
    }

    fn new_tx(customer: &str, pct: f64) -> NewTransaction {
        NewTransaction::new(
            customer,
            vec![line("CBC", 500), line("X-Ray", 300)],
            DiscountRate::from_percent(pct),
        )
        .unwrap()
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_commit_and_get() {
        let db = db().await;
        let before = Utc::now() - Duration::seconds(1);

        let tx = db.transactions().commit(&new_tx("Ana", 10.0)).await.unwrap();
        assert_eq!(tx.total(), Money::from_pesos(720));
        assert!(tx.finished_at >= before);

        let fetched = db.transactions().get_by_id(&tx.id).await.unwrap().unwrap();
        assert_eq!(fetched, tx);
        assert_eq!(fetched.lines[0].service_name, "CBC");
        assert_eq!(fetched.lines[1].service_name, "X-Ray");
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = db().await;
        let first = db.transactions().commit(&new_tx("Ana", 0.0)).await.unwrap();
        let second = db.transactions().commit(&new_tx("Ben", 0.0)).await.unwrap();

        let all = db.transactions().list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
        assert_eq!(all[0].lines.len(), 2);
    }

    #[tokio::test]
    async fn test_list_between_inclusive() {
        let db = db().await;
        let tx = db.transactions().commit(&new_tx("Ana", 0.0)).await.unwrap();

        let hit = db
            .transactions()
            .list_between(tx.finished_at, tx.finished_at)
            .await
            .unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].lines.len(), 2);

        let miss = db
            .transactions()
            .list_between(
                tx.finished_at + Duration::milliseconds(1),
                tx.finished_at + Duration::days(1),
            )
            .await
            .unwrap();
        assert!(miss.is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascades_lines() {
        let db = db().await;
        let tx = db.transactions().commit(&new_tx("Ana", 0.0)).await.unwrap();

        db.transactions().delete(&tx.id).await.unwrap();
        assert!(db.transactions().get_by_id(&tx.id).await.unwrap().is_none());

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transaction_lines")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_catalog_edit_does_not_touch_history() {
        use clinic_core::types::ServiceDraft;

        let db = db().await;
        let svc = db
            .services()
            .insert(&ServiceDraft {
                title: "CBC".into(),
                details: "Blood".into(),
                price: Money::from_pesos(500),
                available: true,
            })
            .await
            .unwrap();

        let committed = db
            .transactions()
            .commit(
                &NewTransaction::new(
                    "Ana",
                    vec![TransactionLine {
                        service_id: svc.id.clone(),
                        service_name: svc.title.clone(),
                        details: svc.details.clone(),
                        price_cents: svc.price_cents,
                    }],
                    DiscountRate::ZERO,
                )
                .unwrap(),
            )
            .await
            .unwrap();

        db.services().delete(&svc.id).await.unwrap();

        let fetched = db.transactions().get_by_id(&committed.id).await.unwrap().unwrap();
        assert_eq!(fetched.lines[0].price_cents, 50_000);
        assert_eq!(fetched.lines[0].service_name, "CBC");
    }
}
