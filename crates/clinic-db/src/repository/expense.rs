//! # Expense Repository
//!
//! The expense ledger: add, list in insertion order, delete. No update.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::feed::{ChangeFeed, Collection};
use crate::repository::{from_millis, to_millis};
use clinic_core::types::{Expense, ExpenseDraft};

#[derive(Debug, sqlx::FromRow)]
struct ExpenseRow {
    id: String,
    amount_cents: i64,
    note: String,
    date_ms: i64,
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = DbError;

    fn try_from(row: ExpenseRow) -> DbResult<Self> {
        Ok(Expense {
            date: from_millis("Expense", row.date_ms)?,
            id: row.id,
            amount_cents: row.amount_cents,
            note: row.note,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
    feed: ChangeFeed,
}

impl ExpenseRepository {
    pub fn new(pool: SqlitePool, feed: ChangeFeed) -> Self {
        ExpenseRepository { pool, feed }
    }

    /// Records an expense dated now.
    ///
    /// The draft is already validated (amount > 0, note defaulted); the
    /// table's CHECK constraint is the last line of defence.
    pub async fn add(&self, draft: &ExpenseDraft) -> DbResult<Expense> {
        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            amount_cents: draft.amount.cents(),
            note: draft.note.clone(),
            date: from_millis("Expense", Utc::now().timestamp_millis())?,
        };

        debug!(id = %expense.id, amount = %draft.amount, "Recording expense");

        sqlx::query("INSERT INTO expenses (id, amount_cents, note, date_ms) VALUES (?1, ?2, ?3, ?4)")
            .bind(&expense.id)
            .bind(expense.amount_cents)
            .bind(&expense.note)
            .bind(to_millis(expense.date))
            .execute(&self.pool)
            .await?;

        self.feed.notify(Collection::Expenses);
        Ok(expense)
    }

    /// All expenses in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Expense>> {
        let rows: Vec<ExpenseRow> =
            sqlx::query_as("SELECT id, amount_cents, note, date_ms FROM expenses ORDER BY seq")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Expense::try_from).collect()
    }

    /// Expenses dated within `[start, end]`, in insertion order.
    pub async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Expense>> {
        let rows: Vec<ExpenseRow> = sqlx::query_as(
            r#"
            SELECT id, amount_cents, note, date_ms
            FROM expenses
            WHERE date_ms BETWEEN ?1 AND ?2
            ORDER BY seq
            "#,
        )
        .bind(to_millis(start))
        .bind(to_millis(end))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Expense::try_from).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Expense>> {
        let row: Option<ExpenseRow> =
            sqlx::query_as("SELECT id, amount_cents, note, date_ms FROM expenses WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Expense::try_from).transpose()
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting expense");

        let result = sqlx::query("DELETE FROM expenses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id));
        }

        self.feed.notify(Collection::Expenses);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
