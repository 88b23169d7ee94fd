//! # Schema Bootstrap
//!
//! Creates the clinic tables on connect.
//!
//! ## Tables
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  services                 transactions              expenses            │
//! │  ────────                 ────────────              ────────            │
//! │  id (PK)                  seq (PK, autoinc)         seq (PK, autoinc)   │
//! │  title                    id (UNIQUE)               id (UNIQUE)         │
//! │  details                  customer_name             amount_cents (>0)   │
//! │  price_cents (>=0)        subtotal/discount/total   note                │
//! │  available                finished_at_ms (idx)      date_ms (idx)       │
//! │  created/updated_at_ms         │                                        │
//! │                                │ ON DELETE CASCADE                      │
//! │                                ▼                                        │
//! │                           transaction_lines                             │
//! │                           (transaction_id, position) PK                 │
//! │                           service_id, service_name, details, price      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every statement is `IF NOT EXISTS`, so bootstrapping an existing file is a
//! no-op. Timestamps are epoch milliseconds (UTC) so range filters compare
//! integers.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS services (
        id            TEXT PRIMARY KEY NOT NULL,
        title         TEXT NOT NULL,
        details       TEXT NOT NULL DEFAULT '',
        price_cents   INTEGER NOT NULL CHECK (price_cents >= 0),
        available     INTEGER NOT NULL DEFAULT 1,
        created_at_ms INTEGER NOT NULL,
        updated_at_ms INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        seq                   INTEGER PRIMARY KEY AUTOINCREMENT,
        id                    TEXT NOT NULL UNIQUE,
        customer_name         TEXT NOT NULL,
        subtotal_cents        INTEGER NOT NULL CHECK (subtotal_cents >= 0),
        discount_bps          INTEGER NOT NULL CHECK (discount_bps BETWEEN 0 AND 10000),
        discount_amount_cents INTEGER NOT NULL CHECK (discount_amount_cents >= 0),
        total_cents           INTEGER NOT NULL CHECK (total_cents >= 0),
        finished_at_ms        INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_transactions_finished_at ON transactions (finished_at_ms)",
    r#"
    CREATE TABLE IF NOT EXISTS transaction_lines (
        transaction_id TEXT NOT NULL REFERENCES transactions (id) ON DELETE CASCADE,
        position       INTEGER NOT NULL,
        service_id     TEXT NOT NULL,
        service_name   TEXT NOT NULL,
        details        TEXT NOT NULL DEFAULT '',
        price_cents    INTEGER NOT NULL CHECK (price_cents >= 0),
        PRIMARY KEY (transaction_id, position)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS expenses (
        seq          INTEGER PRIMARY KEY AUTOINCREMENT,
        id           TEXT NOT NULL UNIQUE,
        amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
        note         TEXT NOT NULL,
        date_ms      INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses (date_ms)",
];

/// Creates any missing tables and indexes.
///
/// ## Safety
/// - Idempotent: safe to run on every start
/// - Runs inside one transaction, so a failure leaves no partial schema
pub async fn bootstrap_schema(pool: &SqlitePool) -> DbResult<()> {
    info!("Bootstrapping database schema");

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| DbError::SchemaFailed(e.to_string()))?;

    for statement in STATEMENTS {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::SchemaFailed(e.to_string()))?;
    }

    tx.commit()
        .await
        .map_err(|e| DbError::SchemaFailed(e.to_string()))?;

    debug!(statements = STATEMENTS.len(), "Schema ready");
    Ok(())
}

/// Number of user tables present. Used for diagnostics.
pub async fn table_count(pool: &SqlitePool) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
