//! # Database Pool Management
//!
//! Connection pool creation, schema bootstrap and repository access.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Handle                                    │
//! │                                                                         │
//! │  DbConfig::new(path) ← Configure pool settings                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + bootstrap schema          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────┐    ┌────────────────────────────┐     │
//! │  │        SqlitePool           │    │        ChangeFeed          │     │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐    │    │  broadcast<Collection>     │     │
//! │  │  │Conn1│ │Conn2│ │Conn3│    │    │                            │     │
//! │  │  └─────┘ └─────┘ └─────┘    │    │                            │     │
//! │  └──────────────┬──────────────┘    └─────────────┬──────────────┘     │
//! │                 │                                 │                     │
//! │                 ▼                                 ▼                     │
//! │  services() / transactions() / expenses()   watch_*() → Subscription   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File databases use SQLite WAL (Write-Ahead Logging) so the dashboard's
//! watchers can read while a checkout writes.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::feed::{ChangeFeed, Collection};
use crate::repository::expense::ExpenseRepository;
use crate::repository::service::ServiceRepository;
use crate::repository::transaction::TransactionRepository;
use crate::schema;
use crate::watch::Subscription;
use clinic_core::types::{Expense, Service, Transaction};

const MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/clinic.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection. `None` keeps connections
    /// open, which an in-memory database requires.
    pub idle_timeout: Option<Duration>,

    /// Whether to create missing tables on connect.
    /// Default: true
    pub bootstrap_schema: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// ## Arguments
    /// * `path` - Path to the SQLite database file. Created if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            bootstrap_schema: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to bootstrap the schema on connect.
    pub fn bootstrap_schema(mut self, run: bool) -> Self {
        self.bootstrap_schema = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// Each in-memory connection is its own database, so the pool is pinned
    /// to a single connection that never idles out.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            bootstrap_schema: true,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == MEMORY_PATH
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access and live watches.
///
/// Cloning is cheap: the pool and the change feed are shared.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    feed: ChangeFeed,
}

impl Database {
    /// Creates the connection pool and bootstraps the schema.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite: WAL (file databases), NORMAL synchronous,
    ///    foreign keys on (needed for line cascades)
    /// 3. Creates the connection pool
    /// 4. Creates missing tables (if enabled)
    ///
    /// ## Returns
    /// * `Ok(Database)` - Ready-to-use database handle
    /// * `Err(DbError)` - Connection or schema bootstrap failed
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let base_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());
            SqliteConnectOptions::from_str(&connect_url)
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
                .journal_mode(SqliteJournalMode::Wal)
                .create_if_missing(true)
        };

        let connect_options = base_options
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        debug!("Connection options configured");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout);
        if config.is_in_memory() {
            pool_options = pool_options.max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database {
            pool,
            feed: ChangeFeed::new(),
        };

        if config.bootstrap_schema {
            schema::bootstrap_schema(&db.pool).await?;
        }

        Ok(db)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the change feed shared by all repositories.
    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    /// Returns the service (catalog) repository.
    pub fn services(&self) -> ServiceRepository {
        ServiceRepository::new(self.pool.clone(), self.feed.clone())
    }

    /// Returns the transaction repository.
    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.pool.clone(), self.feed.clone())
    }

    /// Returns the expense repository.
    pub fn expenses(&self) -> ExpenseRepository {
        ExpenseRepository::new(self.pool.clone(), self.feed.clone())
    }

    // =========================================================================
    // Live Watches
    // =========================================================================

    /// Watches the whole catalog.
    pub fn watch_services(&self) -> Subscription<Service> {
        let repo = self.services();
        Subscription::spawn(&self.feed, Collection::Services, move || {
            let repo = repo.clone();
            async move { repo.list().await }
        })
    }

    /// Watches transactions finished within `[start, end]`.
    pub fn watch_transactions(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Subscription<Transaction> {
        let repo = self.transactions();
        Subscription::spawn(&self.feed, Collection::Transactions, move || {
            let repo = repo.clone();
            async move { repo.list_between(start, end).await }
        })
    }

    /// Watches expenses dated within `[start, end]`.
    pub fn watch_expenses(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Subscription<Expense> {
        let repo = self.expenses();
        Subscription::spawn(&self.feed, Collection::Expenses, move || {
            let repo = repo.clone();
            async move { repo.list_between(start, end).await }
        })
    }

    /// Closes the database connection pool.
    ///
    /// ## Note
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_core::money::Money;
    use clinic_core::types::ServiceDraft;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
        assert_eq!(schema::table_count(db.pool()).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        schema::bootstrap_schema(db.pool()).await.unwrap();
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_watch_services_sees_insert() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut sub = db.watch_services();
        assert!(sub.next().await.unwrap().is_empty());

        db.services()
            .insert(&ServiceDraft {
                title: "CBC".into(),
                details: "Blood".into(),
                price: Money::from_pesos(500),
                available: true,
            })
            .await
            .unwrap();

        let snapshot = sub.next().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        sub.cancel();
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic.db");

        {
            let db = Database::new(DbConfig::new(&path)).await.unwrap();
            db.expenses()
                .add(&clinic_core::types::ExpenseDraft {
                    amount: Money::from_pesos(10),
                    note: "Paper".into(),
                })
                .await
                .unwrap();
            db.close().await;
        }

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(db.expenses().list().await.unwrap().len(), 1);
    }
}
