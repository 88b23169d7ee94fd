//! # Database State
//!
//! Wraps the `Database` connection for use in commands.
//!
//! The `Database` from `clinic-db` holds a `SqlitePool`, which is
//! thread-safe. Commands run queries concurrently without extra locking.

use clinic_db::Database;

#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let services = db_state.inner().services().list().await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
