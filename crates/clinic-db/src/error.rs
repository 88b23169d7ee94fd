//! # Store Errors
//!
//! Every repository call returns [`DbResult`]. The command layer turns these
//! into stable API codes; operators never see raw SQLite text.
//!
//! ```text
//! sqlx::Error ──► DbError ──► ApiError (clinic-pos)
//!                   │
//!                   ├── NotFound / CorruptRow         row-level
//!                   ├── Unique / Check / ForeignKey   constraint-level
//!                   └── Connection / Schema / Query   store-level
//! ```

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No row with this id (services, transactions or expenses).
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A stored value failed to map back to a domain type, e.g. a negative
    /// `price_cents` written by another tool.
    #[error("Corrupt {entity} row: {reason}")]
    CorruptRow { entity: String, reason: String },

    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Negative price or non-positive expense amount reached the table.
    #[error("Constraint violation: {0}")]
    CheckViolation(String),

    /// A transaction line pointing at a missing transaction.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database file could not be opened, or the pool was closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// `CREATE TABLE IF NOT EXISTS` bootstrap failed at startup.
    #[error("Schema bootstrap failed: {0}")]
    SchemaFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Commit of a checkout or cascade delete failed; nothing was written.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn corrupt(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        DbError::CorruptRow {
            entity: entity.into(),
            reason: reason.into(),
        }
    }

    /// True for failures of the store itself rather than of the data.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            DbError::ConnectionFailed(_)
                | DbError::SchemaFailed(_)
                | DbError::QueryFailed(_)
                | DbError::TransactionFailed(_)
                | DbError::PoolExhausted
                | DbError::Internal(_)
        )
    }

    /// Maps a SQLite constraint message to a typed variant.
    ///
    /// SQLite reports constraints as text only:
    /// `UNIQUE constraint failed: services.id`,
    /// `CHECK constraint failed: price_cents >= 0`,
    /// `FOREIGN KEY constraint failed`.
    fn from_sqlite_message(msg: &str) -> Self {
        if let Some(column) = msg.strip_prefix("UNIQUE constraint failed: ") {
            DbError::UniqueViolation {
                field: column.to_string(),
                value: "unknown".to_string(),
            }
        } else if msg.starts_with("CHECK constraint failed") {
            DbError::CheckViolation(msg.to_string())
        } else if msg.starts_with("FOREIGN KEY constraint failed") {
            DbError::ForeignKeyViolation {
                message: msg.to_string(),
            }
        } else {
            DbError::QueryFailed(msg.to_string())
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),
            sqlx::Error::Database(db_err) => DbError::from_sqlite_message(db_err.message()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = DbError::not_found("Service", "abc");
        assert_eq!(err.to_string(), "Service not found: abc");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert!(!err.is_store_failure());
    }

    #[test]
    fn test_sqlite_messages_classified() {
        assert!(matches!(
            DbError::from_sqlite_message("UNIQUE constraint failed: services.id"),
            DbError::UniqueViolation { ref field, .. } if field == "services.id"
        ));
        assert!(matches!(
            DbError::from_sqlite_message("CHECK constraint failed: amount_cents > 0"),
            DbError::CheckViolation(_)
        ));
        assert!(matches!(
            DbError::from_sqlite_message("FOREIGN KEY constraint failed"),
            DbError::ForeignKeyViolation { .. }
        ));
        let other = DbError::from_sqlite_message("database is locked");
        assert!(matches!(other, DbError::QueryFailed(_)));
        assert!(other.is_store_failure());
    }
}
