//! # API Error Type
//!
//! Unified error type for commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Clinic POS                             │
//! │                                                                         │
//! │  Command Function  →  Result<T, ApiError>                               │
//! │         │                                                               │
//! │         ├── ValidationError / CoreError::EmptyCart ──► VALIDATION_ERROR │
//! │         ├── no session ─────────────────────────────► UNAUTHENTICATED   │
//! │         ├── staff deleting ─────────────────────────► FORBIDDEN         │
//! │         ├── DbError::NotFound ──────────────────────► NOT_FOUND         │
//! │         ├── DbError::QueryFailed (logged) ──────────► DATABASE_ERROR    │
//! │         ├── same operation already in flight ───────► BUSY              │
//! │         └── RenderError ────────────────────────────► RENDER_ERROR      │
//! │                                                                         │
//! │  Logo failures never reach this type: the renderer logs and carries on. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error serializes as `{ "code": "...", "message": "..." }` so a UI
//! can branch on the code and show the message as-is.

use serde::Serialize;
use std::fmt;

use clinic_core::{CoreError, ValidationError};
use clinic_db::DbError;
use clinic_receipt::RenderError;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "FORBIDDEN",
///   "message": "staff accounts cannot delete records"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected before anything was stored
    ValidationError,

    /// No active session
    Unauthenticated,

    /// Session role lacks the capability
    Forbidden,

    /// Record does not exist
    NotFound,

    /// Store operation failed
    DatabaseError,

    /// The same operation is already running
    Busy,

    /// Document could not be produced or written
    RenderError,

    /// Anything else
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a busy error for an operation already in flight.
    pub fn busy(operation: &str) -> Self {
        ApiError::new(
            ErrorCode::Busy,
            format!("{} is already in progress, please wait", operation),
        )
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::CheckViolation(message) => {
                tracing::warn!("Check constraint rejected write: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Value rejected by the store")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::SchemaFailed(e) => {
                tracing::error!("Schema bootstrap failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database setup failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::CorruptRow { entity, reason } => {
                tracing::error!(entity = %entity, "Corrupt row: {}", reason);
                ApiError::new(ErrorCode::DatabaseError, "Stored data could not be read")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ServiceUnavailable(_)
            | CoreError::EmptyCart
            | CoreError::CartTooLarge { .. }
            | CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::Unauthenticated | CoreError::InvalidCredentials => ErrorCode::Unauthenticated,
            CoreError::Forbidden { .. } => ErrorCode::Forbidden,
        };
        match err {
            // Show the field message without the "Validation error:" prefix
            CoreError::Validation(e) => ApiError::from(e),
            other => ApiError::new(code, other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        tracing::error!("Document rendering failed: {}", err);
        ApiError::new(ErrorCode::RenderError, err.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_core::{Capability, Role};

    #[test]
    fn test_forbidden_maps_to_code() {
        let err = ApiError::from(CoreError::Forbidden {
            role: Role::Staff,
            capability: Capability::DeleteRecords,
        });
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert!(err.message.starts_with("staff accounts cannot"));
    }

    #[test]
    fn test_validation_message_is_plain() {
        let err = ApiError::from(CoreError::Validation(ValidationError::required("Customer name")));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Customer name is required");
    }

    #[test]
    fn test_query_failure_is_generic() {
        let err = ApiError::from(DbError::QueryFailed("near \"SELEC\": syntax error".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_serializes_screaming_code() {
        let json = serde_json::to_string(&ApiError::busy("Checkout")).unwrap();
        assert!(json.contains("\"code\":\"BUSY\""));
    }
}
