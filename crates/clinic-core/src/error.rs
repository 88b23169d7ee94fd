//! # Error Types
//!
//! Domain-specific error types for clinic-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  clinic-core errors (this file)                                        │
//! │  ├── CoreError        - Cart, checkout and authorization failures      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  clinic-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  clinic-receipt errors (separate crate)                                │
//! │  └── RenderError      - PDF generation failures                        │
//! │                                                                         │
//! │  App errors                                                            │
//! │  └── ApiError         - What the operator sees (serialized)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::session::{Capability, Role};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The service is switched off in the catalog and cannot be rung up.
    #[error("Service is not available: {0}")]
    ServiceUnavailable(String),

    /// Checkout attempted with no lines in the cart.
    #[error("Please add at least one service")]
    EmptyCart,

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} services")]
    CartTooLarge { max: usize },

    /// No session is active. Protected operations require a login first.
    #[error("Please log in to continue")]
    Unauthenticated,

    /// Email/password pair did not match any account.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The session role does not hold the capability.
    ///
    /// ## When This Occurs
    /// - Staff attempting to delete a service, transaction or expense
    #[error("{role} accounts cannot {capability}")]
    Forbidden { role: Role, capability: Capability },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when operator input doesn't meet requirements.
/// Used for early validation before anything reaches the store.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., non-numeric amount, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates a Required error for a field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::Forbidden {
            role: Role::Staff,
            capability: Capability::DeleteRecords,
        };
        assert_eq!(err.to_string(), "staff accounts cannot delete records");

        assert_eq!(
            CoreError::EmptyCart.to_string(),
            "Please add at least one service"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("customer name");
        assert_eq!(err.to_string(), "customer name is required");

        let err = ValidationError::invalid("amount", "not a number");
        assert_eq!(err.to_string(), "amount has invalid format: not a number");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("title").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
