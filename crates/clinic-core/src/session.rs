//! # Session & Authorization
//!
//! Roles, capabilities and the session object handed to every privileged
//! operation.
//!
//! ## Capability Matrix
//! ```text
//! ┌───────────────────┬─────────┬─────────┐
//! │ Capability        │  Admin  │  Staff  │
//! ├───────────────────┼─────────┼─────────┤
//! │ ManageCatalog     │   ✅    │   ✅    │
//! │ Checkout          │   ✅    │   ✅    │
//! │ RecordExpense     │   ✅    │   ✅    │
//! │ ViewReports       │   ✅    │   ✅    │
//! │ DeleteRecords     │   ✅    │   ❌    │
//! └───────────────────┴─────────┴─────────┘
//! ```
//!
//! Login creates a [`Session`]; logout drops it. Nothing reads the role from
//! ambient global state: commands receive the session explicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};

// =============================================================================
// Role
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    /// Returns true if this role holds the capability.
    pub fn can(&self, capability: Capability) -> bool {
        match capability {
            Capability::DeleteRecords => matches!(self, Role::Admin),
            Capability::ManageCatalog
            | Capability::Checkout
            | Capability::RecordExpense
            | Capability::ViewReports => true,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Staff => write!(f, "staff"),
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            other => Err(ValidationError::invalid(
                "role",
                format!("expected admin or staff, got '{}'", other),
            )),
        }
    }
}

// =============================================================================
// Capability
// =============================================================================

/// Something a session may or may not be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ManageCatalog,
    Checkout,
    RecordExpense,
    ViewReports,
    /// Delete services, transactions and expenses.
    DeleteRecords,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Capability::ManageCatalog => "manage the catalog",
            Capability::Checkout => "check out",
            Capability::RecordExpense => "record expenses",
            Capability::ViewReports => "view reports",
            Capability::DeleteRecords => "delete records",
        };
        f.write_str(text)
    }
}

// =============================================================================
// Session
// =============================================================================

/// An authenticated operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Session {
    pub email: String,
    pub role: Role,
    #[ts(as = "String")]
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(email: impl Into<String>, role: Role, started_at: DateTime<Utc>) -> Self {
        Session {
            email: email.into(),
            role,
            started_at,
        }
    }

    /// Checks the capability, returning `Forbidden` when the role lacks it.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::Utc;
    /// use clinic_core::session::{Capability, Role, Session};
    ///
    /// let staff = Session::new("desk@clinic.ph", Role::Staff, Utc::now());
    /// assert!(staff.authorize(Capability::Checkout).is_ok());
    /// assert!(staff.authorize(Capability::DeleteRecords).is_err());
    /// ```
    pub fn authorize(&self, capability: Capability) -> CoreResult<()> {
        if self.role.can(capability) {
            Ok(())
        } else {
            Err(CoreError::Forbidden {
                role: self.role,
                capability,
            })
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// =============================================================================
// Authenticator
// =============================================================================

/// Pluggable credential check.
///
/// Implementations decide where accounts live (config file, directory
/// service, test fixture). A successful call yields a fresh [`Session`].
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, email: &str, password: &str) -> CoreResult<Session>;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct SingleAccount;

    impl Authenticator for SingleAccount {
        fn authenticate(&self, email: &str, password: &str) -> CoreResult<Session> {
            if email == "admin@clinic.ph" && password == "letmein" {
                Ok(Session::new(email, Role::Admin, Utc::now()))
            } else {
                Err(CoreError::InvalidCredentials)
            }
        }
    }

    #[test]
    fn test_only_admin_deletes() {
        assert!(Role::Admin.can(Capability::DeleteRecords));
        assert!(!Role::Staff.can(Capability::DeleteRecords));
        assert!(Role::Staff.can(Capability::Checkout));
        assert!(Role::Staff.can(Capability::RecordExpense));
    }

    #[test]
    fn test_authorize_reports_role_and_capability() {
        let session = Session::new("desk@clinic.ph", Role::Staff, Utc::now());
        match session.authorize(Capability::DeleteRecords) {
            Err(CoreError::Forbidden { role, capability }) => {
                assert_eq!(role, Role::Staff);
                assert_eq!(capability, Capability::DeleteRecords);
            }
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }

    #[test]
    fn test_authenticator_trait_object() {
        let auth: Box<dyn Authenticator> = Box::new(SingleAccount);
        assert!(auth.authenticate("admin@clinic.ph", "letmein").unwrap().is_admin());
        assert!(matches!(
            auth.authenticate("admin@clinic.ph", "wrong"),
            Err(CoreError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("staff".parse::<Role>().unwrap(), Role::Staff);
        assert!("owner".parse::<Role>().is_err());
    }
}
