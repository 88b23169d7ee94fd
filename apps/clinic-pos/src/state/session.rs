//! # Session State
//!
//! The logged-in operator, with an explicit lifecycle:
//!
//! ```text
//!   (none) ──login(ok)──► Some(Session) ──logout──► (none)
//!     │                        │
//!     │ require()              │ authorize(capability)
//!     ▼                        ▼
//!  UNAUTHENTICATED        Ok(session) | FORBIDDEN
//! ```
//!
//! Commands receive this state explicitly; nothing reads the session from a
//! global.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use clinic_core::{Authenticator, Capability, CoreError, Session};

use crate::error::ApiError;

#[derive(Clone)]
pub struct SessionState {
    current: Arc<RwLock<Option<Session>>>,
    authenticator: Arc<dyn Authenticator>,
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}

impl SessionState {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        SessionState {
            current: Arc::new(RwLock::new(None)),
            authenticator,
        }
    }

    /// Verifies the credentials and starts a session, replacing any
    /// previous one. On failure the previous session is left as it was.
    pub fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let session = self.authenticator.authenticate(email, password)?;

        info!(email = %session.email, role = %session.role, "Logged in");
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(session)
    }

    /// Ends the session. Returns the session that was active, if any.
    pub fn logout(&self) -> Option<Session> {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(ref s) = previous {
            info!(email = %s.email, "Logged out");
        }
        previous
    }

    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The active session, or `UNAUTHENTICATED`.
    pub fn require(&self) -> Result<Session, ApiError> {
        self.current()
            .ok_or_else(|| ApiError::from(CoreError::Unauthenticated))
    }

    /// The active session if its role holds `capability`.
    pub fn authorize(&self, capability: Capability) -> Result<Session, ApiError> {
        let session = self.require()?;
        session.authorize(capability)?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::Utc;
    use clinic_core::{CoreResult, Role};

    /// Accepts any password equal to the email's local part.
    struct EchoAuth;

    impl Authenticator for EchoAuth {
        fn authenticate(&self, email: &str, password: &str) -> CoreResult<Session> {
            let local = email.split('@').next().unwrap_or_default();
            if local != password {
                return Err(CoreError::InvalidCredentials);
            }
            let role = if local == "admin" { Role::Admin } else { Role::Staff };
            Ok(Session::new(email, role, Utc::now()))
        }
    }

    fn state() -> SessionState {
        SessionState::new(Arc::new(EchoAuth))
    }

    #[test]
    fn test_require_without_login() {
        let err = state().require().unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }

    #[test]
    fn test_login_logout_lifecycle() {
        let s = state();
        s.login("admin@clinic.ph", "admin").unwrap();
        assert!(s.authorize(Capability::DeleteRecords).is_ok());

        let ended = s.logout().unwrap();
        assert_eq!(ended.email, "admin@clinic.ph");
        assert!(s.current().is_none());
        assert!(s.logout().is_none());
    }

    #[test]
    fn test_staff_forbidden_from_delete() {
        let s = state();
        s.login("desk@clinic.ph", "desk").unwrap();

        assert!(s.authorize(Capability::Checkout).is_ok());
        let err = s.authorize(Capability::DeleteRecords).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[test]
    fn test_failed_login_keeps_previous_session() {
        let s = state();
        s.login("admin@clinic.ph", "admin").unwrap();

        let err = s.login("desk@clinic.ph", "wrong").unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
        assert_eq!(s.current().unwrap().role, Role::Admin);
    }
}
