//! # Credential Table
//!
//! The shipped [`Authenticator`]: accounts from `[[accounts]]` in the config
//! file, each with an argon2 PHC hash.
//!
//! ```text
//! login(email, password)
//!     │
//!     ▼
//! CredentialTable::authenticate
//!     │  email match is case-insensitive
//!     │  argon2 verify against the stored PHC string
//!     ▼
//! Session { email, role, started_at }  ──►  SessionState
//! ```
//!
//! Other implementations (a directory service, a test fixture) plug in
//! through the same trait.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use tracing::{debug, warn};

use clinic_core::{Authenticator, CoreError, CoreResult, Session};

use crate::state::AccountConfig;

/// Accounts loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct CredentialTable {
    accounts: Vec<AccountConfig>,
}

impl CredentialTable {
    pub fn new(accounts: Vec<AccountConfig>) -> Self {
        CredentialTable { accounts }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn find(&self, email: &str) -> Option<&AccountConfig> {
        let email = email.trim();
        self.accounts
            .iter()
            .find(|a| a.email.trim().eq_ignore_ascii_case(email))
    }
}

impl Authenticator for CredentialTable {
    fn authenticate(&self, email: &str, password: &str) -> CoreResult<Session> {
        let Some(account) = self.find(email) else {
            debug!(email = %email, "Login for unknown account");
            return Err(CoreError::InvalidCredentials);
        };

        let parsed = PasswordHash::new(&account.password_hash).map_err(|e| {
            warn!(email = %account.email, "Stored password hash is unreadable: {}", e);
            CoreError::InvalidCredentials
        })?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| CoreError::InvalidCredentials)?;

        Ok(Session::new(account.email.trim(), account.role, Utc::now()))
    }
}

/// Hashes a password for the `[[accounts]]` table.
///
/// Uses Argon2id with default parameters and a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_core::Role;

    fn table() -> CredentialTable {
        CredentialTable::new(vec![
            AccountConfig {
                email: "admin@clinic.ph".into(),
                password_hash: hash_password("admin-pass").unwrap(),
                role: Role::Admin,
            },
            AccountConfig {
                email: "desk@clinic.ph".into(),
                password_hash: hash_password("desk-pass").unwrap(),
                role: Role::Staff,
            },
        ])
    }

    #[test]
    fn test_authenticate_roles() {
        let table = table();

        let admin = table.authenticate("admin@clinic.ph", "admin-pass").unwrap();
        assert_eq!(admin.role, Role::Admin);

        let staff = table.authenticate(" Desk@Clinic.ph ", "desk-pass").unwrap();
        assert_eq!(staff.role, Role::Staff);
        assert_eq!(staff.email, "desk@clinic.ph");
    }

    #[test]
    fn test_wrong_password_and_unknown_email() {
        let table = table();
        assert!(matches!(
            table.authenticate("admin@clinic.ph", "desk-pass"),
            Err(CoreError::InvalidCredentials)
        ));
        assert!(matches!(
            table.authenticate("nobody@clinic.ph", "admin-pass"),
            Err(CoreError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
    }

    #[test]
    fn test_empty_table_rejects_everyone() {
        let table = CredentialTable::default();
        assert!(table.is_empty());
        assert!(table.authenticate("admin@clinic.ph", "").is_err());
    }
}
