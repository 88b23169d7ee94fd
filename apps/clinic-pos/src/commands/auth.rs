//! # Auth Commands

use tracing::debug;

use clinic_core::validation::validate_email;
use clinic_core::Session;

use crate::error::ApiError;
use crate::state::{CartState, SessionState};

/// Starts a session for the operator.
pub fn login(session: &SessionState, email: &str, password: &str) -> Result<Session, ApiError> {
    let email = validate_email(email)?;
    debug!(email = %email, "login command");
    session.login(&email, password)
}

/// Ends the session and discards any unfinished cart.
pub fn logout(session: &SessionState, cart: &CartState) -> Option<Session> {
    cart.with_cart_mut(|c| c.clear());
    session.logout()
}

pub fn current_session(session: &SessionState) -> Option<Session> {
    session.current()
}
