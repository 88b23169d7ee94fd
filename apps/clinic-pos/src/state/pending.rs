//! # Pending Operations
//!
//! Guards against duplicate submissions: a second checkout (or a second
//! delete of the same record) while the first is still running is refused
//! with `BUSY` instead of running twice.
//!
//! ```text
//!  checkout ──► try_begin("checkout") ──► Ok(guard) ──► commit ... ──► drop(guard)
//!  checkout ──► try_begin("checkout") ──► Err(BUSY)        (while the first runs)
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::error::ApiError;

/// Key for the single checkout slot.
pub const CHECKOUT_KEY: &str = "checkout";

/// Key for deleting one record.
pub fn delete_key(id: &str) -> String {
    format!("delete:{}", id)
}

#[derive(Debug, Clone, Default)]
pub struct PendingOps {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl PendingOps {
    pub fn new() -> Self {
        PendingOps::default()
    }

    /// Marks `key` as in flight. The returned guard clears it on drop.
    pub fn try_begin(&self, key: impl Into<String>) -> Result<PendingGuard, ApiError> {
        let key = key.into();
        let mut set = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);

        if !set.insert(key.clone()) {
            debug!(key = %key, "Refusing duplicate submission");
            return Err(ApiError::busy(&key));
        }

        Ok(PendingGuard {
            key,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

/// Releases its key when dropped, including on early `?` returns.
#[derive(Debug)]
pub struct PendingGuard {
    key: String,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl PendingGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_second_begin_is_busy() {
        let ops = PendingOps::new();
        let _guard = ops.try_begin(CHECKOUT_KEY).unwrap();

        let err = ops.try_begin(CHECKOUT_KEY).unwrap_err();
        assert_eq!(err.code, ErrorCode::Busy);
    }

    #[test]
    fn test_drop_releases() {
        let ops = PendingOps::new();
        {
            let guard = ops.try_begin(delete_key("abc")).unwrap();
            assert_eq!(guard.key(), "delete:abc");
            assert!(ops.is_pending("delete:abc"));
        }
        assert!(!ops.is_pending("delete:abc"));
        assert!(ops.try_begin(delete_key("abc")).is_ok());
    }

    #[test]
    fn test_keys_are_independent() {
        let ops = PendingOps::new();
        let _a = ops.try_begin(delete_key("a")).unwrap();
        assert!(ops.try_begin(delete_key("b")).is_ok());
        assert!(ops.try_begin(CHECKOUT_KEY).is_ok());
    }
}
