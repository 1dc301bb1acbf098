//! Authenticated portal session, injected into every operation.
//!
//! The engine never owns authentication: the host application obtains a
//! bearer token (login is outside this crate) and hands the engine a
//! `Session`. Teardown is an explicit, observable call — when the portal
//! answers 401 the engine marks the session terminated and the host
//! reacts (clears storage, returns to login), rather than the engine
//! performing hidden side effects.

use std::sync::atomic::{AtomicBool, Ordering};

/// An authenticated session against the portal backend.
///
/// Shared by reference (typically behind `Arc`) between the request
/// manager and the dose tracker so a 401 seen by either invalidates both.
#[derive(Debug)]
pub struct Session {
    token: String,
    terminated: AtomicBool,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            terminated: AtomicBool::new(false),
        }
    }

    /// Bearer token for the `Authorization` header.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Mark this session invalid. Idempotent.
    pub fn terminate(&self) {
        if !self.terminated.swap(true, Ordering::SeqCst) {
            tracing::warn!("portal session terminated");
        }
    }

    /// Whether `terminate` has been called (locally or after a 401).
    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    /// Terminate when a portal call came back 401. Any other error —
    /// including 403 — leaves the session valid.
    pub fn expire_from(&self, err: &crate::error::PortalError) {
        if matches!(err, crate::error::PortalError::SessionExpired) {
            self.terminate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_valid() {
        let session = Session::new("tok");
        assert_eq!(session.token(), "tok");
        assert!(!session.is_terminated());
    }

    #[test]
    fn terminate_is_sticky_and_idempotent() {
        let session = Session::new("tok");
        session.terminate();
        session.terminate();
        assert!(session.is_terminated());
    }

    #[test]
    fn only_expiry_terminates() {
        let session = Session::new("tok");
        session.expire_from(&crate::error::PortalError::Forbidden("no".into()));
        assert!(!session.is_terminated());
        session.expire_from(&crate::error::PortalError::SessionExpired);
        assert!(session.is_terminated());
    }
}
