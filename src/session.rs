use std::sync::{Arc, RwLock};

use crate::model::session::{Role, Session};

/// Where the session lifecycle currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// The startup check has not resolved yet; render a loading indicator
    /// and nothing else.
    Unknown,
    /// The server has told us who we are (possibly: nobody).
    Resolved(Session),
}

/// Process-wide session state. Resolved exactly once at startup by the
/// role router, re-resolved by the login flow, and invalidated on logout.
/// One writer, many cheap readers.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<RwLock<SessionPhase>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionPhase::Unknown)),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.read().expect("session lock poisoned").clone()
    }

    /// The resolved session, if the startup check has completed.
    pub fn snapshot(&self) -> Option<Session> {
        match self.phase() {
            SessionPhase::Unknown => None,
            SessionPhase::Resolved(session) => Some(session),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot()
            .map(|session| session.is_authenticated)
            .unwrap_or(false)
    }

    pub fn is_admin(&self) -> bool {
        self.snapshot()
            .map(|session| session.is_admin())
            .unwrap_or(false)
    }

    pub fn role(&self) -> Option<Role> {
        self.snapshot().and_then(|session| session.role)
    }

    /// Record what the server said. Writer side: the role router and the
    /// login flow only.
    pub fn resolve(&self, session: Session) {
        *self.inner.write().expect("session lock poisoned") = SessionPhase::Resolved(session);
    }

    /// Drop the local identity after a logout.
    pub fn invalidate(&self) {
        self.resolve(Session::anonymous());
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}
