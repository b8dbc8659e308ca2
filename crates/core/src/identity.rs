//! Identity context resolution
//!
//! Resolves the acting identity for one operation from a session id, and
//! carries the session-ending glue the boundary layer needs. Session
//! issuance (login, password verification) lives outside this crate; this
//! is only the bridge between a presented session and the canonical
//! `ActorId` the permission checks compare against.

use uuid::Uuid;

use crate::error::Result;
use crate::models::ActorId;
use crate::storage::UserRepository;

/// The acting identity for a single operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityContext {
    actor: Option<ActorId>,
}

impl IdentityContext {
    pub fn anonymous() -> Self {
        Self { actor: None }
    }

    pub fn authenticated(actor: ActorId) -> Self {
        Self { actor: Some(actor) }
    }

    /// Resolve a presented session id against the user store.
    ///
    /// The session must be unexpired and its account must still exist;
    /// anything else resolves to the anonymous context rather than an
    /// error. The ownership guard turns anonymity into Forbidden when a
    /// mutation is attempted.
    pub fn resolve<S: UserRepository>(store: &S, session_id: Uuid) -> Result<Self> {
        let session = match store.find_valid_session(session_id)? {
            Some(session) => session,
            None => return Ok(Self::anonymous()),
        };

        Ok(match store.find_user_by_id(session.user_id)? {
            Some(user) => Self::authenticated(user.id),
            None => Self::anonymous(),
        })
    }

    pub fn actor(&self) -> Option<ActorId> {
        self.actor
    }

    pub fn is_authenticated(&self) -> bool {
        self.actor.is_some()
    }
}

/// End a session (logout). Ending an unknown session is a no-op.
pub fn end_session<S: UserRepository>(store: &S, session_id: Uuid) -> Result<()> {
    store.delete_session(session_id)
}

/// Drop every expired session from the store.
///
/// Housekeeping for hosts to run periodically; returns how many sessions
/// were removed.
pub fn sweep_expired_sessions<S: UserRepository>(store: &S) -> Result<u64> {
    store.cleanup_expired_sessions()
}
