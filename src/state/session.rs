//! Session-scoped context: who is at the keyboard and which change awaits confirmation.
//!
//! Nothing in here is persisted. A new [`SessionContext`] always starts unauthenticated.

use uuid::Uuid;

use crate::state::board::ScoreChange;

/// Identity attached to the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionIdentity {
    /// Unauthenticated and not viewing.
    #[default]
    None,
    /// Read-only visitor mode, entered without credentials.
    Visitor,
    /// Authenticated admin allowed to mutate the board.
    Admin(String),
}

impl SessionIdentity {
    /// Identifier of the authenticated admin, if any.
    pub fn admin(&self) -> Option<&str> {
        match self {
            Self::Admin(identity) => Some(identity.as_str()),
            _ => None,
        }
    }

    /// Whether the session may read the board (visitor or admin).
    pub fn can_view(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Proposed score change waiting for an explicit confirm or cancel.
pub type PendingChange = ScoreChange;

/// Per-session state owned by the presentation layer for the session lifetime.
#[derive(Debug, Clone)]
pub struct SessionContext {
    id: Uuid,
    identity: SessionIdentity,
    pending: Option<PendingChange>,
}

impl SessionContext {
    /// Unauthenticated context with a fresh identifier.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            identity: SessionIdentity::None,
            pending: None,
        }
    }

    /// Identifier used to correlate log lines emitted during this session.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    /// Switch identity. Any pending change belonged to the previous identity and is dropped.
    pub fn set_identity(&mut self, identity: SessionIdentity) {
        self.identity = identity;
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&PendingChange> {
        self.pending.as_ref()
    }

    /// Replace the pending change, returning the one that was never confirmed.
    pub fn replace_pending(&mut self, change: PendingChange) -> Option<PendingChange> {
        self.pending.replace(change)
    }

    pub fn take_pending(&mut self) -> Option<PendingChange> {
        self.pending.take()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
