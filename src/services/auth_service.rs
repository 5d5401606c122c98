//! Session gate: credential check against the configured admin table, visitor mode and
//! logout.

use tracing::{info, warn};

use crate::{
    error::ServiceError,
    state::{SessionContext, SessionIdentity, SharedState},
};

/// Log the session in as `identity` when `secret` matches the admin table exactly.
///
/// On failure the session is left as it was.
pub fn authenticate(
    state: &SharedState,
    session: &mut SessionContext,
    identity: &str,
    secret: &str,
) -> Result<SessionIdentity, ServiceError> {
    let config = state.config();
    let known = config
        .admins()
        .iter()
        .any(|admin| admin.identity == identity && admin.secret == secret);

    if !known {
        warn!(session_id = %session.id(), identity, "admin authentication failed");
        return Err(ServiceError::Unauthorized("invalid credentials".into()));
    }

    session.set_identity(SessionIdentity::Admin(identity.to_string()));
    info!(session_id = %session.id(), identity, "admin authenticated");
    Ok(session.identity().clone())
}

/// Switch the session to read-only visitor mode, without credentials.
pub fn enter_visitor_mode(session: &mut SessionContext) -> SessionIdentity {
    session.set_identity(SessionIdentity::Visitor);
    info!(session_id = %session.id(), "visitor mode entered");
    session.identity().clone()
}

/// End the session; the caller continues with a brand-new, unauthenticated context.
pub fn logout(session: &mut SessionContext) {
    let previous = std::mem::take(session);
    info!(
        session_id = %previous.id(),
        next_session_id = %session.id(),
        "session closed"
    );
}

/// Identity of the logged-in admin, or an error for visitors and anonymous sessions.
pub fn require_admin(session: &SessionContext) -> Result<&str, ServiceError> {
    session
        .identity()
        .admin()
        .ok_or_else(|| ServiceError::Unauthorized("admin login required".into()))
}

/// Succeeds for visitors and admins alike.
pub fn require_viewer(session: &SessionContext) -> Result<(), ServiceError> {
    if session.identity().can_view() {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized(
            "log in or enter visitor mode first".into(),
        ))
    }
}
