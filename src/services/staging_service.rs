//! Two-step score changes: a change is staged first and only reaches the board once it
//! is explicitly confirmed.

use tracing::{debug, info};

use crate::{
    error::ServiceError,
    services::score_service,
    state::{PendingChange, SessionContext, SharedState, board::BoardState},
};

/// Stage a change, silently replacing any change that was never confirmed.
pub fn stage(
    session: &mut SessionContext,
    team: &str,
    delta: i64,
    note: Option<String>,
) -> PendingChange {
    let change = PendingChange::new(team, delta, note);
    if let Some(discarded) = session.replace_pending(change.clone()) {
        debug!(
            session_id = %session.id(),
            team = %discarded.team,
            delta = discarded.delta,
            "replacing unconfirmed change"
        );
    }
    change
}

/// Commit the pending change on behalf of `actor`.
///
/// Returns `Ok(None)` when nothing is pending. The pending slot is cleared before the
/// change is applied, so it is gone even if applying it fails.
pub async fn confirm(
    state: &SharedState,
    session: &mut SessionContext,
    actor: &str,
) -> Result<Option<BoardState>, ServiceError> {
    let Some(change) = session.take_pending() else {
        debug!(session_id = %session.id(), "confirm requested without a pending change");
        return Ok(None);
    };

    let board =
        score_service::apply_change(state, &change.team, change.delta, actor, change.note).await?;
    Ok(Some(board))
}

/// Drop the pending change without applying it, returning it for display.
pub fn cancel(session: &mut SessionContext) -> Option<PendingChange> {
    let cancelled = session.take_pending();
    if let Some(change) = &cancelled {
        info!(
            session_id = %session.id(),
            team = %change.team,
            delta = change.delta,
            "pending change cancelled"
        );
    }
    cancelled
}
