//! Score mutations: every committed change updates the ledger, lands in the history log
//! and is persisted before the caller sees the new board.

use tracing::{info, warn};

use crate::{
    error::ServiceError,
    state::{
        SharedState,
        board::{BoardState, ChangeOutcome, ScoreChange},
    },
};

/// Current board as persisted.
pub async fn load_board(state: &SharedState) -> Result<BoardState, ServiceError> {
    state.read_board().await
}

/// Add `delta` to `team` on behalf of `actor` and record it in the history log.
///
/// An unknown team is ignored: the board is returned unchanged and nothing is saved.
/// A change that would overflow the score is rejected and nothing is saved either.
pub async fn apply_change(
    state: &SharedState,
    team: &str,
    delta: i64,
    actor: &str,
    note: Option<String>,
) -> Result<BoardState, ServiceError> {
    let at = state.clock().now();
    let change = ScoreChange::new(team, delta, note);

    let (board, outcome) = state
        .with_board_mut(|board| {
            let outcome = board.apply_change(change, actor, at);
            (matches!(outcome, ChangeOutcome::Applied(_)), outcome)
        })
        .await?;

    match outcome {
        ChangeOutcome::Applied(entry) => {
            info!(
                team = %entry.team,
                delta = entry.delta,
                actor = %entry.actor,
                score = ?board.ledger.score(&entry.team),
                "score change committed"
            );
        }
        ChangeOutcome::UnknownTeam => {
            warn!(team, delta, actor, "ignoring score change for unknown team");
        }
        ChangeOutcome::OutOfRange => {
            warn!(team, delta, actor, "rejecting score change that overflows the score");
            return Err(ServiceError::InvalidInput(format!(
                "score of team `{team}` would overflow"
            )));
        }
    }

    Ok(board)
}

/// Zero every score and clear the history log. There is no undo.
pub async fn reset_all(state: &SharedState) -> Result<BoardState, ServiceError> {
    let (board, cleared) = state
        .with_board_mut(|board| {
            let cleared = board.history.len();
            board.reset_all();
            (true, cleared)
        })
        .await?;

    warn!(cleared_entries = cleared, "scoreboard reset");
    Ok(board)
}
