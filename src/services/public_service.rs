//! Service helpers that expose read-only projections of the board.

use crate::{
    dto::public::{HistoryView, ScoreboardView, TeamStanding, standings as rank_teams},
    error::ServiceError,
    services::score_service,
    state::SharedState,
};

/// Current scores per team, leaders and last update.
pub async fn get_scoreboard(state: &SharedState) -> Result<ScoreboardView, ServiceError> {
    let board = score_service::load_board(state).await?;
    Ok(ScoreboardView::build(state.config().teams(), &board))
}

/// Teams ranked by score.
pub async fn get_standings(state: &SharedState) -> Result<Vec<TeamStanding>, ServiceError> {
    let board = score_service::load_board(state).await?;
    Ok(rank_teams(state.config().teams(), &board))
}

/// History log, most recent first, optionally truncated to `limit` entries.
pub async fn get_history(
    state: &SharedState,
    limit: Option<usize>,
) -> Result<HistoryView, ServiceError> {
    let board = score_service::load_board(state).await?;
    Ok(HistoryView::build(&board, limit))
}
