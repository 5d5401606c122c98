//! Tabular projection of the history log for external consumers.

use crate::{
    dto::export::ExportRow,
    error::ServiceError,
    services::score_service,
    state::{SharedState, board::HistoryEntry},
};

/// One row per history entry, in log order. An empty log is reported as
/// [`ServiceError::EmptyExport`] instead of producing an empty table.
pub fn project(history: &[HistoryEntry]) -> Result<Vec<ExportRow>, ServiceError> {
    if history.is_empty() {
        return Err(ServiceError::EmptyExport);
    }
    Ok(history.iter().map(ExportRow::from).collect())
}

/// Project the currently persisted history log.
pub async fn export_history(state: &SharedState) -> Result<Vec<ExportRow>, ServiceError> {
    let board = score_service::load_board(state).await?;
    project(&board.history)
}
