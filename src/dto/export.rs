use serde::Serialize;

use crate::{
    dto::{format_export_time, format_signed_delta},
    state::board::HistoryEntry,
};

/// Suggested file name for history exports.
pub const HISTORY_EXPORT_FILENAME: &str = "score_history.csv";

/// Column titles matching the field order of [`ExportRow::fields`].
pub const EXPORT_HEADER: [&str; 5] = ["Time", "Team", "Delta", "Admin", "Note"];

/// Flat, unescaped projection of one history entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExportRow {
    /// `YYYY-MM-DD HH:MM:SS`, UTC.
    pub time: String,
    pub team: String,
    /// Delta with an explicit `+` for positive values.
    pub delta: String,
    pub actor: String,
    /// Empty when the entry had no note.
    pub note: String,
}

impl ExportRow {
    /// Values in column order.
    pub fn fields(&self) -> [&str; 5] {
        [&self.time, &self.team, &self.delta, &self.actor, &self.note]
    }
}

impl From<&HistoryEntry> for ExportRow {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            time: format_export_time(entry.timestamp),
            team: entry.team.clone(),
            delta: format_signed_delta(entry.delta),
            actor: entry.actor.clone(),
            note: entry.note.clone().unwrap_or_default(),
        }
    }
}
