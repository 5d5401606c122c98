use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::state::board::{BoardState, HistoryEntry};

/// Schema version written alongside the persisted board.
pub const BOARD_SCHEMA_VERSION: u32 = 1;

/// Persisted representation of the whole board, stored as a single JSON document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardStateEntity {
    /// Schema version; documents with any other value are discarded on load.
    pub version: u32,
    /// Score per team, in configuration order.
    pub scores: IndexMap<String, i64>,
    /// Audit log in chronological order.
    pub history: Vec<HistoryEntryEntity>,
    /// Timestamp of the most recent history entry.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_update: Option<OffsetDateTime>,
}

/// Persisted audit record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntryEntity {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub actor: String,
    pub team: String,
    pub delta: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<HistoryEntryEntity> for HistoryEntry {
    fn from(value: HistoryEntryEntity) -> Self {
        Self {
            timestamp: value.timestamp,
            actor: value.actor,
            team: value.team,
            delta: value.delta,
            note: value.note,
        }
    }
}

impl From<HistoryEntry> for HistoryEntryEntity {
    fn from(value: HistoryEntry) -> Self {
        Self {
            timestamp: value.timestamp,
            actor: value.actor,
            team: value.team,
            delta: value.delta,
            note: value.note,
        }
    }
}

impl From<BoardStateEntity> for BoardState {
    fn from(value: BoardStateEntity) -> Self {
        Self {
            ledger: value.scores.into(),
            history: value.history.into_iter().map(Into::into).collect(),
            last_update: value.last_update,
        }
    }
}

impl From<BoardState> for BoardStateEntity {
    fn from(value: BoardState) -> Self {
        Self {
            version: BOARD_SCHEMA_VERSION,
            scores: value.ledger.into(),
            history: value.history.into_iter().map(Into::into).collect(),
            last_update: value.last_update,
        }
    }
}
