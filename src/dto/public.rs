use serde::Serialize;

use crate::{
    dto::{format_signed_delta, format_timestamp},
    state::board::{BoardState, HistoryEntry, Team},
};

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
/// Public projection of a team and its current score.
pub struct TeamScore {
    pub name: String,
    pub color: String,
    pub score: i64,
}

/// Read-only snapshot rendered by both the visitor and the admin views.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ScoreboardView {
    /// Teams in configuration order.
    pub teams: Vec<TeamScore>,
    /// Names of the teams sharing the highest score; empty while nobody has scored.
    pub leaders: Vec<String>,
    /// RFC 3339 timestamp of the last committed change.
    pub last_update: Option<String>,
    pub history_len: usize,
}

impl ScoreboardView {
    pub fn build(teams: &[Team], board: &BoardState) -> Self {
        let teams = team_scores(teams, board);
        let top = teams.iter().map(|team| team.score).max();
        let leaders = match top {
            Some(top) if teams.iter().any(|team| team.score != 0) => teams
                .iter()
                .filter(|team| team.score == top)
                .map(|team| team.name.clone())
                .collect(),
            _ => Vec::new(),
        };

        Self {
            teams,
            leaders,
            last_update: board.last_update.map(format_timestamp),
            history_len: board.history.len(),
        }
    }
}

/// Team position in the ranking. Tied teams share a rank.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TeamStanding {
    pub rank: usize,
    #[serde(flatten)]
    pub team: TeamScore,
}

/// Rank teams by descending score; ties keep configuration order.
pub fn standings(teams: &[Team], board: &BoardState) -> Vec<TeamStanding> {
    let mut scores = team_scores(teams, board);
    // Stable sort keeps configuration order among equal scores.
    scores.sort_by(|a, b| b.score.cmp(&a.score));

    let mut standings: Vec<TeamStanding> = Vec::with_capacity(scores.len());
    for (index, team) in scores.into_iter().enumerate() {
        let rank = match standings.last() {
            Some(previous) if previous.team.score == team.score => previous.rank,
            _ => index + 1,
        };
        standings.push(TeamStanding { rank, team });
    }
    standings
}

fn team_scores(teams: &[Team], board: &BoardState) -> Vec<TeamScore> {
    teams
        .iter()
        .map(|team| TeamScore {
            name: team.name.clone(),
            color: team.color.clone(),
            score: board.ledger.score(&team.name).unwrap_or(0),
        })
        .collect()
}

/// One history entry as shown on screen.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HistoryItem {
    pub timestamp: String,
    pub actor: String,
    pub team: String,
    pub delta: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&HistoryEntry> for HistoryItem {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            timestamp: format_timestamp(entry.timestamp),
            actor: entry.actor.clone(),
            team: entry.team.clone(),
            delta: format_signed_delta(entry.delta),
            note: entry.note.clone(),
        }
    }
}

/// History log, most recent entry first.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HistoryView {
    pub entries: Vec<HistoryItem>,
    /// Number of entries in the full log, regardless of any limit.
    pub total: usize,
}

impl HistoryView {
    pub fn build(board: &BoardState, limit: Option<usize>) -> Self {
        let limit = limit.unwrap_or(usize::MAX);
        Self {
            entries: board
                .history
                .iter()
                .rev()
                .take(limit)
                .map(HistoryItem::from)
                .collect(),
            total: board.history.len(),
        }
    }
}
