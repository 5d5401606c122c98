use serde::{Deserialize, Serialize};

use crate::{
    dto::{
        admin::{PendingChangeSummary, ResetRequest, StageRequest},
        public::{HistoryView, ScoreboardView, TeamStanding},
    },
    error::ServiceError,
    state::SessionIdentity,
};

#[derive(Debug, Deserialize, PartialEq, Eq)]
/// Commands accepted on the console input, one JSON object per line.
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsoleCommand {
    /// Authenticate against the admin table.
    Login {
        /// Admin identity.
        identity: String,
        /// Shared secret, compared verbatim.
        secret: String,
    },
    /// Enter read-only visitor mode.
    Visitor,
    /// Drop identity and pending change, starting a fresh session.
    Logout,
    /// Report the current session identity.
    Whoami,
    /// Stage a score change for confirmation.
    Stage(StageRequest),
    /// Commit the staged change.
    Confirm,
    /// Discard the staged change.
    Cancel,
    /// Zero every score and clear the history log.
    Reset(ResetRequest),
    /// Current scores and leaders.
    Scoreboard,
    /// Teams ranked by score.
    Standings,
    /// History log, most recent first.
    History {
        /// Maximum number of entries to return.
        #[serde(default)]
        limit: Option<usize>,
    },
    /// Write the history log to the CSV export file.
    Export,
    /// Any unrecognized `type`.
    #[serde(other)]
    Unknown,
}

/// Serializable view of the session identity.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SessionSummary {
    /// Not logged in.
    None,
    /// Read-only visitor.
    Visitor,
    /// Authenticated admin.
    Admin {
        /// Admin identity.
        identity: String,
    },
}

impl From<&SessionIdentity> for SessionSummary {
    fn from(identity: &SessionIdentity) -> Self {
        match identity {
            SessionIdentity::None => Self::None,
            SessionIdentity::Visitor => Self::Visitor,
            SessionIdentity::Admin(identity) => Self::Admin {
                identity: identity.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Severity of a [`Notice`].
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// User-visible, non-fatal message.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    /// Human-readable text shown to the operator.
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl From<ServiceError> for Notice {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(_) | ServiceError::Encoding(_) => {
                Notice::error(err.to_string())
            }
            ServiceError::Unauthorized(_)
            | ServiceError::InvalidInput(_)
            | ServiceError::EmptyExport => Notice::warning(err.to_string()),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
/// Replies written to the console output, one JSON object per line.
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsoleReply {
    /// Identity after `login`, `visitor`, `logout` or `whoami`.
    Session(SessionSummary),
    /// Change waiting for `confirm` or `cancel`.
    Staged {
        /// The staged change.
        pending: PendingChangeSummary,
    },
    /// Scoreboard snapshot, also sent after every committed mutation.
    Scoreboard(ScoreboardView),
    /// Ranked teams.
    Standings {
        /// One entry per configured team.
        standings: Vec<TeamStanding>,
    },
    /// History log page.
    History(HistoryView),
    /// Export file written.
    Exported {
        /// Location of the CSV file.
        path: String,
        /// Number of data rows, header excluded.
        rows: usize,
    },
    /// Informational, warning or error message.
    Notice(Notice),
}

impl From<Notice> for ConsoleReply {
    fn from(notice: Notice) -> Self {
        ConsoleReply::Notice(notice)
    }
}

impl From<ServiceError> for ConsoleReply {
    fn from(err: ServiceError) -> Self {
        ConsoleReply::Notice(err.into())
    }
}
