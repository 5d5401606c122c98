//! DTO definitions used by the admin side of the console.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::{
    dto::validation::{validate_delta, validate_note, validate_team_selection},
    state::PendingChange,
};

/// Request to stage a score change awaiting confirmation.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StageRequest {
    pub team: String,
    pub delta: i64,
    #[serde(default)]
    pub note: Option<String>,
}

impl Validate for StageRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_team_selection(&self.team) {
            errors.add("team", e);
        }

        if let Err(e) = validate_delta(self.delta) {
            errors.add("delta", e);
        }

        if let Some(ref note) = self.note {
            if let Err(e) = validate_note(note) {
                errors.add("note", e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Pending change as displayed in the confirmation prompt.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PendingChangeSummary {
    pub team: String,
    pub delta: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&PendingChange> for PendingChangeSummary {
    fn from(change: &PendingChange) -> Self {
        Self {
            team: change.team.clone(),
            delta: change.delta,
            note: change.note.clone(),
        }
    }
}

/// Request to wipe every score and the whole history log.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ResetRequest {
    /// Must be `true`; a reset cannot be undone.
    #[serde(default)]
    pub confirm: bool,
}
