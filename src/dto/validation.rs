//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest note accepted from the admin form, in characters.
pub const MAX_NOTE_CHARS: usize = 280;

/// Validates that a team selection is present.
pub fn validate_team_selection(team: &str) -> Result<(), ValidationError> {
    if team.trim().is_empty() {
        let mut err = ValidationError::new("team_empty");
        err.message = Some("A team must be selected".into());
        return Err(err);
    }
    Ok(())
}

/// Validates that a score delta actually changes the score.
///
/// The board itself accepts a zero delta; the admin form is expected to prevent it.
pub fn validate_delta(delta: i64) -> Result<(), ValidationError> {
    if delta == 0 {
        let mut err = ValidationError::new("delta_zero");
        err.message = Some("Delta must not be zero".into());
        return Err(err);
    }
    Ok(())
}

/// Validates the optional note length.
pub fn validate_note(note: &str) -> Result<(), ValidationError> {
    let length = note.chars().count();
    if length > MAX_NOTE_CHARS {
        let mut err = ValidationError::new("note_length");
        err.message = Some(
            format!("Note must be at most {MAX_NOTE_CHARS} characters (got {length})").into(),
        );
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_team_selection() {
        assert!(validate_team_selection("BLUE").is_ok());
        assert!(validate_team_selection("").is_err());
        assert!(validate_team_selection("   ").is_err());
    }

    #[test]
    fn test_validate_delta() {
        assert!(validate_delta(5).is_ok());
        assert!(validate_delta(-3).is_ok());
        assert!(validate_delta(0).is_err());
    }

    #[test]
    fn test_validate_note_length() {
        assert!(validate_note("").is_ok());
        assert!(validate_note(&"é".repeat(MAX_NOTE_CHARS)).is_ok()); // counts chars, not bytes
        assert!(validate_note(&"x".repeat(MAX_NOTE_CHARS + 1)).is_err());
    }
}
