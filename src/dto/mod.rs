use time::{
    OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

/// Admin requests and the pending change summary.
pub mod admin;
/// Console commands and replies.
pub mod console;
/// History export rows.
pub mod export;
/// Read-only scoreboard views.
pub mod public;
/// Field validators shared by the requests.
pub mod validation;

fn format_timestamp(time: OffsetDateTime) -> String {
    time.format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

/// Human-readable layout used in history exports, always in UTC.
fn format_export_time(time: OffsetDateTime) -> String {
    time.to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

/// Render a delta with an explicit `+` for positive values.
fn format_signed_delta(delta: i64) -> String {
    if delta > 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn signed_delta_formatting() {
        assert_eq!(format_signed_delta(5), "+5");
        assert_eq!(format_signed_delta(-3), "-3");
        assert_eq!(format_signed_delta(0), "0");
    }

    #[test]
    fn export_time_is_rendered_in_utc() {
        let time = datetime!(2026-10-17 19:05:09 +07:00);
        assert_eq!(format_export_time(time), "2026-10-17 12:05:09");
    }

    #[test]
    fn timestamps_use_rfc3339() {
        let time = datetime!(2026-10-17 12:00:00 UTC);
        assert_eq!(format_timestamp(time), "2026-10-17T12:00:00Z");
    }
}
