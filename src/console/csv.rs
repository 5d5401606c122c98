//! CSV serializer for history exports.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::dto::export::{EXPORT_HEADER, ExportRow, HISTORY_EXPORT_FILENAME};

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Quote a single field when it contains the delimiter, a quote or a line break.
pub fn quote_field(value: &str) -> String {
    let needs_quoting = value.contains(DELIMITER)
        || value.contains(QUOTE)
        || value.contains('\n')
        || value.contains('\r');

    if needs_quoting {
        let escaped = value.replace(QUOTE, "\"\"");
        format!("{QUOTE}{escaped}{QUOTE}")
    } else {
        value.to_string()
    }
}

fn render_line<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    let mut line = fields
        .into_iter()
        .map(quote_field)
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string());
    line.push_str("\r\n");
    line
}

/// Render the header and every row as CSV text.
pub fn render(rows: &[ExportRow]) -> String {
    let mut out = render_line(EXPORT_HEADER);
    for row in rows {
        out.push_str(&render_line(row.fields()));
    }
    out
}

/// Write `rows` to the history export file inside `dir`, replacing any previous export.
pub async fn write_export(dir: &Path, rows: &[ExportRow]) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir).await?;
    let path = dir.join(HISTORY_EXPORT_FILENAME);
    fs::write(&path, render(rows)).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(note: &str) -> ExportRow {
        ExportRow {
            time: "2026-10-17 12:00:00".into(),
            team: "BLUE".into(),
            delta: "+10".into(),
            actor: "Pailin".into(),
            note: note.into(),
        }
    }

    #[test]
    fn plain_fields_are_left_alone() {
        assert_eq!(quote_field("kickoff"), "kickoff");
        assert_eq!(quote_field(""), "");
    }

    #[test]
    fn special_characters_force_quoting() {
        assert_eq!(quote_field("a,b"), "\"a,b\"");
        assert_eq!(quote_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn render_writes_header_then_rows() {
        let csv = render(&[row("kickoff"), row("late, but valid")]);
        assert_eq!(
            csv,
            "Time,Team,Delta,Admin,Note\r\n\
             2026-10-17 12:00:00,BLUE,+10,Pailin,kickoff\r\n\
             2026-10-17 12:00:00,BLUE,+10,Pailin,\"late, but valid\"\r\n"
        );
    }

    #[tokio::test]
    async fn write_export_uses_fixed_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_export(dir.path(), &[row("kickoff")]).await.unwrap();
        assert_eq!(path, dir.path().join("score_history.csv"));
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("Time,Team,Delta,Admin,Note\r\n"));
    }
}
