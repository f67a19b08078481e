//! Text codec for the on-disk note format.
//!
//! Each note is one `<id>.txt` file: three metadata header lines, one blank
//! line, then the raw content to end of file:
//!
//! ```text
//! # Title: 2026-01-25 07:52
//! # Created: 2026-01-25T07:52:34.000Z
//! # Updated: 2026-01-25T08:15:22.000Z
//!
//! [content...]
//! ```
//!
//! The format is not fully injective: content whose first line after the
//! blank separator itself matches `# Title: ...` would re-parse as a header
//! block. Known limitation, preserved as-is.

use chrono::{DateTime, SecondsFormat, Utc};
use std::path::Path;

use crate::models::{Note, NoteId};

const TITLE_PREFIX: &str = "# Title: ";
const CREATED_PREFIX: &str = "# Created: ";
const UPDATED_PREFIX: &str = "# Updated: ";

/// Headers must appear within this many leading lines.
const HEADER_SCAN_LINES: usize = 10;

/// Encode a note into its on-disk text representation.
#[must_use]
pub fn encode(note: &Note) -> String {
    format!(
        "{TITLE_PREFIX}{}\n{CREATED_PREFIX}{}\n{UPDATED_PREFIX}{}\n\n{}",
        note.title,
        format_timestamp(note.created_at),
        format_timestamp(note.updated_at),
        note.content
    )
}

/// Decode a note from its on-disk text representation.
///
/// The note ID is derived from `filename` with the extension stripped.
/// Headers are matched by prefix, order-tolerant, within the first
/// [`HEADER_SCAN_LINES`] lines. Returns `None` when any required header is
/// missing or malformed; callers log and skip such files. Decoded notes are
/// marked synced, since decoding only happens for data already committed to
/// a store.
#[must_use]
pub fn decode(filename: &str, text: &str) -> Option<Note> {
    let id = Path::new(filename).file_stem()?.to_str()?;
    if id.is_empty() {
        return None;
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let separator = lines.iter().position(|line| line.trim().is_empty());

    let mut title = None;
    let mut created = None;
    let mut updated = None;
    let header_end = separator.unwrap_or(lines.len()).min(HEADER_SCAN_LINES);
    for line in &lines[..header_end] {
        if let Some(value) = header_value(line, TITLE_PREFIX) {
            title = Some(value.to_string());
        } else if let Some(value) = header_value(line, CREATED_PREFIX) {
            created = Some(value);
        } else if let Some(value) = header_value(line, UPDATED_PREFIX) {
            updated = Some(value);
        }
    }

    let content = separator.map_or_else(String::new, |blank| lines[blank + 1..].join("\n"));

    Some(Note {
        id: NoteId::from(id),
        title: title?,
        content,
        created_at: parse_timestamp(created?)?,
        updated_at: parse_timestamp(updated?)?,
        is_synced: true,
        remote_file_id: None,
    })
}

fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

fn header_value<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    line.strip_prefix(prefix).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample_note() -> Note {
        Note {
            id: NoteId::from("2026-01-25_07-52-34"),
            title: "My Morning Journal".to_string(),
            content: "First line\n\nSecond paragraph with *markdown*".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 25, 7, 52, 34).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 1, 25, 8, 15, 22).unwrap(),
            is_synced: true,
            remote_file_id: None,
        }
    }

    #[test]
    fn test_encode_layout() {
        let encoded = encode(&sample_note());
        assert_eq!(
            encoded,
            "# Title: My Morning Journal\n\
             # Created: 2026-01-25T07:52:34.000Z\n\
             # Updated: 2026-01-25T08:15:22.000Z\n\
             \n\
             First line\n\nSecond paragraph with *markdown*"
        );
    }

    #[test]
    fn test_round_trip() {
        let note = sample_note();
        let decoded = decode(&note.filename(), &encode(&note)).unwrap();
        assert_eq!(decoded, note);
    }

    #[test]
    fn test_round_trip_empty_content() {
        let note = Note {
            content: String::new(),
            ..sample_note()
        };
        let decoded = decode(&note.filename(), &encode(&note)).unwrap();
        assert_eq!(decoded.content, "");
        assert_eq!(decoded, note);
    }

    #[test]
    fn test_decode_marks_synced_and_strips_extension() {
        let decoded = decode("2026-01-25_07-52-34.txt", &encode(&sample_note())).unwrap();
        assert!(decoded.is_synced);
        assert_eq!(decoded.id.as_str(), "2026-01-25_07-52-34");
    }

    #[test]
    fn test_decode_is_order_tolerant() {
        let text = "# Updated: 2026-01-25T08:15:22.000Z\n\
                    # Title: Shuffled\n\
                    # Created: 2026-01-25T07:52:34.000Z\n\
                    \n\
                    body";
        let decoded = decode("a.txt", text).unwrap();
        assert_eq!(decoded.title, "Shuffled");
        assert_eq!(decoded.content, "body");
    }

    #[test]
    fn test_decode_rejects_missing_header() {
        let text = "# Title: No timestamps\n\nbody";
        assert_eq!(decode("a.txt", text), None);
    }

    #[test]
    fn test_decode_rejects_malformed_timestamp() {
        let text = "# Title: Bad\n\
                    # Created: yesterday\n\
                    # Updated: 2026-01-25T08:15:22.000Z\n\
                    \n\
                    body";
        assert_eq!(decode("a.txt", text), None);
    }

    #[test]
    fn test_decode_rejects_foreign_file() {
        assert_eq!(decode("abc.txt", "not a valid header block"), None);
    }

    #[test]
    fn test_decode_ignores_headers_past_scan_window() {
        let mut text = String::new();
        for i in 0..HEADER_SCAN_LINES {
            text.push_str(&format!("junk line {i}\n"));
        }
        text.push_str("# Title: Too late\n# Created: 2026-01-25T07:52:34.000Z\n# Updated: 2026-01-25T08:15:22.000Z\n\nbody");
        assert_eq!(decode("a.txt", &text), None);
    }

    #[test]
    fn test_decode_without_separator_yields_empty_content() {
        let text = "# Title: Headers only\n\
                    # Created: 2026-01-25T07:52:34.000Z\n\
                    # Updated: 2026-01-25T08:15:22.000Z";
        let decoded = decode("a.txt", text).unwrap();
        assert_eq!(decoded.content, "");
    }
}
