//! Note model

use chrono::{DateTime, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Current instant truncated to millisecond precision, matching the
/// resolution of the on-disk timestamp format.
fn now() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond((now.nanosecond() / 1_000_000) * 1_000_000)
        .unwrap_or(now)
}

/// A unique identifier for a note, derived from its creation instant with
/// second resolution (`YYYY-MM-DD_HH-MM-SS`). Doubles as the filename stem
/// on both the local and the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteId(String);

impl NoteId {
    /// Build an ID from a local creation instant.
    #[must_use]
    pub fn from_instant(instant: DateTime<Local>) -> Self {
        Self(instant.format("%Y-%m-%d_%H-%M-%S").to_string())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A journal note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier, immutable for the lifetime of the note
    pub id: NoteId,
    /// Display title (auto-generated at creation, user-editable)
    pub title: String,
    /// Markdown-flavored content
    pub content: String,
    /// Creation timestamp, never mutated
    pub created_at: DateTime<Utc>,
    /// Last update timestamp; primary ordering and conflict-resolution key
    pub updated_at: DateTime<Utc>,
    /// True only right after a successful remote write or remote read
    pub is_synced: bool,
    /// Remote store handle for the note's file, set after first upload
    pub remote_file_id: Option<String>,
}

impl Note {
    /// Create a new note with an auto-generated ID and title.
    #[must_use]
    pub fn new() -> Self {
        let created = now();
        let local = created.with_timezone(&Local);
        Self {
            id: NoteId::from_instant(local),
            title: local.format("%Y-%m-%d %H:%M").to_string(),
            content: String::new(),
            created_at: created,
            updated_at: created,
            is_synced: false,
            remote_file_id: None,
        }
    }

    /// Return a copy with new content, marked unsynced.
    #[must_use]
    pub fn with_content(self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            updated_at: now(),
            is_synced: false,
            ..self
        }
    }

    /// Return a copy with a new title, marked unsynced.
    #[must_use]
    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            updated_at: now(),
            is_synced: false,
            ..self
        }
    }

    /// Return a copy marked as synced. Called after a successful upload;
    /// retains the existing remote file ID when none is provided.
    #[must_use]
    pub fn mark_synced(self, remote_file_id: Option<String>) -> Self {
        Self {
            is_synced: true,
            remote_file_id: remote_file_id.or(self.remote_file_id),
            ..self
        }
    }

    /// Validate the note before saving.
    ///
    /// Rejects empty or whitespace-only title/content; callers must surface
    /// the error to the user, never autocorrect.
    pub fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Note content cannot be empty".to_string(),
            ));
        }
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Note title cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Filename used for this note on both stores.
    #[must_use]
    pub fn filename(&self) -> String {
        format!("{}.txt", self.id)
    }

    /// Plain-text preview of the content, truncated to `max_len` characters.
    #[must_use]
    pub fn preview(&self, max_len: usize) -> String {
        let plain: String = self
            .content
            .chars()
            .filter(|c| !matches!(c, '*' | '_' | '~' | '`' | '#'))
            .collect();
        let plain = plain.split_whitespace().collect::<Vec<_>>().join(" ");
        if plain.chars().count() > max_len {
            let truncated: String = plain.chars().take(max_len).collect();
            format!("{truncated}...")
        } else {
            plain
        }
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort notes newest-first by `updated_at` for display.
#[must_use]
pub fn sorted_by_recency(notes: &[Note]) -> Vec<Note> {
    let mut sorted = notes.to_vec();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    sorted
}

/// Count notes still awaiting upload.
#[must_use]
pub fn unsynced_count(notes: &[Note]) -> usize {
    notes.iter().filter(|note| !note.is_synced).count()
}
