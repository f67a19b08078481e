use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] daybook_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No note content provided")]
    EmptyContent,
    #[error("Nothing to change: provide new content and/or --title")]
    NothingToEdit,
    #[error("Note not found for id/prefix: {0}")]
    NoteNotFound(String),
    #[error("{0}")]
    AmbiguousNoteId(String),
    #[error(
        "No remote is configured. Pass --remote-dir or set DAYBOOK_REMOTE_DIR to a folder synced by your drive client."
    )]
    RemoteNotConfigured,
}
