use std::io::{self, IsTerminal, Read};

use chrono::{DateTime, Utc};
use daybook_core::models::Note;
use daybook_core::store::{FsLocalStore, FsRemoteStore, FsStateStore};
use daybook_core::sync::{SyncEngine, SyncService};
use serde::Serialize;

use crate::config::CliConfig;
use crate::error::CliError;

pub type CliSyncService = SyncService<FsRemoteStore, FsLocalStore, FsStateStore>;

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub updated_at: String,
    pub relative_time: String,
    pub synced: bool,
}

pub fn note_list_item(note: &Note) -> NoteListItem {
    NoteListItem {
        id: note.id.to_string(),
        title: note.title.clone(),
        preview: note.preview(100),
        updated_at: note.updated_at.to_rfc3339(),
        relative_time: relative_time(note.updated_at),
        synced: note.is_synced,
    }
}

pub async fn open_local(config: &CliConfig) -> Result<FsLocalStore, CliError> {
    Ok(FsLocalStore::open(&config.notes_dir).await?)
}

pub fn open_state(config: &CliConfig) -> FsStateStore {
    FsStateStore::new(&config.state_path)
}

/// Build the sync service; requires a configured remote folder.
pub async fn open_service(config: &CliConfig) -> Result<CliSyncService, CliError> {
    let Some(remote_dir) = &config.remote_dir else {
        return Err(CliError::RemoteNotConfigured);
    };

    let engine = SyncEngine::new(
        FsRemoteStore::new(remote_dir),
        open_local(config).await?,
        open_state(config),
        config.owner_key.clone(),
    )
    .await?;
    Ok(SyncService::new(engine))
}

/// Resolve a note by exact ID or unique ID prefix.
pub fn resolve_note<'a>(notes: &'a [Note], id_or_prefix: &str) -> Result<&'a Note, CliError> {
    if let Some(exact) = notes.iter().find(|note| note.id.as_str() == id_or_prefix) {
        return Ok(exact);
    }

    let matches: Vec<&Note> = notes
        .iter()
        .filter(|note| note.id.as_str().starts_with(id_or_prefix))
        .collect();
    match matches.as_slice() {
        [] => Err(CliError::NoteNotFound(id_or_prefix.to_string())),
        [only] => Ok(only),
        many => {
            let ids: Vec<&str> = many.iter().map(|note| note.id.as_str()).collect();
            Err(CliError::AmbiguousNoteId(format!(
                "Prefix '{id_or_prefix}' matches multiple notes: {}",
                ids.join(", ")
            )))
        }
    }
}

/// Note content from arguments, falling back to piped stdin.
pub fn resolve_note_content(parts: &[String]) -> Result<String, CliError> {
    let joined = parts.join(" ");
    if !joined.trim().is_empty() {
        return Ok(joined);
    }

    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(CliError::EmptyContent);
    }

    let mut piped = String::new();
    stdin.read_to_string(&mut piped)?;
    let piped = piped.trim_end_matches('\n').to_string();
    if piped.trim().is_empty() {
        return Err(CliError::EmptyContent);
    }
    Ok(piped)
}

/// Compact relative time for display.
pub fn relative_time(instant: DateTime<Utc>) -> String {
    let seconds = (Utc::now() - instant).num_seconds();
    if seconds < 60 {
        "Just now".to_string()
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3600)
    } else {
        instant.format("%Y-%m-%d").to_string()
    }
}

pub fn sync_marker(note: &Note) -> &'static str {
    if note.is_synced {
        "synced"
    } else {
        "local"
    }
}
