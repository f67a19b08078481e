//! Filesystem-backed store implementations.
//!
//! `FsRemoteStore` treats a directory (typically a mounted drive folder) as
//! the remote side: the container is a per-owner subfolder and the remote
//! file ID is the file's absolute path.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::warn;

use crate::codec;
use crate::error::{Error, Result};
use crate::models::{Note, NoteId};
use crate::store::{LocalStore, RemoteStore, StateStore};

/// Local store over a flat directory of `<id>.txt` files.
#[derive(Clone, Debug)]
pub struct FsLocalStore {
    root: PathBuf,
}

impl FsLocalStore {
    /// Open the store, creating the directory when missing.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn note_path(&self, id: &NoteId) -> PathBuf {
        self.root.join(format!("{id}.txt"))
    }
}

impl LocalStore for FsLocalStore {
    async fn list(&self) -> Result<Vec<Note>> {
        read_notes_dir(&self.root).await
    }

    async fn read(&self, id: &NoteId) -> Result<Option<Note>> {
        let path = self.note_path(id);
        match fs::read_to_string(&path).await {
            Ok(text) => {
                let decoded = codec::decode(&format!("{id}.txt"), &text);
                if decoded.is_none() {
                    warn!(path = %path.display(), "skipping undecodable note file");
                }
                Ok(decoded)
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    async fn write(&self, note: &Note) -> Result<()> {
        fs::write(self.note_path(&note.id), codec::encode(note)).await?;
        Ok(())
    }

    async fn delete(&self, id: &NoteId) -> Result<()> {
        match fs::remove_file(self.note_path(id)).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

/// Remote store over a directory, with a find-or-create container subfolder
/// per owner.
#[derive(Clone, Debug)]
pub struct FsRemoteStore {
    root: PathBuf,
}

impl FsRemoteStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl RemoteStore for FsRemoteStore {
    async fn ensure_container(&self, owner_key: &str) -> Result<String> {
        let owner = sanitize_owner_key(owner_key);
        if owner.is_empty() {
            return Err(Error::Container("owner key cannot be empty".to_string()));
        }

        let container = self.root.join(format!("daybook-{owner}"));
        fs::create_dir_all(&container).await.map_err(|error| {
            Error::Container(format!(
                "cannot create container {}: {error}",
                container.display()
            ))
        })?;
        Ok(container.to_string_lossy().into_owned())
    }

    async fn upload(&self, note: &Note, container_id: &str) -> Result<String> {
        let path = Path::new(container_id).join(note.filename());
        fs::write(&path, codec::encode(note))
            .await
            .map_err(|error| remote_error("upload", &path, &error))?;
        Ok(path.to_string_lossy().into_owned())
    }

    async fn list_and_download_all(&self, container_id: &str) -> Result<Vec<Note>> {
        let notes = read_notes_dir(Path::new(container_id))
            .await
            .map_err(|error| Error::Remote(format!("listing {container_id} failed: {error}")))?;

        // Attach the remote handle so deletes can target the file directly.
        Ok(notes
            .into_iter()
            .map(|note| {
                let path = Path::new(container_id).join(note.filename());
                let file_id = path.to_string_lossy().into_owned();
                note.mark_synced(Some(file_id))
            })
            .collect())
    }

    async fn delete(&self, remote_file_id: &str) -> Result<()> {
        match fs::remove_file(remote_file_id).await {
            Ok(()) => Ok(()),
            // Already gone counts as deleted.
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(remote_error("delete", Path::new(remote_file_id), &error)),
        }
    }
}

/// Key-value state persisted as one JSON file.
#[derive(Clone, Debug)]
pub struct FsStateStore {
    path: PathBuf,
}

impl FsStateStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path).await {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(error) => Err(error.into()),
        }
    }
}

impl StateStore for FsStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?).await?;
        Ok(())
    }
}

/// Read and decode every `.txt` note in a directory, skipping files that
/// cannot be read or decoded.
async fn read_notes_dir(dir: &Path) -> Result<Vec<Note>> {
    let mut notes = Vec::new();
    let mut entries = fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
            continue;
        }
        let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };

        match fs::read_to_string(&path).await {
            Ok(text) => match codec::decode(filename, &text) {
                Some(note) => notes.push(note),
                None => warn!(path = %path.display(), "skipping undecodable note file"),
            },
            Err(error) => {
                warn!(path = %path.display(), %error, "skipping unreadable note file");
            }
        }
    }

    Ok(notes)
}

fn remote_error(operation: &str, path: &Path, error: &std::io::Error) -> Error {
    Error::Remote(format!("{operation} failed for {}: {error}", path.display()))
}

fn sanitize_owner_key(owner_key: &str) -> String {
    let mut out = String::with_capacity(owner_key.len());
    let mut last_dash = false;
    for ch in owner_key.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_note(id: &str) -> Note {
        Note::new()
            .with_content(format!("content for {id}"))
            .with_title(format!("title for {id}"))
            .into_id(id)
    }

    trait IntoId {
        fn into_id(self, id: &str) -> Note;
    }

    impl IntoId for Note {
        fn into_id(self, id: &str) -> Note {
            Note {
                id: NoteId::from(id),
                ..self
            }
        }
    }

    #[tokio::test]
    async fn test_local_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FsLocalStore::open(dir.path().join("notes")).await.unwrap();

        let note = sample_note("2026-01-25_07-52-34");
        store.write(&note).await.unwrap();

        let read = store.read(&note.id).await.unwrap().unwrap();
        assert_eq!(read.id, note.id);
        assert_eq!(read.content, note.content);
        // Files only exist once committed, so decoded notes read back synced.
        assert!(read.is_synced);

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_local_store_read_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FsLocalStore::open(dir.path()).await.unwrap();
        let missing = store.read(&NoteId::from("nope")).await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_local_store_delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FsLocalStore::open(dir.path()).await.unwrap();

        let note = sample_note("2026-01-25_07-52-34");
        store.write(&note).await.unwrap();
        store.delete(&note.id).await.unwrap();
        store.delete(&note.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_local_store_skips_foreign_files() {
        let dir = TempDir::new().unwrap();
        let store = FsLocalStore::open(dir.path()).await.unwrap();

        std::fs::write(dir.path().join("foreign.txt"), "not a note").unwrap();
        std::fs::write(dir.path().join("readme.md"), "ignored").unwrap();
        store.write(&sample_note("2026-01-25_07-52-34")).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_remote_store_container_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FsRemoteStore::new(dir.path());

        let first = store.ensure_container("Alice Example!").await.unwrap();
        let second = store.ensure_container("Alice Example!").await.unwrap();
        assert_eq!(first, second);
        assert!(first.ends_with("daybook-alice-example"));
    }

    #[tokio::test]
    async fn test_remote_store_upload_is_create_or_update() {
        let dir = TempDir::new().unwrap();
        let store = FsRemoteStore::new(dir.path());
        let container = store.ensure_container("alice").await.unwrap();

        let note = sample_note("2026-01-25_07-52-34");
        let first_id = store.upload(&note, &container).await.unwrap();
        let updated = note.with_content("rewritten");
        let second_id = store.upload(&updated, &container).await.unwrap();
        assert_eq!(first_id, second_id);

        let downloaded = store.list_and_download_all(&container).await.unwrap();
        assert_eq!(downloaded.len(), 1);
        assert_eq!(downloaded[0].content, "rewritten");
    }

    #[tokio::test]
    async fn test_remote_store_delete_tolerates_absent_file() {
        let dir = TempDir::new().unwrap();
        let store = FsRemoteStore::new(dir.path());
        let container = store.ensure_container("alice").await.unwrap();

        let note = sample_note("2026-01-25_07-52-34");
        let file_id = store.upload(&note, &container).await.unwrap();
        store.delete(&file_id).await.unwrap();
        store.delete(&file_id).await.unwrap();
        assert!(store
            .list_and_download_all(&container)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_state_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FsStateStore::new(dir.path().join("state.json"));

        assert_eq!(store.get("last-sync-time").await.unwrap(), None);
        store.set("last-sync-time", "2026-01-25T08:15:22Z").await.unwrap();
        store.set("other", "value").await.unwrap();
        assert_eq!(
            store.get("last-sync-time").await.unwrap().as_deref(),
            Some("2026-01-25T08:15:22Z")
        );
    }
}
