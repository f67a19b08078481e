//! In-memory store implementations, primarily for tests.
//!
//! `MemoryRemoteStore` carries switches to simulate the remote failure modes
//! the engine must tolerate: per-note upload failures, delete failures, and
//! eventual-consistency lag where an uploaded file is missing from listings.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::models::{Note, NoteId};
use crate::store::{LocalStore, RemoteStore, StateStore};

/// Local store backed by an in-memory map.
#[derive(Clone, Debug, Default)]
pub struct MemoryLocalStore {
    notes: Arc<Mutex<BTreeMap<NoteId, Note>>>,
}

impl MemoryLocalStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryLocalStore {
    async fn list(&self) -> Result<Vec<Note>> {
        Ok(self.notes.lock().expect("lock").values().cloned().collect())
    }

    async fn read(&self, id: &NoteId) -> Result<Option<Note>> {
        Ok(self.notes.lock().expect("lock").get(id).cloned())
    }

    async fn write(&self, note: &Note) -> Result<()> {
        self.notes
            .lock()
            .expect("lock")
            .insert(note.id.clone(), note.clone());
        Ok(())
    }

    async fn delete(&self, id: &NoteId) -> Result<()> {
        self.notes.lock().expect("lock").remove(id);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct RemoteInner {
    files: BTreeMap<String, Note>,
    hidden_from_listing: HashSet<NoteId>,
    failing_uploads: HashSet<NoteId>,
    fail_deletes: bool,
    fail_container: bool,
}

/// Remote store backed by an in-memory map, with injectable failures.
#[derive(Clone, Debug, Default)]
pub struct MemoryRemoteStore {
    inner: Arc<Mutex<RemoteInner>>,
}

impl MemoryRemoteStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn file_id(id: &NoteId) -> String {
        format!("mem:{id}")
    }

    /// Preload a note as if another device had uploaded it.
    pub fn seed(&self, note: Note) {
        let file_id = Self::file_id(&note.id);
        let note = note.mark_synced(Some(file_id.clone()));
        self.inner.lock().expect("lock").files.insert(file_id, note);
    }

    /// Simulate eventual-consistency lag: the note stays stored but is
    /// missing from `list_and_download_all` results.
    pub fn hide_from_listing(&self, id: &NoteId) {
        self.inner
            .lock()
            .expect("lock")
            .hidden_from_listing
            .insert(id.clone());
    }

    /// Make uploads of the given note fail.
    pub fn fail_uploads_for(&self, id: &NoteId) {
        self.inner
            .lock()
            .expect("lock")
            .failing_uploads
            .insert(id.clone());
    }

    /// Make all deletes fail.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.inner.lock().expect("lock").fail_deletes = fail;
    }

    /// Make container resolution fail.
    pub fn set_fail_container(&self, fail: bool) {
        self.inner.lock().expect("lock").fail_container = fail;
    }

    /// Whether a note with this ID is currently stored remotely.
    #[must_use]
    pub fn contains(&self, id: &NoteId) -> bool {
        self.inner
            .lock()
            .expect("lock")
            .files
            .contains_key(&Self::file_id(id))
    }

    /// Fetch the stored copy of a note, if any.
    #[must_use]
    pub fn stored(&self, id: &NoteId) -> Option<Note> {
        self.inner
            .lock()
            .expect("lock")
            .files
            .get(&Self::file_id(id))
            .cloned()
    }
}

impl RemoteStore for MemoryRemoteStore {
    async fn ensure_container(&self, owner_key: &str) -> Result<String> {
        let inner = self.inner.lock().expect("lock");
        if inner.fail_container {
            return Err(Error::Container("simulated container failure".to_string()));
        }
        Ok(format!("mem-container:{owner_key}"))
    }

    async fn upload(&self, note: &Note, _container_id: &str) -> Result<String> {
        let mut inner = self.inner.lock().expect("lock");
        if inner.failing_uploads.contains(&note.id) {
            return Err(Error::Remote(format!(
                "simulated upload failure for {}",
                note.id
            )));
        }
        let file_id = Self::file_id(&note.id);
        let stored = note.clone().mark_synced(Some(file_id.clone()));
        inner.files.insert(file_id.clone(), stored);
        Ok(file_id)
    }

    async fn list_and_download_all(&self, _container_id: &str) -> Result<Vec<Note>> {
        let inner = self.inner.lock().expect("lock");
        Ok(inner
            .files
            .values()
            .filter(|note| !inner.hidden_from_listing.contains(&note.id))
            .cloned()
            .collect())
    }

    async fn delete(&self, remote_file_id: &str) -> Result<()> {
        let mut inner = self.inner.lock().expect("lock");
        if inner.fail_deletes {
            return Err(Error::Remote(format!(
                "simulated delete failure for {remote_file_id}"
            )));
        }
        // Absent files count as deleted.
        inner.files.remove(remote_file_id);
        Ok(())
    }
}

/// Key-value state backed by an in-memory map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStateStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().expect("lock").get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .expect("lock")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_note(id: &str) -> Note {
        Note {
            id: NoteId::from(id),
            ..Note::new().with_content("body")
        }
    }

    #[tokio::test]
    async fn test_memory_local_store_round_trip() {
        let store = MemoryLocalStore::new();
        let note = sample_note("a");
        store.write(&note).await.unwrap();
        assert_eq!(store.read(&note.id).await.unwrap(), Some(note.clone()));
        store.delete(&note.id).await.unwrap();
        assert_eq!(store.read(&note.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_remote_store_upload_and_listing_lag() {
        let store = MemoryRemoteStore::new();
        let container = store.ensure_container("alice").await.unwrap();

        let note = sample_note("a");
        store.upload(&note, &container).await.unwrap();
        assert!(store.contains(&note.id));

        store.hide_from_listing(&note.id);
        let listed = store.list_and_download_all(&container).await.unwrap();
        assert!(listed.is_empty());
        // Still stored, just invisible to listings.
        assert!(store.contains(&note.id));
    }

    #[tokio::test]
    async fn test_memory_remote_store_simulated_failures() {
        let store = MemoryRemoteStore::new();
        let container = store.ensure_container("alice").await.unwrap();

        let note = sample_note("a");
        store.fail_uploads_for(&note.id);
        assert!(store.upload(&note, &container).await.is_err());

        store.set_fail_container(true);
        assert!(store.ensure_container("alice").await.is_err());
    }

    #[tokio::test]
    async fn test_memory_state_store() {
        let store = MemoryStateStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
