//! Tombstone tracker for locally deleted notes.
//!
//! A deleted note's ID stays in this durable set until the remote store
//! confirms the file no longer exists. While a member, the ID is excluded
//! from every merge pass, so a failed remote delete cannot resurrect the
//! note locally. The trade-off is accepted: a failed delete leaves an
//! orphaned remote file rather than a reappearing note.

use std::collections::HashSet;

use tracing::debug;

use crate::error::Result;
use crate::models::NoteId;
use crate::store::StateStore;

/// Storage key carrying the suppressed ID set as a JSON string array.
const SUPPRESSED_IDS_KEY: &str = "daybook-suppressed-ids";

/// Durable set of note IDs pending confirmed remote deletion.
#[derive(Debug)]
pub struct TombstoneTracker<S> {
    store: S,
    ids: HashSet<NoteId>,
}

impl<S: StateStore> TombstoneTracker<S> {
    /// Load the tracker from durable state.
    pub async fn load(store: S) -> Result<Self> {
        let ids = match store.get(SUPPRESSED_IDS_KEY).await? {
            Some(raw) => serde_json::from_str::<Vec<String>>(&raw)?
                .into_iter()
                .map(NoteId::from)
                .collect(),
            None => HashSet::new(),
        };
        Ok(Self { store, ids })
    }

    /// Suppress an ID. Persisted before returning, so a crash between this
    /// call and the remote delete never resurrects the note.
    pub async fn suppress(&mut self, id: &NoteId) -> Result<()> {
        if self.ids.insert(id.clone()) {
            debug!(%id, "suppressing note id");
            self.persist().await?;
        }
        Ok(())
    }

    /// Whether an ID is currently suppressed.
    #[must_use]
    pub fn is_suppressed(&self, id: &NoteId) -> bool {
        self.ids.contains(id)
    }

    /// Clear an ID after the remote store confirms the file is gone.
    pub async fn clear(&mut self, id: &NoteId) -> Result<()> {
        if self.ids.remove(id) {
            debug!(%id, "clearing suppressed note id");
            self.persist().await?;
        }
        Ok(())
    }

    /// Number of IDs awaiting confirmed remote deletion.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.ids.len()
    }

    async fn persist(&self) -> Result<()> {
        let mut ids: Vec<&str> = self.ids.iter().map(NoteId::as_str).collect();
        ids.sort_unstable();
        self.store
            .set(SUPPRESSED_IDS_KEY, &serde_json::to_string(&ids)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStateStore;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_suppress_and_clear() {
        let store = MemoryStateStore::new();
        let mut tracker = TombstoneTracker::load(store).await.unwrap();

        let id = NoteId::from("2026-01-25_07-52-34");
        assert!(!tracker.is_suppressed(&id));

        tracker.suppress(&id).await.unwrap();
        assert!(tracker.is_suppressed(&id));
        assert_eq!(tracker.pending(), 1);

        tracker.clear(&id).await.unwrap();
        assert!(!tracker.is_suppressed(&id));
        assert_eq!(tracker.pending(), 0);
    }

    #[tokio::test]
    async fn test_survives_reload() {
        let store = MemoryStateStore::new();
        let mut tracker = TombstoneTracker::load(store.clone()).await.unwrap();

        let id = NoteId::from("2026-01-25_07-52-34");
        tracker.suppress(&id).await.unwrap();

        let reloaded = TombstoneTracker::load(store).await.unwrap();
        assert!(reloaded.is_suppressed(&id));
    }

    #[tokio::test]
    async fn test_clear_persists_removal() {
        let store = MemoryStateStore::new();
        let mut tracker = TombstoneTracker::load(store.clone()).await.unwrap();

        let keep = NoteId::from("a");
        let drop = NoteId::from("b");
        tracker.suppress(&keep).await.unwrap();
        tracker.suppress(&drop).await.unwrap();
        tracker.clear(&drop).await.unwrap();

        let reloaded = TombstoneTracker::load(store).await.unwrap();
        assert!(reloaded.is_suppressed(&keep));
        assert!(!reloaded.is_suppressed(&drop));
    }
}
