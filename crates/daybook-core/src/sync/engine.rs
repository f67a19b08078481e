//! Sync orchestrator.
//!
//! One pass is a fixed sequence: refresh the local view, upload unsynced
//! notes, download the remote set, drop suppressed IDs, merge, re-insert
//! just-uploaded notes the remote listing has not caught up with, persist
//! the difference, record the completion time. There is no terminal failure
//! state: a failed pass is logged and retried on the next trigger.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{Note, NoteId};
use crate::store::{LocalStore, RemoteStore, StateStore};
use crate::sync::merge::merge;
use crate::sync::tombstone::TombstoneTracker;

/// Storage key for the last successful sync timestamp (RFC 3339).
const LAST_SYNC_KEY: &str = "last-sync-time";

/// Summary of one completed sync pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Notes uploaded this pass
    pub uploaded: usize,
    /// Notes whose upload failed; left unsynced, retried next pass
    pub failed_uploads: Vec<NoteId>,
    /// Notes in the downloaded remote set
    pub downloaded: usize,
    /// Size of the merged, persisted collection
    pub merged: usize,
    /// Completion timestamp, recorded as last-successful-sync time
    pub completed_at: DateTime<Utc>,
}

/// Outcome of the user-initiated delete flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Removed locally and confirmed gone remotely
    Deleted,
    /// Removed locally; the ID stays suppressed until a remote deletion
    /// is confirmed
    PendingRemote,
}

/// Orchestrates sync between one local and one remote store.
///
/// Stores are injected by constructor; the engine holds no ambient state.
#[derive(Debug)]
pub struct SyncEngine<R, L, S> {
    remote: R,
    local: L,
    state: S,
    tombstones: TombstoneTracker<S>,
    owner_key: String,
    container_id: Option<String>,
}

impl<R, L, S> SyncEngine<R, L, S>
where
    R: RemoteStore,
    L: LocalStore,
    S: StateStore + Clone,
{
    /// Build an engine, loading the tombstone set from durable state.
    pub async fn new(
        remote: R,
        local: L,
        state: S,
        owner_key: impl Into<String>,
    ) -> Result<Self> {
        let tombstones = TombstoneTracker::load(state.clone()).await?;
        Ok(Self {
            remote,
            local,
            state,
            tombstones,
            owner_key: owner_key.into(),
            container_id: None,
        })
    }

    /// Validate and persist a note to the local store.
    pub async fn save_note(&self, note: &Note) -> Result<()> {
        note.validate()?;
        self.local.write(note).await
    }

    /// Run one full sync pass.
    pub async fn sync_pass(&mut self) -> Result<SyncReport> {
        let container_id = self.container().await?;

        // Refresh-local: the store may have changed behind our back.
        let mut local_view: HashMap<NoteId, Note> = self
            .local
            .list()
            .await?
            .into_iter()
            .map(|note| (note.id.clone(), note))
            .collect();

        // Upload-pending: sequential, one note's failure does not block the
        // others.
        let mut just_uploaded: HashSet<NoteId> = HashSet::new();
        let mut failed_uploads = Vec::new();
        let pending: Vec<Note> = local_view
            .values()
            .filter(|note| !note.is_synced)
            .cloned()
            .collect();
        for note in pending {
            match self.remote.upload(&note, &container_id).await {
                Ok(file_id) => {
                    let synced = note.mark_synced(Some(file_id));
                    // Persist the flag immediately so a failure later in the
                    // pass cannot lose it.
                    if let Err(error) = self.local.write(&synced).await {
                        warn!(id = %synced.id, %error, "failed to persist sync flag");
                        continue;
                    }
                    just_uploaded.insert(synced.id.clone());
                    local_view.insert(synced.id.clone(), synced);
                }
                Err(error) => {
                    warn!(id = %note.id, %error, "upload failed; will retry next pass");
                    failed_uploads.push(note.id.clone());
                }
            }
        }

        // Download-remote.
        let remote_notes = self.remote.list_and_download_all(&container_id).await?;
        let downloaded = remote_notes.len();
        let remote_ids: HashSet<NoteId> =
            remote_notes.iter().map(|note| note.id.clone()).collect();

        // Filter-suppressed: deleted-here beats exists-remotely.
        let filtered_remote: Vec<Note> = remote_notes
            .into_iter()
            .filter(|note| !self.tombstones.is_suppressed(&note.id))
            .collect();

        // Merge: the remote set is authoritative for every ID it lists;
        // unsynced local notes are carried forward and win per-ID when newer.
        let unsynced_local: Vec<Note> = local_view
            .values()
            .filter(|note| !note.is_synced && !self.tombstones.is_suppressed(&note.id))
            .cloned()
            .collect();
        let mut merged = merge(filtered_remote, unsynced_local);

        // Latency-protection: a note uploaded this pass must not vanish just
        // because the remote listing has not caught up yet.
        for id in &just_uploaded {
            if !remote_ids.contains(id) && !self.tombstones.is_suppressed(id) {
                if let Some(copy) = local_view.get(id) {
                    debug!(%id, "remote listing lagging behind upload; keeping local copy");
                    merged.push(copy.clone());
                }
            }
        }

        // Persist the difference versus the previous local view.
        let merged_ids: HashSet<NoteId> = merged.iter().map(|note| note.id.clone()).collect();
        for note in &merged {
            if local_view.get(&note.id) != Some(note) {
                if let Err(error) = self.local.write(note).await {
                    warn!(id = %note.id, %error, "failed to persist merged note");
                }
            }
        }
        for id in local_view.keys() {
            if !merged_ids.contains(id) {
                if let Err(error) = self.local.delete(id).await {
                    warn!(%id, %error, "failed to remove stale local note");
                }
            }
        }

        let completed_at = Utc::now();
        self.state
            .set(LAST_SYNC_KEY, &completed_at.to_rfc3339())
            .await?;

        let report = SyncReport {
            uploaded: just_uploaded.len(),
            failed_uploads,
            downloaded,
            merged: merged.len(),
            completed_at,
        };
        info!(
            uploaded = report.uploaded,
            downloaded = report.downloaded,
            merged = report.merged,
            "sync pass completed"
        );
        Ok(report)
    }

    /// User-initiated delete: suppress durably, remove locally, then attempt
    /// the remote delete. On remote failure the ID stays suppressed so the
    /// next pass cannot resurrect the note.
    pub async fn delete_note(&mut self, id: &NoteId) -> Result<DeleteOutcome> {
        let note = self.local.read(id).await?;

        // Durable before any network call.
        self.tombstones.suppress(id).await?;
        self.local.delete(id).await?;

        let Some(file_id) = note.and_then(|note| note.remote_file_id) else {
            // No remote handle to confirm deletion against.
            return Ok(DeleteOutcome::PendingRemote);
        };

        match self.remote.delete(&file_id).await {
            Ok(()) => {
                self.tombstones.clear(id).await?;
                info!(%id, "note deleted locally and remotely");
                Ok(DeleteOutcome::Deleted)
            }
            Err(error) => {
                warn!(%id, %error, "remote delete failed; will retry while suppressed");
                Ok(DeleteOutcome::PendingRemote)
            }
        }
    }

    /// Timestamp of the last successful pass, if any.
    pub async fn last_sync_time(&self) -> Result<Option<DateTime<Utc>>> {
        last_sync_time(&self.state).await
    }

    /// Number of deletions awaiting remote confirmation.
    #[must_use]
    pub fn pending_deletions(&self) -> usize {
        self.tombstones.pending()
    }

    async fn container(&mut self) -> Result<String> {
        if let Some(container_id) = &self.container_id {
            return Ok(container_id.clone());
        }
        let container_id = self.remote.ensure_container(&self.owner_key).await?;
        self.container_id = Some(container_id.clone());
        Ok(container_id)
    }
}

/// Read the last successful sync timestamp from durable state.
pub async fn last_sync_time<S: StateStore>(state: &S) -> Result<Option<DateTime<Utc>>> {
    let Some(raw) = state.get(LAST_SYNC_KEY).await? else {
        return Ok(None);
    };
    let parsed = DateTime::parse_from_rfc3339(&raw)
        .map_err(|error| Error::InvalidInput(format!("stored sync time invalid: {error}")))?;
    Ok(Some(parsed.with_timezone(&Utc)))
}

/// Attempt result of a triggered sync.
#[derive(Debug)]
pub enum SyncAttempt {
    /// The pass ran to completion
    Completed(SyncReport),
    /// The pass failed; logged, retried on the next trigger
    Failed(Error),
    /// Another pass is running; this trigger was dropped, not queued
    AlreadyRunning,
}

/// Shared, single-flight handle around a [`SyncEngine`].
///
/// Concurrent triggers (timer tick during a user refresh) are dropped while
/// a pass is in flight.
#[derive(Debug)]
pub struct SyncService<R, L, S> {
    engine: Arc<Mutex<SyncEngine<R, L, S>>>,
}

impl<R, L, S> Clone for SyncService<R, L, S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<R, L, S> SyncService<R, L, S>
where
    R: RemoteStore,
    L: LocalStore,
    S: StateStore + Clone,
{
    #[must_use]
    pub fn new(engine: SyncEngine<R, L, S>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Trigger a sync pass unless one is already running.
    pub async fn try_sync(&self) -> SyncAttempt {
        let Ok(mut engine) = self.engine.try_lock() else {
            debug!("sync already in flight; trigger dropped");
            return SyncAttempt::AlreadyRunning;
        };
        match engine.sync_pass().await {
            Ok(report) => SyncAttempt::Completed(report),
            Err(error) => {
                warn!(%error, "sync pass failed; will retry on next trigger");
                SyncAttempt::Failed(error)
            }
        }
    }

    /// Run the delete flow, serialized against any running pass.
    pub async fn delete_note(&self, id: &NoteId) -> Result<DeleteOutcome> {
        self.engine.lock().await.delete_note(id).await
    }

    /// Validate and persist a note to the local store.
    pub async fn save_note(&self, note: &Note) -> Result<()> {
        self.engine.lock().await.save_note(note).await
    }

    /// Timestamp of the last successful pass, if any.
    pub async fn last_sync_time(&self) -> Result<Option<DateTime<Utc>>> {
        self.engine.lock().await.last_sync_time().await
    }

    /// Number of deletions awaiting remote confirmation.
    pub async fn pending_deletions(&self) -> usize {
        self.engine.lock().await.pending_deletions()
    }
}
