//! Store abstractions consumed by the sync engine.
//!
//! The engine never reaches for ambient state: implementations of these
//! traits are injected by constructor. `fs` provides the production
//! filesystem-backed stores; `memory` provides in-memory stores, primarily
//! for tests.

mod fs;
mod memory;

pub use fs::{FsLocalStore, FsRemoteStore, FsStateStore};
pub use memory::{MemoryLocalStore, MemoryRemoteStore, MemoryStateStore};

use crate::error::Result;
use crate::models::{Note, NoteId};

/// Remote note store (cloud drive or equivalent).
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// Find-or-create the remote container for `owner_key`. Idempotent.
    async fn ensure_container(&self, owner_key: &str) -> Result<String>;

    /// Upload a note into the container with create-or-update semantics
    /// keyed by `<id>.txt`. Returns the remote file ID. Safe to call
    /// repeatedly with the same content.
    async fn upload(&self, note: &Note, container_id: &str) -> Result<String>;

    /// Download every note in the container. Files that fail to decode are
    /// logged and skipped, never fatal.
    async fn list_and_download_all(&self, container_id: &str) -> Result<Vec<Note>>;

    /// Delete a remote file by ID. An already-absent file is success.
    async fn delete(&self, remote_file_id: &str) -> Result<()>;
}

/// Local note store (on-device persistence).
#[allow(async_fn_in_trait)]
pub trait LocalStore {
    /// List all locally stored notes.
    async fn list(&self) -> Result<Vec<Note>>;

    /// Read one note by ID, `None` when absent.
    async fn read(&self, id: &NoteId) -> Result<Option<Note>>;

    /// Write a note, fully overwriting any existing record with the same ID.
    async fn write(&self, note: &Note) -> Result<()>;

    /// Delete a note by ID. No-op when absent.
    async fn delete(&self, id: &NoteId) -> Result<()>;
}

/// Durable key-value capability carrying the tombstone set and the
/// last-sync timestamp.
#[allow(async_fn_in_trait)]
pub trait StateStore {
    /// Read a value by key, `None` when unset.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Durably write a value under a key.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
