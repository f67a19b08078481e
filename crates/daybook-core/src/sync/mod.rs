//! Note synchronization: conflict resolution, merge, tombstones, and the
//! orchestrating engine.

mod engine;
mod merge;
mod tombstone;

pub use engine::{
    last_sync_time, DeleteOutcome, SyncAttempt, SyncEngine, SyncReport, SyncService,
};
pub use merge::{merge, resolve};
pub use tombstone::TombstoneTracker;
