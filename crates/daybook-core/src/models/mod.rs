//! Data models for Daybook

mod note;

pub use note::{sorted_by_recency, unsynced_count, Note, NoteId};
