//! daybook-core - Core library for Daybook
//!
//! This crate contains the note model, the on-disk text codec, the store
//! abstractions, and the sync engine shared by all Daybook front ends.

pub mod codec;
pub mod error;
pub mod models;
pub mod store;
pub mod sync;

pub use error::{Error, Result};
pub use models::{Note, NoteId};
