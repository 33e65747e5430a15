//! Repository layer for the durable storage slot.
//!
//! # Responsibility
//! - Define the key-value slot contract and its backends.
//! - Isolate collection encoding from store orchestration.
//!
//! # Invariants
//! - Decoding enforces `Note::validate()` on every stored note.
//! - Slot writes replace the whole value atomically.

pub mod note_repo;
pub mod slot_repo;
