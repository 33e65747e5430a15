//! Domain model for captured notes.
//!
//! # Responsibility
//! - Define the canonical note record shared by store, search and storage.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard remove from the collection; there are no tombstones.

pub mod note;
