//! Note collection codec over a single storage slot.
//!
//! # Responsibility
//! - Serialize the whole note collection into one slot value and back.
//! - Keep every readable note when a few stored entries are damaged.
//!
//! # Invariants
//! - The slot value is a JSON array of `{id, date, content}` objects.
//! - Every save rewrites the complete collection; there is no diffing.
//! - An absent or empty slot value means "no collection yet".
//! - Only a value that is not a JSON array fails the whole load; single
//!   unreadable, empty or repeated entries are dropped with a warning.

use crate::model::note::Note;
use crate::repo::slot_repo::{KeyValueStore, StorageError, StorageResult};
use log::warn;
use std::collections::HashSet;

/// Storage key used by the original browser widget.
pub const DEFAULT_STORAGE_KEY: &str = "notesCookies";

/// Loads and saves the note collection under one fixed key.
pub struct NoteCollectionRepository<S: KeyValueStore> {
    slot: S,
    key: String,
}

impl<S: KeyValueStore> NoteCollectionRepository<S> {
    /// Uses [`DEFAULT_STORAGE_KEY`].
    pub fn new(slot: S) -> Self {
        Self::with_key(slot, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(slot: S, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn slot_mut(&mut self) -> &mut S {
        &mut self.slot
    }

    /// Reads the collection; `Ok(None)` when the slot holds nothing.
    pub fn load(&self) -> StorageResult<Option<Vec<Note>>> {
        match self.slot.get_item(&self.key)? {
            Some(raw) if !raw.is_empty() => decode_notes(&raw).map(Some),
            _ => Ok(None),
        }
    }

    /// Replaces the slot value with the full collection.
    pub fn save(&mut self, notes: &[Note]) -> StorageResult<()> {
        let encoded = encode_notes(notes)?;
        self.slot.set_item(&self.key, &encoded)
    }

    /// Drops the slot entirely.
    pub fn clear(&mut self) -> StorageResult<()> {
        self.slot.remove_item(&self.key)
    }
}

/// Encodes a collection into the slot wire format.
pub fn encode_notes(notes: &[Note]) -> StorageResult<String> {
    serde_json::to_string(notes).map_err(|err| StorageError::Encode(err.to_string()))
}

/// Decodes a slot value into a collection.
///
/// Entries are decoded one by one. An entry that does not parse as a note,
/// has empty content, or repeats an earlier id is dropped and logged; the
/// rest of the collection is kept in order.
///
/// # Errors
/// - `StorageError::Parse` when the value is not a JSON array.
pub fn decode_notes(raw: &str) -> StorageResult<Vec<Note>> {
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(raw).map_err(|err| StorageError::Parse(err.to_string()))?;

    let mut seen = HashSet::with_capacity(entries.len());
    let mut notes = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let note: Note = match serde_json::from_value(entry) {
            Ok(note) => note,
            Err(err) => {
                warn!(
                    "event=slot_decode module=repo status=warn reason=unreadable_entry index={} category={:?}",
                    index,
                    err.classify()
                );
                continue;
            }
        };
        if let Err(err) = note.validate() {
            warn!(
                "event=slot_decode module=repo status=warn reason=invalid_entry index={} id={} error={}",
                index, note.id, err
            );
            continue;
        }
        if seen.contains(&note.id) {
            warn!(
                "event=slot_decode module=repo status=warn reason=duplicate_id index={} id={}",
                index, note.id
            );
            continue;
        }
        seen.insert(note.id.clone());
        notes.push(note);
    }
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::{decode_notes, encode_notes, NoteCollectionRepository, DEFAULT_STORAGE_KEY};
    use crate::model::note::Note;
    use crate::repo::slot_repo::{KeyValueStore, MemoryKeyValueStore, StorageError};

    const BROWSER_PAYLOAD: &str = r#"[
        {"id":"5f0c7a3e-1b7d-4c57-9a55-2a3c3e2f9d10","date":"2024-05-10T14:03:11.482Z","content":"World"},
        {"id":"0d6b0a8e-2c1a-4f7f-8d0e-1c9d4b7e6a21","date":"2024-05-10T14:02:59.001Z","content":"Hello"}
    ]"#;

    #[test]
    fn decodes_browser_payload_in_order() {
        let notes = decode_notes(BROWSER_PAYLOAD).unwrap();
        let contents: Vec<&str> = notes.iter().map(|n| n.content.as_str()).collect();
        assert_eq!(contents, vec!["World", "Hello"]);
    }

    #[test]
    fn decode_drops_repeated_ids() {
        let note = Note::new("only once");
        let raw = encode_notes(&[note.clone(), note.clone()]).unwrap();
        let notes = decode_notes(&raw).unwrap();
        assert_eq!(notes, vec![note]);
    }

    #[test]
    fn decode_keeps_non_uuid_ids() {
        let raw = r#"[
            {"id":"note-2","date":"2024-05-10T14:03:11Z","content":"second"},
            {"id":"note-1","date":"2024-05-10T14:02:00Z","content":"first"}
        ]"#;
        let notes = decode_notes(raw).unwrap();
        let ids: Vec<&str> = notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["note-2", "note-1"]);
    }

    #[test]
    fn decode_skips_bad_entries_and_keeps_the_rest() {
        let raw = r#"[
            {"id":"a","date":"2024-05-10T14:03:11Z","content":"kept first"},
            {"id":"b","date":"2024-05-10T14:03:10Z","content":""},
            {"id":"c","date":"yesterday","content":"bad date"},
            42,
            {"id":"d","date":"2024-05-10T14:03:09Z","content":"kept last"}
        ]"#;
        let notes = decode_notes(raw).unwrap();
        let contents: Vec<&str> = notes.iter().map(|n| n.content.as_str()).collect();
        assert_eq!(contents, vec!["kept first", "kept last"]);
    }

    #[test]
    fn decode_rejects_values_that_are_not_arrays() {
        assert!(matches!(decode_notes("{not json"), Err(StorageError::Parse(_))));
        assert!(matches!(
            decode_notes(r#"{"id":"a","content":"x"}"#),
            Err(StorageError::Parse(_))
        ));
    }

    #[test]
    fn empty_slot_value_loads_as_absent() {
        let repo = NoteCollectionRepository::new(MemoryKeyValueStore::with_item(
            DEFAULT_STORAGE_KEY,
            "",
        ));
        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn save_writes_under_configured_key() {
        let mut repo = NoteCollectionRepository::with_key(MemoryKeyValueStore::new(), "custom");
        repo.save(&[Note::new("a")]).unwrap();
        assert!(repo.slot().get_item("custom").unwrap().is_some());
        assert!(repo.slot().get_item(DEFAULT_STORAGE_KEY).unwrap().is_none());

        repo.clear().unwrap();
        assert!(repo.load().unwrap().is_none());
    }
}
