//! Note store: canonical collection, persistence and search.
//!
//! # Responsibility
//! - Own the in-memory note collection, newest first.
//! - Rewrite the storage slot after every mutation.
//! - Emit user-facing notices for rejected creates and deletes.
//!
//! # Invariants
//! - The collection is loaded exactly once, when the store is constructed.
//! - In-memory mutations never wait on or roll back for persistence outcome.
//! - Empty content never reaches the collection or the slot.
//! - Note ids stay unique within the collection.

use crate::model::note::{Note, NoteId};
use crate::notify::{NoticeKind, Notifier, NOTICE_EMPTY_CONTENT, NOTICE_NOTE_DELETED};
use crate::repo::note_repo::NoteCollectionRepository;
use crate::repo::slot_repo::{KeyValueStore, StorageError, StorageResult};
use crate::search::substring::filter_notes;
use log::{debug, error, info, warn};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, NoteStoreError>;

/// Store error for note use-cases.
#[derive(Debug)]
pub enum NoteStoreError {
    /// Create was called with an empty string.
    EmptyContent,
    /// Storage failure surfaced at initialization.
    Storage(StorageError),
}

impl Display for NoteStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "note content must not be empty"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyContent => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<StorageError> for NoteStoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// What to do when the slot holds data that cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptSlotPolicy {
    /// Start from an empty collection and keep the diagnostic.
    #[default]
    Reset,
    /// Refuse to initialize.
    Fail,
}

/// Note store facade over a slot repository and a notice sink.
pub struct NoteStore<S: KeyValueStore, N: Notifier> {
    repo: NoteCollectionRepository<S>,
    notifier: N,
    notes: Vec<Note>,
    load_diagnostic: Option<StorageError>,
    last_write_error: Option<StorageError>,
}

impl<S: KeyValueStore, N: Notifier> NoteStore<S, N> {
    /// Loads the collection from the slot and returns a ready store.
    ///
    /// # Errors
    /// - Storage transport failures always propagate.
    /// - Undecodable slot data propagates only under `CorruptSlotPolicy::Fail`.
    pub fn initialize(
        repo: NoteCollectionRepository<S>,
        notifier: N,
        policy: CorruptSlotPolicy,
    ) -> StoreResult<Self> {
        let mut load_diagnostic = None;
        let notes = match repo.load() {
            Ok(Some(notes)) => notes,
            Ok(None) => Vec::new(),
            Err(err @ StorageError::Parse(_)) => match policy {
                CorruptSlotPolicy::Fail => {
                    error!(
                        "event=store_init module=store status=error key={} error={}",
                        repo.key(),
                        err
                    );
                    return Err(err.into());
                }
                CorruptSlotPolicy::Reset => {
                    warn!(
                        "event=store_init module=store status=reset key={} error={}",
                        repo.key(),
                        err
                    );
                    load_diagnostic = Some(err);
                    Vec::new()
                }
            },
            Err(err) => return Err(err.into()),
        };

        info!(
            "event=store_init module=store status=ok key={} note_count={}",
            repo.key(),
            notes.len()
        );

        Ok(Self {
            repo,
            notifier,
            notes,
            load_diagnostic,
            last_write_error: None,
        })
    }

    /// Creates a note and prepends it to the collection.
    ///
    /// Emptiness is checked on the raw string; whitespace is kept as-is.
    ///
    /// # Errors
    /// - `NoteStoreError::EmptyContent`; an error notice is emitted and the
    ///   slot is not written.
    pub fn create(&mut self, content: &str) -> StoreResult<Note> {
        if content.is_empty() {
            self.notifier.notify(NoticeKind::Error, NOTICE_EMPTY_CONTENT);
            return Err(NoteStoreError::EmptyContent);
        }

        let note = Note::new(content);
        self.notes.insert(0, note.clone());
        info!(
            "event=note_create module=store status=ok id={} content_len={} note_count={}",
            note.id,
            note.content.chars().count(),
            self.notes.len()
        );
        self.persist_logged();
        Ok(note)
    }

    /// Removes the note with `id` and rewrites the slot.
    ///
    /// Unknown ids leave the collection unchanged. The slot is rewritten and
    /// the success notice emitted either way. Returns whether a note was
    /// removed.
    pub fn delete(&mut self, id: &NoteId) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != *id);
        let removed = self.notes.len() != before;
        if removed {
            info!("event=note_delete module=store status=ok id={id}");
        } else {
            debug!("event=note_delete module=store status=noop reason=unknown_id id={id}");
        }

        self.notifier.notify(NoticeKind::Success, NOTICE_NOTE_DELETED);
        self.persist_logged();
        removed
    }

    /// Returns notes whose content contains `query`, ignoring case.
    ///
    /// An empty query returns the whole collection in order.
    pub fn search(&self, query: &str) -> Vec<&Note> {
        filter_notes(&self.notes, query)
    }

    /// Writes the full collection to the slot.
    pub fn persist(&mut self) -> StorageResult<()> {
        self.repo.save(&self.notes)
    }

    /// Current collection, newest first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == *id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Decode failure swallowed at initialization, if any.
    pub fn load_diagnostic(&self) -> Option<&StorageError> {
        self.load_diagnostic.as_ref()
    }

    /// Failure of the most recent slot write; cleared by a successful write.
    pub fn last_write_error(&self) -> Option<&StorageError> {
        self.last_write_error.as_ref()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn repository(&self) -> &NoteCollectionRepository<S> {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut NoteCollectionRepository<S> {
        &mut self.repo
    }

    fn persist_logged(&mut self) {
        match self.persist() {
            Ok(()) => {
                debug!(
                    "event=slot_write module=store status=ok note_count={}",
                    self.notes.len()
                );
                self.last_write_error = None;
            }
            Err(err) => {
                error!(
                    "event=slot_write module=store status=error note_count={} error={}",
                    self.notes.len(),
                    err
                );
                self.last_write_error = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CorruptSlotPolicy, NoteStore};
    use crate::notify::MemoryNotifier;
    use crate::repo::note_repo::NoteCollectionRepository;
    use crate::repo::slot_repo::MemoryKeyValueStore;

    fn empty_store() -> NoteStore<MemoryKeyValueStore, MemoryNotifier> {
        NoteStore::initialize(
            NoteCollectionRepository::new(MemoryKeyValueStore::new()),
            MemoryNotifier::new(),
            CorruptSlotPolicy::Reset,
        )
        .unwrap()
    }

    #[test]
    fn get_finds_created_note() {
        let mut store = empty_store();
        let note = store.create("find me").unwrap();
        assert_eq!(store.get(&note.id), Some(&note));
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }

    #[test]
    fn successful_write_clears_previous_write_error() {
        let mut store = empty_store();
        store.repository_mut().slot_mut().set_fail_writes(true);
        store.create("first").unwrap();
        assert!(store.last_write_error().is_some());

        store.repository_mut().slot_mut().set_fail_writes(false);
        store.create("second").unwrap();
        assert!(store.last_write_error().is_none());
        assert_eq!(store.repository().load().unwrap().unwrap().len(), 2);
    }
}
