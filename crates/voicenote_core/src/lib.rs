//! Core domain logic for VoiceNote.
//! This crate owns the note collection, its storage slot and the capture
//! state machine; hosts only render and forward events.

pub mod capture;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod search;
pub mod service;

pub use capture::speech::{
    SpeechAlternative, SpeechConfig, SpeechError, SpeechEvent, SpeechRecognizer, SpeechResult,
    UnavailableRecognizer,
};
pub use capture::surface::{CaptureError, CaptureMode, CaptureSurface, SessionId};
pub use config::{ConfigError, CoreConfig, DEFAULT_DB_FILE};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId, NoteValidationError};
pub use notify::{LogNotifier, MemoryNotifier, Notice, NoticeKind, Notifier};
pub use repo::note_repo::{NoteCollectionRepository, DEFAULT_STORAGE_KEY};
pub use repo::slot_repo::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};
pub use search::substring::{filter_notes, NoteQuery};
pub use service::note_store::{CorruptSlotPolicy, NoteStore, NoteStoreError, StoreResult};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
