//! Capture surface state machine.
//!
//! # Responsibility
//! - Collect note content from typed text or streamed transcription.
//! - Hand the finished draft to the note store on submit.
//! - Own the speech recognizer for the lifetime of the surface.
//!
//! # Invariants
//! - At most one recording session is active; events from any other session
//!   are ignored.
//! - Every draft mutation re-evaluates the empty-draft guard.
//! - Submit, cancel and close always stop an active stream first.
//! - Nothing reaches the store unless the draft is non-empty.

use crate::capture::speech::{
    transcript_from_results, SpeechConfig, SpeechEvent, SpeechRecognizer,
};
use crate::model::note::Note;
use crate::notify::{
    NoticeKind, Notifier, NOTICE_EMPTY_CONTENT, NOTICE_NOTE_SAVED, NOTICE_SPEECH_START_FAILED,
    NOTICE_SPEECH_UNAVAILABLE,
};
use crate::repo::slot_repo::KeyValueStore;
use crate::service::note_store::{NoteStore, NoteStoreError};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

/// Identifier of one recording session, used to drop stale events.
pub type SessionId = Uuid;

/// Current capture mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Initial view offering voice or text.
    IdleOnboarding,
    /// Manual typing, or editing a stopped transcript.
    TextEntry,
    /// Speech stream active.
    Recording {
        session_id: SessionId,
        started_at: Instant,
    },
}

impl CaptureMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IdleOnboarding => "idle_onboarding",
            Self::TextEntry => "text_entry",
            Self::Recording { .. } => "recording",
        }
    }
}

/// Capture-layer error for rejected user actions.
#[derive(Debug)]
pub enum CaptureError {
    /// Submit with an empty draft.
    EmptyContent,
    /// Host offers no speech capability.
    CapabilityUnavailable,
    /// A recording session is already running.
    AlreadyRecording,
    /// Action not allowed from the current mode.
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
    /// Recognizer refused to start.
    SpeechStart(String),
    Store(NoteStoreError),
}

impl Display for CaptureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "cannot submit an empty note"),
            Self::CapabilityUnavailable => write!(f, "speech capability is unavailable"),
            Self::AlreadyRecording => write!(f, "a recording session is already active"),
            Self::InvalidTransition { from, action } => {
                write!(f, "cannot `{action}` while in `{from}` mode")
            }
            Self::SpeechStart(message) => write!(f, "speech start failed: {message}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CaptureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteStoreError> for CaptureError {
    fn from(value: NoteStoreError) -> Self {
        Self::Store(value)
    }
}

/// One capture surface with its recognizer and notice sink.
pub struct CaptureSurface<R: SpeechRecognizer, N: Notifier> {
    recognizer: R,
    notifier: N,
    speech_config: SpeechConfig,
    mode: CaptureMode,
    draft: String,
}

impl<R: SpeechRecognizer, N: Notifier> CaptureSurface<R, N> {
    /// Creates a surface in `IdleOnboarding` with an empty draft.
    pub fn new(recognizer: R, notifier: N, speech_config: SpeechConfig) -> Self {
        Self {
            recognizer,
            notifier,
            speech_config,
            mode: CaptureMode::IdleOnboarding,
            draft: String::new(),
        }
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.mode, CaptureMode::Recording { .. })
    }

    /// Session id of the running recording, if any.
    pub fn active_session(&self) -> Option<SessionId> {
        match self.mode {
            CaptureMode::Recording { session_id, .. } => Some(session_id),
            _ => None,
        }
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Switches onboarding to manual typing.
    pub fn choose_text(&mut self) -> Result<(), CaptureError> {
        match self.mode {
            CaptureMode::IdleOnboarding => {
                self.mode = CaptureMode::TextEntry;
                debug!("event=capture_mode module=capture from=idle_onboarding to=text_entry");
                Ok(())
            }
            CaptureMode::TextEntry => Ok(()),
            CaptureMode::Recording { .. } => Err(self.invalid("choose_text")),
        }
    }

    /// Starts a recording session from onboarding.
    ///
    /// # Errors
    /// - `CapabilityUnavailable` with an info notice when the host has no
    ///   recognizer; the mode is unchanged.
    /// - `SpeechStart` with an error notice when the recognizer fails to start.
    pub fn choose_voice(&mut self) -> Result<SessionId, CaptureError> {
        match self.mode {
            CaptureMode::IdleOnboarding => {}
            CaptureMode::Recording { .. } => return Err(CaptureError::AlreadyRecording),
            CaptureMode::TextEntry => return Err(self.invalid("choose_voice")),
        }

        if !self.recognizer.is_available() {
            info!("event=speech_start module=capture status=unavailable");
            self.notifier
                .notify(NoticeKind::Info, NOTICE_SPEECH_UNAVAILABLE);
            return Err(CaptureError::CapabilityUnavailable);
        }

        self.recognizer.configure(&self.speech_config);
        if let Err(err) = self.recognizer.start() {
            error!("event=speech_start module=capture status=error error={err}");
            self.notifier
                .notify(NoticeKind::Error, NOTICE_SPEECH_START_FAILED);
            return Err(CaptureError::SpeechStart(err.to_string()));
        }

        let session_id = Uuid::new_v4();
        self.mode = CaptureMode::Recording {
            session_id,
            started_at: Instant::now(),
        };
        info!(
            "event=speech_start module=capture status=ok session_id={} language={}",
            session_id, self.speech_config.language
        );
        Ok(session_id)
    }

    /// Applies one recognizer event to the active session.
    pub fn on_speech_event(&mut self, session_id: SessionId, event: SpeechEvent) {
        if self.active_session() != Some(session_id) {
            debug!(
                "event=speech_event module=capture status=ignored reason=stale_session session_id={session_id}"
            );
            return;
        }

        match event {
            SpeechEvent::Result { results } => {
                self.draft = transcript_from_results(&results);
                self.apply_draft_guard();
            }
            SpeechEvent::Error { message } => {
                error!(
                    "event=speech_event module=capture status=error session_id={} error={}",
                    session_id, message
                );
                self.recognizer.stop();
                self.mode = CaptureMode::TextEntry;
            }
        }
    }

    /// Stops recording and keeps the transcript editable.
    pub fn stop_recording(&mut self) {
        if let CaptureMode::Recording {
            session_id,
            started_at,
        } = self.mode
        {
            self.recognizer.stop();
            self.mode = CaptureMode::TextEntry;
            info!(
                "event=speech_stop module=capture status=ok session_id={} duration_ms={}",
                session_id,
                started_at.elapsed().as_millis()
            );
        }
    }

    /// Replaces the draft with user-edited text.
    pub fn edit_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        self.apply_draft_guard();
    }

    /// Hands the draft to `store` and resets the surface.
    ///
    /// # Errors
    /// - `EmptyContent` with an error notice; mode and draft are unchanged.
    pub fn submit<S: KeyValueStore, M: Notifier>(
        &mut self,
        store: &mut NoteStore<S, M>,
    ) -> Result<Note, CaptureError> {
        if self.draft.is_empty() {
            self.notifier.notify(NoticeKind::Error, NOTICE_EMPTY_CONTENT);
            return Err(CaptureError::EmptyContent);
        }

        self.stop_recording();
        let note = store.create(&self.draft)?;
        self.notifier.notify(NoticeKind::Success, NOTICE_NOTE_SAVED);
        self.reset();
        Ok(note)
    }

    /// Discards the draft without creating a note.
    pub fn cancel(&mut self) {
        self.stop_active_stream();
        self.reset();
    }

    /// Closing the surface behaves like cancel.
    pub fn close(&mut self) {
        self.cancel();
    }

    fn apply_draft_guard(&mut self) {
        match self.mode {
            CaptureMode::TextEntry if self.draft.is_empty() => {
                self.mode = CaptureMode::IdleOnboarding;
            }
            CaptureMode::IdleOnboarding if !self.draft.is_empty() => {
                self.mode = CaptureMode::TextEntry;
            }
            _ => {}
        }
    }

    fn stop_active_stream(&mut self) {
        if self.is_recording() {
            self.recognizer.stop();
        }
    }

    fn reset(&mut self) {
        self.draft.clear();
        self.mode = CaptureMode::IdleOnboarding;
    }

    fn invalid(&self, action: &'static str) -> CaptureError {
        CaptureError::InvalidTransition {
            from: self.mode.as_str(),
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CaptureMode, CaptureSurface};
    use crate::capture::speech::{SpeechConfig, UnavailableRecognizer};
    use crate::notify::MemoryNotifier;

    #[test]
    fn typing_into_onboarding_enters_text_entry() {
        let mut surface = CaptureSurface::new(
            UnavailableRecognizer,
            MemoryNotifier::new(),
            SpeechConfig::default(),
        );
        surface.edit_draft("x");
        assert_eq!(surface.mode(), CaptureMode::TextEntry);
        surface.edit_draft("");
        assert_eq!(surface.mode(), CaptureMode::IdleOnboarding);
    }

    #[test]
    fn mode_labels_are_stable() {
        assert_eq!(CaptureMode::IdleOnboarding.as_str(), "idle_onboarding");
        assert_eq!(CaptureMode::TextEntry.as_str(), "text_entry");
    }
}
