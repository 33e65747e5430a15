//! Speech-to-text capability contract.
//!
//! # Responsibility
//! - Describe the recognizer the capture surface drives (detect, configure,
//!   start, stop).
//! - Define the interim-result events a recognizer pushes back.
//!
//! # Invariants
//! - `stop()` is idempotent and must be a no-op when nothing is recording.
//! - A running transcript is the in-order concatenation of each result's
//!   best alternative; it replaces, never appends to, the previous one.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Recognizer settings applied before every session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// BCP 47 language tag.
    pub language: String,
    /// Keep listening until explicitly stopped.
    pub continuous: bool,
    /// Emit partial results while the user is speaking.
    pub interim_results: bool,
    pub max_alternatives: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: "pt-BR".to_string(),
            continuous: true,
            interim_results: true,
            max_alternatives: 1,
        }
    }
}

/// One candidate transcription.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechAlternative {
    pub transcript: String,
    pub confidence: Option<f32>,
}

impl SpeechAlternative {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            confidence: None,
        }
    }
}

/// One recognized segment; alternatives are ordered best first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpeechResult {
    pub alternatives: Vec<SpeechAlternative>,
    pub is_final: bool,
}

impl SpeechResult {
    /// Interim result with a single alternative.
    pub fn interim(transcript: impl Into<String>) -> Self {
        Self {
            alternatives: vec![SpeechAlternative::new(transcript)],
            is_final: false,
        }
    }

    pub fn best(&self) -> Option<&SpeechAlternative> {
        self.alternatives.first()
    }
}

/// Event pushed by a recognizer while a session is active.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    /// Every result recognized so far in the session.
    Result { results: Vec<SpeechResult> },
    /// Recognizer-internal failure.
    Error { message: String },
}

/// Failure reported by a recognizer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    Unavailable,
    Start(String),
}

impl Display for SpeechError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "speech recognition is not available"),
            Self::Start(message) => write!(f, "speech recognition failed to start: {message}"),
        }
    }
}

impl Error for SpeechError {}

/// Host-provided speech-to-text capability.
pub trait SpeechRecognizer {
    /// Capability detection, evaluated at call time.
    fn is_available(&self) -> bool;
    fn configure(&mut self, config: &SpeechConfig);
    fn start(&mut self) -> Result<(), SpeechError>;
    /// Stops the audio stream. Safe to call when not recording.
    fn stop(&mut self);
}

impl<R: SpeechRecognizer + ?Sized> SpeechRecognizer for Box<R> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn configure(&mut self, config: &SpeechConfig) {
        (**self).configure(config);
    }

    fn start(&mut self) -> Result<(), SpeechError> {
        (**self).start()
    }

    fn stop(&mut self) {
        (**self).stop();
    }
}

/// Recognizer for hosts without any speech capability.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableRecognizer;

impl SpeechRecognizer for UnavailableRecognizer {
    fn is_available(&self) -> bool {
        false
    }

    fn configure(&mut self, _config: &SpeechConfig) {}

    fn start(&mut self) -> Result<(), SpeechError> {
        Err(SpeechError::Unavailable)
    }

    fn stop(&mut self) {}
}

/// Builds the running transcript from a result snapshot.
///
/// Results with no alternatives contribute nothing.
pub fn transcript_from_results(results: &[SpeechResult]) -> String {
    results
        .iter()
        .filter_map(SpeechResult::best)
        .fold(String::new(), |mut text, alternative| {
            text.push_str(&alternative.transcript);
            text
        })
}
