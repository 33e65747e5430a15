//! Note capture: typed text or streamed speech transcription.
//!
//! The recognizer is an external capability consumed through
//! [`speech::SpeechRecognizer`]; the state machine lives in [`surface`].

pub mod speech;
pub mod surface;
