//! Note domain model.
//!
//! # Responsibility
//! - Define the immutable record rendered by note cards.
//! - Own the serialized field names used by the durable storage slot.
//!
//! # Invariants
//! - `id` is generated once and never reused for another note.
//! - `content` is never empty for a persisted note.
//! - Notes have no edit operation; all fields are fixed after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for one note.
///
/// Stored ids are opaque strings. Notes created here use a UUID v4 string,
/// but any id already present in the slot is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Generates a fresh UUID v4 id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for NoteId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// Validation failures for note records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyContent,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "note content must not be empty"),
        }
    }
}

impl Error for NoteValidationError {}

/// User-authored note with identity, creation time and text body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// Serialized as `date`; `createdAt` is accepted when reading.
    #[serde(rename = "date", alias = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub content: String,
}

impl Note {
    /// Creates a note with a fresh id stamped with the current time.
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_id(NoteId::generate(), Utc::now(), content)
    }

    /// Creates a note from existing identity and timestamp.
    ///
    /// Used by decode paths; does not validate `content`.
    pub fn with_id(id: NoteId, created_at: DateTime<Utc>, content: impl Into<String>) -> Self {
        Self {
            id,
            created_at,
            content: content.into(),
        }
    }

    /// Checks record invariants before persistence.
    ///
    /// Emptiness is tested on the raw string; whitespace-only content is valid.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.content.is_empty() {
            return Err(NoteValidationError::EmptyContent);
        }
        Ok(())
    }
}
