//! Case-insensitive substring matching over note content.
//!
//! # Invariants
//! - An empty query matches every note and preserves collection order.
//! - Query and content are both lower-cased before the substring test.
//! - Filtering never mutates or reorders the input.

use crate::model::note::Note;

/// Lower-cased query ready to be tested against many notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteQuery {
    folded: String,
}

impl NoteQuery {
    pub fn new(text: &str) -> Self {
        Self {
            folded: text.to_lowercase(),
        }
    }

    /// Returns whether this query filters nothing.
    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// Tests one note against the query.
    pub fn matches(&self, note: &Note) -> bool {
        self.is_empty() || note.content.to_lowercase().contains(&self.folded)
    }
}

/// Returns the subsequence of `notes` matching `query`.
pub fn filter_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    let query = NoteQuery::new(query);
    if query.is_empty() {
        return notes.iter().collect();
    }
    notes.iter().filter(|note| query.matches(note)).collect()
}
