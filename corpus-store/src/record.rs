//! Data records flowing through ingestion and retrieval.

use serde::{Deserialize, Serialize};

/// A reference document loaded from the corpus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceDocument {
    /// Provenance label (file path as given or discovered).
    pub source: String,
    pub text: String,
}

impl ReferenceDocument {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }
}

/// Contiguous slice of a [`ReferenceDocument`]; the unit of indexing and retrieval.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextWindow {
    /// Stable SHA-256 hex digest of (source, ordinal, text).
    pub id: String,
    pub source: String,
    /// Position of the window within its document.
    pub ordinal: u32,
    /// Offset of the first character within the document (in chars).
    pub start_char: usize,
    pub text: String,
}

/// One search hit.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredWindow {
    pub id: String,
    pub source: String,
    pub text: String,
    /// Similarity; higher is closer.
    pub score: f32,
}
