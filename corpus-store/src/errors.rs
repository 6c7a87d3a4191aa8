//! Unified error type for indexing and retrieval.

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Top-level error for corpus-store operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The index is missing, unreadable, empty or was built incompatibly.
    #[error("index unavailable: {0}")]
    Unavailable(String),

    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing / serialization errors.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Embedding backend failure.
    #[error("embedding error: {0}")]
    Embedding(#[from] AiLlmError),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Mismatch in vector dimensionality.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },
}

impl IndexError {
    /// True when the failure means "no usable index", as opposed to a write-side fault.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, IndexError::Unavailable(_))
    }
}
