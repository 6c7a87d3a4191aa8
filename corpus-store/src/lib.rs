//! Reference corpus indexing and context retrieval.
//!
//! - [`CorpusIndexer`] loads reference files, cuts them into overlapping
//!   [`TextWindow`]s and replaces the index in one call.
//! - [`ContextRetriever`] returns the top-k windows for a query as a
//!   [`RetrievedContext`] ready to be rendered into a prompt.
//! - [`IndexBackend`] is the store seam: [`LocalIndex`] (flat JSON file, exact
//!   cosine) or [`QdrantIndex`]. Backends own embedding via [`EmbeddingsProvider`].

mod backend;
mod config;
mod embed;
mod errors;
mod ingest;
mod local_index;
mod progress;
mod qdrant_facade;
mod qdrant_index;
mod record;
mod retrieve;
mod splitter;

pub use backend::{IndexBackend, IndexFuture};
pub use config::{
    DEFAULT_WINDOW_OVERLAP, DEFAULT_WINDOW_SIZE, LocalIndexConfig, QdrantIndexConfig,
    WindowConfig,
};
pub use embed::hashing::{DEFAULT_HASHING_DIM, HashingEmbedder};
pub use embed::ollama::{OllamaConfig, OllamaEmbedder};
pub use embed::{EmbeddingsProvider, cosine, embed_all};
pub use errors::IndexError;
pub use ingest::{CORPUS_EXTENSIONS, CorpusIndexer, IndexStats};
pub use local_index::{INDEX_FILE, LocalIndex};
pub use progress::{IndicatifProgress, NoopProgress, Progress};
pub use qdrant_index::QdrantIndex;
pub use record::{ReferenceDocument, ScoredWindow, TextWindow};
pub use retrieve::{ContextRetriever, DEFAULT_TOP_K, RetrievedContext};
pub use splitter::split_document;
