//! Windowing and index backend configuration.

use std::path::PathBuf;

use crate::errors::IndexError;

/// Default window length in characters.
pub const DEFAULT_WINDOW_SIZE: usize = 800;
/// Default number of characters shared by adjacent windows.
pub const DEFAULT_WINDOW_OVERLAP: usize = 100;

/// How documents are cut into overlapping windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowConfig {
    /// Maximum window length in characters.
    pub size: usize,
    /// Characters shared between adjacent windows.
    pub overlap: usize,
}

impl WindowConfig {
    /// Validated constructor.
    ///
    /// # Errors
    /// `IndexError::Config` unless `size > 0` and `size > overlap`.
    pub fn new(size: usize, overlap: usize) -> Result<Self, IndexError> {
        let cfg = Self { size, overlap };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), IndexError> {
        if self.size == 0 {
            return Err(IndexError::Config("window size must be > 0".into()));
        }
        if self.overlap >= self.size {
            return Err(IndexError::Config(format!(
                "window overlap ({}) must be smaller than window size ({})",
                self.overlap, self.size
            )));
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_WINDOW_SIZE,
            overlap: DEFAULT_WINDOW_OVERLAP,
        }
    }
}

/// On-disk flat index settings.
#[derive(Clone, Debug)]
pub struct LocalIndexConfig {
    /// Directory holding `index.json`.
    pub dir: PathBuf,
    /// Maximum number of concurrent embedding calls during indexing.
    pub embed_concurrency: usize,
}

impl LocalIndexConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            embed_concurrency: 4,
        }
    }
}

/// Qdrant collection settings.
#[derive(Clone, Debug)]
pub struct QdrantIndexConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub url: String,
    /// Optional API key for Qdrant Cloud.
    pub api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Upsert batch size (typical range: 128..512).
    pub upsert_batch: usize,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
    /// Maximum number of concurrent embedding calls during indexing.
    pub embed_concurrency: usize,
}

impl QdrantIndexConfig {
    /// Sane defaults for a given endpoint and collection.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            collection: collection.into(),
            upsert_batch: 256,
            exact_search: true,
            embed_concurrency: 4,
        }
    }

    pub fn validate(&self) -> Result<(), IndexError> {
        if self.url.trim().is_empty() {
            return Err(IndexError::Config("qdrant url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(IndexError::Config("collection is empty".into()));
        }
        if self.upsert_batch == 0 {
            return Err(IndexError::Config("upsert_batch must be > 0".into()));
        }
        Ok(())
    }
}
