//! Flat on-disk vector index (`<dir>/index.json`) with exact cosine search.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::backend::{IndexBackend, IndexFuture};
use crate::config::LocalIndexConfig;
use crate::embed::{EmbeddingsProvider, cosine, embed_all};
use crate::errors::IndexError;
use crate::record::{ScoredWindow, TextWindow};

/// File name of the persisted index inside the configured directory.
pub const INDEX_FILE: &str = "index.json";

#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    embedder: String,
    dim: usize,
    created_at: String,
    rows: Vec<IndexRow>,
}

#[derive(Debug, Serialize, Deserialize)]
struct IndexRow {
    id: String,
    source: String,
    text: String,
    vector: Vec<f32>,
}

pub struct LocalIndex {
    cfg: LocalIndexConfig,
    embedder: Arc<dyn EmbeddingsProvider>,
}

impl LocalIndex {
    pub fn new(cfg: LocalIndexConfig, embedder: Arc<dyn EmbeddingsProvider>) -> Self {
        Self { cfg, embedder }
    }

    /// Path of the index file.
    pub fn path(&self) -> PathBuf {
        self.cfg.dir.join(INDEX_FILE)
    }

    async fn write_index(&self, windows: &[TextWindow]) -> Result<usize, IndexError> {
        let texts: Vec<&str> = windows.iter().map(|w| w.text.as_str()).collect();
        let vectors = embed_all(&texts, self.embedder.as_ref(), self.cfg.embed_concurrency).await?;
        let dim = vectors.first().map_or(0, Vec::len);

        let file = IndexFile {
            embedder: self.embedder.id(),
            dim,
            created_at: Utc::now().to_rfc3339(),
            rows: windows
                .iter()
                .zip(vectors)
                .map(|(w, vector)| IndexRow {
                    id: w.id.clone(),
                    source: w.source.clone(),
                    text: w.text.clone(),
                    vector,
                })
                .collect(),
        };

        tokio::fs::create_dir_all(&self.cfg.dir).await?;
        let path = self.path();
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec(&file)?).await?;
        tokio::fs::rename(&tmp, &path).await?;

        info!(path = %path.display(), rows = file.rows.len(), dim, "local index written");
        Ok(file.rows.len())
    }

    async fn load_index(&self) -> Result<IndexFile, IndexError> {
        let path = self.path();
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            IndexError::Unavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        let file: IndexFile = serde_json::from_slice(&bytes).map_err(|e| {
            IndexError::Unavailable(format!("corrupt index {}: {e}", path.display()))
        })?;

        if file.rows.is_empty() {
            return Err(IndexError::Unavailable(format!(
                "index {} holds no windows",
                path.display()
            )));
        }
        let current = self.embedder.id();
        if file.embedder != current {
            warn!(built_with = %file.embedder, %current, "embedder mismatch");
            return Err(IndexError::Unavailable(format!(
                "index was built with `{}`, current embedder is `{current}`; re-run ingestion",
                file.embedder
            )));
        }
        Ok(file)
    }

    async fn search_index(&self, query: &str, k: usize) -> Result<Vec<ScoredWindow>, IndexError> {
        let file = self.load_index().await?;
        let qv = self.embedder.embed(query).await?;
        if qv.len() != file.dim {
            return Err(IndexError::VectorSizeMismatch {
                got: qv.len(),
                want: file.dim,
            });
        }

        let mut scored: Vec<ScoredWindow> = file
            .rows
            .into_iter()
            .map(|row| ScoredWindow {
                score: cosine(&qv, &row.vector),
                id: row.id,
                source: row.source,
                text: row.text,
            })
            .collect();
        // `sort_by` is stable: ties keep index order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);

        debug!(hits = scored.len(), k, "local search completed");
        Ok(scored)
    }
}

impl IndexBackend for LocalIndex {
    fn index<'a>(&'a self, windows: &'a [TextWindow]) -> IndexFuture<'a, usize> {
        Box::pin(self.write_index(windows))
    }

    fn search<'a>(&'a self, query: &'a str, k: usize) -> IndexFuture<'a, Vec<ScoredWindow>> {
        Box::pin(self.search_index(query, k))
    }

    fn describe(&self) -> String {
        format!("local:{} ({})", self.path().display(), self.embedder.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::hashing::HashingEmbedder;

    fn window(id: &str, text: &str) -> TextWindow {
        TextWindow {
            id: id.into(),
            source: format!("{id}.md"),
            ordinal: 0,
            start_char: 0,
            text: text.into(),
        }
    }

    #[tokio::test]
    async fn missing_index_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let idx = LocalIndex::new(
            LocalIndexConfig::new(dir.path().join("absent")),
            Arc::new(HashingEmbedder::default()),
        );
        let err = idx.search("anything", 3).await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn corrupt_or_empty_index_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let idx = LocalIndex::new(
            LocalIndexConfig::new(dir.path()),
            Arc::new(HashingEmbedder::default()),
        );

        std::fs::write(idx.path(), b"{ not json").unwrap();
        assert!(idx.search("q", 1).await.unwrap_err().is_unavailable());

        idx.index(&[]).await.unwrap();
        assert!(idx.search("q", 1).await.unwrap_err().is_unavailable());
    }

    #[tokio::test]
    async fn other_embedder_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let built = LocalIndex::new(
            LocalIndexConfig::new(dir.path()),
            Arc::new(HashingEmbedder::new(64).unwrap()),
        );
        built.index(&[window("a", "login page")]).await.unwrap();

        let reader = LocalIndex::new(
            LocalIndexConfig::new(dir.path()),
            Arc::new(HashingEmbedder::new(128).unwrap()),
        );
        assert!(reader.search("login", 1).await.unwrap_err().is_unavailable());
    }

    #[tokio::test]
    async fn reindex_replaces_previous_rows() {
        let dir = tempfile::tempdir().unwrap();
        let idx = LocalIndex::new(
            LocalIndexConfig::new(dir.path()),
            Arc::new(HashingEmbedder::default()),
        );
        idx.index(&[window("old", "old text"), window("older", "older text")])
            .await
            .unwrap();
        assert_eq!(idx.index(&[window("new", "new text")]).await.unwrap(), 1);

        let hits = idx.search("text", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "new");
    }
}
