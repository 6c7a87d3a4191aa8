//! [`IndexBackend`] over a Qdrant collection.

use std::sync::Arc;

use qdrant_client::Payload;
use qdrant_client::qdrant::PointStruct;
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::{IndexBackend, IndexFuture};
use crate::config::QdrantIndexConfig;
use crate::embed::{EmbeddingsProvider, embed_all};
use crate::errors::IndexError;
use crate::qdrant_facade::QdrantFacade;
use crate::record::{ScoredWindow, TextWindow};

pub struct QdrantIndex {
    facade: QdrantFacade,
    embedder: Arc<dyn EmbeddingsProvider>,
    upsert_batch: usize,
    embed_concurrency: usize,
}

impl QdrantIndex {
    pub fn new(
        cfg: &QdrantIndexConfig,
        embedder: Arc<dyn EmbeddingsProvider>,
    ) -> Result<Self, IndexError> {
        Ok(Self {
            facade: QdrantFacade::new(cfg)?,
            embedder,
            upsert_batch: cfg.upsert_batch.max(1),
            embed_concurrency: cfg.embed_concurrency,
        })
    }

    async fn replace_all(&self, windows: &[TextWindow]) -> Result<usize, IndexError> {
        let texts: Vec<&str> = windows.iter().map(|w| w.text.as_str()).collect();
        let vectors = embed_all(&texts, self.embedder.as_ref(), self.embed_concurrency).await?;
        match rebuild_plan(&vectors) {
            Rebuild::Drop => {
                warn!(
                    collection = self.facade.collection(),
                    "no windows to index; dropping collection"
                );
                self.facade.drop_collection().await?;
                return Ok(0);
            }
            Rebuild::Recreate { dim } => self.facade.recreate_collection(dim).await?,
        }

        let embedder_id = self.embedder.id();
        let mut points = Vec::with_capacity(windows.len());
        for (w, vector) in windows.iter().zip(vectors) {
            let payload = Payload::try_from(serde_json::json!({
                "window_id": w.id,
                "source": w.source,
                "ordinal": w.ordinal,
                "text": w.text,
                "embedder": embedder_id,
            }))
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;
            points.push(PointStruct::new(stable_uuid(&w.id).to_string(), vector, payload));
        }

        let mut total = 0usize;
        for batch in points.chunks(self.upsert_batch) {
            total += self.facade.upsert_points(batch.to_vec()).await?;
        }

        info!(collection = self.facade.collection(), total, "qdrant index rebuilt");
        Ok(total)
    }

    async fn nearest(&self, query: &str, k: usize) -> Result<Vec<ScoredWindow>, IndexError> {
        let exists = self
            .facade
            .collection_exists()
            .await
            .map_err(|e| IndexError::Unavailable(e.to_string()))?;
        if !exists {
            return Err(IndexError::Unavailable(format!(
                "collection '{}' does not exist; run ingestion first",
                self.facade.collection()
            )));
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let qv = self.embedder.embed(query).await?;
        let hits = self
            .facade
            .search(qv, k as u64)
            .await
            .map_err(|e| IndexError::Unavailable(e.to_string()))?;

        Ok(hits
            .into_iter()
            .map(|(score, payload)| ScoredWindow {
                id: str_field(&payload, "window_id"),
                source: str_field(&payload, "source"),
                text: str_field(&payload, "text"),
                score,
            })
            .collect())
    }
}

impl IndexBackend for QdrantIndex {
    fn index<'a>(&'a self, windows: &'a [TextWindow]) -> IndexFuture<'a, usize> {
        Box::pin(self.replace_all(windows))
    }

    fn search<'a>(&'a self, query: &'a str, k: usize) -> IndexFuture<'a, Vec<ScoredWindow>> {
        Box::pin(self.nearest(query, k))
    }

    fn describe(&self) -> String {
        format!("qdrant:{} ({})", self.facade.collection(), self.embedder.id())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Rebuild {
    /// Nothing to store; the old collection must not survive.
    Drop,
    Recreate { dim: usize },
}

fn rebuild_plan(vectors: &[Vec<f32>]) -> Rebuild {
    match vectors.first() {
        Some(v) => Rebuild::Recreate { dim: v.len() },
        None => Rebuild::Drop,
    }
}

/// Deterministic UUIDv5 from a window id.
fn stable_uuid(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_bytes())
}

fn str_field(payload: &serde_json::Value, key: &str) -> String {
    payload
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_ids_are_stable() {
        assert_eq!(stable_uuid("abc"), stable_uuid("abc"));
        assert_ne!(stable_uuid("abc"), stable_uuid("abd"));
    }

    #[test]
    fn empty_ingestion_drops_the_collection() {
        assert_eq!(rebuild_plan(&[]), Rebuild::Drop);
        assert_eq!(
            rebuild_plan(&[vec![0.0; 8], vec![1.0; 8]]),
            Rebuild::Recreate { dim: 8 }
        );
    }
}
