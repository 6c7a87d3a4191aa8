//! Embedding providers and the bounded-concurrency embedding executor.

use std::{future::Future, pin::Pin};

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::errors::IndexError;

pub mod hashing;
pub mod ollama;

/// Provider interface for embedding generation.
///
/// Async because real providers (Ollama) perform HTTP requests.
pub trait EmbeddingsProvider: Send + Sync {
    /// Embeds one text.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>>;

    /// Identifier persisted next to vectors; an index is only queryable with the same id.
    fn id(&self) -> String;
}

/// Embeds `texts` with at most `concurrency` calls in flight, preserving input order.
///
/// # Errors
/// The first provider error, or [`IndexError::VectorSizeMismatch`] when vectors
/// disagree on dimensionality.
pub async fn embed_all(
    texts: &[&str],
    provider: &dyn EmbeddingsProvider,
    concurrency: usize,
) -> Result<Vec<Vec<f32>>, IndexError> {
    info!(
        "embed_all: total={} concurrency={} provider={}",
        texts.len(),
        concurrency,
        provider.id()
    );

    let pending: Vec<_> = texts.iter().map(|text| provider.embed(text)).collect();
    let vectors: Vec<Vec<f32>> = stream::iter(pending)
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    if let Some(first) = vectors.first() {
        let want = first.len();
        if let Some(bad) = vectors.iter().find(|v| v.len() != want) {
            return Err(IndexError::VectorSizeMismatch {
                got: bad.len(),
                want,
            });
        }
    }

    debug!("embed_all: {} vectors ready", vectors.len());
    Ok(vectors)
}

/// Cosine similarity; zero vectors score 0.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut na, mut nb) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::hashing::HashingEmbedder;

    #[test]
    fn cosine_basics() {
        assert!((cosine(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn embed_all_preserves_order() {
        let emb = HashingEmbedder::default();
        let texts = ["alpha", "beta", "gamma"];
        let all = embed_all(&texts, &emb, 2).await.unwrap();
        for (text, vector) in texts.iter().zip(&all) {
            assert_eq!(vector, &emb.embed(text).await.unwrap());
        }
    }
}
