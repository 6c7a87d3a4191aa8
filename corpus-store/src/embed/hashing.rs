//! Offline, deterministic feature-hashing embedder.
//!
//! Lowercased word unigrams and character trigrams are hashed with BLAKE3 into
//! a fixed number of signed buckets and the result is L2-normalized. BLAKE3
//! output does not depend on the platform or build, so a persisted index stays
//! queryable across runs.

use std::{future::Future, pin::Pin};

use crate::embed::EmbeddingsProvider;
use crate::errors::IndexError;

/// Default vector dimensionality.
pub const DEFAULT_HASHING_DIM: usize = 384;

const TRIGRAM_WEIGHT: f32 = 0.5;

#[derive(Clone, Debug)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    /// # Errors
    /// `IndexError::Config` when `dim == 0`.
    pub fn new(dim: usize) -> Result<Self, IndexError> {
        if dim == 0 {
            return Err(IndexError::Config("hashing dimension must be > 0".into()));
        }
        Ok(Self { dim })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Synchronous core used by the async provider impl.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dim];
        let lower = text.to_lowercase();

        for word in lower
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|w| !w.is_empty())
        {
            self.accumulate(&mut v, b"w:", word, 1.0);
        }

        let chars: Vec<char> = lower.chars().filter(|c| !c.is_whitespace()).collect();
        for tri in chars.windows(3) {
            let gram: String = tri.iter().collect();
            self.accumulate(&mut v, b"c:", &gram, TRIGRAM_WEIGHT);
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }

    fn accumulate(&self, v: &mut [f32], prefix: &[u8], feature: &str, weight: f32) {
        let mut hasher = blake3::Hasher::new();
        hasher.update(prefix);
        hasher.update(feature.as_bytes());
        let digest = hasher.finalize();
        let bytes = digest.as_bytes();

        let mut word = [0u8; 8];
        word.copy_from_slice(&bytes[..8]);
        let bucket = (u64::from_le_bytes(word) % self.dim as u64) as usize;
        let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
        v[bucket] += sign * weight;
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            dim: DEFAULT_HASHING_DIM,
        }
    }
}

impl EmbeddingsProvider for HashingEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.embed_text(text)) })
    }

    fn id(&self) -> String {
        format!("hashing-blake3-{}", self.dim)
    }
}
