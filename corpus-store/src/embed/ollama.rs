//! Ollama embedding provider over `ai-llm-service`.

use std::sync::Arc;
use std::{future::Future, pin::Pin};

use ai_llm_service::OllamaService;

use crate::embed::EmbeddingsProvider;
use crate::errors::IndexError;

/// Configuration for the Ollama embedding backend.
#[derive(Clone)]
pub struct OllamaConfig {
    pub svc: Arc<OllamaService>,
    /// Expected embedding dimension; `None` accepts whatever the model returns.
    pub dim: Option<usize>,
}

/// Ollama embedding provider (async).
#[derive(Clone)]
pub struct OllamaEmbedder {
    svc: Arc<OllamaService>,
    dim: Option<usize>,
}

impl OllamaEmbedder {
    pub fn new(cfg: OllamaConfig) -> Self {
        Self {
            svc: cfg.svc,
            dim: cfg.dim,
        }
    }
}

impl EmbeddingsProvider for OllamaEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>> {
        Box::pin(async move {
            let resp = self.svc.embeddings(text).await?;
            if let Some(want) = self.dim {
                if resp.len() != want {
                    return Err(IndexError::VectorSizeMismatch {
                        got: resp.len(),
                        want,
                    });
                }
            }
            Ok(resp)
        })
    }

    fn id(&self) -> String {
        format!("ollama-{}", self.svc.model())
    }
}
