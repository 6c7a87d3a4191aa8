//! Thin Ollama client for text generation and embeddings.
//!
//! - `POST {endpoint}/api/generate`: non-streaming generation (`stream=false`)
//! - `POST {endpoint}/api/embeddings`: single embeddings vector
//!
//! # Examples
//!
//! ```no_run
//! use ai_llm_service::{LlmModelConfig, OllamaService};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = OllamaService::new(LlmModelConfig::ollama("http://localhost:11434", "llama3"))?;
//! let text = svc.generate("List three login edge cases.").await?;
//! println!("{text}");
//! # Ok(()) }
//! ```

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{
    AiLlmError, HttpError, ProviderError, ProviderErrorKind, Result, make_snippet,
};

/// Ollama client bound to one model config.
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    timeout: Duration,
    url_generate: String,
    url_embeddings: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - `InvalidProvider` if `cfg.provider` is not Ollama
    /// - config validation errors (endpoint scheme, empty model, ranges)
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(
                ProviderError::new(LlmProvider::Ollama, ProviderErrorKind::InvalidProvider).into(),
            );
        }
        cfg.validate()?;

        let timeout = cfg.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .brotli(true)
            .build()?;

        let base = cfg.endpoint.trim().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            url_generate: format!("{base}/api/generate"),
            url_embeddings: format!("{base}/api/embeddings"),
            timeout,
            cfg,
        })
    }

    /// Model this client talks to.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Non-streaming generation via `/api/generate`.
    ///
    /// `num_predict`, `temperature` and `top_p` are taken from the config.
    ///
    /// # Errors
    /// HTTP status, transport, timeout or decode failures.
    #[instrument(skip_all, fields(model = %self.cfg.model, prompt_len = prompt.len()))]
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let started = Instant::now();
        let body = GenerateRequest {
            model: &self.cfg.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.cfg.temperature,
                top_p: self.cfg.top_p,
                num_predict: self.cfg.max_tokens,
            },
        };

        debug!("POST {}", self.url_generate);
        let out: GenerateResponse = self.post_json(&self.url_generate, &body).await?;

        debug!(
            latency_ms = started.elapsed().as_millis(),
            response_len = out.response.len(),
            "ollama generate completed"
        );
        Ok(out.response)
    }

    /// Single embeddings vector via `/api/embeddings`.
    ///
    /// # Errors
    /// HTTP status, transport, timeout or decode failures; an empty vector is a decode error.
    #[instrument(skip_all, fields(model = %self.cfg.model, input_len = input.len()))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>> {
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            prompt: input,
        };

        debug!("POST {}", self.url_embeddings);
        let out: EmbeddingsResponse = self.post_json(&self.url_embeddings, &body).await?;
        if out.embedding.is_empty() {
            return Err(ProviderError::new(
                LlmProvider::Ollama,
                ProviderErrorKind::Decode("empty `embedding` array".into()),
            )
            .into());
        }
        Ok(out.embedding)
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| AiLlmError::from_transport(e, self.timeout))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);
            warn!(%status, url, %snippet, "ollama returned non-success status");
            return Err(ProviderError::new(
                LlmProvider::Ollama,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url: url.to_string(),
                    snippet,
                }),
            )
            .into());
        }

        resp.json::<T>().await.map_err(|e| {
            ProviderError::new(
                LlmProvider::Ollama,
                ProviderErrorKind::Decode(format!("serde error: {e}; ensure `stream=false` is used")),
            )
            .into()
        })
    }
}

/* ==========================
HTTP payloads & options
========================== */

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

/// Subset of Ollama `options`.
#[derive(Debug, Default, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_foreign_provider() {
        let err = OllamaService::new(LlmModelConfig::stub()).err().unwrap();
        assert!(matches!(err, AiLlmError::Provider(_)));
    }

    #[test]
    fn generate_request_omits_unset_options() {
        let body = GenerateRequest {
            model: "llama3",
            prompt: "hi",
            stream: false,
            options: GenerateOptions {
                temperature: Some(0.2),
                ..Default::default()
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["temperature"].as_f64().unwrap() as f32, 0.2);
        assert!(json["options"].get("top_p").is_none());
    }
}
