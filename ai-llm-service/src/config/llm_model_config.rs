use std::fmt;
use std::time::Duration;

use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{
    ConfigError, Result, validate_http_endpoint, validate_range_f32,
};

/// Default request timeout when the config does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Configuration for one generator backend.
///
/// Built once at startup (from env/CLI in the binary) and handed to the
/// backend constructor; the services never read the environment themselves.
///
/// # Fields
///
/// - `provider`: which backend to use.
/// - `model`: model identifier (e.g., `"llama3"`, `"gpt-4o-mini"`).
/// - `endpoint`: base URL of the inference server.
/// - `api_key`: optional API key (required for OpenAI).
/// - `max_tokens`: maximum number of tokens to generate.
/// - `temperature`: sampling temperature (`0.0..=2.0`).
/// - `top_p`: nucleus sampling cutoff (`0.0..=1.0`).
/// - `timeout_secs`: request timeout in seconds.
#[derive(Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Ollama config with the usual local defaults.
    pub fn ollama(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: LlmProvider::Ollama,
            model: model.into(),
            endpoint: endpoint.into(),
            api_key: None,
            max_tokens: None,
            temperature: Some(0.2),
            top_p: None,
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Config for the offline stub backend. Endpoint and model are informational.
    pub fn stub() -> Self {
        Self {
            provider: LlmProvider::Stub,
            model: "stub".into(),
            endpoint: "stub://local".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: None,
        }
    }

    /// Effective request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Checks the fields a network backend relies on.
    ///
    /// The stub backend only needs a model label, so endpoint checks are skipped for it.
    ///
    /// # Errors
    /// [`ConfigError::EmptyModel`], [`ConfigError::InvalidFormat`] or
    /// [`ConfigError::OutOfRange`] wrapped in [`crate::AiLlmError`].
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        if self.provider != LlmProvider::Stub {
            validate_http_endpoint("endpoint", &self.endpoint)?;
        }
        if let Some(t) = self.temperature {
            validate_range_f32("temperature", t, 0.0, 2.0)?;
        }
        if let Some(p) = self.top_p {
            validate_range_f32("top_p", p, 0.0, 1.0)?;
        }
        Ok(())
    }
}

// Manual impl keeps the API key out of logs.
impl fmt::Debug for LlmModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmModelConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
