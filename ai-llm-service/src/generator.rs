//! The generator capability the pipeline is written against.
//!
//! [`TextGenerator`] is the only seam: one operation, prompt in, text out.
//! [`GeneratorBackend`] is the enum-dispatched set of concrete backends and
//! carries no logic beyond picking one from an [`LlmModelConfig`].

use futures::future::BoxFuture;
use tracing::info;

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::Result;
use crate::services::ollama_service::OllamaService;
use crate::services::open_ai_service::OpenAiService;
use crate::services::stub_service::StubGenerator;

/// Opaque text generator.
///
/// Implementations may be nondeterministic and make no promise about the
/// shape of the returned text.
pub trait TextGenerator: Send + Sync {
    /// Produces text for `prompt`.
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>>;

    /// Short label for logs (`ollama:llama3`, `stub`, ...).
    fn name(&self) -> String;
}

impl TextGenerator for StubGenerator {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move { Ok(self.respond(prompt).to_string()) })
    }

    fn name(&self) -> String {
        "stub".to_string()
    }
}

impl TextGenerator for OllamaService {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(OllamaService::generate(self, prompt))
    }

    fn name(&self) -> String {
        format!("ollama:{}", self.model())
    }
}

impl TextGenerator for OpenAiService {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(OpenAiService::generate(self, prompt, None))
    }

    fn name(&self) -> String {
        format!("openai:{}", self.model())
    }
}

/// Concrete backends selectable by [`LlmProvider`].
pub enum GeneratorBackend {
    Ollama(OllamaService),
    OpenAi(OpenAiService),
    Stub(StubGenerator),
}

impl GeneratorBackend {
    /// Builds the backend named by `cfg.provider`.
    ///
    /// `offline` is the stub used when the provider is [`LlmProvider::Stub`];
    /// it is dropped otherwise.
    ///
    /// # Errors
    /// Construction errors of the selected service (config, missing API key, TLS init).
    pub fn from_config(cfg: LlmModelConfig, offline: StubGenerator) -> Result<Self> {
        let backend = match cfg.provider {
            LlmProvider::Ollama => GeneratorBackend::Ollama(OllamaService::new(cfg)?),
            LlmProvider::OpenAI => GeneratorBackend::OpenAi(OpenAiService::new(cfg)?),
            LlmProvider::Stub => GeneratorBackend::Stub(offline),
        };
        info!(backend = %backend.name(), "generator backend selected");
        Ok(backend)
    }
}

impl TextGenerator for GeneratorBackend {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
        match self {
            GeneratorBackend::Ollama(svc) => TextGenerator::generate(svc, prompt),
            GeneratorBackend::OpenAi(svc) => TextGenerator::generate(svc, prompt),
            GeneratorBackend::Stub(stub) => TextGenerator::generate(stub, prompt),
        }
    }

    fn name(&self) -> String {
        match self {
            GeneratorBackend::Ollama(svc) => svc.name(),
            GeneratorBackend::OpenAi(svc) => svc.name(),
            GeneratorBackend::Stub(stub) => stub.name(),
        }
    }
}
