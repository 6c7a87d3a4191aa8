//! Generator adapter: one [`TextGenerator`] capability, several backends.
//!
//! - [`OllamaService`]: local Ollama (`/api/generate`, `/api/embeddings`)
//! - [`OpenAiService`]: OpenAI-compatible chat completions
//! - [`StubGenerator`]: deterministic canned answers for offline runs and tests
//!
//! Backends are built from an explicit [`LlmModelConfig`]; nothing in this
//! crate reads the environment.

pub mod config;
pub mod error_handler;
pub mod generator;
pub mod services;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{AiLlmError, ConfigError, ProviderError, ProviderErrorKind};
pub use generator::{GeneratorBackend, TextGenerator};
pub use services::ollama_service::OllamaService;
pub use services::open_ai_service::OpenAiService;
pub use services::stub_service::StubGenerator;
