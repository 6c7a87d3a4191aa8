//! Application configuration, read once from the environment at startup.
//!
//! Everything below the binary receives explicit config values; no library
//! crate reads the environment.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use ado_publisher::{AdoConfig, DEFAULT_ADO_API_VERSION, DEFAULT_ADO_BASE_URL};
use ai_llm_service::config::llm_model_config::DEFAULT_TIMEOUT_SECS;
use ai_llm_service::{AiLlmError, ConfigError, LlmModelConfig, LlmProvider};
use corpus_store::{
    DEFAULT_TOP_K, DEFAULT_WINDOW_OVERLAP, DEFAULT_WINDOW_SIZE, QdrantIndexConfig, WindowConfig,
};

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3";
const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// Where the reference index lives.
#[derive(Clone, Debug)]
pub enum IndexSettings {
    Local { dir: PathBuf },
    Qdrant(QdrantIndexConfig),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbedderKind {
    Hashing,
    Ollama,
}

impl FromStr for EmbedderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hashing" | "offline" => Ok(EmbedderKind::Hashing),
            "ollama" => Ok(EmbedderKind::Ollama),
            _ => Err(ConfigError::InvalidFormat {
                var: "EMBEDDER",
                reason: "expected `hashing` or `ollama`",
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EmbedderSettings {
    pub kind: EmbedderKind,
    pub model: String,
    pub dim: Option<usize>,
}

/// Generator selection; turned into an [`LlmModelConfig`] after CLI overrides.
#[derive(Clone)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    /// Explicit model; wins over the provider-specific one.
    pub model: Option<String>,
    pub ollama_model: Option<String>,
    pub openai_model: Option<String>,
    pub ollama_endpoint: String,
    pub openai_endpoint: String,
    pub openai_api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("ollama_model", &self.ollama_model)
            .field("openai_model", &self.openai_model)
            .field("ollama_endpoint", &self.ollama_endpoint)
            .field("openai_endpoint", &self.openai_endpoint)
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "***"))
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl LlmSettings {
    /// Model config for the selected provider.
    ///
    /// # Errors
    /// Validation errors from [`LlmModelConfig::validate`].
    pub fn model_config(&self) -> Result<LlmModelConfig, AiLlmError> {
        let mut cfg = match self.provider {
            LlmProvider::Ollama => LlmModelConfig::ollama(
                self.ollama_endpoint.clone(),
                self.model_or(self.ollama_model.as_deref(), DEFAULT_OLLAMA_MODEL),
            ),
            LlmProvider::OpenAI => LlmModelConfig {
                provider: LlmProvider::OpenAI,
                model: self.model_or(self.openai_model.as_deref(), DEFAULT_OPENAI_MODEL),
                endpoint: self.openai_endpoint.clone(),
                api_key: self.openai_api_key.clone(),
                max_tokens: None,
                temperature: Some(0.2),
                top_p: None,
                timeout_secs: None,
            },
            LlmProvider::Stub => LlmModelConfig::stub(),
        };
        cfg.max_tokens = self.max_tokens;
        cfg.timeout_secs = Some(self.timeout_secs);
        cfg.validate()?;
        Ok(cfg)
    }

    fn model_or(&self, provider_model: Option<&str>, default: &str) -> String {
        self.model
            .as_deref()
            .or(provider_model)
            .unwrap_or(default)
            .to_string()
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub corpus_paths: Vec<PathBuf>,
    pub index: IndexSettings,
    pub embedder: EmbedderSettings,
    pub window: WindowConfig,
    pub top_k: usize,
    pub llm: LlmSettings,
    pub ado: AdoConfig,
}

impl AppConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, AiLlmError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AiLlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let index = match env.str_or("INDEX_BACKEND", "local").to_ascii_lowercase().as_str() {
            "local" => IndexSettings::Local {
                dir: PathBuf::from(env.str_or("INDEX_DIR", ".vector_store")),
            },
            "qdrant" => {
                let mut q = QdrantIndexConfig::new_default(
                    env.str_or("QDRANT_URL", "http://localhost:6334"),
                    env.str_or("QDRANT_COLLECTION", "testcase_forge"),
                );
                q.api_key = env.opt("QDRANT_API_KEY");
                IndexSettings::Qdrant(q)
            }
            _ => {
                return Err(ConfigError::InvalidFormat {
                    var: "INDEX_BACKEND",
                    reason: "expected `local` or `qdrant`",
                }
                .into());
            }
        };

        let window = WindowConfig {
            size: env.usize_or("WINDOW_SIZE", DEFAULT_WINDOW_SIZE)?,
            overlap: env.usize_or("WINDOW_OVERLAP", DEFAULT_WINDOW_OVERLAP)?,
        };
        if window.validate().is_err() {
            return Err(ConfigError::OutOfRange {
                field: "WINDOW_OVERLAP",
                detail: "window size must be > 0 and larger than the overlap",
            }
            .into());
        }

        let ollama_endpoint = ollama_endpoint(&env)?;

        Ok(Self {
            output_dir: PathBuf::from(env.str_or("OUTPUT_DIR", "outputs")),
            corpus_paths: env
                .str_or("CORPUS_PATHS", "corpus")
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .collect(),
            index,
            embedder: EmbedderSettings {
                kind: env.str_or("EMBEDDER", "hashing").parse()?,
                model: env.str_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
                dim: env.opt_usize("EMBEDDING_DIM")?,
            },
            window,
            top_k: env.usize_or("RAG_TOP_K", DEFAULT_TOP_K)?,
            llm: LlmSettings {
                provider: env.str_or("LLM_KIND", "ollama").parse()?,
                model: None,
                ollama_model: env.opt("OLLAMA_MODEL"),
                openai_model: env.opt("OPENAI_MODEL"),
                ollama_endpoint,
                openai_endpoint: env.str_or("OPENAI_URL", DEFAULT_OPENAI_URL),
                openai_api_key: env.opt("OPENAI_API_KEY"),
                max_tokens: env.opt_u32("LLM_MAX_TOKENS")?,
                timeout_secs: env
                    .opt_u32("LLM_TIMEOUT_SECS")?
                    .map_or(DEFAULT_TIMEOUT_SECS, u64::from),
            },
            ado: AdoConfig {
                base_url: env.str_or("ADO_BASE_URL", DEFAULT_ADO_BASE_URL),
                api_version: env.str_or("ADO_API_VERSION", DEFAULT_ADO_API_VERSION),
                ..AdoConfig::new(env.opt("ADO_ORG"), env.opt("ADO_PROJECT"), env.opt("ADO_PAT"))
            },
        })
    }
}

/// `OLLAMA_URL`, else `http://localhost:{OLLAMA_PORT}`, else the default local endpoint.
fn ollama_endpoint<F>(env: &Env<F>) -> Result<String, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = env.opt("OLLAMA_URL") {
        return Ok(url);
    }
    if let Some(port) = env.opt("OLLAMA_PORT") {
        port.parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
            var: "OLLAMA_PORT",
            reason: "expected u16 (1..=65535)",
        })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Ok(DEFAULT_OLLAMA_URL.to_string())
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn opt(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn str_or(&self, key: &str, default: &str) -> String {
        self.opt(key).unwrap_or_else(|| default.to_string())
    }

    fn opt_u32(&self, key: &'static str) -> Result<Option<u32>, ConfigError> {
        self.opt(key)
            .map(|v| {
                v.parse::<u32>().map_err(|_| ConfigError::InvalidNumber {
                    var: key,
                    reason: "expected u32",
                })
            })
            .transpose()
    }

    fn opt_usize(&self, key: &'static str) -> Result<Option<usize>, ConfigError> {
        self.opt(key)
            .map(|v| {
                v.parse::<usize>().map_err(|_| ConfigError::InvalidNumber {
                    var: key,
                    reason: "expected a non-negative integer",
                })
            })
            .transpose()
    }

    fn usize_or(&self, key: &'static str, default: usize) -> Result<usize, ConfigError> {
        Ok(self.opt_usize(key)?.unwrap_or(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("outputs"));
        assert_eq!(cfg.corpus_paths, vec![PathBuf::from("corpus")]);
        assert_eq!(cfg.top_k, 6);
        assert_eq!(cfg.window, WindowConfig::default());
        assert_eq!(cfg.embedder.kind, EmbedderKind::Hashing);
        assert_eq!(cfg.llm.provider, LlmProvider::Ollama);
        assert_eq!(cfg.llm.ollama_endpoint, "http://localhost:11434");
        assert!(matches!(cfg.index, IndexSettings::Local { .. }));
        assert_eq!(cfg.ado.base_url, "https://dev.azure.com");
    }

    #[test]
    fn reads_lists_ports_and_backends() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("CORPUS_PATHS", "java/sqm-api, docs ,"),
            ("OLLAMA_PORT", "11500"),
            ("INDEX_BACKEND", "qdrant"),
            ("QDRANT_COLLECTION", "refs"),
            ("RAG_TOP_K", "3"),
            ("LLM_KIND", "stub"),
        ]))
        .unwrap();
        assert_eq!(
            cfg.corpus_paths,
            vec![PathBuf::from("java/sqm-api"), PathBuf::from("docs")]
        );
        assert_eq!(cfg.llm.ollama_endpoint, "http://localhost:11500");
        assert_eq!(cfg.top_k, 3);
        match cfg.index {
            IndexSettings::Qdrant(q) => assert_eq!(q.collection, "refs"),
            other => panic!("unexpected index settings: {other:?}"),
        }
        assert_eq!(cfg.llm.model_config().unwrap().provider, LlmProvider::Stub);
    }

    #[test]
    fn rejects_bad_numbers_and_windows() {
        assert!(AppConfig::from_lookup(lookup(&[("RAG_TOP_K", "many")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("OLLAMA_PORT", "99999")])).is_err());
        assert!(
            AppConfig::from_lookup(lookup(&[("WINDOW_SIZE", "50"), ("WINDOW_OVERLAP", "50")]))
                .is_err()
        );
    }

    #[test]
    fn openai_requires_key_only_when_built() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("LLM_KIND", "openai"),
            ("OPENAI_MODEL", "gpt-4o"),
        ]))
        .unwrap();
        let model = cfg.llm.model_config().unwrap();
        assert_eq!(model.model, "gpt-4o");
        assert!(model.api_key.is_none());
    }

    #[test]
    fn provider_models_come_from_the_same_lookup() {
        let mut cfg = AppConfig::from_lookup(lookup(&[
            ("OLLAMA_MODEL", "mistral"),
            ("OPENAI_MODEL", "gpt-4o"),
        ]))
        .unwrap();
        assert_eq!(cfg.llm.model_config().unwrap().model, "mistral");

        cfg.llm.provider = LlmProvider::OpenAI;
        assert_eq!(cfg.llm.model_config().unwrap().model, "gpt-4o");

        cfg.llm.model = Some("llama3.1".into());
        assert_eq!(cfg.llm.model_config().unwrap().model, "llama3.1");
    }
}
