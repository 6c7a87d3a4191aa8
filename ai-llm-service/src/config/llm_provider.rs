use std::fmt;
use std::str::FromStr;

use crate::error_handler::ConfigError;

/// Represents the backend used for text generation.
///
/// `Stub` is a deterministic in-process backend: it never touches the network
/// and answers from a fixed rule list, which keeps offline runs and tests
/// reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime.
    Ollama,
    /// OpenAI-compatible chat completion API.
    OpenAI,
    /// Deterministic canned responses.
    Stub,
}

impl LlmProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            LlmProvider::Ollama => "ollama",
            LlmProvider::OpenAI => "openai",
            LlmProvider::Stub => "stub",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    /// Case-insensitive; accepts `chatgpt` as an alias of `openai`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(LlmProvider::Ollama),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            "stub" | "offline" => Ok(LlmProvider::Stub),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}
