//! Pipeline error taxonomy.

use std::fmt;
use std::path::PathBuf;

use ai_llm_service::AiLlmError;
use corpus_store::IndexError;
use thiserror::Error;

use crate::artifact::ArtifactType;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Stage of an invocation, for user-facing failure reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Retrieval,
    Generation,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Retrieval => "retrieval",
            Stage::Generation => "generation",
            Stage::Write => "write",
        })
    }
}

/// Fatal invocation failure. Normalization has no error path.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Retrieval could not proceed.
    #[error("index unavailable: {0}")]
    IndexUnavailable(#[source] IndexError),

    /// The generator backend call failed.
    #[error("generator failed for {artifact}: {source}")]
    GeneratorFailure {
        artifact: ArtifactType,
        #[source]
        source: AiLlmError,
    },

    /// Writing an artifact or the trace failed.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::IndexUnavailable(_) => Stage::Retrieval,
            PipelineError::GeneratorFailure { .. } => Stage::Generation,
            PipelineError::Write { .. } => Stage::Write,
        }
    }
}

impl From<IndexError> for PipelineError {
    fn from(err: IndexError) -> Self {
        PipelineError::IndexUnavailable(err)
    }
}
