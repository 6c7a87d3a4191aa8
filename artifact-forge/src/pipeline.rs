//! One generation invocation: retrieve → prompt → generate → normalize → write.
//!
//! Stages run strictly in order. Every selected artifact is generated and
//! normalized before anything touches the output directory, and the files are
//! then staged and renamed together, so a failed invocation leaves the
//! previous artifacts in place.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use ai_llm_service::TextGenerator;
use corpus_store::{ContextRetriever, DEFAULT_TOP_K};
use tracing::{debug, info, warn};

use crate::artifact::{ArtifactSelection, ArtifactType};
use crate::errors::{PipelineError, PipelineResult};
use crate::normalize::{NormalizationOutcome, normalize};
use crate::prompt::build_prompt;
use crate::writer::ArtifactWriter;

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Windows retrieved per invocation.
    pub top_k: usize,
    pub selection: ArtifactSelection,
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            selection: ArtifactSelection::Both,
            output_dir: PathBuf::from("outputs"),
        }
    }
}

/// Per-artifact result of a successful invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtifactReport {
    pub artifact: ArtifactType,
    pub path: PathBuf,
    pub outcome: NormalizationOutcome,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PipelineReport {
    pub artifacts: Vec<ArtifactReport>,
    pub trace_path: PathBuf,
    pub retrieved_windows: usize,
    pub duration_ms: u128,
}

pub struct Pipeline {
    retriever: ContextRetriever,
    generator: Arc<dyn TextGenerator>,
    writer: ArtifactWriter,
    cfg: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        retriever: ContextRetriever,
        generator: Arc<dyn TextGenerator>,
        cfg: PipelineConfig,
    ) -> Self {
        Self {
            retriever,
            generator,
            writer: ArtifactWriter::new(cfg.output_dir.clone()),
            cfg,
        }
    }

    /// Runs one invocation for `user_input`.
    ///
    /// # Errors
    /// [`PipelineError::IndexUnavailable`], [`PipelineError::GeneratorFailure`]
    /// or [`PipelineError::Write`]; [`PipelineError::stage`] names the stage.
    pub async fn run(&self, user_input: &str) -> PipelineResult<PipelineReport> {
        let started = Instant::now();

        let context = self.retriever.retrieve(user_input, self.cfg.top_k).await?;
        let rendered = context.render();
        debug!(windows = context.len(), context_len = rendered.len(), "context ready");

        let mut raw_outputs = Vec::new();
        let mut normalized = Vec::new();
        for &artifact in self.cfg.selection.artifacts() {
            let prompt = build_prompt(artifact, user_input, &rendered);
            debug!(%artifact, generator = %self.generator.name(), prompt_len = prompt.len(), "generating");

            let raw = self
                .generator
                .generate(&prompt)
                .await
                .map_err(|source| PipelineError::GeneratorFailure { artifact, source })?;

            let (text, outcome) = normalize(artifact, &raw);
            if outcome.is_degraded() {
                warn!(%artifact, ?outcome, "generated content replaced by synthetic content");
            }
            raw_outputs.push(raw);
            normalized.push((artifact, text, outcome));
        }

        let texts: Vec<(ArtifactType, String)> = normalized
            .iter()
            .map(|(artifact, text, _)| (*artifact, text.clone()))
            .collect();
        let written = self.writer.commit(&texts, &raw_outputs)?;

        let artifacts = normalized
            .into_iter()
            .zip(written.artifacts)
            .map(|((artifact, _, outcome), path)| ArtifactReport {
                artifact,
                path,
                outcome,
            })
            .collect();

        let report = PipelineReport {
            artifacts,
            trace_path: written.trace,
            retrieved_windows: context.len(),
            duration_ms: started.elapsed().as_millis(),
        };
        info!(
            output_dir = %self.writer.dir().display(),
            artifacts = report.artifacts.len(),
            retrieved = report.retrieved_windows,
            duration_ms = report.duration_ms as u64,
            "pipeline finished"
        );
        Ok(report)
    }
}
