//! Subcommand handlers: wire explicit config into the library crates.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use ado_publisher::{AdoPublisher, PublishMode};
use ai_llm_service::{GeneratorBackend, LlmModelConfig, OllamaService, TextGenerator};
use anyhow::{Context, Result};
use artifact_forge::{
    ArtifactSelection, ArtifactType, Pipeline, PipelineConfig, offline_generator,
};
use corpus_store::{
    ContextRetriever, CorpusIndexer, DEFAULT_HASHING_DIM, EmbeddingsProvider, HashingEmbedder,
    IndexBackend, IndicatifProgress, LocalIndex, LocalIndexConfig, OllamaConfig, OllamaEmbedder,
    QdrantIndex,
};
use tracing::info;

use crate::cli::{Cli, Command};
use crate::config::{AppConfig, EmbedderKind, IndexSettings};

pub async fn run(cli: Cli) -> Result<()> {
    let mut cfg = AppConfig::from_env().context("invalid configuration")?;
    if let Some(out) = cli.out {
        cfg.output_dir = out;
    }

    match cli.command {
        Command::Ingest { corpus } => {
            if !corpus.is_empty() {
                cfg.corpus_paths = corpus;
            }
            ingest(&cfg).await
        }
        Command::Generate {
            input,
            llm,
            model,
            agent,
            top_k,
        } => {
            if let Some(provider) = llm {
                cfg.llm.provider = provider;
            }
            if model.is_some() {
                cfg.llm.model = model;
            }
            let top_k = top_k.unwrap_or(cfg.top_k);
            generate(&cfg, &input, agent, top_k).await
        }
        Command::Push { input, dry_run } => {
            let path = input.unwrap_or_else(|| cfg.output_dir.join(ArtifactType::TestCase.file_name()));
            let mode = if dry_run {
                PublishMode::DryRun
            } else {
                PublishMode::Live
            };
            push(&cfg, &path, mode).await
        }
    }
}

async fn ingest(cfg: &AppConfig) -> Result<()> {
    let backend = build_backend(cfg)?;
    let indexer = CorpusIndexer::new(backend, cfg.window)?;

    let docs = indexer.load_documents(&cfg.corpus_paths);
    anyhow::ensure!(
        !docs.is_empty(),
        "no reference documents found under {:?}",
        cfg.corpus_paths
    );

    let progress = IndicatifProgress::new();
    let stats = indexer.index_documents(&docs, &progress).await?;
    println!(
        "Indexed {} documents into {} windows in {} ms",
        stats.documents, stats.windows, stats.duration_ms
    );
    Ok(())
}

async fn generate(
    cfg: &AppConfig,
    input: &Path,
    selection: ArtifactSelection,
    top_k: usize,
) -> Result<()> {
    let user_input = read_input(input)?;
    let backend = build_backend(cfg)?;
    let generator: Arc<dyn TextGenerator> = Arc::new(
        GeneratorBackend::from_config(cfg.llm.model_config()?, offline_generator())
            .context("cannot build generator backend")?,
    );

    let pipeline = Pipeline::new(
        ContextRetriever::new(backend),
        generator,
        PipelineConfig {
            top_k,
            selection,
            output_dir: cfg.output_dir.clone(),
        },
    );
    let report = pipeline.run(&user_input).await?;

    println!("Artifacts written to {}", cfg.output_dir.display());
    for artifact in &report.artifacts {
        let note = if artifact.outcome.is_degraded() {
            " (synthetic fallback)"
        } else {
            ""
        };
        println!("  {}: {}{note}", artifact.artifact, artifact.path.display());
    }
    println!("  trace: {}", report.trace_path.display());
    Ok(())
}

async fn push(cfg: &AppConfig, path: &Path, mode: PublishMode) -> Result<()> {
    let publisher = AdoPublisher::new(cfg.ado.clone())?;
    let outcomes = publisher.publish_file(path, mode).await?;
    info!(records = outcomes.len(), "publish finished");
    println!("{}", serde_json::to_string_pretty(&outcomes)?);
    Ok(())
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("cannot read acceptance criteria from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(input)
        .with_context(|| format!("cannot read acceptance criteria from {}", input.display()))
}

fn build_embedder(cfg: &AppConfig) -> Result<Arc<dyn EmbeddingsProvider>> {
    let embedder: Arc<dyn EmbeddingsProvider> = match cfg.embedder.kind {
        EmbedderKind::Hashing => Arc::new(HashingEmbedder::new(
            cfg.embedder.dim.unwrap_or(DEFAULT_HASHING_DIM),
        )?),
        EmbedderKind::Ollama => {
            let svc = OllamaService::new(LlmModelConfig::ollama(
                cfg.llm.ollama_endpoint.clone(),
                cfg.embedder.model.clone(),
            ))?;
            Arc::new(OllamaEmbedder::new(OllamaConfig {
                svc: Arc::new(svc),
                dim: cfg.embedder.dim,
            }))
        }
    };
    Ok(embedder)
}

fn build_backend(cfg: &AppConfig) -> Result<Arc<dyn IndexBackend>> {
    let embedder = build_embedder(cfg)?;
    let backend: Arc<dyn IndexBackend> = match &cfg.index {
        IndexSettings::Local { dir } => Arc::new(LocalIndex::new(
            LocalIndexConfig::new(dir.clone()),
            embedder,
        )),
        IndexSettings::Qdrant(q) => {
            q.validate()?;
            Arc::new(QdrantIndex::new(q, embedder)?)
        }
    };
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config(root: &Path) -> AppConfig {
        let mut cfg = AppConfig::from_lookup(|k| match k {
            "LLM_KIND" => Some("stub".into()),
            _ => None,
        })
        .unwrap();
        cfg.output_dir = root.join("out");
        cfg.index = IndexSettings::Local {
            dir: root.join("index"),
        };
        cfg.corpus_paths = vec![root.join("corpus")];
        cfg
    }

    #[tokio::test]
    async fn ingest_then_generate_offline() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("corpus")).unwrap();
        std::fs::write(
            tmp.path().join("corpus/LoginTest.java"),
            "public class LoginTest { ApiClient api; WebClient web; }",
        )
        .unwrap();
        std::fs::write(tmp.path().join("story.txt"), "User can log in").unwrap();
        let cfg = offline_config(tmp.path());

        ingest(&cfg).await.unwrap();
        generate(&cfg, &tmp.path().join("story.txt"), ArtifactSelection::Both, 3)
            .await
            .unwrap();

        assert!(cfg.output_dir.join("ado_testcases.yaml").is_file());
        assert!(cfg.output_dir.join("TestSuiteGenerated.java").is_file());
        assert!(cfg.output_dir.join("raw_output.txt").is_file());
    }

    #[tokio::test]
    async fn generate_without_index_fails_at_retrieval() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("story.txt"), "anything").unwrap();
        let cfg = offline_config(tmp.path());

        let err = generate(&cfg, &tmp.path().join("story.txt"), ArtifactSelection::Both, 3)
            .await
            .unwrap_err();
        let pipeline_err = err.downcast_ref::<artifact_forge::PipelineError>().unwrap();
        assert_eq!(pipeline_err.stage(), artifact_forge::Stage::Retrieval);
        assert!(!cfg.output_dir.exists());
    }

    #[tokio::test]
    async fn ingest_rejects_empty_corpus() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = offline_config(tmp.path());
        assert!(ingest(&cfg).await.is_err());
    }
}
