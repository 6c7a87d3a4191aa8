use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use ai_llm_service::{AiLlmError, TextGenerator};
use artifact_forge::offline::{OFFLINE_SCRIPT_RESPONSE, OFFLINE_TESTCASE_RESPONSE};
use artifact_forge::{
    ArtifactSelection, ArtifactType, NormalizationOutcome, Pipeline, PipelineConfig, Stage,
    TestCaseDocument, TestCaseOutcome, offline_generator,
};
use corpus_store::{
    ContextRetriever, CorpusIndexer, HashingEmbedder, IndexBackend, LocalIndex, LocalIndexConfig,
    NoopProgress, ReferenceDocument, WindowConfig,
};
use futures::future::BoxFuture;

async fn indexed_retriever(dir: &Path) -> ContextRetriever {
    let backend: Arc<dyn IndexBackend> = Arc::new(LocalIndex::new(
        LocalIndexConfig::new(dir.join("index")),
        Arc::new(HashingEmbedder::default()),
    ));
    CorpusIndexer::new(backend.clone(), WindowConfig::default())
        .unwrap()
        .index_documents(
            &[
                ReferenceDocument::new("sqm/WebClient.java", "web.open(path); web.click(selector);"),
                ReferenceDocument::new("ado/template.md", "Test case template: title, area path, priority, steps."),
            ],
            &NoopProgress,
        )
        .await
        .unwrap();
    ContextRetriever::new(backend)
}

fn config(out: &Path, selection: ArtifactSelection) -> PipelineConfig {
    PipelineConfig {
        top_k: 6,
        selection,
        output_dir: out.to_path_buf(),
    }
}

/// Answers test-case prompts, fails on script prompts.
struct FailsOnScript;

impl TextGenerator for FailsOnScript {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, AiLlmError>> {
        Box::pin(async move {
            if prompt.contains("ScriptAgent") {
                Err(AiLlmError::Timeout(Duration::from_secs(1)))
            } else {
                Ok(OFFLINE_TESTCASE_RESPONSE.to_string())
            }
        })
    }

    fn name(&self) -> String {
        "fails-on-script".into()
    }
}

#[tokio::test]
async fn offline_run_writes_both_artifacts_and_trace() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("outputs");
    let pipeline = Pipeline::new(
        indexed_retriever(dir.path()).await,
        Arc::new(offline_generator()),
        config(&out, ArtifactSelection::Both),
    );

    let report = pipeline.run("User can log in with valid credentials").await.unwrap();
    assert_eq!(report.retrieved_windows, 2);
    assert_eq!(report.artifacts.len(), 2);
    assert_eq!(
        report.artifacts[0].outcome,
        NormalizationOutcome::TestCase(TestCaseOutcome::Verbatim)
    );

    let yaml = std::fs::read_to_string(out.join("ado_testcases.yaml")).unwrap();
    let doc = TestCaseDocument::from_yaml(&yaml).unwrap();
    assert_eq!(doc.ado_testcases[0].title.as_deref(), Some("Generated Test"));

    let java = std::fs::read_to_string(out.join("TestSuiteGenerated.java")).unwrap();
    assert!(java.starts_with("import org.testng.annotations.Test;\n"));
    assert_eq!(java.matches("@Test").count(), 1);

    let trace = std::fs::read_to_string(&report.trace_path).unwrap();
    assert_eq!(
        trace,
        format!("{OFFLINE_TESTCASE_RESPONSE}\n\n{OFFLINE_SCRIPT_RESPONSE}")
    );
}

#[tokio::test]
async fn selection_limits_generated_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("outputs");
    let pipeline = Pipeline::new(
        indexed_retriever(dir.path()).await,
        Arc::new(offline_generator()),
        config(&out, ArtifactSelection::Script),
    );

    let report = pipeline.run("checkout flow").await.unwrap();
    assert_eq!(report.artifacts.len(), 1);
    assert_eq!(report.artifacts[0].artifact, ArtifactType::Script);
    assert!(!out.join("ado_testcases.yaml").exists());
}

#[tokio::test]
async fn generator_failure_leaves_no_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("outputs");
    let pipeline = Pipeline::new(
        indexed_retriever(dir.path()).await,
        Arc::new(FailsOnScript),
        config(&out, ArtifactSelection::Both),
    );

    let err = pipeline.run("login").await.unwrap_err();
    assert_eq!(err.stage(), Stage::Generation);
    assert!(!out.exists());
}

#[tokio::test]
async fn missing_index_fails_at_retrieval() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("outputs");
    let backend: Arc<dyn IndexBackend> = Arc::new(LocalIndex::new(
        LocalIndexConfig::new(dir.path().join("never-built")),
        Arc::new(HashingEmbedder::default()),
    ));
    let pipeline = Pipeline::new(
        ContextRetriever::new(backend),
        Arc::new(offline_generator()),
        config(&out, ArtifactSelection::Both),
    );

    let err = pipeline.run("login").await.unwrap_err();
    assert_eq!(err.stage(), Stage::Retrieval);
    assert!(!out.exists());
}
