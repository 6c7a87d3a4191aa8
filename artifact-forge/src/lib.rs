//! Turns acceptance criteria into a test-case YAML document and a TestNG
//! script skeleton.
//!
//! The [`Pipeline`] retrieves reference context, builds a role prompt per
//! artifact, asks a [`TextGenerator`](ai_llm_service::TextGenerator) and
//! repairs whatever comes back with the total normalizers in [`normalize`].

pub mod artifact;
pub mod errors;
pub mod model;
pub mod normalize;
pub mod offline;
pub mod pipeline;
pub mod prompt;
pub mod writer;

pub use artifact::{ArtifactSelection, ArtifactType};
pub use errors::{PipelineError, PipelineResult, Stage};
pub use model::{TestCaseDocument, TestCaseRecord, TestParameter, TestStep, TESTCASE_ROOT_KEY};
pub use normalize::{
    NormalizationOutcome, ScriptReport, TestCaseOutcome, normalize, normalize_script,
    normalize_testcase,
};
pub use offline::offline_generator;
pub use pipeline::{ArtifactReport, Pipeline, PipelineConfig, PipelineReport};
pub use prompt::build_prompt;
pub use writer::{ArtifactWriter, TRACE_FILE, WrittenFiles};
