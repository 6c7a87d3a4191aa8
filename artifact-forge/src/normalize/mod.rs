//! Total, pure repair of raw generator output.

pub mod boundary;
pub mod script;
pub mod testcase;

use crate::artifact::ArtifactType;

pub use script::{NormalizedScript, ScriptReport, normalize_script};
pub use testcase::{NormalizedTestCase, TestCaseOutcome, normalize_testcase};

/// What normalization did, per artifact type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalizationOutcome {
    TestCase(TestCaseOutcome),
    Script(ScriptReport),
}

impl NormalizationOutcome {
    /// True when generated content was replaced by synthetic content.
    pub fn is_degraded(&self) -> bool {
        match self {
            NormalizationOutcome::TestCase(o) => *o == TestCaseOutcome::Fallback,
            NormalizationOutcome::Script(r) => r.discarded_class_lines > 0,
        }
    }
}

/// Normalizes `raw` for `artifact`; never fails.
pub fn normalize(artifact: ArtifactType, raw: &str) -> (String, NormalizationOutcome) {
    match artifact {
        ArtifactType::TestCase => {
            let n = normalize_testcase(raw);
            (n.text, NormalizationOutcome::TestCase(n.outcome))
        }
        ArtifactType::Script => {
            let n = normalize_script(raw);
            (n.text, NormalizationOutcome::Script(n.report))
        }
    }
}
