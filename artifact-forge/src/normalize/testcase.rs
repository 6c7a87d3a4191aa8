//! Repair of raw generator output into a test-case document.

use tracing::{debug, warn};

use crate::model::TESTCASE_ROOT_LITERAL;
use crate::normalize::boundary::{find_start, find_trailing_fence};

/// Synthetic single-record document used when nothing usable was generated.
pub const FALLBACK_TESTCASE_DOCUMENT: &str = "ado_testcases:
  - title: Generated Test Case
    area_path: \"\"
    priority: 2
    steps:
      - step: Execute test
        expected: Success
    tags: [automation]
";

/// How the raw text was turned into the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestCaseOutcome {
    /// Raw output was already a document.
    Verbatim,
    /// Leading preamble and/or a trailing fenced postamble was cut.
    Trimmed { dropped_lines: usize },
    /// Nothing usable; the synthetic document was substituted.
    Fallback,
}

/// Normalized test-case document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedTestCase {
    pub text: String,
    pub outcome: TestCaseOutcome,
}

/// Total: any input yields text whose trimmed form starts with `ado_testcases:`.
pub fn normalize_testcase(raw: &str) -> NormalizedTestCase {
    let Some((start, leading)) = find_start(raw) else {
        warn!("no test-case content found in generator output; using fallback document");
        return fallback();
    };

    let mut body = &raw[start..];
    let mut trailing = 0usize;
    if let Some((cut, dropped)) = find_trailing_fence(body) {
        body = &body[..cut];
        trailing = dropped;
    }

    if !body.trim_start().starts_with(TESTCASE_ROOT_LITERAL) {
        warn!("candidate test-case body does not start with the root key; using fallback document");
        return fallback();
    }

    let outcome = match leading + trailing {
        0 => TestCaseOutcome::Verbatim,
        dropped_lines => TestCaseOutcome::Trimmed { dropped_lines },
    };
    debug!(?outcome, "test-case output normalized");
    NormalizedTestCase {
        text: body.to_string(),
        outcome,
    }
}

fn fallback() -> NormalizedTestCase {
    NormalizedTestCase {
        text: FALLBACK_TESTCASE_DOCUMENT.to_string(),
        outcome: TestCaseOutcome::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TestCaseDocument;

    #[test]
    fn well_formed_output_is_returned_byte_for_byte() {
        let raw = "ado_testcases:\n  - title: X\n    steps:\n      - step: A\n        expected: B\n";
        let n = normalize_testcase(raw);
        assert_eq!(n.text, raw);
        assert_eq!(n.outcome, TestCaseOutcome::Verbatim);
    }

    #[test]
    fn preamble_is_stripped() {
        let n = normalize_testcase("Sure, here you go:\nado_testcases:\n  - title: X\n");
        assert_eq!(n.text, "ado_testcases:\n  - title: X\n");
        assert_eq!(n.outcome, TestCaseOutcome::Trimmed { dropped_lines: 1 });
    }

    #[test]
    fn fenced_answer_loses_both_fences() {
        let raw = "```yaml\nado_testcases:\n  - title: X\n```\nLet me know!";
        let n = normalize_testcase(raw);
        assert_eq!(n.text, "ado_testcases:\n  - title: X\n");
        assert_eq!(n.outcome, TestCaseOutcome::Trimmed { dropped_lines: 3 });
    }

    #[test]
    fn fence_inside_block_scalar_is_kept() {
        let raw = "ado_testcases:\n  - title: Run script\n    steps:\n      - step: |\n          ```\n          ./run.sh\n          ```\n        expected: exit 0\n    tags: [cli]\n";
        let n = normalize_testcase(raw);
        assert_eq!(n.text, raw);
        assert_eq!(n.outcome, TestCaseOutcome::Verbatim);

        let doc = TestCaseDocument::from_yaml(&n.text).unwrap();
        let rec = &doc.ado_testcases[0];
        assert!(rec.steps[0].step.contains("./run.sh"));
        assert_eq!(rec.steps[0].expected, "exit 0");
        assert_eq!(rec.tags, vec!["cli"]);
    }

    #[test]
    fn refusal_yields_fallback() {
        let n = normalize_testcase("I cannot help with that.");
        assert_eq!(n.text, FALLBACK_TESTCASE_DOCUMENT);
        assert_eq!(n.outcome, TestCaseOutcome::Fallback);
    }

    #[test]
    fn list_before_root_key_yields_fallback() {
        let n = normalize_testcase("Steps:\n- open page\nado_testcases:\n  - title: X\n");
        assert_eq!(n.outcome, TestCaseOutcome::Fallback);
    }

    #[test]
    fn empty_input_yields_fallback() {
        assert_eq!(normalize_testcase("").outcome, TestCaseOutcome::Fallback);
    }

    #[test]
    fn fallback_document_parses() {
        let doc = TestCaseDocument::from_yaml(FALLBACK_TESTCASE_DOCUMENT).unwrap();
        assert_eq!(doc.ado_testcases.len(), 1);
        assert_eq!(doc.ado_testcases[0].steps.len(), 1);
        assert_eq!(doc.ado_testcases[0].priority, Some(2));
    }
}
