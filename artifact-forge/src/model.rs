//! Typed view of the test-case document.
//!
//! Every per-record field is optional or defaulted: normalization only
//! guarantees the `ado_testcases` container, the rest is best-effort.

use serde::{Deserialize, Deserializer, Serialize};
use serde_yml::Value;

/// Top-level key of the test-case document.
pub const TESTCASE_ROOT_KEY: &str = "ado_testcases";
/// The root key as it opens the document.
pub const TESTCASE_ROOT_LITERAL: &str = "ado_testcases:";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCaseDocument {
    #[serde(default)]
    pub ado_testcases: Vec<TestCaseRecord>,
}

impl TestCaseDocument {
    /// Parses a normalized test-case document.
    ///
    /// # Errors
    /// YAML syntax errors or a container of the wrong shape.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yml::Error> {
        serde_yml::from_str(text)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCaseRecord {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub area_path: Option<String>,
    /// Non-numeric priorities (`High`, `P1`) read as unset.
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Option<u32>,
    #[serde(default)]
    pub steps: Vec<TestStep>,
    #[serde(default)]
    pub parameters: Vec<TestParameter>,
    #[serde(default, deserialize_with = "scalars_as_strings")]
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TestStep {
    #[serde(default, deserialize_with = "scalar_or_empty")]
    pub step: String,
    #[serde(default, deserialize_with = "scalar_or_empty")]
    pub expected: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TestParameter {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "scalars_as_strings")]
    pub values: Vec<String>,
}

fn scalar(v: Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accepts a list of scalars (strings, numbers, booleans) or a single scalar.
fn scalars_as_strings<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::Sequence(items) => items.into_iter().filter_map(scalar).collect(),
        Value::Null => Vec::new(),
        other => scalar(other).into_iter().collect(),
    })
}

/// Any scalar as a string; mappings and sequences read as unset.
fn scalar_as_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar(Value::deserialize(de)?))
}

fn scalar_or_empty<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_as_string(de)?.unwrap_or_default())
}

/// Integers and numeric strings; anything else reads as unset.
fn lenient_priority<'de, D>(de: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::Number(n) => n.as_u64().and_then(|p| u32::try_from(p).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generated_document_with_mixed_scalars() {
        let doc = TestCaseDocument::from_yaml(
            "ado_testcases:\n  - title: Login\n    priority: 2\n    steps:\n      - step: Open\n        expected: Form\n    parameters:\n      - name: retries\n        values: [1, 2]\n    tags: [smoke, true]\n",
        )
        .unwrap();
        let rec = &doc.ado_testcases[0];
        assert_eq!(rec.title.as_deref(), Some("Login"));
        assert_eq!(rec.priority, Some(2));
        assert_eq!(rec.steps[0].expected, "Form");
        assert_eq!(rec.parameters[0].values, vec!["1", "2"]);
        assert_eq!(rec.tags, vec!["smoke", "true"]);
    }

    #[test]
    fn missing_fields_default() {
        let doc = TestCaseDocument::from_yaml("ado_testcases:\n  - title: Bare\n").unwrap();
        assert!(doc.ado_testcases[0].steps.is_empty());
        assert!(doc.ado_testcases[0].area_path.is_none());
    }

    #[test]
    fn mistyped_fields_do_not_reject_the_document() {
        let doc = TestCaseDocument::from_yaml(
            "ado_testcases:\n  - title: 404\n    area_path: [a, b]\n    priority: High\n    steps:\n      - step: Call endpoint\n        expected: 200\n    tags: [a]\n  - title: Second\n    priority: \"3\"\n",
        )
        .unwrap();
        let first = &doc.ado_testcases[0];
        assert_eq!(first.title.as_deref(), Some("404"));
        assert_eq!(first.area_path, None);
        assert_eq!(first.priority, None);
        assert_eq!(first.steps[0].expected, "200");
        assert_eq!(first.tags, vec!["a"]);
        assert_eq!(doc.ado_testcases[1].priority, Some(3));
    }
}
