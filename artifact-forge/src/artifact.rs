//! Artifact kinds and which of them an invocation produces.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Kind of generated artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    /// Step-based test-case YAML document.
    TestCase,
    /// TestNG automation-script skeleton.
    Script,
}

impl ArtifactType {
    /// File name the writer uses for this artifact.
    pub fn file_name(self) -> &'static str {
        match self {
            ArtifactType::TestCase => "ado_testcases.yaml",
            ArtifactType::Script => "TestSuiteGenerated.java",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactType::TestCase => "testcase",
            ArtifactType::Script => "script",
        }
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which artifacts one invocation generates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArtifactSelection {
    TestCase,
    Script,
    #[default]
    Both,
}

impl ArtifactSelection {
    /// Selected artifacts in generation order (test case before script).
    pub fn artifacts(self) -> &'static [ArtifactType] {
        match self {
            ArtifactSelection::TestCase => &[ArtifactType::TestCase],
            ArtifactSelection::Script => &[ArtifactType::Script],
            ArtifactSelection::Both => &[ArtifactType::TestCase, ArtifactType::Script],
        }
    }
}

impl FromStr for ArtifactSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testcase" | "test-case" | "test_case" => Ok(ArtifactSelection::TestCase),
            "script" => Ok(ArtifactSelection::Script),
            "both" => Ok(ArtifactSelection::Both),
            other => Err(format!(
                "unknown agent `{other}`; expected testcase, script or both"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_parses_and_orders() {
        let both: ArtifactSelection = "Both".parse().unwrap();
        assert_eq!(both.artifacts(), &[ArtifactType::TestCase, ArtifactType::Script]);
        assert_eq!(
            "script".parse::<ArtifactSelection>().unwrap().artifacts(),
            &[ArtifactType::Script]
        );
        assert!("all".parse::<ArtifactSelection>().is_err());
    }
}
