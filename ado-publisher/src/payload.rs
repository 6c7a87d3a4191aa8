//! JSON-patch body for one Test Case work item.

use artifact_forge::{TestCaseRecord, TestStep};
use serde::{Deserialize, Serialize};

/// Title used when a record has none.
pub const DEFAULT_TITLE: &str = "Generated Test";

/// One `add` operation of a JSON-patch document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: String,
    pub path: String,
    pub value: serde_json::Value,
}

impl PatchOperation {
    fn add_field(field: &str, value: impl Into<serde_json::Value>) -> Self {
        Self {
            op: "add".to_string(),
            path: format!("/fields/{field}"),
            value: value.into(),
        }
    }
}

/// Builds the patch for `record`; `project` is the area path fallback.
pub fn build_patch(record: &TestCaseRecord, project: &str) -> Vec<PatchOperation> {
    let title = record
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(DEFAULT_TITLE);
    let area_path = record
        .area_path
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or(project);

    let mut ops = vec![
        PatchOperation::add_field("System.Title", title),
        PatchOperation::add_field("System.AreaPath", area_path),
        PatchOperation::add_field("System.Tags", record.tags.join(",")),
        PatchOperation::add_field("System.Description", description(record)),
    ];
    if let Some(priority) = record.priority {
        ops.push(PatchOperation::add_field(
            "Microsoft.VSTS.Common.Priority",
            priority,
        ));
    }
    if !record.steps.is_empty() {
        ops.push(PatchOperation::add_field(
            "Microsoft.VSTS.TCM.Steps",
            steps_xml(&record.steps),
        ));
    }
    ops
}

/// `Step: … | Expected: …` lines followed by `Parameter: name = v1, v2` lines.
pub fn description(record: &TestCaseRecord) -> String {
    record
        .steps
        .iter()
        .map(|s| format!("Step: {} | Expected: {}", s.step, s.expected))
        .chain(
            record
                .parameters
                .iter()
                .map(|p| format!("Parameter: {} = {}", p.name, p.values.join(", "))),
        )
        .collect::<Vec<_>>()
        .join("\n")
}

/// Test steps in the work-item steps XML format.
pub fn steps_xml(steps: &[TestStep]) -> String {
    let mut xml = format!(r#"<steps id="0" last="{}">"#, steps.len());
    for (i, s) in steps.iter().enumerate() {
        let kind = if s.expected.trim().is_empty() {
            "ActionStep"
        } else {
            "ValidateStep"
        };
        xml.push_str(&format!(
            r#"<step id="{}" type="{kind}"><parameterizedString isformatted="true">{}</parameterizedString><parameterizedString isformatted="true">{}</parameterizedString><description/></step>"#,
            i + 1,
            xml_escape(&s.step),
            xml_escape(&s.expected),
        ));
    }
    xml.push_str("</steps>");
    xml
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_forge::TestParameter;

    fn record() -> TestCaseRecord {
        TestCaseRecord {
            title: Some("Login".into()),
            area_path: None,
            priority: Some(1),
            steps: vec![TestStep {
                step: "Type <admin> & submit".into(),
                expected: "Dashboard".into(),
            }],
            parameters: vec![TestParameter {
                name: "env".into(),
                values: vec!["dev".into(), "qa".into()],
            }],
            tags: vec!["automation".into(), "sqm".into()],
        }
    }

    #[test]
    fn patch_carries_fields_and_defaults() {
        let ops = build_patch(&record(), "MyProject");
        let field = |name: &str| {
            ops.iter()
                .find(|o| o.path == format!("/fields/{name}"))
                .map(|o| o.value.clone())
        };
        assert!(ops.iter().all(|o| o.op == "add"));
        assert_eq!(field("System.Title").unwrap(), "Login");
        assert_eq!(field("System.AreaPath").unwrap(), "MyProject");
        assert_eq!(field("System.Tags").unwrap(), "automation,sqm");
        assert_eq!(
            field("System.Description").unwrap(),
            "Step: Type <admin> & submit | Expected: Dashboard\nParameter: env = dev, qa"
        );
        assert_eq!(field("Microsoft.VSTS.Common.Priority").unwrap(), 1);
        let xml = field("Microsoft.VSTS.TCM.Steps").unwrap();
        assert!(xml.as_str().unwrap().contains("Type &lt;admin&gt; &amp; submit"));
    }

    #[test]
    fn empty_record_uses_default_title() {
        let ops = build_patch(&TestCaseRecord::default(), "P");
        assert_eq!(ops[0].value, DEFAULT_TITLE);
        assert_eq!(ops.len(), 4);
    }
}
