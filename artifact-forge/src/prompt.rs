//! Role prompt templates and placeholder interpolation.

use crate::artifact::ArtifactType;

/// Template for the test-case role.
pub const TESTCASE_TEMPLATE: &str = "Act as a TestcaseAgent. Using the context from SQM libraries and the ADO template, \
generate ADO-style test cases (non-linear, step-based).\n\n\
User Input:\n{user_input}\n\nContext:\n{context}\n\n\
Output YAML starting with 'ado_testcases:' using fields title, area_path, priority, \
steps (with step and expected), parameters, tags.";

/// Template for the script role.
pub const SCRIPT_TEMPLATE: &str = "Act as a ScriptAgent. Generate a Java TestNG class named 'TestSuiteGenerated' that \
uses com.example.sqm.api.ApiClient and com.example.sqm.web.WebClient reusable methods.\n\n\
User Input:\n{user_input}\n\nContext:\n{context}\n\n\
Include imports, field instances, and at least one @Test method calling api and web methods.";

/// Template used for `artifact`.
pub fn template_for(artifact: ArtifactType) -> &'static str {
    match artifact {
        ArtifactType::TestCase => TESTCASE_TEMPLATE,
        ArtifactType::Script => SCRIPT_TEMPLATE,
    }
}

/// Builds the generation prompt for `artifact`.
pub fn build_prompt(artifact: ArtifactType, user_input: &str, context: &str) -> String {
    interpolate(template_for(artifact), user_input, context)
}

/// Single-pass substitution of `{user_input}` and `{context}`.
///
/// Substituted values are copied as-is and never scanned again. Unknown
/// braces are kept literally.
pub fn interpolate(template: &str, user_input: &str, context: &str) -> String {
    let mut out = String::with_capacity(template.len() + user_input.len() + context.len());
    let mut rest = template;
    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix("{user_input}") {
            out.push_str(user_input);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{context}") {
            out.push_str(context);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_in_values_are_not_expanded() {
        let out = interpolate("[{user_input}|{context}]", "{context}", "ctx");
        assert_eq!(out, "[{context}|ctx]");
    }

    #[test]
    fn unknown_braces_survive() {
        assert_eq!(interpolate("{x} {user_input}", "u", "c"), "{x} u");
        assert_eq!(interpolate("", "u", "c"), "");
    }

    #[test]
    fn templates_name_their_schema() {
        let tc = build_prompt(ArtifactType::TestCase, "login works", "Source: a\nb");
        assert!(tc.contains("ado_testcases:"));
        assert!(tc.contains("User Input:\nlogin works\n"));
        assert!(tc.contains("Context:\nSource: a\nb\n"));

        let script = build_prompt(ArtifactType::Script, "", "");
        assert!(script.contains("TestSuiteGenerated"));
        assert!(script.contains("@Test"));
        assert!(!script.contains("{user_input}"));
    }
}
