//! Repair of raw generator output into the TestNG script skeleton.
//!
//! Only extra import/package declarations survive from the raw output. The
//! mandatory imports are always emitted canonically and the class body is
//! always the canonical `TestSuiteGenerated` skeleton.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Mandatory imports, in emission order.
pub const MANDATORY_IMPORTS: [&str; 3] = [
    "import org.testng.annotations.Test;",
    "import com.example.sqm.api.ApiClient;",
    "import com.example.sqm.web.WebClient;",
];

/// Canonical class emitted for every script.
pub const CANONICAL_CLASS: &str = r##"public class TestSuiteGenerated {
    private ApiClient api = new ApiClient();
    private WebClient web = new WebClient();

    @Test
    public void testGeneratedScenario() {
        // Generated test steps
        web.open("/login");
        web.type("#username", "admin");
        web.type("#password", "admin123");
        web.click("#submit");
        web.waitForVisible(".dashboard");
        api.post("/auth/login", "{\"username\":\"admin\",\"password\":\"admin123\"}");
        web.screenshot("login_success.png");
    }
}
"##;

/// Single well-formed `import`, `import static` or `package` statement.
static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:import(?:\s+static)?\s+[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*(?:\.\*)?|package\s+[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*)\s*;$",
    )
    .expect("declaration pattern is valid")
});

/// Counters describing what was taken from, or dropped from, the raw output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScriptReport {
    /// Extra declarations carried into the script.
    pub kept_declarations: usize,
    /// Declarations dropped as mandatory-framework, malformed or duplicate.
    pub dropped_declarations: usize,
    /// Lines of generated class content replaced by the canonical class.
    pub discarded_class_lines: usize,
}

/// Normalized TestNG script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedScript {
    pub text: String,
    pub report: ScriptReport,
}

/// Total: any input yields the canonical imports, kept extras and the canonical class.
pub fn normalize_script(raw: &str) -> NormalizedScript {
    let mut report = ScriptReport::default();
    let mut extras: Vec<&str> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut in_class = false;

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("import ") || trimmed.starts_with("package ") {
            if is_extra_declaration(trimmed) && seen.insert(trimmed) {
                extras.push(trimmed);
            } else {
                report.dropped_declarations += 1;
            }
        } else if in_class || line.contains("class ") {
            in_class = true;
            report.discarded_class_lines += 1;
        }
    }
    report.kept_declarations = extras.len();

    let mut text = String::new();
    for import in MANDATORY_IMPORTS {
        text.push_str(import);
        text.push('\n');
    }
    text.push('\n');
    for decl in &extras {
        text.push_str(decl);
        text.push('\n');
    }
    text.push('\n');
    text.push_str(CANONICAL_CLASS);

    debug!(?report, "script output normalized");
    NormalizedScript { text, report }
}

/// Well-formed declaration outside the TestNG/SQM framework packages.
fn is_extra_declaration(decl: &str) -> bool {
    let lower = decl.to_ascii_lowercase();
    !lower.contains("testng") && !lower.contains("sqm") && DECLARATION.is_match(decl)
}
