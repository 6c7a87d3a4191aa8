//! Canned answers for running the pipeline without a model server.

use ai_llm_service::StubGenerator;

/// Test-case answer of the offline generator.
pub const OFFLINE_TESTCASE_RESPONSE: &str = "ado_testcases:
  - title: Generated Test
    area_path: Project\\Area
    priority: 2
    steps:
      - step: Login
        expected: Dashboard visible
    parameters:
      - name: env
        values: [dev, qa]
    tags: [automation, sqm]
";

/// Script answer of the offline generator.
pub const OFFLINE_SCRIPT_RESPONSE: &str = r##"import org.testng.annotations.Test;
public class TestSuiteGenerated {
  com.example.sqm.api.ApiClient api = new com.example.sqm.api.ApiClient();
  com.example.sqm.web.WebClient web = new com.example.sqm.web.WebClient();
  @Test
  public void testLogin() {
    web.open("/login"); web.type("#user", "demo"); web.type("#pass", "secret"); web.click("#submit");
    api.post("/auth/login", "{\"user\":\"demo\",\"pass\":\"secret\"}");
  }
}
"##;

/// Stub that answers test-case prompts with YAML and everything else with Java.
pub fn offline_generator() -> StubGenerator {
    StubGenerator::new(OFFLINE_SCRIPT_RESPONSE)
        .with_rule("ado_testcases:", OFFLINE_TESTCASE_RESPONSE)
        .with_rule("TestcaseAgent", OFFLINE_TESTCASE_RESPONSE)
}
