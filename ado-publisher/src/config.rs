use std::fmt;

use crate::errors::PublishError;

pub const DEFAULT_ADO_BASE_URL: &str = "https://dev.azure.com";
pub const DEFAULT_ADO_API_VERSION: &str = "7.1-preview.3";

/// Azure DevOps connection settings.
///
/// Organization, project and PAT are only required for live publishing.
#[derive(Clone, Default)]
pub struct AdoConfig {
    pub base_url: String,
    pub organization: Option<String>,
    pub project: Option<String>,
    pub pat: Option<String>,
    pub api_version: String,
}

impl AdoConfig {
    pub fn new(
        organization: Option<String>,
        project: Option<String>,
        pat: Option<String>,
    ) -> Self {
        Self {
            base_url: DEFAULT_ADO_BASE_URL.to_string(),
            organization: non_empty(organization),
            project: non_empty(project),
            pat: non_empty(pat),
            api_version: DEFAULT_ADO_API_VERSION.to_string(),
        }
    }

    /// Credentials needed for a live push.
    ///
    /// # Errors
    /// `PublishError::Config` naming the first missing setting.
    pub fn live_credentials(&self) -> Result<(&str, &str, &str), PublishError> {
        let org = self
            .organization
            .as_deref()
            .ok_or_else(|| PublishError::Config("ADO organization is not set".into()))?;
        let project = self
            .project
            .as_deref()
            .ok_or_else(|| PublishError::Config("ADO project is not set".into()))?;
        let pat = self
            .pat
            .as_deref()
            .ok_or_else(|| PublishError::Config("ADO personal access token is not set".into()))?;
        Ok((org, project, pat))
    }

    /// `PATCH` target for creating a Test Case work item.
    pub fn work_item_url(&self) -> String {
        format!(
            "{}/{}/{}/_apis/wit/workitems/$Test%20Case?api-version={}",
            self.base_url.trim_end_matches('/'),
            self.organization.as_deref().unwrap_or_default(),
            self.project.as_deref().unwrap_or_default(),
            self.api_version
        )
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

// PAT stays out of logs.
impl fmt::Debug for AdoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdoConfig")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("pat", &self.pat.as_ref().map(|_| "***"))
            .field("api_version", &self.api_version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_matches_work_item_endpoint() {
        let cfg = AdoConfig::new(Some("myorg".into()), Some("MyProject".into()), None);
        assert_eq!(
            cfg.work_item_url(),
            "https://dev.azure.com/myorg/MyProject/_apis/wit/workitems/$Test%20Case?api-version=7.1-preview.3"
        );
    }

    #[test]
    fn live_requires_every_credential() {
        let cfg = AdoConfig::new(Some("o".into()), Some(" ".into()), Some("pat".into()));
        assert!(cfg.live_credentials().is_err());
        assert!(!format!("{cfg:?}").contains("pat\""));
    }
}
