//! Dry-run or live publishing of test-case records.

use std::path::Path;

use artifact_forge::{TestCaseDocument, TestCaseRecord};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::AdoConfig;
use crate::errors::PublishError;
use crate::payload::{PatchOperation, build_patch};

const JSON_PATCH: &str = "application/json-patch+json";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PublishMode {
    /// Echo the would-be request without network I/O.
    #[default]
    DryRun,
    /// Create the work item remotely.
    Live,
}

/// Result for one record.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PublishOutcome {
    DryRun {
        dry_run: bool,
        url: String,
        body: Vec<PatchOperation>,
    },
    Created(serde_json::Value),
}

pub struct AdoPublisher {
    cfg: AdoConfig,
    client: reqwest::Client,
}

impl AdoPublisher {
    /// # Errors
    /// [`PublishError::Http`] if the HTTP client cannot be built.
    pub fn new(cfg: AdoConfig) -> Result<Self, PublishError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { cfg, client })
    }

    pub fn config(&self) -> &AdoConfig {
        &self.cfg
    }

    /// Reads a test-case YAML file and publishes every record in order.
    ///
    /// # Errors
    /// I/O, YAML, config (live only) or HTTP failures; stops at the first failure.
    pub async fn publish_file(
        &self,
        path: &Path,
        mode: PublishMode,
    ) -> Result<Vec<PublishOutcome>, PublishError> {
        let text = std::fs::read_to_string(path).map_err(|source| PublishError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = TestCaseDocument::from_yaml(&text)?;
        self.publish_document(&doc, mode).await
    }

    pub async fn publish_document(
        &self,
        doc: &TestCaseDocument,
        mode: PublishMode,
    ) -> Result<Vec<PublishOutcome>, PublishError> {
        if mode == PublishMode::Live {
            self.cfg.live_credentials()?;
        }
        let mut out = Vec::with_capacity(doc.ado_testcases.len());
        for record in &doc.ado_testcases {
            out.push(self.publish_record(record, mode).await?);
        }
        info!(records = out.len(), ?mode, "test cases published");
        Ok(out)
    }

    /// Publishes one record.
    ///
    /// # Errors
    /// Missing credentials in live mode, transport errors or non-2xx answers.
    pub async fn publish_record(
        &self,
        record: &TestCaseRecord,
        mode: PublishMode,
    ) -> Result<PublishOutcome, PublishError> {
        let url = self.cfg.work_item_url();
        let body = build_patch(record, self.cfg.project.as_deref().unwrap_or_default());

        if mode == PublishMode::DryRun {
            debug!(%url, ops = body.len(), "dry run; not sending");
            return Ok(PublishOutcome::DryRun {
                dry_run: true,
                url,
                body,
            });
        }

        let (_, _, pat) = self.cfg.live_credentials()?;
        let resp = self
            .client
            .patch(&url)
            .basic_auth("", Some(pat))
            .header(CONTENT_TYPE, JSON_PATCH)
            .body(serde_json::to_vec(&body)?)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let snippet: String = text.trim().chars().take(240).collect();
            error!(%status, %url, %snippet, "work item creation failed");
            return Err(PublishError::Status {
                status: status.as_u16(),
                url,
                snippet,
            });
        }

        let created: serde_json::Value = resp.json().await?;
        info!(id = %created.get("id").unwrap_or(&serde_json::Value::Null), "work item created");
        Ok(PublishOutcome::Created(created))
    }
}
