//! Azure DevOps publishing sink for generated test-case documents.
//!
//! Each record of an `ado_testcases` document becomes one Test Case work item,
//! created with a JSON-patch `PATCH` request. [`PublishMode::DryRun`] returns
//! the request it would send instead.

mod client;
mod config;
mod errors;
mod payload;

pub use client::{AdoPublisher, PublishMode, PublishOutcome};
pub use config::{AdoConfig, DEFAULT_ADO_API_VERSION, DEFAULT_ADO_BASE_URL};
pub use errors::PublishError;
pub use payload::{DEFAULT_TITLE, PatchOperation, build_patch, description, steps_xml};
