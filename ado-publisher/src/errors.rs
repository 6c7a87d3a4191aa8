use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("[ADO Publisher] config error: {0}")]
    Config(String),

    #[error("[ADO Publisher] invalid test-case document: {0}")]
    Document(#[from] serde_yml::Error),

    #[error("[ADO Publisher] cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[ADO Publisher] cannot encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("[ADO Publisher] transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("[ADO Publisher] HTTP {status} from {url}: {snippet}")]
    Status {
        status: u16,
        url: String,
        snippet: String,
    },
}
