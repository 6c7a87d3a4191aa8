//! Ingestion progress hooks. The indexer reports, the CLI draws.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::ingest::IndexStats;

/// Callbacks fired by [`CorpusIndexer::index_documents`](crate::CorpusIndexer::index_documents).
pub trait Progress: Send + Sync {
    fn documents(&self, _total: usize) {}
    fn document_split(&self, _source: &str, _windows: usize) {}
    fn embedding(&self, _windows: usize) {}
    fn finished(&self, _stats: &IndexStats) {}
}

/// Reports nothing.
#[derive(Default, Clone, Copy)]
pub struct NoopProgress;
impl Progress for NoopProgress {}

/// Terminal bar over documents, then a spinner while windows are embedded.
pub struct IndicatifProgress {
    pb: ProgressBar,
}

impl IndicatifProgress {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>4}/{len:4} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { pb }
    }
}

impl Default for IndicatifProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for IndicatifProgress {
    fn documents(&self, total: usize) {
        self.pb.set_length(total as u64);
    }

    fn document_split(&self, source: &str, windows: usize) {
        self.pb.inc(1);
        self.pb.set_message(format!("{source} ({windows} windows)"));
    }

    fn embedding(&self, windows: usize) {
        self.pb.set_style(
            ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        self.pb.enable_steady_tick(Duration::from_millis(100));
        self.pb.set_message(format!("embedding {windows} windows"));
    }

    fn finished(&self, stats: &IndexStats) {
        self.pb.finish_with_message(format!(
            "indexed {} windows from {} documents",
            stats.windows, stats.documents
        ));
    }
}
