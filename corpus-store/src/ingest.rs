//! Corpus ingestion: read reference files → split into windows → replace the index.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::backend::IndexBackend;
use crate::config::WindowConfig;
use crate::errors::IndexError;
use crate::progress::Progress;
use crate::record::{ReferenceDocument, TextWindow};
use crate::splitter::split_document;

/// File extensions picked up when a corpus path is a directory.
pub const CORPUS_EXTENSIONS: &[&str] = &["java", "yaml", "yml", "md", "txt", "json", "feature"];

/// Outcome of one ingestion run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexStats {
    pub documents: usize,
    pub windows: usize,
    pub duration_ms: u128,
}

/// Builds (and rebuilds) the reference index.
pub struct CorpusIndexer {
    backend: Arc<dyn IndexBackend>,
    window: WindowConfig,
}

impl CorpusIndexer {
    /// # Errors
    /// `IndexError::Config` if the window config is invalid.
    pub fn new(backend: Arc<dyn IndexBackend>, window: WindowConfig) -> Result<Self, IndexError> {
        window.validate()?;
        Ok(Self { backend, window })
    }

    /// Loads the corpus from files and directories.
    ///
    /// Directories are walked recursively in file-name order, keeping files
    /// with a [`CORPUS_EXTENSIONS`] extension. Missing, unreadable, non-UTF-8
    /// and blank files are skipped.
    pub fn load_documents(&self, paths: &[PathBuf]) -> Vec<ReferenceDocument> {
        let mut docs = Vec::new();
        for path in paths {
            if path.is_dir() {
                for entry in WalkDir::new(path)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|e| e.map_err(|err| warn!("walk error: {err}")).ok())
                    .filter(|e| e.file_type().is_file() && has_corpus_extension(e.path()))
                {
                    push_document(&mut docs, entry.path());
                }
            } else if path.is_file() {
                push_document(&mut docs, path);
            } else {
                warn!(path = %path.display(), "corpus path not found; skipping");
            }
        }
        info!(documents = docs.len(), "corpus loaded");
        docs
    }

    /// Splits `docs` and replaces the index with the resulting windows.
    ///
    /// # Errors
    /// Backend failures (embedding, I/O, Qdrant).
    pub async fn index_documents(
        &self,
        docs: &[ReferenceDocument],
        progress: &dyn Progress,
    ) -> Result<IndexStats, IndexError> {
        let started = Instant::now();
        progress.documents(docs.len());

        let mut windows: Vec<TextWindow> = Vec::new();
        for doc in docs {
            let split = split_document(doc, &self.window);
            progress.document_split(&doc.source, split.len());
            windows.extend(split);
        }

        progress.embedding(windows.len());
        let stored = self.backend.index(&windows).await?;

        let stats = IndexStats {
            documents: docs.len(),
            windows: stored,
            duration_ms: started.elapsed().as_millis(),
        };
        info!(
            backend = %self.backend.describe(),
            documents = stats.documents,
            windows = stats.windows,
            duration_ms = stats.duration_ms as u64,
            "ingestion complete"
        );
        progress.finished(&stats);
        Ok(stats)
    }

    /// [`load_documents`](Self::load_documents) followed by [`index_documents`](Self::index_documents).
    pub async fn ingest(
        &self,
        paths: &[PathBuf],
        progress: &dyn Progress,
    ) -> Result<IndexStats, IndexError> {
        let docs = self.load_documents(paths);
        self.index_documents(&docs, progress).await
    }
}

fn has_corpus_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| CORPUS_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn push_document(docs: &mut Vec<ReferenceDocument>, path: &Path) {
    match std::fs::read_to_string(path) {
        Ok(text) if text.trim().is_empty() => {
            debug!(path = %path.display(), "blank corpus file; skipping");
        }
        Ok(text) => docs.push(ReferenceDocument::new(path.display().to_string(), text)),
        Err(err) => warn!(path = %path.display(), "cannot read corpus file: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_index::LocalIndex;
    use crate::config::LocalIndexConfig;
    use crate::embed::hashing::HashingEmbedder;

    fn indexer(dir: &Path) -> CorpusIndexer {
        let backend = LocalIndex::new(
            LocalIndexConfig::new(dir.join("store")),
            Arc::new(HashingEmbedder::default()),
        );
        CorpusIndexer::new(Arc::new(backend), WindowConfig::default()).unwrap()
    }

    #[test]
    fn load_skips_missing_blank_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("corpus");
        std::fs::create_dir_all(corpus.join("nested")).unwrap();
        std::fs::write(corpus.join("a.md"), "login rules").unwrap();
        std::fs::write(corpus.join("nested/b.java"), "class Login {}").unwrap();
        std::fs::write(corpus.join("blank.txt"), "   \n").unwrap();
        std::fs::write(corpus.join("image.png"), "binary-ish").unwrap();

        let docs = indexer(dir.path()).load_documents(&[corpus, dir.path().join("missing.md")]);
        let names: Vec<_> = docs.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(names, vec!["login rules", "class Login {}"]);
    }

    #[tokio::test]
    async fn index_documents_reports_stats() {
        let dir = tempfile::tempdir().unwrap();
        let docs = vec![
            ReferenceDocument::new("a.md", "x ".repeat(1000)),
            ReferenceDocument::new("b.md", "short"),
        ];
        let stats = indexer(dir.path())
            .index_documents(&docs, &crate::progress::NoopProgress)
            .await
            .unwrap();
        assert_eq!(stats.documents, 2);
        assert!(stats.windows >= 4);
    }

    #[derive(Default)]
    struct Recorder(std::sync::Mutex<Vec<String>>);

    impl Progress for Recorder {
        fn documents(&self, total: usize) {
            self.0.lock().unwrap().push(format!("total {total}"));
        }
        fn document_split(&self, source: &str, windows: usize) {
            self.0.lock().unwrap().push(format!("{source}:{windows}"));
        }
        fn embedding(&self, windows: usize) {
            self.0.lock().unwrap().push(format!("embed {windows}"));
        }
        fn finished(&self, stats: &IndexStats) {
            self.0.lock().unwrap().push(format!("done {}", stats.windows));
        }
    }

    #[tokio::test]
    async fn progress_sees_every_document_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let docs = vec![
            ReferenceDocument::new("a.md", "first"),
            ReferenceDocument::new("b.md", "second"),
        ];
        let recorder = Recorder::default();
        indexer(dir.path())
            .index_documents(&docs, &recorder)
            .await
            .unwrap();
        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec!["total 2", "a.md:1", "b.md:1", "embed 2", "done 2"]
        );
    }
}
