//! Context retrieval for generation requests.

use std::sync::Arc;

use tracing::{debug, info};

use crate::backend::IndexBackend;
use crate::errors::IndexError;
use crate::record::ScoredWindow;

/// Number of windows retrieved when the caller does not say otherwise.
pub const DEFAULT_TOP_K: usize = 6;

/// Ordered retrieval result, most similar first. Not deduplicated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RetrievedContext {
    entries: Vec<ScoredWindow>,
}

impl RetrievedContext {
    pub fn new(entries: Vec<ScoredWindow>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ScoredWindow] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prompt rendering: `Source: <source>\n<text>` blocks separated by a blank line.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("Source: {}\n{}", e.source, e.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Read-only view over an index backend.
#[derive(Clone)]
pub struct ContextRetriever {
    backend: Arc<dyn IndexBackend>,
}

impl ContextRetriever {
    pub fn new(backend: Arc<dyn IndexBackend>) -> Self {
        Self { backend }
    }

    /// Up to `k` windows most similar to `query`.
    ///
    /// `k == 0` returns an empty context without touching the index.
    ///
    /// # Errors
    /// [`IndexError::Unavailable`] when the index is absent or unreadable, or
    /// when it answers no windows for `k > 0`; other backend errors pass through.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<RetrievedContext, IndexError> {
        if k == 0 {
            debug!("retrieve called with k=0; returning empty context");
            return Ok(RetrievedContext::default());
        }

        let hits = self.backend.search(query, k).await?;
        if hits.is_empty() {
            return Err(IndexError::Unavailable(format!(
                "{} returned no windows",
                self.backend.describe()
            )));
        }

        info!(
            backend = %self.backend.describe(),
            k,
            hits = hits.len(),
            top_score = hits[0].score,
            "context retrieved"
        );
        Ok(RetrievedContext::new(hits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(source: &str, text: &str) -> ScoredWindow {
        ScoredWindow {
            id: source.into(),
            source: source.into(),
            text: text.into(),
            score: 0.5,
        }
    }

    #[test]
    fn render_tags_each_block_with_its_source() {
        let ctx = RetrievedContext::new(vec![hit("a.md", "alpha"), hit("b.java", "beta")]);
        assert_eq!(ctx.render(), "Source: a.md\nalpha\n\nSource: b.java\nbeta");
        assert_eq!(RetrievedContext::default().render(), "");
    }
}
