use std::sync::Arc;

use corpus_store::{
    ContextRetriever, CorpusIndexer, HashingEmbedder, IndexBackend, LocalIndex, LocalIndexConfig,
    NoopProgress, ReferenceDocument, WindowConfig,
};

fn local_backend(dir: &std::path::Path) -> Arc<dyn IndexBackend> {
    Arc::new(LocalIndex::new(
        LocalIndexConfig::new(dir),
        Arc::new(HashingEmbedder::default()),
    ))
}

#[tokio::test]
async fn near_duplicates_of_the_query_rank_first() {
    let dir = tempfile::tempdir().unwrap();
    let backend = local_backend(dir.path());

    let docs = vec![
        ReferenceDocument::new("billing.md", "Invoice export produces a CSV report per month."),
        ReferenceDocument::new("reset-1.md", "User resets password via emailed reset link."),
        ReferenceDocument::new("cart.md", "Shopping cart total includes tax and shipping."),
        ReferenceDocument::new("reset-2.md", "The user resets the password via an emailed reset link"),
        ReferenceDocument::new("admin.md", "Admin deactivates inactive accounts every night."),
    ];
    let indexer = CorpusIndexer::new(backend.clone(), WindowConfig::default()).unwrap();
    let stats = indexer.index_documents(&docs, &NoopProgress).await.unwrap();
    assert_eq!(stats.windows, 5);

    let retriever = ContextRetriever::new(backend);
    let ctx = retriever
        .retrieve("user resets password via emailed reset link", 3)
        .await
        .unwrap();

    assert_eq!(ctx.len(), 3);
    let mut top: Vec<&str> = ctx.entries()[..2].iter().map(|e| e.source.as_str()).collect();
    top.sort();
    assert_eq!(top, vec!["reset-1.md", "reset-2.md"]);
    assert!(ctx.entries().windows(2).all(|p| p[0].score >= p[1].score));
    assert!(ctx.render().starts_with("Source: reset-"));
}

#[tokio::test]
async fn missing_index_fails_instead_of_returning_empty_context() {
    let dir = tempfile::tempdir().unwrap();
    let retriever = ContextRetriever::new(local_backend(&dir.path().join("never-built")));

    let err = retriever.retrieve("anything", 6).await.unwrap_err();
    assert!(err.is_unavailable());

    let empty = retriever.retrieve("anything", 0).await.unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn large_k_returns_every_window() {
    let dir = tempfile::tempdir().unwrap();
    let backend = local_backend(dir.path());
    let indexer = CorpusIndexer::new(backend.clone(), WindowConfig::default()).unwrap();
    indexer
        .index_documents(
            &[
                ReferenceDocument::new("a.md", "alpha"),
                ReferenceDocument::new("b.md", "beta"),
            ],
            &NoopProgress,
        )
        .await
        .unwrap();

    let ctx = ContextRetriever::new(backend).retrieve("alpha", 100).await.unwrap();
    assert_eq!(ctx.len(), 2);
    assert_eq!(ctx.entries()[0].source, "a.md");
}
