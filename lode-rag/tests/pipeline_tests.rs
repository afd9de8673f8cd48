//! Ingestion and query behaviour of the RAG pipeline.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use lode_rag::{
    Document, EmbeddingProvider, InMemoryVectorStore, RagConfig, RagError, RagPipeline,
    SimpleEmbeddingProvider, VectorStore,
};

/// Counts calls and maps known words onto fixed directions.
#[derive(Default)]
struct KeywordEmbedder {
    calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> lode_rag::Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let text = text.to_lowercase();
        Ok(vec![
            if text.contains("rust") { 1.0 } else { 0.0 },
            if text.contains("python") { 1.0 } else { 0.0 },
            if text.contains("go") { 1.0 } else { 0.0 },
        ])
    }

    fn dimensions(&self) -> usize {
        3
    }
}

/// Always fails, like a remote provider without credentials.
struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> lode_rag::Result<Vec<f32>> {
        Err(RagError::EmbeddingError { provider: "test".into(), message: "offline".into() })
    }

    fn dimensions(&self) -> usize {
        3
    }
}

fn pipeline_with(
    embedder: Arc<dyn EmbeddingProvider>,
) -> (RagPipeline, Arc<InMemoryVectorStore>) {
    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline = RagPipeline::builder()
        .config(RagConfig::default())
        .embedding_provider(embedder)
        .vector_store(store.clone())
        .build()
        .unwrap();
    (pipeline, store)
}

#[tokio::test]
async fn ingest_then_query_returns_relevant_chunk() {
    let embedder = Arc::new(KeywordEmbedder::default());
    let (pipeline, _) = pipeline_with(embedder.clone());

    let added = pipeline
        .ingest(&Document::new(
            "langs",
            "Rust has ownership. Rust has lifetimes. Rust has traits. Python has a GIL.",
        ))
        .await
        .unwrap();
    assert_eq!(added, 2);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);

    let results = pipeline.query("python").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk.id, "langs-2");
    assert_eq!(results[0].chunk.content, "Python has a GIL.");
    assert!((results[0].score - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn empty_document_is_rejected_without_embedding() {
    let embedder = Arc::new(KeywordEmbedder::default());
    let (pipeline, store) = pipeline_with(embedder.clone());

    let err = pipeline.ingest(&Document::new("empty", "")).await.unwrap_err();
    assert!(matches!(err, RagError::EmptyInput(_)));
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn whitespace_document_stores_nothing() {
    let embedder = Arc::new(KeywordEmbedder::default());
    let (pipeline, _) = pipeline_with(embedder.clone());

    assert_eq!(pipeline.ingest(&Document::new("blank", "  . . ")).await.unwrap(), 0);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(pipeline.chunk_count().await, 0);
}

#[tokio::test]
async fn oversized_document_is_rejected_atomically() {
    let embedder = Arc::new(KeywordEmbedder::default());
    let (pipeline, store) = pipeline_with(embedder.clone());

    // 16 sentences at 3 per chunk make 6 chunks, one over the default ceiling.
    let text = "Rust is fast. ".repeat(16);
    let err = pipeline.ingest(&Document::new("big", text)).await.unwrap_err();

    assert!(matches!(err, RagError::TooManyChunks { count: 6, max: 5 }));
    assert_eq!(store.len().await, 0);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn document_at_the_ceiling_is_accepted() {
    let (pipeline, _) = pipeline_with(Arc::new(KeywordEmbedder::default()));
    let text = "Rust is fast. ".repeat(15);
    assert_eq!(pipeline.ingest(&Document::new("edge", text)).await.unwrap(), 5);
}

#[tokio::test]
async fn threshold_filters_weak_matches_but_search_keeps_them() {
    let (pipeline, _) = pipeline_with(Arc::new(KeywordEmbedder::default()));
    pipeline.ingest(&Document::new("a", "Rust and Go.")).await.unwrap();
    pipeline.ingest(&Document::new("b", "Python only.")).await.unwrap();

    // Both chunks exist; "python" is orthogonal to the first one.
    let raw = pipeline.search("python").await.unwrap();
    assert_eq!(raw.len(), 2);

    let filtered = pipeline.query("python").await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].chunk.source, "b");
}

#[tokio::test]
async fn nothing_above_threshold_is_an_empty_list() {
    let (pipeline, _) = pipeline_with(Arc::new(KeywordEmbedder::default()));
    pipeline.ingest(&Document::new("a", "Rust only.")).await.unwrap();

    assert!(pipeline.query("python").await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_query_is_rejected() {
    let (pipeline, _) = pipeline_with(Arc::new(KeywordEmbedder::default()));
    let err = pipeline.query("").await.unwrap_err();
    assert!(matches!(err, RagError::EmptyInput("query")));
}

#[tokio::test]
async fn query_on_empty_store_is_empty() {
    let (pipeline, _) = pipeline_with(Arc::new(SimpleEmbeddingProvider::new()));
    assert!(pipeline.query("anything at all").await.unwrap().is_empty());
}

#[tokio::test]
async fn failing_embedder_degrades_to_zero_similarity() {
    let (pipeline, store) = pipeline_with(Arc::new(FailingEmbedder));

    assert_eq!(pipeline.ingest(&Document::new("doc", "One. Two.")).await.unwrap(), 1);
    let stored = store.search(&[1.0, 0.0, 0.0], 10).await;
    assert_eq!(stored.len(), 1);
    assert!(stored[0].chunk.embedding.is_empty());

    let raw = pipeline.search("one").await.unwrap();
    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0].score, 0.0);
    assert!(pipeline.query("one").await.unwrap().is_empty());
}

#[tokio::test]
async fn reset_clears_the_store() {
    let (pipeline, _) = pipeline_with(Arc::new(KeywordEmbedder::default()));
    pipeline.ingest(&Document::new("a", "Rust. Go.")).await.unwrap();
    assert_eq!(pipeline.chunk_count().await, 1);

    pipeline.reset().await;
    assert_eq!(pipeline.chunk_count().await, 0);
    assert!(pipeline.search("rust").await.unwrap().is_empty());
}

#[tokio::test]
async fn top_k_caps_the_candidate_list() {
    let (pipeline, _) = pipeline_with(Arc::new(KeywordEmbedder::default()));
    for source in ["a", "b", "c", "d"] {
        pipeline.ingest(&Document::new(source, "Rust.")).await.unwrap();
    }

    let results = pipeline.query("rust").await.unwrap();
    assert_eq!(results.len(), 3);
    let sources: Vec<&str> = results.iter().map(|r| r.chunk.source.as_str()).collect();
    assert_eq!(sources, vec!["a", "b", "c"]);
}

#[test]
fn builder_requires_embedder_and_store() {
    let err = RagPipeline::builder().build().err().unwrap();
    assert!(matches!(err, RagError::ConfigError(_)));

    let err = RagPipeline::builder()
        .embedding_provider(Arc::new(SimpleEmbeddingProvider::new()))
        .build()
        .err()
        .unwrap();
    assert!(err.to_string().contains("vector_store"));
}
