//! RAG pipeline orchestrator.
//!
//! The [`RagPipeline`] coordinates the ingest-and-query workflow by composing
//! an [`EmbeddingProvider`], a [`VectorStore`] and a [`Chunker`].
//!
//! # Example
//!
//! ```rust,ignore
//! use lode_rag::{InMemoryVectorStore, RagConfig, RagPipeline, SimpleEmbeddingProvider};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(SimpleEmbeddingProvider::new()))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .build()?;
//!
//! pipeline.ingest(&Document::new("doc1", "Some text. More text.")).await?;
//! let results = pipeline.query("search query").await?;
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::chunking::{Chunker, SentenceChunker};
use crate::config::RagConfig;
use crate::document::{Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// The RAG pipeline orchestrator.
///
/// Coordinates document ingestion (chunk → embed → store) and query
/// execution (embed → search → filter). Construct one via
/// [`RagPipeline::builder()`].
///
/// Embedding failures are soft: the affected chunk or query gets an empty
/// vector, which scores zero against everything, and a warning is logged.
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    async fn embed_or_empty(&self, text: &str) -> Vec<f32> {
        match self.embedding_provider.embed(text).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "embedding unavailable, continuing with empty vector");
                Vec::new()
            }
        }
    }

    /// Ingest a single document: chunk → embed → store.
    ///
    /// Returns the number of chunks stored. A document producing more chunks
    /// than `max_chunks_per_document` is rejected before anything is
    /// embedded or stored, so a rejected document never touches the store.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyInput`] if the document text is empty.
    /// - [`RagError::TooManyChunks`] if the document is over the chunk ceiling.
    pub async fn ingest(&self, document: &Document) -> Result<usize> {
        if document.text.is_empty() {
            return Err(RagError::EmptyInput("document text"));
        }

        let mut chunks = self.chunker.chunk(document);
        let count = chunks.len();
        let max = self.config.max_chunks_per_document;
        if count > max {
            warn!(source = %document.source, chunk_count = count, max, "document too big");
            return Err(RagError::TooManyChunks { count, max });
        }

        // Embeddings are computed before the store lock is taken.
        for chunk in &mut chunks {
            chunk.embedding = self.embed_or_empty(&chunk.content).await;
        }

        self.vector_store.add(chunks).await;
        info!(source = %document.source, chunk_count = count, "ingested document");

        Ok(count)
    }

    /// Embed the query and return the raw top-K results, unfiltered.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyInput`] if the query is empty.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        if query.is_empty() {
            return Err(RagError::EmptyInput("query"));
        }

        let query_embedding = self.embed_or_empty(query).await;
        let results = self.vector_store.search(&query_embedding, self.config.top_k).await;

        for result in &results {
            debug!(query, chunk = %result.chunk.id, score = result.score, "candidate");
        }

        Ok(results)
    }

    /// Query the pipeline: embed → search → filter by threshold.
    ///
    /// Returns search results ordered by descending score. Results below the
    /// configured `similarity_threshold` are dropped, so the list may be
    /// empty even when chunks are stored.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyInput`] if the query is empty.
    pub async fn query(&self, query: &str) -> Result<Vec<SearchResult>> {
        let candidates = self.search(query).await?;
        let candidate_count = candidates.len();

        let threshold = self.config.similarity_threshold;
        let filtered: Vec<SearchResult> =
            candidates.into_iter().filter(|r| r.score >= threshold).collect();

        info!(query, candidate_count, result_count = filtered.len(), "query completed");

        Ok(filtered)
    }

    /// Discard every stored chunk.
    pub async fn reset(&self) {
        self.vector_store.clear().await;
        info!("store cleared");
    }

    /// Number of chunks currently stored.
    pub async fn chunk_count(&self) -> usize {
        self.vector_store.len().await
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// `embedding_provider` and `vector_store` are required. Without an explicit
/// chunker, a [`SentenceChunker`] sized from the config is used.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = RagPipeline::builder()
///     .config(RagConfig::default())
///     .embedding_provider(Arc::new(embedder))
///     .vector_store(Arc::new(store))
///     .chunker(Arc::new(chunker))  // optional
///     .build()?;
/// ```
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration. Defaults to [`RagConfig::default()`].
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RagPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config = self.config.unwrap_or_default();
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let chunker = self.chunker.unwrap_or_else(|| {
            Arc::new(SentenceChunker::new(config.max_sentences_per_chunk)) as Arc<dyn Chunker>
        });

        Ok(RagPipeline { config, embedding_provider, vector_store, chunker })
    }
}
