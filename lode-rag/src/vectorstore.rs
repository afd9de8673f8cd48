//! Vector store trait for holding chunks and searching them by similarity.

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};

/// A storage backend for embedded chunks with similarity search.
///
/// Every operation is total: dimension mismatches, empty stores and any
/// `top_k` have defined results, so nothing here returns an error.
///
/// # Example
///
/// ```rust,ignore
/// use lode_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.add(chunks).await;
/// let results = store.search(&query_embedding, 3).await;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Append chunks, preserving their order. No deduplication.
    async fn add(&self, chunks: Vec<Chunk>);

    /// Return the `top_k` chunks most similar to `embedding`.
    ///
    /// Results are ordered by descending similarity score. Fewer than
    /// `top_k` results are returned when fewer chunks are stored.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Vec<SearchResult>;

    /// Discard every stored chunk.
    async fn clear(&self);

    /// Number of stored chunks.
    async fn len(&self) -> usize;

    /// Whether the store holds no chunks.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
