//! In-memory vector store using cosine similarity.
//!
//! This module provides [`InMemoryVectorStore`], a brute-force store backed
//! by a `Vec` protected by a `tokio::sync::RwLock`. Every search scores every
//! chunk; there is no index, no norm cache and no persistence.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::trace;

use crate::document::{Chunk, SearchResult};
use crate::vectorstore::VectorStore;

/// An in-memory vector store using cosine similarity for search.
///
/// Chunks live in a single append-only `Vec` in insertion order. `add` and
/// `clear` take the write lock; `search` and `len` share the read lock, so a
/// search never observes a half-applied `add`.
///
/// Chunks with equal scores keep their insertion order in search results.
///
/// # Example
///
/// ```rust,ignore
/// use lode_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.add(chunks).await;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    chunks: RwLock<Vec<Chunk>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 when the vectors differ in length, when either has zero
/// magnitude, or when the result is not a number.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let score = dot / (norm_a * norm_b);
    if score.is_nan() { 0.0 } else { score }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn add(&self, chunks: Vec<Chunk>) {
        let mut stored = self.chunks.write().await;
        stored.extend(chunks);
        trace!(total = stored.len(), "chunks added");
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Vec<SearchResult> {
        let stored = self.chunks.read().await;

        let mut scored: Vec<SearchResult> = stored
            .iter()
            .map(|chunk| SearchResult {
                chunk: chunk.clone(),
                score: cosine_similarity(embedding, &chunk.embedding),
            })
            .collect();

        // sort_by is stable: ties keep insertion order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        scored
    }

    async fn clear(&self) {
        self.chunks.write().await.clear();
    }

    async fn len(&self) -> usize {
        self.chunks.read().await.len()
    }
}
