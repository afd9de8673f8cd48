//! Embedding provider trait and the deterministic local provider.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap a specific embedding backend behind a unified async
/// interface. The backend is picked once, when the pipeline is built.
///
/// # Example
///
/// ```rust,ignore
/// use lode_rag::{EmbeddingProvider, SimpleEmbeddingProvider};
///
/// let provider = SimpleEmbeddingProvider::new();
/// let embedding = provider.embed("hello world").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}

/// A deterministic, dependency-free embedding provider.
///
/// Produces a 4-dimensional vector of character counts:
/// `[length, vowels, consonants, spaces]`. Every character that is neither an
/// ASCII vowel nor a space counts as a consonant, punctuation included.
/// Identical input always yields the identical vector, which makes this the
/// provider of choice for tests and offline runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleEmbeddingProvider;

impl SimpleEmbeddingProvider {
    /// Create a new `SimpleEmbeddingProvider`.
    pub fn new() -> Self {
        Self
    }

    fn counts(text: &str) -> Vec<f32> {
        let (mut length, mut vowels, mut consonants, mut spaces) = (0.0f32, 0.0, 0.0, 0.0);
        for c in text.chars() {
            length += 1.0;
            match c {
                'a' | 'e' | 'i' | 'o' | 'u' | 'A' | 'E' | 'I' | 'O' | 'U' => vowels += 1.0,
                ' ' => spaces += 1.0,
                _ => consonants += 1.0,
            }
        }
        vec![length, vowels, consonants, spaces]
    }
}

#[async_trait]
impl EmbeddingProvider for SimpleEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(Self::counts(text))
    }

    fn dimensions(&self) -> usize {
        4
    }
}
