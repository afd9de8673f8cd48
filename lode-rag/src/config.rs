//! Configuration for the RAG pipeline.

use serde::{Deserialize, Serialize};

use crate::chunking::DEFAULT_MAX_SENTENCES;
use crate::error::{RagError, Result};

/// Configuration parameters for the RAG pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum number of sentences grouped into one chunk.
    pub max_sentences_per_chunk: usize,
    /// Documents producing more chunks than this are rejected whole.
    pub max_chunks_per_document: usize,
    /// Number of top results to return from vector search.
    pub top_k: usize,
    /// Minimum similarity score for results (results below this are filtered out).
    pub similarity_threshold: f32,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            max_sentences_per_chunk: DEFAULT_MAX_SENTENCES,
            max_chunks_per_document: 5,
            top_k: 3,
            similarity_threshold: 0.4,
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum number of sentences per chunk.
    pub fn max_sentences_per_chunk(mut self, sentences: usize) -> Self {
        self.config.max_sentences_per_chunk = sentences;
        self
    }

    /// Set the per-document chunk ceiling.
    pub fn max_chunks_per_document(mut self, chunks: usize) -> Self {
        self.config.max_chunks_per_document = chunks;
        self
    }

    /// Set the number of top results to return from vector search.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the minimum similarity threshold for filtering results.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `max_sentences_per_chunk == 0`
    /// - `max_chunks_per_document == 0`
    /// - `top_k == 0`
    /// - `similarity_threshold` is outside `[-1, 1]`
    pub fn build(self) -> Result<RagConfig> {
        let config = self.config;
        if config.max_sentences_per_chunk == 0 {
            return Err(RagError::ConfigError(
                "max_sentences_per_chunk must be greater than zero".to_string(),
            ));
        }
        if config.max_chunks_per_document == 0 {
            return Err(RagError::ConfigError(
                "max_chunks_per_document must be greater than zero".to_string(),
            ));
        }
        if config.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if !(-1.0..=1.0).contains(&config.similarity_threshold) {
            return Err(RagError::ConfigError(format!(
                "similarity_threshold ({}) must be within [-1, 1]",
                config.similarity_threshold
            )));
        }
        Ok(config)
    }
}
