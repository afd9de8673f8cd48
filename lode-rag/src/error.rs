//! Error types for the `lode-rag` crate.

use thiserror::Error;

/// Errors that can occur in ingestion and query operations.
///
/// The chunk store itself never fails; these errors come from input
/// validation, ingestion policy, embedding backends and configuration.
#[derive(Debug, Error)]
pub enum RagError {
    /// A required input (document text, query string) was empty.
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    /// A document produced more chunks than the ingestion policy allows.
    #[error("document too big: {count} chunks exceeds the limit of {max}")]
    TooManyChunks {
        /// Number of chunks the document produced.
        count: usize,
        /// Configured per-document ceiling.
        max: usize,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
