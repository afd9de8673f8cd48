//! # lode-rag
//!
//! Core of the lode retrieval service: documents are split into sentence
//! chunks, each chunk is embedded, and chunks are kept in an in-memory store
//! that answers queries by brute-force cosine similarity.
//!
//! ## Overview
//!
//! - [`SentenceChunker`] groups period-delimited sentences into chunks
//! - [`EmbeddingProvider`] turns text into vectors; [`SimpleEmbeddingProvider`]
//!   is deterministic and local, `OpenAIEmbeddingProvider` (feature `openai`)
//!   calls a remote API
//! - [`InMemoryVectorStore`] holds chunks behind one read/write lock
//! - [`RagPipeline`] ties them together and applies the ingestion ceiling and
//!   the minimum-score filter
//!
//! ## Features
//!
//! - `openai` — OpenAI embedding provider

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod pipeline;
pub mod vectorstore;

#[cfg(feature = "openai")]
pub mod openai;

pub use chunking::{Chunker, SentenceChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, SearchResult};
pub use embedding::{EmbeddingProvider, SimpleEmbeddingProvider};
pub use error::{RagError, Result};
pub use inmemory::{InMemoryVectorStore, cosine_similarity};
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use vectorstore::VectorStore;

#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
