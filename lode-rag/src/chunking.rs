//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`SentenceChunker`], which
//! groups a fixed number of period-delimited sentences into each chunk.

use crate::document::{Chunk, Document};

/// Default number of sentences grouped into one chunk.
pub const DEFAULT_MAX_SENTENCES: usize = 3;

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with content and provenance but no
/// embeddings. Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has no sentences.
    /// Each returned chunk has an empty embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text on the literal `.` and groups sentences into chunks.
///
/// Sentences are trimmed and empty ones are dropped. Up to `max_sentences`
/// consecutive sentences are re-joined with `". "` and closed with a
/// trailing period. Chunk IDs are `{source}-{n}` with `n` starting at 1.
///
/// # Example
///
/// ```rust,ignore
/// use lode_rag::{Document, SentenceChunker};
///
/// let chunker = SentenceChunker::new(3);
/// let chunks = chunker.chunk(&Document::new("doc1", "One. Two. Three. Four."));
/// assert_eq!(chunks.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    max_sentences: usize,
}

impl SentenceChunker {
    /// Create a new `SentenceChunker`.
    ///
    /// A `max_sentences` of zero is treated as one.
    pub fn new(max_sentences: usize) -> Self {
        Self { max_sentences: max_sentences.max(1) }
    }

    /// Maximum number of sentences per chunk.
    pub fn max_sentences(&self) -> usize {
        self.max_sentences
    }
}

impl Default for SentenceChunker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SENTENCES)
    }
}

impl Chunker for SentenceChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let sentences: Vec<&str> =
            document.text.split('.').map(str::trim).filter(|s| !s.is_empty()).collect();

        sentences
            .chunks(self.max_sentences)
            .enumerate()
            .map(|(i, group)| Chunk {
                id: format!("{}-{}", document.source, i + 1),
                content: format!("{}.", group.join(". ")),
                source: document.source.clone(),
                embedding: Vec::new(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_text(text: &str) -> Vec<Chunk> {
        SentenceChunker::default().chunk(&Document::new("test-doc", text))
    }

    #[test]
    fn four_sentences_make_two_chunks() {
        let chunks = chunk_text("Sentence one. Sentence two. Sentence three. Sentence four.");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "Sentence one. Sentence two. Sentence three.");
        assert_eq!(chunks[1].content, "Sentence four.");
        assert_eq!(chunks[0].id, "test-doc-1");
        assert_eq!(chunks[1].id, "test-doc-2");
        assert!(chunks.iter().all(|c| c.source == "test-doc" && c.embedding.is_empty()));
    }

    #[test]
    fn empty_input_makes_no_chunks() {
        assert!(chunk_text("").is_empty());
        assert!(chunk_text("   ").is_empty());
        assert!(chunk_text(". . ..").is_empty());
    }

    #[test]
    fn missing_final_period_is_added() {
        let chunks = chunk_text("no period here");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "no period here.");
    }

    #[test]
    fn blank_sentences_are_skipped() {
        let chunks = chunk_text("  One..  Two. \n . Three  ");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "One. Two. Three.");
    }

    #[test]
    fn decimal_points_split_sentences() {
        let chunks = chunk_text("Pi is 3.14");
        assert_eq!(chunks[0].content, "Pi is 3. 14.");
    }

    #[test]
    fn custom_group_size() {
        let chunker = SentenceChunker::new(1);
        let chunks = chunker.chunk(&Document::new("d", "A. B. C."));
        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["A.", "B.", "C."]);
        assert_eq!(SentenceChunker::new(0).max_sentences(), 1);
    }
}
