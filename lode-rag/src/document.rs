//! Data types for documents, chunks, and search results.

use serde::{Deserialize, Serialize};

/// A source document waiting to be chunked and ingested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Label of the originating document (file name or document ID).
    pub source: String,
    /// The raw text content of the document.
    pub text: String,
}

impl Document {
    /// Create a document from a source label and its text.
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self { source: source.into(), text: text.into() }
    }
}

/// A segment of a [`Document`] with its vector embedding.
///
/// An empty `embedding` means no embedding was available; such a chunk
/// scores zero against every query.
///
/// Serialized with capitalized field names (`ID`, `Content`, `Source`,
/// `Embedding`) so existing clients of the query API keep working.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Chunk {
    /// Identifier, unique within one ingestion of a source.
    #[serde(rename = "ID")]
    pub id: String,
    /// The text content of the chunk.
    pub content: String,
    /// Label of the [`Document`] this chunk was cut from.
    pub source: String,
    /// The vector embedding for this chunk's content.
    pub embedding: Vec<f32>,
}

/// A retrieved [`Chunk`] paired with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Cosine similarity to the query, in `[-1, 1]` (higher is more relevant).
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_result_uses_capitalized_field_names() {
        let result = SearchResult {
            chunk: Chunk {
                id: "doc1-1".into(),
                content: "The cat sat.".into(),
                source: "doc1".into(),
                embedding: vec![1.0, 0.0],
            },
            score: 0.5,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Chunk": {
                    "ID": "doc1-1",
                    "Content": "The cat sat.",
                    "Source": "doc1",
                    "Embedding": [1.0, 0.0],
                },
                "Score": 0.5,
            })
        );
    }
}
