//! Text extraction for uploaded documents.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read pdf text: {0}")]
    Failed(String),
    #[error("pdf extraction timed out after {0:?}")]
    TimedOut(Duration),
}

/// Pulls plain text out of an uploaded file.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, data: &[u8]) -> Result<String, ExtractError>;
}

/// Extracts PDF text with `pdf-extract` on the blocking thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    #[tracing::instrument(skip_all, fields(bytes = data.len()))]
    async fn extract_text(&self, data: &[u8]) -> Result<String, ExtractError> {
        let data = data.to_vec();
        let text = tokio::time::timeout(
            EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data)),
        )
        .await
        .map_err(|_| ExtractError::TimedOut(EXTRACTION_TIMEOUT))?
        // pdf-extract panics on some malformed input; the join error carries it.
        .map_err(|e| ExtractError::Failed(format!("extraction task failed: {e}")))?
        .map_err(|e| ExtractError::Failed(e.to_string()))?;

        tracing::debug!(chars = text.len(), "pdf text extracted");
        Ok(text)
    }
}

/// Flatten extracted text onto one line: line breaks become spaces, runs of
/// whitespace collapse to a single space, and the ends are trimmed.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
