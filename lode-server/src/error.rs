//! HTTP error mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lode_rag::RagError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Errors surfaced to HTTP clients.
///
/// Client mistakes and policy rejections become `400`, bodies over the upload
/// ceiling `413`; failures of the service or its upstreams become `500`.
/// Every error is logged once, when it is turned into a response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input, or a document over the chunk ceiling.
    #[error("{0}")]
    BadRequest(String),

    /// The request body exceeded the configured upload ceiling.
    #[error("request body too large")]
    PayloadTooLarge,

    /// Text extraction or another server-side step failed.
    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Rag(#[from] RagError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn payload_too_large() -> Self {
        Self::PayloadTooLarge
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rag(RagError::EmptyInput(_) | RagError::TooManyChunks { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Rag(RagError::EmbeddingError { .. } | RagError::ConfigError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!(%status, error = %message, "request failed");
        } else {
            warn!(%status, error = %message, "request rejected");
        }
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
