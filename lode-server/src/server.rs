use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::BytesRejection,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use lode_rag::{
    Document, EmbeddingProvider, InMemoryVectorStore, RagError, RagPipeline, SearchResult,
    SimpleEmbeddingProvider,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{debug, error, info, warn};

use crate::{
    config::{EmbedderKind, ServerConfig},
    error::ApiError,
    extract::{PdfTextExtractor, TextExtractor, normalize_text},
};

/// Source label given to documents uploaded as a raw text body.
pub const TEXT_UPLOAD_SOURCE: &str = "doc1";

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RagPipeline>,
    pub extractor: Arc<dyn TextExtractor>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// State around an existing pipeline, extracting PDFs with [`PdfTextExtractor`].
    pub fn new(pipeline: Arc<RagPipeline>) -> Self {
        Self { pipeline, extractor: Arc::new(PdfTextExtractor) }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Build a fresh, empty store and the pipeline around it.
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let pipeline = RagPipeline::builder()
            .config(config.rag.clone())
            .embedding_provider(build_embedding_provider(config))
            .vector_store(Arc::new(InMemoryVectorStore::new()))
            .build()
            .context("failed to assemble retrieval pipeline")?;
        Ok(Self::new(Arc::new(pipeline)))
    }
}

/// Pick the embedding backend named by the configuration.
pub fn build_embedding_provider(config: &ServerConfig) -> Arc<dyn EmbeddingProvider> {
    match config.embedder {
        EmbedderKind::Simple => {
            info!(provider = "simple", "using deterministic local embeddings");
            Arc::new(SimpleEmbeddingProvider::new())
        }
        #[cfg(feature = "openai")]
        EmbedderKind::OpenAI => {
            let mut provider = lode_rag::OpenAIEmbeddingProvider::from_env();
            if let Some(model) = &config.openai.model {
                provider = provider.with_model(model.clone());
            }
            if let Some(base_url) = &config.openai.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            if provider.has_api_key() {
                info!(provider = "openai", "using OpenAI embeddings");
            } else {
                warn!(
                    provider = "openai",
                    "OPENAI_API_KEY not set; every embedding will be empty"
                );
            }
            Arc::new(provider)
        }
    }
}

/// Upload routes share `max_upload_bytes` as their body ceiling.
pub fn app_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let body_limit = DefaultBodyLimit::max(config.max_upload_bytes);

    Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload_text).layer(body_limit))
        .route("/upload-pdf", post(upload_pdf).layer(body_limit))
        .route("/query", post(query))
        .route("/reset", post(reset))
        .fallback_service(ServeDir::new(&config.frontend_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    let app = app_router(state, &config);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid host/port {}:{}", config.host, config.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("lode listening on http://{}", addr);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("lode stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextUploadResponse {
    pub chunks_added: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PdfUploadResponse {
    pub chunks_added: usize,
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

async fn health() -> &'static str {
    "ok"
}

/// Ingest, reporting an over-ceiling document with `too_big` as the message.
async fn ingest(state: &AppState, document: Document, too_big: &str) -> Result<usize, ApiError> {
    state.pipeline.ingest(&document).await.map_err(|e| match e {
        RagError::TooManyChunks { .. } => ApiError::bad_request(too_big),
        other => other.into(),
    })
}

/// Map a failed multipart read, keeping the body-limit case distinct.
fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::payload_too_large();
    }
    debug!(error = %e, "malformed multipart body");
    ApiError::bad_request("failed to parse form")
}

/// Map a body that could not be buffered, keeping the body-limit case distinct.
fn body_error(e: BytesRejection) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::payload_too_large();
    }
    debug!(error = %e, "failed to read request body");
    ApiError::bad_request("failed to read body")
}

async fn upload_text(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<TextUploadResponse>, ApiError> {
    let body = body.map_err(body_error)?;
    if body.is_empty() {
        return Err(ApiError::bad_request("empty body"));
    }

    let bytes = body.len();
    let text = String::from_utf8_lossy(&body).into_owned();
    let document = Document::new(TEXT_UPLOAD_SOURCE, text);
    let chunks_added = ingest(&state, document, "text too big").await?;
    let stored = state.pipeline.chunk_count().await;
    info!(source = TEXT_UPLOAD_SOURCE, bytes, chunks_added, stored, "text uploaded");

    Ok(Json(TextUploadResponse { chunks_added }))
}

async fn upload_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PdfUploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        debug!(error = %e, "rejected multipart request");
        ApiError::bad_request("failed to parse form")
    })?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("unknown").to_string();
        let data = field.bytes().await.map_err(multipart_error)?;
        upload = Some((filename, data));
        break;
    }
    let (filename, data) = upload.ok_or_else(|| ApiError::bad_request("missing file field"))?;

    let raw = state.extractor.extract_text(&data).await.map_err(|e| {
        error!(filename = %filename, error = %e, "pdf extraction failed");
        ApiError::internal("failed to read pdf text")
    })?;

    let text = normalize_text(&raw);
    if text.is_empty() {
        return Err(ApiError::bad_request("no text extracted from pdf"));
    }

    let document = Document::new(filename.clone(), text);
    let chunks_added = ingest(&state, document, "pdf too big").await?;
    let stored = state.pipeline.chunk_count().await;
    info!(source = %filename, bytes = data.len(), chunks_added, stored, "pdf uploaded");

    Ok(Json(PdfUploadResponse { chunks_added, filename }))
}

async fn query(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let body = body.map_err(body_error)?;
    // The body is decoded regardless of Content-Type.
    let request: QueryRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "rejected query body");
        ApiError::bad_request("invalid json")
    })?;
    if request.query.is_empty() {
        return Err(ApiError::bad_request("query is required"));
    }

    Ok(Json(state.pipeline.query(&request.query).await?))
}

async fn reset(State(state): State<AppState>) -> impl IntoResponse {
    state.pipeline.reset().await;
    StatusCode::NO_CONTENT
}
