//! Environment-driven server configuration.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use lode_rag::RagConfig;

/// Default request body ceiling for PDF uploads (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 << 20;

/// Which embedding backend the service is built with.
///
/// Defaults to OpenAI when the `openai` feature is compiled in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmbedderKind {
    /// Deterministic local character-count embeddings.
    #[cfg_attr(not(feature = "openai"), default)]
    Simple,
    /// Remote OpenAI embeddings API.
    #[cfg(feature = "openai")]
    #[default]
    OpenAI,
}

impl FromStr for EmbedderKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            #[cfg(feature = "openai")]
            "openai" => Ok(Self::OpenAI),
            other => bail!("unknown embedder '{other}'"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => bail!("unknown log format '{other}'"),
        }
    }
}

/// OpenAI provider settings. Unset fields keep the provider defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenAISettings {
    pub model: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub embedder: EmbedderKind,
    pub openai: OpenAISettings,
    /// Directory served for every path that is not an API route.
    pub frontend_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub log_format: LogFormat,
    pub rag: RagConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            embedder: EmbedderKind::default(),
            openai: OpenAISettings::default(),
            frontend_dir: PathBuf::from("./frontend"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_format: LogFormat::default(),
            rag: RagConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read the configuration from `LODE_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Unset or empty variables keep their defaults; values that are set but
    /// do not parse are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let mut rag = RagConfig::builder();
        if let Some(top_k) = parse_var(&get, "LODE_TOP_K")? {
            rag = rag.top_k(top_k);
        }
        if let Some(min_score) = parse_var(&get, "LODE_MIN_SCORE")? {
            rag = rag.similarity_threshold(min_score);
        }
        if let Some(max_chunks) = parse_var(&get, "LODE_MAX_CHUNKS")? {
            rag = rag.max_chunks_per_document(max_chunks);
        }
        if let Some(sentences) = parse_var(&get, "LODE_SENTENCES_PER_CHUNK")? {
            rag = rag.max_sentences_per_chunk(sentences);
        }

        Ok(Self {
            host: get("LODE_HOST").unwrap_or(defaults.host),
            port: parse_var(&get, "LODE_PORT")?.unwrap_or(defaults.port),
            embedder: parse_var(&get, "LODE_EMBEDDER")?.unwrap_or(defaults.embedder),
            openai: OpenAISettings {
                model: get("LODE_OPENAI_MODEL"),
                base_url: get("LODE_OPENAI_BASE_URL"),
            },
            frontend_dir: get("LODE_FRONTEND_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.frontend_dir),
            max_upload_bytes: parse_var(&get, "LODE_MAX_UPLOAD_BYTES")?
                .unwrap_or(defaults.max_upload_bytes),
            log_format: parse_var(&get, "LODE_LOG_FORMAT")?.unwrap_or(defaults.log_format),
            rag: rag.build().context("invalid retrieval settings")?,
        })
    }
}

fn parse_var<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| anyhow::anyhow!("invalid {key}={raw:?}: {e}"))
        })
        .transpose()
}
