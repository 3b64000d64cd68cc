//! Application configuration

use serde::Serialize;
use std::env;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

pub const DEFAULT_INDEX_NAME: &str = "insurance-terms-rag";
pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// Configuration value built once at process start and passed by reference
/// into every component constructor
#[derive(Clone, Serialize)]
pub struct AppConfig {
    #[serde(skip_serializing)]
    pub openai_api_key: String,
    #[serde(skip_serializing)]
    pub pinecone_api_key: String,
    pub index_name: String,
    /// Data-plane host of the index; resolved through the control plane when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_host: Option<String>,
    pub namespace: String,
    pub model: String,
    pub openai_api_url: String,
    pub max_search_results: usize,
    pub max_context_length: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub debug_mode: bool,
}

impl AppConfig {
    /// Create configuration with explicit credentials and default limits
    pub fn new(openai_api_key: impl Into<String>, pinecone_api_key: impl Into<String>) -> Self {
        Self {
            openai_api_key: openai_api_key.into(),
            pinecone_api_key: pinecone_api_key.into(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
            index_host: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            openai_api_url: DEFAULT_OPENAI_API_URL.to_string(),
            max_search_results: 5,
            max_context_length: 3000,
            chunk_size: 1000,
            chunk_overlap: 200,
            debug_mode: false,
        }
    }

    /// Create configuration from environment variables, loading `.env` first
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut missing = Vec::new();
        let openai_api_key = get("OPENAI_API_KEY").unwrap_or_else(|| {
            missing.push("OPENAI_API_KEY");
            String::new()
        });
        let pinecone_api_key = get("PINECONE_API_KEY").unwrap_or_else(|| {
            missing.push("PINECONE_API_KEY");
            String::new()
        });
        if !missing.is_empty() {
            return Err(Error::Configuration(format!(
                "required environment variables not set: {}",
                missing.join(", ")
            )));
        }

        let defaults = Self::new(openai_api_key, pinecone_api_key);

        let config = Self {
            index_name: get("PINECONE_INDEX_NAME").unwrap_or(defaults.index_name.clone()),
            index_host: get("PINECONE_INDEX_HOST"),
            namespace: get("PINECONE_NAMESPACE").unwrap_or(defaults.namespace.clone()),
            model: get("OPENAI_MODEL").unwrap_or(defaults.model.clone()),
            openai_api_url: get("OPENAI_API_URL").unwrap_or(defaults.openai_api_url.clone()),
            max_search_results: parse_or(&get, "MAX_SEARCH_RESULTS", defaults.max_search_results)?,
            max_context_length: parse_or(&get, "MAX_CONTEXT_LENGTH", defaults.max_context_length)?,
            chunk_size: parse_or(&get, "CHUNK_SIZE", defaults.chunk_size)?,
            chunk_overlap: parse_or(&get, "CHUNK_OVERLAP", defaults.chunk_overlap)?,
            debug_mode: get("DEBUG_MODE")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can drive the pipeline
    pub fn validate(&self) -> Result<()> {
        if self.openai_api_key.trim().is_empty() {
            return Err(Error::Configuration("OPENAI_API_KEY is empty".to_string()));
        }
        if self.pinecone_api_key.trim().is_empty() {
            return Err(Error::Configuration("PINECONE_API_KEY is empty".to_string()));
        }
        if self.index_name.trim().is_empty() {
            return Err(Error::Configuration("index name is empty".to_string()));
        }
        if self.max_search_results == 0 {
            return Err(Error::Configuration(
                "MAX_SEARCH_RESULTS must be at least 1".to_string(),
            ));
        }
        if self.max_context_length == 0 {
            return Err(Error::Configuration(
                "MAX_CONTEXT_LENGTH must be at least 1".to_string(),
            ));
        }
        if self.chunk_size <= self.chunk_overlap {
            return Err(Error::Configuration(format!(
                "CHUNK_SIZE ({}) must be greater than CHUNK_OVERLAP ({})",
                self.chunk_size, self.chunk_overlap
            )));
        }
        Ok(())
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            Error::Configuration(format!("{} must be a non-negative integer, got {:?}", key, raw))
        }),
        None => Ok(default),
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("openai_api_key", &"<redacted>")
            .field("pinecone_api_key", &"<redacted>")
            .field("index_name", &self.index_name)
            .field("index_host", &self.index_host)
            .field("namespace", &self.namespace)
            .field("model", &self.model)
            .field("openai_api_url", &self.openai_api_url)
            .field("max_search_results", &self.max_search_results)
            .field("max_context_length", &self.max_context_length)
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .field("debug_mode", &self.debug_mode)
            .finish()
    }
}
