//! OpenAI configuration

use serde::{Deserialize, Serialize};
use yakgwan_core::config::{DEFAULT_MODEL, DEFAULT_OPENAI_API_URL};
use yakgwan_core::{AppConfig, Error, Result};

/// Configuration for the OpenAI client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub api_url: String,
    pub model: String,
}

impl OpenAIConfig {
    /// Take the generation settings out of the application configuration
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        if config.openai_api_key.trim().is_empty() {
            return Err(Error::Configuration("OPENAI_API_KEY is empty".to_string()));
        }

        Ok(Self {
            api_key: config.openai_api_key.clone(),
            api_url: config.openai_api_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Create configuration with explicit values
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_url: DEFAULT_OPENAI_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub(crate) fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_url)
    }
}
