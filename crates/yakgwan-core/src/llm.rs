//! LLM provider trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;

/// Role of a message in a chat-style generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message of a chat-style generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Configuration for text generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: "gpt-4o-mini".to_string(),
            max_tokens: 500,
            temperature: 0.1,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Result of a text generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub model_id: String,
    pub tokens_used: Option<u32>,
}

/// Trait for text-generation services (e.g., OpenAI, a local model server)
///
/// Implementations are expected to be safe for concurrent use; the answer
/// pipeline shares one provider across all in-flight requests.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a reply with the provider's default configuration
    async fn generate(&self, messages: &[ChatMessage]) -> Result<GenerationResult>;

    /// Generate a reply with custom configuration
    async fn generate_with_config(
        &self,
        messages: &[ChatMessage],
        config: &GenerationConfig,
    ) -> Result<GenerationResult>;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
