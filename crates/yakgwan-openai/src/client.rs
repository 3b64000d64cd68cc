//! OpenAI chat-completions client implementation

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

use yakgwan_core::{ChatMessage, Error, GenerationConfig, GenerationResult, LLMProvider, Result};

use crate::config::OpenAIConfig;

/// OpenAI chat-completions client
pub struct OpenAIClient {
    config: OpenAIConfig,
    client: Client,
    current_model: String,
}

#[derive(Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    model: Option<String>,
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

impl OpenAIClient {
    /// Create a new OpenAI client from configuration
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        let current_model = config.model.clone();

        Ok(Self {
            config,
            client,
            current_model,
        })
    }

    pub(crate) fn request_body<'a>(
        messages: &'a [ChatMessage],
        config: &'a GenerationConfig,
    ) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &config.model_id,
            messages,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Perform the actual generation request
    async fn perform_generation(
        &self,
        messages: &[ChatMessage],
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        let request_body = Self::request_body(messages, config);

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(Error::Authentication(format!(
                    "OpenAI rejected the credential ({}): {}",
                    status, error_text
                )));
            }
            return Err(Error::LLMProvider(format!(
                "OpenAI API request failed with status {}: {}",
                status, error_text
            )));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        parse_completion(&response_text, &config.model_id)
    }
}

/// Extract the first choice's text from a chat-completions response body
pub(crate) fn parse_completion(body: &str, requested_model: &str) -> Result<GenerationResult> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| Error::Serialization(e.to_string()))?;

    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(Error::LLMProvider(
            "Empty response from OpenAI API".to_string(),
        ));
    }

    Ok(GenerationResult {
        text,
        model_id: parsed.model.unwrap_or_else(|| requested_model.to_string()),
        tokens_used: parsed.usage.map(|u| u.total_tokens),
    })
}

#[async_trait]
impl LLMProvider for OpenAIClient {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<GenerationResult> {
        let config = GenerationConfig {
            model_id: self.current_model.clone(),
            ..Default::default()
        };
        self.generate_with_config(messages, &config).await
    }

    async fn generate_with_config(
        &self,
        messages: &[ChatMessage],
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        let generation_future = self.perform_generation(messages, config);

        let result = match timeout(config.timeout, generation_future).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(Error::Timeout(format!(
                    "generation did not finish within {:?}",
                    config.timeout
                )));
            }
        };

        tracing::debug!(
            model = %result.model_id,
            tokens = ?result.tokens_used,
            chars = result.text.chars().count(),
            "generation completed"
        );

        Ok(result)
    }

    fn model_id(&self) -> &str {
        &self.current_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_completion_trims_text() {
        let body = r#"{
            "id": "chatcmpl-1",
            "model": "gpt-4o-mini-2024-07-18",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "  보험계약은 청약과 승낙으로 성립합니다.\n"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;

        let result = parse_completion(body, "gpt-4o-mini").unwrap();
        assert_eq!(result.text, "보험계약은 청약과 승낙으로 성립합니다.");
        assert_eq!(result.model_id, "gpt-4o-mini-2024-07-18");
        assert_eq!(result.tokens_used, Some(15));
    }

    #[test]
    fn test_parse_completion_rejects_unusable_responses() {
        let no_choices = r#"{"choices": []}"#;
        assert!(matches!(
            parse_completion(no_choices, "gpt-4o-mini"),
            Err(Error::LLMProvider(_))
        ));

        let null_content = r#"{"choices": [{"message": {"content": null}}]}"#;
        assert!(parse_completion(null_content, "gpt-4o-mini").is_err());

        let blank = r#"{"choices": [{"message": {"content": "   "}}]}"#;
        assert!(parse_completion(blank, "gpt-4o-mini").is_err());

        assert!(matches!(
            parse_completion("<html>bad gateway</html>", "gpt-4o-mini"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_model_defaults_to_config() {
        let client = OpenAIClient::new(OpenAIConfig::new("sk-test".to_string())).unwrap();
        assert_eq!(client.model_id(), "gpt-4o-mini");

        let mut app = yakgwan_core::AppConfig::new("sk-test", "pc-test");
        app.model = "gpt-4o".to_string();
        let client = OpenAIClient::new(OpenAIConfig::from_app_config(&app).unwrap()).unwrap();
        assert_eq!(client.model_id(), "gpt-4o");
    }
}
