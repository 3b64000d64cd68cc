//! Snapshot tests for the OpenAI client

#[cfg(test)]
mod snapshot_tests {
    use crate::client::OpenAIClient;
    use crate::{ChatMessage, GenerationConfig, OpenAIConfig};
    use insta::assert_snapshot;
    use yakgwan_core::AppConfig;

    #[test]
    fn test_request_body_snapshot() {
        let messages = vec![
            ChatMessage::system("You are an insurance consultant."),
            ChatMessage::user("How is a contract formed?"),
        ];
        let config = GenerationConfig {
            model_id: "gpt-4o-mini".to_string(),
            max_tokens: 500,
            temperature: 0.5,
            ..Default::default()
        };

        let body =
            serde_json::to_string(&OpenAIClient::request_body(&messages, &config)).unwrap();

        assert_snapshot!(body, @r#"{"model":"gpt-4o-mini","messages":[{"role":"system","content":"You are an insurance consultant."},{"role":"user","content":"How is a contract formed?"}],"temperature":0.5,"max_tokens":500}"#);
    }

    #[test]
    fn test_config_from_app_config() {
        let mut app = AppConfig::new("sk-test", "pc-test");
        app.openai_api_url = "http://localhost:8080/v1/".to_string();

        let config = OpenAIConfig::from_app_config(&app).unwrap();
        assert_eq!(config.completions_url(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.model, "gpt-4o-mini");

        let serialized = serde_json::to_string(&config).unwrap();
        assert!(!serialized.contains("sk-test"));
    }

    #[test]
    fn test_config_requires_key() {
        let app = AppConfig::new(" ", "pc-test");
        assert!(OpenAIConfig::from_app_config(&app).is_err());
    }
}
