//! In-test collaborators for the pipeline

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Mutex;

use yakgwan_core::{
    ChatMessage, Error, GenerationConfig, GenerationResult, IndexStats, LLMProvider, Passage,
    Result, VectorStore,
};

/// Store that answers every search with a fixed response body
pub struct StaticStore {
    pub response: Value,
    pub upserts: Mutex<Vec<(String, Vec<Passage>)>>,
    pub fail_upsert_at: Option<usize>,
}

impl StaticStore {
    pub fn new(response: Value) -> Self {
        Self {
            response,
            upserts: Mutex::new(Vec::new()),
            fail_upsert_at: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(json!({"result": {"hits": []}}))
    }

    /// Response shaped like an integrated-inference search with the given hits
    pub fn with_hits(hits: &[(&str, f32, &str, usize)]) -> Self {
        let hits: Vec<Value> = hits
            .iter()
            .map(|(id, score, text, chunk_index)| {
                json!({
                    "_id": id,
                    "_score": score,
                    "fields": {
                        "text": text,
                        "source": "보험약관",
                        "chunk_index": chunk_index,
                        "chunk_size": text.chars().count(),
                    }
                })
            })
            .collect();
        Self::new(json!({"result": {"hits": hits}, "usage": {"read_units": 1}}))
    }

    pub fn upsert_batches(&self) -> Vec<(String, Vec<Passage>)> {
        self.upserts.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorStore for StaticStore {
    async fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    async fn search_records(&self, _namespace: &str, _query: &str, _top_k: usize) -> Result<Value> {
        Ok(self.response.clone())
    }

    async fn upsert_records(&self, namespace: &str, passages: &[Passage]) -> Result<usize> {
        let mut upserts = self.upserts.lock().unwrap();
        if Some(upserts.len()) == self.fail_upsert_at {
            return Err(Error::VectorStore("upsert rejected".to_string()));
        }
        upserts.push((namespace.to_string(), passages.to_vec()));
        Ok(passages.len())
    }

    async fn stats(&self) -> Result<IndexStats> {
        Ok(IndexStats::default())
    }

    fn is_connected(&self) -> bool {
        true
    }
}

/// Store whose every call fails at the transport level
pub struct UnreachableStore;

#[async_trait]
impl VectorStore for UnreachableStore {
    async fn connect(&mut self) -> Result<()> {
        Err(Error::Network("connection refused".to_string()))
    }

    async fn search_records(&self, _namespace: &str, _query: &str, _top_k: usize) -> Result<Value> {
        Err(Error::Network("connection refused".to_string()))
    }

    async fn upsert_records(&self, _namespace: &str, _passages: &[Passage]) -> Result<usize> {
        Err(Error::Network("connection refused".to_string()))
    }

    async fn stats(&self) -> Result<IndexStats> {
        Err(Error::Network("connection refused".to_string()))
    }

    fn is_connected(&self) -> bool {
        false
    }
}

/// Generation service that returns a canned reply and records its prompts
pub struct ScriptedLlm {
    pub reply: Result<String>,
    pub calls: Mutex<Vec<(Vec<ChatMessage>, GenerationConfig)>>,
}

impl ScriptedLlm {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Err(Error::Timeout("generation timed out".to_string())),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LLMProvider for ScriptedLlm {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<GenerationResult> {
        self.generate_with_config(messages, &GenerationConfig::default()).await
    }

    async fn generate_with_config(
        &self,
        messages: &[ChatMessage],
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        self.calls
            .lock()
            .unwrap()
            .push((messages.to_vec(), config.clone()));

        match &self.reply {
            Ok(text) => Ok(GenerationResult {
                text: text.clone(),
                model_id: config.model_id.clone(),
                tokens_used: None,
            }),
            Err(e) => Err(Error::LLMProvider(e.to_string())),
        }
    }

    fn model_id(&self) -> &str {
        "scripted"
    }
}
