//! Pipeline orchestrator: retrieval, context assembly, synthesis

use async_trait::async_trait;
use std::sync::Arc;

use yakgwan_core::{
    AnswerResult, AppConfig, Error, IndexStats, LLMProvider, RAGEngine, Result, SourceRef,
    VectorStore,
};

use crate::context::{MAX_CONTEXT_PASSAGES, PER_PASSAGE_CAP, assemble};
use crate::retriever::Retriever;
use crate::synthesizer::AnswerSynthesizer;

/// Retrieval-augmented answer engine over policy terms
///
/// Holds no per-request state, so one engine can serve concurrent `ask`
/// calls as long as the store and the generation client allow it.
pub struct PolicyRagEngine<V: VectorStore, L: LLMProvider> {
    vector_store: Arc<V>,
    retriever: Retriever<V>,
    synthesizer: AnswerSynthesizer<L>,
    namespace: String,
    top_k: usize,
    max_context_length: usize,
}

impl<V: VectorStore, L: LLMProvider> PolicyRagEngine<V, L> {
    /// Create a new engine from a connected store, a generation client and the configuration
    pub fn new(vector_store: Arc<V>, llm: L, config: &AppConfig) -> Self {
        Self {
            retriever: Retriever::new(vector_store.clone()),
            vector_store,
            synthesizer: AnswerSynthesizer::from_app_config(llm, config),
            namespace: config.namespace.clone(),
            top_k: config.max_search_results,
            max_context_length: config.max_context_length,
        }
    }
}

#[async_trait]
impl<V: VectorStore + 'static, L: LLMProvider + 'static> RAGEngine for PolicyRagEngine<V, L> {
    async fn ask(&self, query: &str) -> Result<AnswerResult> {
        let question = query.trim();
        if question.is_empty() {
            return Err(Error::InvalidInput("question is empty".to_string()));
        }

        let hits = self
            .retriever
            .search(question, self.top_k, &self.namespace)
            .await;

        if hits.is_empty() {
            tracing::info!(namespace = %self.namespace, "no relevant passages found");
            return Ok(AnswerResult::no_evidence(query));
        }

        let top = &hits[..hits.len().min(MAX_CONTEXT_PASSAGES)];
        let context = assemble(top, PER_PASSAGE_CAP, self.max_context_length);
        tracing::debug!(
            hits = hits.len(),
            context_chars = context.chars().count(),
            "context assembled"
        );

        let answer = self.synthesizer.synthesize(question, &context, top).await;

        Ok(AnswerResult {
            answer: answer.text,
            sources: top.iter().map(SourceRef::from).collect(),
            query: query.to_string(),
            origin: answer.origin,
        })
    }

    async fn stats(&self) -> Result<IndexStats> {
        self.vector_store.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedLlm, StaticStore, UnreachableStore};
    use serde_json::json;
    use yakgwan_core::{AnswerOrigin, ChatMessage, GenerationConfig, NO_EVIDENCE_ANSWER};

    fn config() -> AppConfig {
        AppConfig::new("sk-test", "pc-test")
    }

    fn three_hits() -> StaticStore {
        StaticStore::with_hits(&[
            ("chunk_12", 0.91, "보험계약은 계약자의 청약과 회사의 승낙으로 이루어집니다.", 12),
            ("chunk_13", 0.85, "회사는 청약을 받은 날부터 30일 이내에 승낙 또는 거절하여야 합니다.", 13),
            ("chunk_40", 0.80, "계약자는 청약을 한 날부터 15일 이내에 청약을 철회할 수 있습니다.", 40),
            ("chunk_41", 0.42, "보험료 납입이 연체되는 경우 납입최고기간이 적용됩니다.", 41),
        ])
    }

    #[tokio::test]
    async fn test_ask_end_to_end() {
        let engine = PolicyRagEngine::new(
            Arc::new(three_hits()),
            ScriptedLlm::replying("보험계약은 청약과 승낙으로 성립합니다."),
            &config(),
        );

        let result = engine.ask("보험계약은 어떻게 성립되나요?").await.unwrap();

        assert_eq!(result.query, "보험계약은 어떻게 성립되나요?");
        assert_eq!(result.answer, "보험계약은 청약과 승낙으로 성립합니다.");
        assert_eq!(result.origin, AnswerOrigin::Generated);
        assert_eq!(result.sources.len(), 3);

        let scores: Vec<f32> = result.sources.iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![0.91, 0.85, 0.80]);
        for source in &result.sources {
            assert!(!source.id.is_empty());
            assert!(!source.content.is_empty());
        }
        assert_eq!(result.sources[0].chunk_index, 12);
        assert_eq!(result.sources[2].chunk_index, 40);
    }

    #[tokio::test]
    async fn test_ask_sends_only_top_three_to_generation() {
        let engine = PolicyRagEngine::new(
            Arc::new(three_hits()),
            ScriptedLlm::replying("답변"),
            &config(),
        );
        engine.ask("청약 철회").await.unwrap();

        let calls = engine.synthesizer_calls();
        let user_message = &calls[0].0[1].content;
        assert!(user_message.contains("[참고자료 3]"));
        assert!(!user_message.contains("[참고자료 4]"));
        assert!(!user_message.contains("납입최고기간"));
    }

    #[tokio::test]
    async fn test_ask_no_evidence() {
        let llm = ScriptedLlm::replying("unused");
        let engine = PolicyRagEngine::new(Arc::new(StaticStore::empty()), llm, &config());

        let result = engine.ask("완전히 무관한 질문").await.unwrap();

        assert!(result.sources.is_empty());
        assert_eq!(result.answer, NO_EVIDENCE_ANSWER);
        assert_eq!(result.query, "완전히 무관한 질문");
        assert_eq!(engine.synthesizer_calls().len(), 0);
    }

    #[tokio::test]
    async fn test_ask_no_evidence_when_store_unreachable() {
        let engine = PolicyRagEngine::new(
            Arc::new(UnreachableStore),
            ScriptedLlm::replying("unused"),
            &config(),
        );

        let result = engine.ask("보험금은 언제 지급되나요?").await.unwrap();
        assert_eq!(result.answer, NO_EVIDENCE_ANSWER);
        assert!(result.sources.is_empty());
    }

    #[tokio::test]
    async fn test_ask_no_evidence_on_malformed_response() {
        let store = StaticStore::new(json!({"result": {"matches": []}}));
        let engine = PolicyRagEngine::new(
            Arc::new(store),
            ScriptedLlm::replying("unused"),
            &config(),
        );

        let result = engine.ask("질문").await.unwrap();
        assert_eq!(result.origin, AnswerOrigin::NoEvidence);
    }

    #[tokio::test]
    async fn test_ask_falls_back_when_generation_fails() {
        let engine = PolicyRagEngine::new(
            Arc::new(three_hits()),
            ScriptedLlm::failing(),
            &config(),
        );

        let result = engine.ask("보험계약은 어떻게 성립되나요?").await.unwrap();

        assert_eq!(result.origin, AnswerOrigin::Fallback);
        assert!(result.answer.contains("보험계약은 계약자의 청약과 회사의 승낙으로"));
        assert_eq!(result.sources.len(), 3);
    }

    #[tokio::test]
    async fn test_ask_rejects_blank_question() {
        let engine = PolicyRagEngine::new(
            Arc::new(three_hits()),
            ScriptedLlm::replying("x"),
            &config(),
        );
        assert!(matches!(engine.ask("   ").await, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_ask_is_request_scoped() {
        let engine = Arc::new(PolicyRagEngine::new(
            Arc::new(three_hits()),
            ScriptedLlm::replying("답변"),
            &config(),
        ));

        let tasks: Vec<_> = (0..4)
            .map(|i| {
                let engine = engine.clone();
                tokio::spawn(async move { engine.ask(&format!("질문 {}", i)).await })
            })
            .collect();

        for (i, task) in tasks.into_iter().enumerate() {
            let result = task.await.unwrap().unwrap();
            assert_eq!(result.query, format!("질문 {}", i));
            assert_eq!(result.sources.len(), 3);
        }
    }

    type RecordedCall = (Vec<ChatMessage>, GenerationConfig);

    impl<V: VectorStore> PolicyRagEngine<V, ScriptedLlm> {
        fn synthesizer_calls(&self) -> Vec<RecordedCall> {
            self.synthesizer.llm().calls.lock().unwrap().clone()
        }
    }
}
