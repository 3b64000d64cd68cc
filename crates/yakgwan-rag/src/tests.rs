//! Snapshot tests for the answer pipeline

#[cfg(test)]
mod snapshot_tests {
    use crate::testing::{ScriptedLlm, StaticStore};
    use crate::{PolicyRagEngine, RAGEngine, assemble, build_messages, parse_search_response};
    use insta::{assert_snapshot, assert_yaml_snapshot};
    use std::sync::Arc;
    use yakgwan_core::AppConfig;

    fn store() -> StaticStore {
        StaticStore::with_hits(&[
            ("chunk_12", 0.5, "The contract is formed by offer and acceptance.", 12),
            ("chunk_13", 0.25, "The insurer answers within 30 days.", 13),
        ])
    }

    #[test]
    fn test_generation_prompt_snapshot() {
        let hits = parse_search_response(&store().response, "policy-terms").unwrap();
        let context = assemble(&hits, 1000, 3000);
        let messages = build_messages("  How is the contract formed?  ", &context);

        assert_snapshot!(messages[1].content, @r"
        다음 보험 약관 내용을 참고하여 질문에 답변해주세요:

        [참고자료 1]
        The contract is formed by offer and acceptance.

        [참고자료 2]
        The insurer answers within 30 days.

        질문: How is the contract formed?

        답변:
        ");
    }

    #[tokio::test]
    async fn test_answer_result_snapshot() {
        let engine = PolicyRagEngine::new(
            Arc::new(store()),
            ScriptedLlm::replying("By offer and acceptance."),
            &AppConfig::new("sk-test", "pc-test"),
        );

        let result = engine.ask("How is the contract formed?").await.unwrap();

        assert_yaml_snapshot!(result, @r###"
        answer: By offer and acceptance.
        sources:
          - id: chunk_12
            score: 0.5
            content: The contract is formed by offer and acceptance.
            source: 보험약관
            chunk_index: 12
          - id: chunk_13
            score: 0.25
            content: The insurer answers within 30 days.
            source: 보험약관
            chunk_index: 13
        query: How is the contract formed?
        "###);
    }
}
