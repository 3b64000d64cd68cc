//! Snapshot tests for the terminal rendering

#[cfg(test)]
mod snapshot_tests {
    use crate::{Transcript, debug_report, format_source, preview};
    use insta::{assert_snapshot, assert_yaml_snapshot};
    use std::collections::BTreeMap;
    use yakgwan_core::{AnswerOrigin, AnswerResult, IndexStats, SourceRef};

    fn result() -> AnswerResult {
        AnswerResult {
            answer: "청약과 승낙으로 성립합니다.".to_string(),
            sources: vec![
                SourceRef {
                    id: "chunk_12".to_string(),
                    score: 0.5,
                    content: "보험계약은 계약자의 청약과 회사의 승낙으로 이루어집니다.".to_string(),
                    source: "보험약관".to_string(),
                    chunk_index: 12,
                },
                SourceRef {
                    id: "chunk_13".to_string(),
                    score: 0.25,
                    content: "x".repeat(250),
                    source: "보험약관".to_string(),
                    chunk_index: 13,
                },
            ],
            query: "보험계약은 어떻게 성립되나요?".to_string(),
            origin: AnswerOrigin::Generated,
        }
    }

    fn stats() -> IndexStats {
        IndexStats {
            total_vector_count: 107,
            dimension: Some(1024),
            namespaces: BTreeMap::from([("auto".to_string(), 3), ("default".to_string(), 104)]),
        }
    }

    #[test]
    fn test_format_source_snapshot() {
        let rendered = format_source(1, &result().sources[0]);

        assert_snapshot!(rendered, @r"
        📄 참고자료 1 (점수: 0.500, 청크: 12)
        보험계약은 계약자의 청약과 회사의 승낙으로 이루어집니다.
        ");
    }

    #[test]
    fn test_debug_report() {
        let result = result();
        let mut transcript = Transcript::new();
        transcript.push_question(&result.query);
        transcript.push_answer(&result);

        let report = debug_report(Some(&result), Some(&stats()), &transcript);
        let lines: Vec<String> = report
            .iter()
            .take(10)
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect();

        assert_snapshot!(lines.join("\n"), @r"
        총 메시지 수: 2
        사용자 질문 수: 1
        봇 응답 수: 1
        총 벡터 수: 107
        벡터 차원: 1024
        네임스페이스 auto: 3개
        네임스페이스 default: 104개
        검색 결과 수: 2
        평균 검색 점수: 0.375
        답변 길이: 15자
        ");

        let (_, last) = &report[report.len() - 1];
        assert!(last.starts_with("id=chunk_13 chunk=13 source=보험약관 "));
        assert!(last.ends_with(&format!("{}...", "x".repeat(200))));
    }

    #[test]
    fn test_debug_report_without_answer() {
        let report = debug_report(None, Some(&stats()), &Transcript::new());
        assert_eq!(report.len(), 7);
        assert_eq!(report[3], ("총 벡터 수".to_string(), "107".to_string()));
    }

    #[test]
    fn test_debug_report_when_stats_unavailable() {
        let report = debug_report(None, None, &Transcript::new());
        assert_eq!(report.len(), 4);
        assert_eq!(report[3], ("인덱스 상태".to_string(), "조회 실패".to_string()));
    }

    #[test]
    fn test_transcript_entry_snapshot() {
        let mut transcript = Transcript::new();
        transcript.push_answer(&result());

        assert_yaml_snapshot!(transcript.entries()[0], {
            ".timestamp" => "[timestamp]",
            ".sources[].content" => "[content]",
        }, @r###"
        speaker: assistant
        content: 청약과 승낙으로 성립합니다.
        sources:
          - id: chunk_12
            score: 0.5
            content: "[content]"
            source: 보험약관
            chunk_index: 12
          - id: chunk_13
            score: 0.25
            content: "[content]"
            source: 보험약관
            chunk_index: 13
        timestamp: "[timestamp]"
        "###);
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("약관 내용", 2), "약관...");
        assert_eq!(preview("short", 10), "short");
    }
}
