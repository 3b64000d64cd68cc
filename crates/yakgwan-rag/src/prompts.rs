//! Fixed instruction and answer texts

/// Instruction sent as the system message of every generation request
pub const SYSTEM_PROMPT: &str = "당신은 전문적인 보험 상담사입니다.
제공된 보험 약관 내용을 바탕으로 정확하고 도움이 되는 답변을 제공해주세요.

답변 지침:
1. 제공된 참고자료의 내용을 바탕으로만 답변하세요
2. 답변은 한국어로 명확하고 이해하기 쉽게 작성하세요
3. 구체적인 조항이나 절차가 있다면 정확히 인용하세요
4. 만약 제공된 자료에서 정확한 답변을 찾을 수 없다면, 그 점을 명시하고 보험회사에 직접 문의하도록 안내하세요
5. 답변은 3-4문장으로 간결하게 작성하세요";

/// Number of characters of the top excerpt echoed by the fallback answer
pub const FALLBACK_EXCERPT_CHARS: usize = 500;

/// Fallback answer when generation failed and there is no excerpt to echo
pub const FALLBACK_NO_CONTEXT: &str = "현재 답변을 생성할 수 없습니다. 보험회사에 직접 문의해주세요.";

const FALLBACK_PREFIX: &str = "검색된 약관 내용에 따르면: ";
const FALLBACK_REFERRAL: &str = "... 더 구체적인 정보는 보험회사에 직접 문의해주세요.";

/// Rank label placed above each excerpt in the assembled context (1-based)
pub fn context_label(rank: usize) -> String {
    format!("[참고자료 {}]", rank)
}

/// User message carrying the assembled context and the question
pub fn user_prompt(context: &str, query: &str) -> String {
    format!(
        "다음 보험 약관 내용을 참고하여 질문에 답변해주세요:\n\n{}\n\n질문: {}\n\n답변:",
        context.trim_end(),
        query.trim()
    )
}

/// Fallback answer echoing an excerpt of the top passage
pub fn fallback_with_excerpt(excerpt: &str) -> String {
    format!("{}{}{}", FALLBACK_PREFIX, excerpt, FALLBACK_REFERRAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_layout() {
        let prompt = user_prompt("[참고자료 1]\n제1조\n\n", "  성립 시기는?  ");
        assert!(prompt.starts_with("다음 보험 약관 내용을 참고하여"));
        assert!(prompt.contains("[참고자료 1]\n제1조\n\n질문: 성립 시기는?"));
        assert!(prompt.ends_with("답변:"));
    }

    #[test]
    fn test_fallback_with_excerpt_contains_referral() {
        let answer = fallback_with_excerpt("제3조 계약의 성립");
        assert!(answer.contains("제3조 계약의 성립"));
        assert!(answer.ends_with("보험회사에 직접 문의해주세요."));
    }
}
