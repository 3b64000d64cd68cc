//! Answer synthesis with a deterministic fallback

use yakgwan_core::{
    AnswerOrigin, AppConfig, ChatMessage, GenerationConfig, LLMProvider, RetrievedHit,
};

use crate::context::truncate_chars;
use crate::prompts::{
    FALLBACK_EXCERPT_CHARS, FALLBACK_NO_CONTEXT, SYSTEM_PROMPT, fallback_with_excerpt,
    user_prompt,
};

/// Answer text together with how it was produced
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAnswer {
    pub text: String,
    pub origin: AnswerOrigin,
}

/// Drives the generation service with the fixed instruction template
pub struct AnswerSynthesizer<L: LLMProvider> {
    llm: L,
    config: GenerationConfig,
}

impl<L: LLMProvider> AnswerSynthesizer<L> {
    /// Create a synthesizer with near-deterministic sampling and a 500-token ceiling
    pub fn new(llm: L) -> Self {
        let config = GenerationConfig {
            model_id: llm.model_id().to_string(),
            ..Default::default()
        };
        Self { llm, config }
    }

    /// Create a synthesizer using the configured model
    pub fn from_app_config(llm: L, app: &AppConfig) -> Self {
        let config = GenerationConfig {
            model_id: app.model.clone(),
            ..Default::default()
        };
        Self { llm, config }
    }

    pub fn generation_config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn llm(&self) -> &L {
        &self.llm
    }

    /// Produce the answer for `query` from the assembled `context`
    ///
    /// Never fails: when generation errors out or returns nothing usable, the
    /// answer falls back to an excerpt of the top hit (or a referral sentence
    /// when there are no hits).
    pub async fn synthesize(
        &self,
        query: &str,
        context: &str,
        hits: &[RetrievedHit],
    ) -> SynthesizedAnswer {
        let messages = build_messages(query, context);

        match self.llm.generate_with_config(&messages, &self.config).await {
            Ok(result) if !result.text.trim().is_empty() => SynthesizedAnswer {
                text: result.text.trim().to_string(),
                origin: AnswerOrigin::Generated,
            },
            Ok(_) => {
                tracing::warn!(
                    model = %self.config.model_id,
                    "generation returned no text, using fallback answer"
                );
                fallback(hits)
            }
            Err(e) => {
                tracing::warn!(
                    model = %self.config.model_id,
                    error = %e,
                    "generation failed, using fallback answer"
                );
                fallback(hits)
            }
        }
    }
}

/// System instruction followed by the context-and-question user message
pub fn build_messages(query: &str, context: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(user_prompt(context, query)),
    ]
}

/// Deterministic answer used when generation is unavailable
pub fn fallback_answer(hits: &[RetrievedHit]) -> String {
    match hits.first() {
        Some(top) => fallback_with_excerpt(truncate_chars(top.text(), FALLBACK_EXCERPT_CHARS)),
        None => FALLBACK_NO_CONTEXT.to_string(),
    }
}

fn fallback(hits: &[RetrievedHit]) -> SynthesizedAnswer {
    SynthesizedAnswer {
        text: fallback_answer(hits),
        origin: AnswerOrigin::Fallback,
    }
}
