//! Data model shared by the ingestion path and the answer pipeline

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provenance tag used when a document or a store hit carries no source label
pub const DEFAULT_SOURCE_LABEL: &str = "보험약관";

/// Fixed answer returned when retrieval produced no evidence at all
pub const NO_EVIDENCE_ANSWER: &str = "죄송합니다. 관련된 보험 약관 내용을 찾을 수 없습니다.";

/// A contiguous span of source text, as stored in the vector index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub id: String,
    pub text: String,
    pub source_label: String,
    /// Zero-based position within the source document. Traceability only.
    pub ordinal: usize,
    /// Character count of `text` when the passage was created.
    pub length: usize,
}

impl Passage {
    /// Create a passage, deriving `length` from `text`
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        source_label: impl Into<String>,
        ordinal: usize,
    ) -> Self {
        let text = text.into();
        let length = text.chars().count();
        Self {
            id: id.into(),
            text,
            source_label: source_label.into(),
            ordinal,
            length,
        }
    }
}

/// A passage returned by a similarity search, with the store's relevance score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedHit {
    #[serde(flatten)]
    pub passage: Passage,
    /// Store-defined scale, higher is more relevant.
    pub score: f32,
}

impl RetrievedHit {
    pub fn text(&self) -> &str {
        &self.passage.text
    }
}

/// Citation exposed to the presentation layer for one retrieved hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub id: String,
    pub score: f32,
    pub content: String,
    pub source: String,
    pub chunk_index: usize,
}

impl From<&RetrievedHit> for SourceRef {
    fn from(hit: &RetrievedHit) -> Self {
        Self {
            id: hit.passage.id.clone(),
            score: hit.score,
            content: hit.passage.text.clone(),
            source: hit.passage.source_label.clone(),
            chunk_index: hit.passage.ordinal,
        }
    }
}

/// How the answer text of an [`AnswerResult`] was produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOrigin {
    /// Synthesized by the generation service
    #[default]
    Generated,
    /// Deterministic text used because generation failed
    Fallback,
    /// Retrieval returned nothing; the answer is [`NO_EVIDENCE_ANSWER`]
    NoEvidence,
}

/// Response contract of `ask`
///
/// `sources` is empty if and only if `answer` is [`NO_EVIDENCE_ANSWER`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerResult {
    pub answer: String,
    pub sources: Vec<SourceRef>,
    pub query: String,
    #[serde(skip)]
    pub origin: AnswerOrigin,
}

impl AnswerResult {
    /// Terminal result for a query that retrieved no passages
    pub fn no_evidence(query: impl Into<String>) -> Self {
        Self {
            answer: NO_EVIDENCE_ANSWER.to_string(),
            sources: Vec::new(),
            query: query.into(),
            origin: AnswerOrigin::NoEvidence,
        }
    }

    pub fn has_evidence(&self) -> bool {
        !self.sources.is_empty()
    }

    /// Mean relevance score of the cited sources, if any
    pub fn average_score(&self) -> Option<f32> {
        if self.sources.is_empty() {
            return None;
        }
        let total: f32 = self.sources.iter().map(|s| s.score).sum();
        Some(total / self.sources.len() as f32)
    }
}

/// Summary of the vector index as reported by the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_vector_count: u64,
    pub dimension: Option<u32>,
    pub namespaces: BTreeMap<String, u64>,
}
