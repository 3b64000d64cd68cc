//! Semantic retrieval against the vector store
//!
//! The store's response body is treated as untrusted: it goes through an
//! explicit parse step that either yields normalized hits or reports the
//! shape as unrecognized. Every failure degrades to "no hits" and is logged.

use serde_json::{Map, Value};
use std::sync::Arc;

use yakgwan_core::{DEFAULT_SOURCE_LABEL, Passage, RetrievedHit, VectorStore};

use crate::context::truncate_chars;

/// Retriever over any [`VectorStore`]
pub struct Retriever<V: VectorStore> {
    vector_store: Arc<V>,
    default_source: String,
}

impl<V: VectorStore> Retriever<V> {
    /// Create a new retriever
    pub fn new(vector_store: Arc<V>) -> Self {
        Self {
            vector_store,
            default_source: DEFAULT_SOURCE_LABEL.to_string(),
        }
    }

    /// Override the source label used for hits that carry none
    pub fn with_default_source(mut self, label: impl Into<String>) -> Self {
        self.default_source = label.into();
        self
    }

    /// Search `namespace` for passages relevant to `query`
    ///
    /// Hits keep the store's order. Transport errors and unrecognized
    /// response shapes yield an empty list.
    pub async fn search(&self, query: &str, top_k: usize, namespace: &str) -> Vec<RetrievedHit> {
        let response = match self
            .vector_store
            .search_records(namespace, query, top_k)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(namespace, top_k, error = %e, "vector search failed");
                return Vec::new();
            }
        };

        match parse_search_response(&response, &self.default_source) {
            Some(mut hits) => {
                hits.truncate(top_k);
                tracing::debug!(namespace, hits = hits.len(), "vector search completed");
                hits
            }
            None => {
                tracing::warn!(
                    namespace,
                    response = %preview(&response),
                    "unrecognized search response shape"
                );
                Vec::new()
            }
        }
    }
}

/// Normalize a search response into hits
///
/// Expects `result.hits` to be an array of objects. Each hit reads its id
/// from `_id` (or `id`), its score from `_score` (or `score`) and its payload
/// from `fields` (or `metadata`). Missing numbers default to 0, missing text
/// to the empty string and a missing source to `default_source`. Returns
/// `None` when the overall shape does not match.
pub fn parse_search_response(response: &Value, default_source: &str) -> Option<Vec<RetrievedHit>> {
    let hits = response.get("result")?.get("hits")?.as_array()?;

    hits.iter()
        .map(|hit| parse_hit(hit.as_object()?, default_source))
        .collect()
}

fn parse_hit(hit: &Map<String, Value>, default_source: &str) -> Option<RetrievedHit> {
    let empty = Map::new();
    let fields = hit
        .get("fields")
        .or_else(|| hit.get("metadata"))
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let id = hit
        .get("_id")
        .or_else(|| hit.get("id"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    let source_label = fields
        .get("source")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_source);

    Some(RetrievedHit {
        passage: Passage {
            id: id.to_string(),
            text: fields
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            source_label: source_label.to_string(),
            ordinal: as_count(fields.get("chunk_index")),
            length: as_count(fields.get("chunk_size")),
        },
        score: as_score(hit.get("_score").or_else(|| hit.get("score"))),
    })
}

fn as_score(value: Option<&Value>) -> f32 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0) as f32,
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

// Stores may hand integers back as floats ("3.0") or strings.
fn as_count(value: Option<&Value>) -> usize {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0) as usize,
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn preview(response: &Value) -> String {
    let rendered = response.to_string();
    let head = truncate_chars(&rendered, 200);
    if head.len() < rendered.len() {
        format!("{}...", head)
    } else {
        rendered
    }
}
