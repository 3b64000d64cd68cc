//! Vector store implementations

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use url::Url;

use yakgwan_core::{AppConfig, Error, IndexStats, Passage, Result, VectorStore};

const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
const API_VERSION: &str = "2025-01";

/// Fields requested back from a search; the store maps them from the upserted record.
const RECORD_FIELDS: [&str; 4] = ["text", "source", "chunk_index", "chunk_size"];

/// Pinecone index with integrated inference (server-side embedding)
pub struct PineconeVectorStore {
    client: Client,
    api_key: String,
    index_name: String,
    host: Option<Url>,
    connected: bool,
}

/// Wire form of a passage on upsert
#[derive(Debug, Serialize)]
struct UpsertRecord<'a> {
    #[serde(rename = "_id")]
    id: &'a str,
    text: &'a str,
    source: &'a str,
    chunk_index: usize,
    chunk_size: usize,
}

impl<'a> From<&'a Passage> for UpsertRecord<'a> {
    fn from(passage: &'a Passage) -> Self {
        Self {
            id: &passage.id,
            text: &passage.text,
            source: &passage.source_label,
            chunk_index: passage.ordinal,
            chunk_size: passage.length,
        }
    }
}

#[derive(Deserialize)]
struct IndexDescription {
    host: String,
}

impl PineconeVectorStore {
    /// Create a new store for the configured index
    pub fn new(config: &AppConfig) -> Result<Self> {
        if config.pinecone_api_key.trim().is_empty() {
            return Err(Error::Configuration("PINECONE_API_KEY is empty".to_string()));
        }

        let host = config.index_host.as_deref().map(parse_host).transpose()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.pinecone_api_key.clone(),
            index_name: config.index_name.clone(),
            host,
            connected: false,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let host = self
            .host
            .as_ref()
            .filter(|_| self.connected)
            .ok_or_else(|| Error::VectorStore("Not connected. Call connect() first.".to_string()))?;
        data_plane_url(host, segments)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Authentication(format!(
                "Pinecone rejected the credential ({}): {}",
                status, error_text
            )));
        }
        Err(Error::VectorStore(format!(
            "Pinecone request failed with status {}: {}",
            status, error_text
        )))
    }
}

#[async_trait]
impl VectorStore for PineconeVectorStore {
    async fn connect(&mut self) -> Result<()> {
        if self.host.is_none() {
            let mut url = Url::parse(CONTROL_PLANE_URL)
                .map_err(|e| Error::Configuration(e.to_string()))?;
            url.path_segments_mut()
                .map_err(|_| Error::Configuration("invalid control plane URL".to_string()))?
                .extend(["indexes", self.index_name.as_str()]);

            let response = self.send(self.client.get(url)).await?;
            let description: IndexDescription = response
                .json()
                .await
                .map_err(|e| Error::Serialization(e.to_string()))?;

            self.host = Some(parse_host(&description.host)?);
        }

        tracing::info!(
            index = %self.index_name,
            host = %self.host.as_ref().map(Url::as_str).unwrap_or_default(),
            "connected to vector index"
        );
        self.connected = true;
        Ok(())
    }

    async fn search_records(&self, namespace: &str, query: &str, top_k: usize) -> Result<Value> {
        let url = self.endpoint(&["records", "namespaces", namespace, "search"])?;
        let body = json!({
            "query": {
                "inputs": {"text": query},
                "top_k": top_k,
            },
            "fields": RECORD_FIELDS,
        });

        let response = self.send(self.client.post(url).json(&body)).await?;
        response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    async fn upsert_records(&self, namespace: &str, passages: &[Passage]) -> Result<usize> {
        if passages.is_empty() {
            return Ok(0);
        }

        let url = self.endpoint(&["records", "namespaces", namespace, "upsert"])?;
        let body = to_ndjson(passages)?;

        self.send(
            self.client
                .post(url)
                .header("Content-Type", "application/x-ndjson")
                .body(body),
        )
        .await?;

        Ok(passages.len())
    }

    async fn stats(&self) -> Result<IndexStats> {
        let url = self.endpoint(&["describe_index_stats"])?;
        let response = self.send(self.client.post(url).json(&json!({}))).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        Ok(parse_index_stats(&body))
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Accept a bare host name or a full URL for the index host
fn parse_host(raw: &str) -> Result<Url> {
    let raw = raw.trim().trim_end_matches('/');
    let with_scheme = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let url = Url::parse(&with_scheme)
        .map_err(|e| Error::Configuration(format!("invalid index host {:?}: {}", raw, e)))?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(Error::Configuration(format!("invalid index host {:?}", raw)));
    }
    Ok(url)
}

fn data_plane_url(host: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = host.clone();
    url.path_segments_mut()
        .map_err(|_| Error::VectorStore(format!("index host {} cannot take a path", host)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn to_ndjson(passages: &[Passage]) -> Result<String> {
    let mut body = String::new();
    for passage in passages {
        body.push_str(&serde_json::to_string(&UpsertRecord::from(passage))?);
        body.push('\n');
    }
    Ok(body)
}

/// Read index statistics, accepting both camelCase and snake_case keys
pub fn parse_index_stats(body: &Value) -> IndexStats {
    let count = |value: &Value, camel: &str, snake: &str| {
        value
            .get(camel)
            .or_else(|| value.get(snake))
            .and_then(Value::as_u64)
            .unwrap_or(0)
    };

    let namespaces = body
        .get("namespaces")
        .and_then(Value::as_object)
        .map(|namespaces| {
            namespaces
                .iter()
                .map(|(name, info)| (name.clone(), count(info, "vectorCount", "vector_count")))
                .collect()
        })
        .unwrap_or_default();

    IndexStats {
        total_vector_count: count(body, "totalVectorCount", "total_vector_count"),
        dimension: body
            .get("dimension")
            .and_then(Value::as_u64)
            .and_then(|d| u32::try_from(d).ok()),
        namespaces,
    }
}

/// Local in-memory vector store implementation
///
/// Scores by keyword overlap instead of embeddings and answers searches in
/// the same `result.hits` shape as the hosted index.
pub struct LocalVectorStore {
    namespaces: Arc<RwLock<HashMap<String, BTreeMap<String, Passage>>>>,
    connected: bool,
}

impl LocalVectorStore {
    /// Create a new local vector store
    pub fn new() -> Self {
        Self {
            namespaces: Arc::new(RwLock::new(HashMap::new())),
            connected: false,
        }
    }

    /// Simple text-based similarity: share of query words found in the content
    fn text_similarity(query: &str, content: &str) -> f32 {
        let query_lower = query.to_lowercase();
        let content_lower = content.to_lowercase();

        let query_words: Vec<&str> = query_lower
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| !w.is_empty())
            .collect();

        if query_words.is_empty() {
            return 0.0;
        }

        let matches = query_words
            .iter()
            .filter(|word| content_lower.contains(*word))
            .count();

        matches as f32 / query_words.len() as f32
    }
}

impl Default for LocalVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn connect(&mut self) -> Result<()> {
        self.connected = true;
        Ok(())
    }

    async fn search_records(&self, namespace: &str, query: &str, top_k: usize) -> Result<Value> {
        let namespaces = self
            .namespaces
            .read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;

        let mut scored: Vec<(f32, &Passage)> = namespaces
            .get(namespace)
            .into_iter()
            .flat_map(|passages| passages.values())
            .map(|passage| (Self::text_similarity(query, &passage.text), passage))
            .filter(|(score, _)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.ordinal.cmp(&b.1.ordinal)));
        scored.truncate(top_k);

        let hits: Vec<Value> = scored
            .into_iter()
            .map(|(score, passage)| {
                json!({
                    "_id": passage.id,
                    "_score": score,
                    "fields": {
                        "text": passage.text,
                        "source": passage.source_label,
                        "chunk_index": passage.ordinal,
                        "chunk_size": passage.length,
                    }
                })
            })
            .collect();

        Ok(json!({"result": {"hits": hits}}))
    }

    async fn upsert_records(&self, namespace: &str, passages: &[Passage]) -> Result<usize> {
        let mut namespaces = self
            .namespaces
            .write()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;

        let records = namespaces.entry(namespace.to_string()).or_default();
        for passage in passages {
            records.insert(passage.id.clone(), passage.clone());
        }

        Ok(passages.len())
    }

    async fn stats(&self) -> Result<IndexStats> {
        let namespaces = self
            .namespaces
            .read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;

        let counts: BTreeMap<String, u64> = namespaces
            .iter()
            .map(|(name, records)| (name.clone(), records.len() as u64))
            .collect();

        Ok(IndexStats {
            total_vector_count: counts.values().sum(),
            dimension: None,
            namespaces: counts,
        })
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
