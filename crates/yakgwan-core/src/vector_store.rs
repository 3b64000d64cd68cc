//! Vector store trait

use async_trait::async_trait;

use crate::{IndexStats, Passage, Result};

/// Trait for vector stores with server-side embedding (e.g., Pinecone integrated inference)
///
/// The store embeds both the upserted passages and the raw query text, so no
/// embedding ever crosses this boundary.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Initialize the vector store connection
    async fn connect(&mut self) -> Result<()>;

    /// Run a semantic search with the raw query text
    ///
    /// Returns the store's response body untouched; its shape is not trusted
    /// and is normalized by the retriever.
    async fn search_records(
        &self,
        namespace: &str,
        query: &str,
        top_k: usize,
    ) -> Result<serde_json::Value>;

    /// Insert or replace passages by id, returning how many were written
    async fn upsert_records(&self, namespace: &str, passages: &[Passage]) -> Result<usize>;

    /// Describe the index contents
    async fn stats(&self) -> Result<IndexStats>;

    /// Check if the vector store is connected
    fn is_connected(&self) -> bool;
}
