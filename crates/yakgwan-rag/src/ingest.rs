//! Write path: load a document, chunk it and upload the passages

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use yakgwan_core::{AppConfig, Error, Passage, Result, VectorStore};

use crate::chunker::{chunk_text, clean_text};
use crate::records::build_records;

/// Passages per upsert request
pub const UPLOAD_BATCH_SIZE: usize = 10;

/// Outcome of an upload run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    pub batches: usize,
    pub records: usize,
}

/// Turns documents into passages and writes them to a [`VectorStore`]
pub struct Ingestor<V: VectorStore> {
    vector_store: Arc<V>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl<V: VectorStore> Ingestor<V> {
    pub fn new(vector_store: Arc<V>, config: &AppConfig) -> Self {
        Self {
            vector_store,
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        }
    }

    /// Clean, chunk and label raw document text
    pub fn prepare(&self, text: &str, source_label: &str) -> Result<Vec<Passage>> {
        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            return Err(Error::Ingestion("document contains no text".to_string()));
        }

        let chunks = chunk_text(&cleaned, self.chunk_size, self.chunk_overlap);
        tracing::info!(
            chars = cleaned.chars().count(),
            chunks = chunks.len(),
            chunk_size = self.chunk_size,
            overlap = self.chunk_overlap,
            "document chunked"
        );

        Ok(build_records(&chunks, source_label))
    }

    /// Read a UTF-8 text document from disk and prepare its passages
    pub async fn ingest_file(
        &self,
        path: impl AsRef<Path>,
        source_label: &str,
    ) -> Result<Vec<Passage>> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::Ingestion(format!("failed to read {}: {}", path.display(), e))
        })?;

        self.prepare(&text, source_label)
    }

    /// Upsert passages in batches of [`UPLOAD_BATCH_SIZE`]
    ///
    /// Stops at the first failing batch; earlier batches stay written.
    pub async fn upload(&self, passages: &[Passage], namespace: &str) -> Result<UploadReport> {
        let mut report = UploadReport::default();

        for batch in passages.chunks(UPLOAD_BATCH_SIZE) {
            let written = self.vector_store.upsert_records(namespace, batch).await?;
            report.batches += 1;
            report.records += written;
            tracing::info!(
                namespace,
                batch = report.batches,
                records = written,
                total = report.records,
                "uploaded batch"
            );
        }

        Ok(report)
    }
}
