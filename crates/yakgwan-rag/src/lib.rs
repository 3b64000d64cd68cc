//! Retrieval-augmented answer pipeline for Yakgwan
//!
//! This crate provides the chunker and record builder used on the write path,
//! the vector store implementations, and the read path that turns a question
//! into a cited answer: retrieval, context assembly and answer synthesis.

mod chunker;
mod context;
mod engine;
mod ingest;
mod prompts;
mod records;
mod retriever;
mod synthesizer;
mod vector_store;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod tests;

pub use chunker::{chunk_text, clean_text, split_sentences};
pub use context::{ELLIPSIS, MAX_CONTEXT_PASSAGES, PER_PASSAGE_CAP, assemble, truncate_chars};
pub use engine::PolicyRagEngine;
pub use ingest::{Ingestor, UPLOAD_BATCH_SIZE, UploadReport};
pub use prompts::{FALLBACK_NO_CONTEXT, SYSTEM_PROMPT};
pub use records::build_records;
pub use retriever::{Retriever, parse_search_response};
pub use synthesizer::{AnswerSynthesizer, SynthesizedAnswer, build_messages, fallback_answer};
pub use vector_store::{LocalVectorStore, PineconeVectorStore, parse_index_stats};

// Re-export core types for convenience
pub use yakgwan_core::{
    AnswerOrigin, AnswerResult, AppConfig, Error, IndexStats, Passage, RAGEngine, Result,
    RetrievedHit, SourceRef, VectorStore,
};
