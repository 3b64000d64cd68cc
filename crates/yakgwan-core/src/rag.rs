//! Answer engine trait

use async_trait::async_trait;

use crate::{AnswerResult, IndexStats, Result};

/// Trait for retrieval-augmented answer engines
///
/// This is the sole entry point the presentation layer consumes.
#[async_trait]
pub trait RAGEngine: Send + Sync {
    /// Answer a natural-language question from the indexed corpus
    ///
    /// Retrieval and generation failures degrade to a no-evidence or fallback
    /// answer; an `Err` means the request itself could not be served.
    async fn ask(&self, query: &str) -> Result<AnswerResult>;

    /// Get statistics about the underlying index
    async fn stats(&self) -> Result<IndexStats>;
}
