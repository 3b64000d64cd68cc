//! Error types for Yakgwan

use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by every crate in the workspace
///
/// Retrieval and generation failures are recovered inside the pipeline and
/// never reach the caller of `ask`; the variants still exist because the
/// collaborators report them before recovery happens.
#[derive(Error, Debug)]
pub enum Error {
    #[error("LLM provider error: {0}")]
    LLMProvider(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Ingestion error: {0}")]
    Ingestion(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
