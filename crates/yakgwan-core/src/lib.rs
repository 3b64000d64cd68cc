//! Core traits and types for Yakgwan, a policy-terms question answering system
//!
//! This crate defines the data model that flows through the retrieval-augmented
//! answer pipeline, the capability-facing interfaces for the generation service,
//! the vector store and the answer engine, and the configuration value object
//! that is built once at startup and passed into every component.

pub mod config;
pub mod error;
pub mod llm;
pub mod rag;
pub mod types;
pub mod vector_store;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use llm::{ChatMessage, ChatRole, GenerationConfig, GenerationResult, LLMProvider};
pub use rag::RAGEngine;
pub use types::*;
pub use vector_store::VectorStore;
