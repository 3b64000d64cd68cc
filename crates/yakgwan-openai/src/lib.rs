//! OpenAI integration for Yakgwan
//!
//! This crate provides the chat-completions implementation of the LLMProvider trait.

mod client;
mod config;

#[cfg(test)]
mod tests;

pub use client::OpenAIClient;
pub use config::OpenAIConfig;

// Re-export core types for convenience
pub use yakgwan_core::{
    ChatMessage, ChatRole, Error, GenerationConfig, GenerationResult, LLMProvider, Result,
};
