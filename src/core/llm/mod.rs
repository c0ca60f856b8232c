//! LLM Client Module
//!
//! Completion-API plumbing used by the analysis pipeline:
//! - `types`: chat messages, requests, responses and the error taxonomy
//! - `provider`: the `LLMProvider` trait and model-selection helper
//! - `providers`: concrete provider implementations

pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{select_model_index, LLMProvider};
pub use providers::{OpenAIProvider, DEFAULT_BASE_URL};
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, LLMError, MessageRole, Result, TokenUsage,
};

#[cfg(test)]
pub use provider::MockLLMProvider;
