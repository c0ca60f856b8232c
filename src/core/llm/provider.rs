//! Completion provider trait.

use async_trait::async_trait;

use super::types::{ChatRequest, ChatResponse, Result};

/// Trait that completion backends implement.
///
/// Calls are awaited to completion by the caller; there is no streaming,
/// cancellation or retry at this layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Get the provider's unique identifier
    fn id(&self) -> &str;

    /// Send a chat completion request and return the first choice
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// List model identifiers currently available for selection
    async fn list_models(&self) -> Result<Vec<String>>;
}

/// Index of `current` in `models`, or 0 when it is no longer listed.
pub fn select_model_index(models: &[String], current: &str) -> usize {
    models.iter().position(|m| m == current).unwrap_or(0)
}
