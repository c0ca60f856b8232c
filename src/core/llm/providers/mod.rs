//! LLM Provider Implementations
//!
//! Concrete implementations of the `LLMProvider` trait.

mod openai;

pub use openai::{OpenAIProvider, DEFAULT_BASE_URL};
