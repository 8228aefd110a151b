//! LLM integration module.
//!
//! Provides the [`TextGenerator`] seam used by the response producers, the
//! two hosted backends behind it, and the concierge prompts.

mod client;
mod gemini;
mod prompts;

pub use client::{LlmClient, LlmResponse, Message, Role, TokenUsage};
pub use gemini::GeminiClient;
pub use prompts::Prompts;

use crate::config::{LlmConfig, Provider};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Anything that turns a system prompt and a user message into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, user: &str) -> Result<String>;
}

/// Build the generator selected by `config.provider`.
pub fn generator_for(config: &LlmConfig) -> Arc<dyn TextGenerator> {
    match config.provider {
        Provider::OpenAi => Arc::new(LlmClient::new(config.openai.clone())),
        Provider::Google => Arc::new(GeminiClient::new(config.google.clone())),
    }
}
