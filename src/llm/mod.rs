//! LLM integration for the agent.
//!
//! One provider: an OpenAI-compatible Chat Completions endpoint. Both
//! planner strategies run against the same [`LlmProvider`] trait.

mod openai_compatible;
mod provider;

pub use openai_compatible::OpenAiCompatibleProvider;
pub use provider::{
    ChatMessage, CompletionRequest, CompletionResponse, FinishReason, LlmProvider, Role, ToolCall,
    ToolCompletionRequest, ToolCompletionResponse, ToolDefinition,
};

use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::LlmError;

/// Create an LLM provider based on configuration.
pub fn create_llm_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let provider = OpenAiCompatibleProvider::new(config.clone())?;
    tracing::info!("LLM provider initialized: {}", provider.model_name());
    Ok(Arc::new(provider))
}
