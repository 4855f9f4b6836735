//! Planning: turning the transcript into the next decision.
//!
//! Two interchangeable strategies behind one trait, selected once at
//! startup; the agent loop never branches on which one is active.

mod decision;
mod function_call;
mod json_fallback;
mod prompt;

pub use decision::{coerce_to_string, ActionInput, Decision, FINISH_ACTION};
pub use function_call::FunctionCallPlanner;
pub use json_fallback::JsonFallbackPlanner;

use std::sync::Arc;

use async_trait::async_trait;

use crate::agent::Transcript;
use crate::catalog::ToolCatalog;
use crate::config::{LlmConfig, PlannerStrategy};
use crate::error::PlanError;
use crate::llm::LlmProvider;

/// Sampling parameters shared by both strategies.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlannerParams {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl From<&LlmConfig> for PlannerParams {
    fn from(config: &LlmConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Produces one [`Decision`] per call from the transcript and catalog.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(
        &self,
        transcript: &Transcript,
        catalog: &ToolCatalog,
    ) -> Result<Decision, PlanError>;
}

/// Create a planner based on the configured strategy.
pub fn create_planner(config: &LlmConfig, llm: Arc<dyn LlmProvider>) -> Arc<dyn Planner> {
    let params = PlannerParams::from(config);
    match config.strategy {
        PlannerStrategy::FunctionCall => {
            tracing::info!("Using function-call planner");
            Arc::new(FunctionCallPlanner::new(llm, params))
        }
        PlannerStrategy::JsonFallback => {
            tracing::info!("Using freeform-JSON planner");
            Arc::new(JsonFallbackPlanner::new(llm, params))
        }
    }
}
