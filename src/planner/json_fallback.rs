//! Freeform-JSON planner: the fallback for backends without native tool
//! calling.
//!
//! The system prompt instructs the model to emit the decision as a raw JSON
//! object; the reply is parsed with [`Decision::parse_json_reply`]. An
//! unparseable reply is a [`PlanError::Parse`], which the agent loop counts
//! as a failed attempt rather than aborting the run.

use async_trait::async_trait;

use crate::agent::Transcript;
use crate::catalog::ToolCatalog;
use crate::error::PlanError;
use crate::llm::{CompletionRequest, LlmProvider};
use crate::planner::decision::Decision;
use crate::planner::prompt;
use crate::planner::{Planner, PlannerParams};

use std::sync::Arc;

pub struct JsonFallbackPlanner {
    llm: Arc<dyn LlmProvider>,
    params: PlannerParams,
}

impl JsonFallbackPlanner {
    pub fn new(llm: Arc<dyn LlmProvider>, params: PlannerParams) -> Self {
        Self { llm, params }
    }
}

#[async_trait]
impl Planner for JsonFallbackPlanner {
    async fn plan(
        &self,
        transcript: &Transcript,
        catalog: &ToolCatalog,
    ) -> Result<Decision, PlanError> {
        let system = prompt::system_prompt(catalog, true);
        let response = self
            .llm
            .complete(CompletionRequest {
                messages: prompt::transcript_messages(system, transcript),
                temperature: self.params.temperature,
                max_tokens: self.params.max_tokens,
            })
            .await?;

        Decision::parse_json_reply(&response.content)
    }
}
