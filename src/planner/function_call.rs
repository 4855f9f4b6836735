//! Function-call planner: the model selects a registered tool natively.
//!
//! Every catalog tool is exposed as an LLM tool definition (parameters
//! derived from its argument specs), plus a `finish` tool for declaring
//! completion. A plain-text reply with no tool call is treated as a final
//! answer rather than an error.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::agent::Transcript;
use crate::catalog::{ToolCatalog, ToolSpec};
use crate::error::PlanError;
use crate::llm::{LlmProvider, ToolCompletionRequest, ToolDefinition};
use crate::planner::decision::{ActionInput, Decision, FINISH_ACTION};
use crate::planner::prompt;
use crate::planner::{Planner, PlannerParams};

use std::sync::Arc;

pub struct FunctionCallPlanner {
    llm: Arc<dyn LlmProvider>,
    params: PlannerParams,
}

impl FunctionCallPlanner {
    pub fn new(llm: Arc<dyn LlmProvider>, params: PlannerParams) -> Self {
        Self { llm, params }
    }

    fn tool_definitions(catalog: &ToolCatalog) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> =
            catalog.iter().map(spec_to_definition).collect();
        definitions.push(finish_definition());
        definitions
    }
}

/// JSON Schema for one catalog tool, derived from its argument specs.
fn spec_to_definition(spec: &ToolSpec) -> ToolDefinition {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for arg in &spec.arguments {
        properties.insert(
            arg.name.clone(),
            json!({ "type": "string", "description": arg.description }),
        );
        if arg.required {
            required.push(Value::String(arg.name.clone()));
        }
    }

    ToolDefinition {
        name: spec.name.clone(),
        description: spec.description.clone(),
        parameters: json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }),
    }
}

fn finish_definition() -> ToolDefinition {
    ToolDefinition {
        name: FINISH_ACTION.to_string(),
        description: "Declare the goal achieved or impossible and provide the final answer."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "answer": {
                    "type": "string",
                    "description": "The final answer to report to the user."
                }
            },
            "required": ["answer"],
        }),
    }
}

#[async_trait]
impl Planner for FunctionCallPlanner {
    async fn plan(
        &self,
        transcript: &Transcript,
        catalog: &ToolCatalog,
    ) -> Result<Decision, PlanError> {
        let system = prompt::system_prompt(catalog, false);
        let response = self
            .llm
            .complete_with_tools(ToolCompletionRequest {
                messages: prompt::transcript_messages(system, transcript),
                tools: Self::tool_definitions(catalog),
                temperature: self.params.temperature,
                max_tokens: self.params.max_tokens,
            })
            .await?;

        let thought = response.content.unwrap_or_default();

        let Some(call) = response.tool_calls.into_iter().next() else {
            // No tool call: the model answered in prose. Treat it as final.
            tracing::debug!("model replied without a tool call; treating as final answer");
            return Ok(Decision::finish(thought));
        };

        let mut decision = Decision::new(thought, call.name, ActionInput::from_value(call.arguments));

        // The finish tool carries its answer in an "answer" argument.
        if decision.is_final {
            if let ActionInput::Mapping(map) = &decision.action_input {
                if let Some(answer) = map.get("answer").and_then(Value::as_str) {
                    decision.action_input = ActionInput::Scalar(answer.to_string());
                }
            }
        }

        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(required: bool) -> ToolSpec {
        serde_json::from_value(json!({
            "name": "math_tool",
            "description": "Evaluate an arithmetic expression",
            "script_path": "tools/math_tool.py",
            "arguments": [{
                "name": "expression",
                "option": "--expression",
                "description": "Expression to evaluate",
                "required": required
            }]
        }))
        .unwrap()
    }

    #[test]
    fn definition_schema_marks_required_arguments() {
        let def = spec_to_definition(&spec(true));
        assert_eq!(def.name, "math_tool");
        assert_eq!(def.parameters["required"], json!(["expression"]));
        assert_eq!(
            def.parameters["properties"]["expression"]["type"],
            json!("string")
        );

        let def = spec_to_definition(&spec(false));
        assert_eq!(def.parameters["required"], json!([]));
    }

    #[test]
    fn finish_tool_requires_an_answer() {
        let def = finish_definition();
        assert_eq!(def.name, FINISH_ACTION);
        assert_eq!(def.parameters["required"], json!(["answer"]));
    }
}
