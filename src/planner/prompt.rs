//! System prompt and transcript rendering shared by both planner strategies.

use serde_json::json;

use crate::agent::{HistoryEntry, Transcript};
use crate::catalog::ToolCatalog;
use crate::llm::ChatMessage;
use crate::planner::decision::FINISH_ACTION;

/// Render the tool overview: one block per tool with its argument schema.
fn tool_overview(catalog: &ToolCatalog) -> String {
    let mut lines = Vec::with_capacity(catalog.len());
    for tool in catalog.iter() {
        let arguments = if tool.arguments.is_empty() {
            "No arguments. Pass a plain string as action_input.".to_string()
        } else {
            tool.arguments
                .iter()
                .map(|arg| {
                    let requirement = if arg.required { "required" } else { "optional" };
                    format!(
                        "{} (option: {}) - {} ({})",
                        arg.name, arg.option, arg.description, requirement
                    )
                })
                .collect::<Vec<_>>()
                .join("; ")
        };
        lines.push(format!(
            "- {}: {} ({})\n  Arguments: {}",
            tool.name, tool.description, tool.script_path, arguments
        ));
    }
    lines.join("\n")
}

/// Build the system prompt for a run.
///
/// `json_replies` adds the output-shape instruction the freeform strategy
/// needs; the function-call strategy relies on native tool selection instead.
pub fn system_prompt(catalog: &ToolCatalog, json_replies: bool) -> String {
    let mut prompt = format!(
        "You are an assistant following the ReAct approach: reason about the \
         goal, pick at most one tool per step, observe its output, repeat.\n\
         Available tools:\n{}\n",
        tool_overview(catalog)
    );
    if json_replies {
        prompt.push_str(
            "Respond with a single JSON object with keys 'thought', 'action', \
             and 'action_input'. Always include 'action_input': a JSON object \
             mapping argument names to values when invoking a tool with defined \
             arguments, or an empty string when there is nothing to pass.\n",
        );
        prompt.push_str(&format!(
            "When the goal is achieved or impossible, set 'action' to \
             '{FINISH_ACTION}' and put the final answer in 'action_input'.\n"
        ));
    } else {
        prompt.push_str(&format!(
            "Call exactly one tool per step. When the goal is achieved or \
             impossible, call the '{FINISH_ACTION}' tool with the final answer.\n"
        ));
    }
    prompt
}

/// Render the transcript as role-tagged chat messages.
///
/// The goal becomes a user message; each iteration becomes an assistant
/// message (the decision as JSON) followed by a user message carrying the
/// observation.
pub fn transcript_messages(system: String, transcript: &Transcript) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(system)];
    for entry in transcript.entries() {
        match entry {
            HistoryEntry::Goal(goal) => {
                messages.push(ChatMessage::user(format!("Goal: {goal}")));
            }
            HistoryEntry::Step {
                decision,
                observation,
            } => {
                messages.push(ChatMessage::assistant(
                    json!({
                        "thought": decision.thought,
                        "action": decision.action,
                        "action_input": decision.action_input.to_value(),
                    })
                    .to_string(),
                ));
                messages.push(ChatMessage::user(
                    json!({
                        "observation": {
                            "stdout": observation.stdout,
                            "stderr": observation.stderr,
                            "exit_code": observation.exit_code,
                        }
                    })
                    .to_string(),
                ));
            }
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;
    use crate::planner::{ActionInput, Decision};
    use crate::tools::Observation;

    fn math_catalog() -> ToolCatalog {
        ToolCatalog::from_json(
            r#"[
                {
                    "name": "math_tool",
                    "description": "Evaluate an arithmetic expression",
                    "script_path": "tools/math_tool.py",
                    "arguments": [
                        {
                            "name": "expression",
                            "option": "--expression",
                            "description": "Expression to evaluate",
                            "required": true
                        }
                    ]
                }
            ]"#,
            "test",
        )
        .unwrap()
    }

    #[test]
    fn system_prompt_enumerates_tools_and_arguments() {
        let prompt = system_prompt(&math_catalog(), true);
        assert!(prompt.contains("math_tool"));
        assert!(prompt.contains("--expression"));
        assert!(prompt.contains("required"));
        assert!(prompt.contains("'thought'"));
        assert!(prompt.contains(FINISH_ACTION));
    }

    #[test]
    fn function_call_prompt_omits_json_shape() {
        let prompt = system_prompt(&math_catalog(), false);
        assert!(prompt.contains("math_tool"));
        assert!(!prompt.contains("'thought'"));
        assert!(prompt.contains(FINISH_ACTION));
    }

    #[test]
    fn transcript_renders_role_tagged_messages() {
        let mut transcript = Transcript::seeded("compute 2+3*4");
        transcript.record_step(
            Decision::new(
                "use the math tool",
                "math_tool",
                ActionInput::Scalar("2+3*4".to_string()),
            ),
            Observation {
                stdout: "14\n".to_string(),
                stderr: String::new(),
                exit_code: 0,
            },
        );

        let messages = transcript_messages("sys".to_string(), &transcript);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.contains("compute 2+3*4"));
        assert_eq!(messages[2].role, Role::Assistant);
        assert!(messages[2].content.contains("math_tool"));
        assert_eq!(messages[3].role, Role::User);
        assert!(messages[3].content.contains("14"));
    }
}
